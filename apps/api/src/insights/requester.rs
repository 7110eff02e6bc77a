//! Insight Requester: one prompt, one text-generation call, one typed `Insight`.
//!
//! `request_insight` collapses every failure path (transport error, API error,
//! empty reply, malformed JSON) into `Insight::fallback()`: callers never see an
//! error, operators see a `warn!` carrying the request flavor and the cause.

use thiserror::Error;
use tracing::{debug, warn};

use crate::insights::models::Insight;
use crate::insights::prompts::{
    INSIGHT_SYSTEM, PERSON_PROMPT_TEMPLATE, TEAM_PROMPT_TEMPLATE, THOUGHTS_PROMPT_TEMPLATE,
};
use crate::llm_client::prompts::JSON_OBJECT_ONLY;
use crate::llm_client::{strip_json_fences, LlmError, TextGenerator};
use crate::metrics::TeamMetrics;
use crate::models::checkin::CheckIn;

/// The three analysis flavors. They share the reply contract and the fallback
/// policy; only the prompt differs.
#[derive(Debug, Clone, Copy)]
pub enum InsightRequest<'a> {
    Person {
        user_name: &'a str,
        records: &'a [CheckIn],
        metrics: &'a TeamMetrics,
    },
    Thoughts {
        text: &'a str,
    },
    Team {
        records: &'a [CheckIn],
        metrics: &'a TeamMetrics,
    },
}

impl InsightRequest<'_> {
    pub fn flavor(&self) -> &'static str {
        match self {
            InsightRequest::Person { .. } => "person",
            InsightRequest::Thoughts { .. } => "thoughts",
            InsightRequest::Team { .. } => "team",
        }
    }

    fn build_prompt(&self) -> Result<String, serde_json::Error> {
        let prompt = match self {
            InsightRequest::Person {
                user_name,
                records,
                metrics,
            } => {
                let metrics_json = serde_json::to_string_pretty(metrics)?;
                let records_json = serde_json::to_string_pretty(records)?;
                let total = records.len().to_string();
                fill_template(
                    PERSON_PROMPT_TEMPLATE,
                    &[
                        ("{user_name}", *user_name),
                        ("{metrics_json}", metrics_json.as_str()),
                        ("{total}", total.as_str()),
                        ("{records_json}", records_json.as_str()),
                    ],
                )
            }
            InsightRequest::Thoughts { text } => {
                fill_template(THOUGHTS_PROMPT_TEMPLATE, &[("{thoughts}", *text)])
            }
            InsightRequest::Team { records, metrics } => {
                let metrics_json = serde_json::to_string_pretty(metrics)?;
                let records_json = serde_json::to_string_pretty(records)?;
                let total = records.len().to_string();
                fill_template(
                    TEAM_PROMPT_TEMPLATE,
                    &[
                        ("{metrics_json}", metrics_json.as_str()),
                        ("{total}", total.as_str()),
                        ("{records_json}", records_json.as_str()),
                    ],
                )
            }
        };
        Ok(prompt)
    }
}

/// Substitutes `{placeholder}` keys in one pass over the template. Inserted values
/// are never rescanned, so braces in names, notes or thoughts stay literal.
fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        match values.iter().find(|(key, _)| tail.starts_with(key)) {
            Some((key, value)) => {
                out.push_str(value);
                rest = &tail[key.len()..];
            }
            None => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// Why an insight request produced nothing usable.
#[derive(Debug, Error)]
pub enum InsightError {
    #[error("could not build prompt: {0}")]
    Prompt(serde_json::Error),

    #[error("text generation failed: {0}")]
    Generation(#[from] LlmError),

    #[error("reply was not a valid insight object: {0}")]
    Parse(serde_json::Error),
}

/// Issues exactly one generator call and parses the reply. Callers that must not
/// fail should use [`request_insight`] instead.
pub async fn try_request_insight(
    generator: &dyn TextGenerator,
    request: InsightRequest<'_>,
) -> Result<Insight, InsightError> {
    let prompt = request.build_prompt().map_err(InsightError::Prompt)?;
    let system = format!("{INSIGHT_SYSTEM} {JSON_OBJECT_ONLY}");
    let reply = generator.generate(&system, &prompt).await?;

    let insight = parse_insight_reply(&reply).map_err(|e| {
        debug!(
            "Unparseable {} reply: {:?}",
            request.flavor(),
            reply.chars().take(120).collect::<String>()
        );
        InsightError::Parse(e)
    })?;

    debug!(
        "Parsed {} insight: {} recommendations, {} findings",
        request.flavor(),
        insight.recommendations.len(),
        insight.risk_factors.len()
    );
    Ok(insight)
}

/// Requests one insight. Issues at most one generator call and never fails.
pub async fn request_insight(generator: &dyn TextGenerator, request: InsightRequest<'_>) -> Insight {
    try_request_insight(generator, request)
        .await
        .unwrap_or_else(|e| fallback_after(request.flavor(), &e))
}

/// Logs the failure and hands back the fixed fallback insight.
pub fn fallback_after(flavor: &str, error: &InsightError) -> Insight {
    warn!("Falling back: {flavor} insight unavailable: {error}");
    Insight::fallback()
}

/// Strict JSON parse of a reply. Markdown fences are tolerated; an empty reply is an error.
pub fn parse_insight_reply(reply: &str) -> Result<Insight, serde_json::Error> {
    serde_json::from_str(strip_json_fences(reply))
}
