use serde::{Deserialize, Serialize};

/// A flagged risk (`{level, description}`) or observed pattern (`{type, description}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    #[serde(alias = "type")]
    pub level: String,
    pub description: String,
}

/// Structured analysis produced by the text-generation service.
///
/// Deserialization accepts every reply shape the prompts ask for:
/// `riskFactors` or `patterns`, and `suggestions` or `positiveHighlights`.
/// `summary` is required; a reply without it is treated as unparseable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Insight {
    pub summary: String,
    #[serde(default)]
    pub recommendations: Vec<String>,
    #[serde(default, alias = "patterns")]
    pub risk_factors: Vec<Finding>,
    #[serde(default, alias = "positiveHighlights")]
    pub suggestions: Vec<String>,
}

impl Insight {
    /// Fixed insight returned whenever generation or parsing fails.
    pub fn fallback() -> Self {
        Self {
            summary: "Unable to generate insights at this time.".to_string(),
            recommendations: vec!["Please try again later.".to_string()],
            risk_factors: vec![Finding {
                level: "unknown".to_string(),
                description: "Insight analysis is currently unavailable.".to_string(),
            }],
            suggestions: Vec::new(),
        }
    }

    /// Fixed insight for a dashboard that has no check-ins to analyze yet.
    pub fn no_data() -> Self {
        Self {
            summary: "No check-ins recorded yet.".to_string(),
            recommendations: vec!["Submit a check-in to start seeing insights.".to_string()],
            risk_factors: Vec::new(),
            suggestions: Vec::new(),
        }
    }

    /// Merges a check-in analysis with a free-text analysis.
    /// Lists are concatenated in encounter order; duplicates are kept.
    pub fn combine(self, thoughts: Insight) -> Insight {
        let mut combined = self;
        combined.summary = format!(
            "{}\n\nThoughts Analysis: {}",
            combined.summary, thoughts.summary
        );
        combined.recommendations.extend(thoughts.recommendations);
        combined.risk_factors.extend(thoughts.risk_factors);
        combined.suggestions.extend(thoughts.suggestions);
        combined
    }
}
