//! Dashboard actions: the cache-or-request flow behind the insight endpoints.
//!
//! Flow: compute metrics → fingerprint → load cache entry → (hit) return it
//!       → (miss) one generator call → store on success → return.
//!
//! Calls run sequentially within an action; there is no fan-out.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::info;

use crate::errors::AppError;
use crate::insights::cache::{should_refetch, CacheScope, InsightCache};
use crate::insights::fingerprint::fingerprint;
use crate::insights::models::Insight;
use crate::insights::requester::{
    fallback_after, request_insight, try_request_insight, InsightRequest,
};
use crate::llm_client::TextGenerator;
use crate::metrics::{compute_team_metrics, TeamMetrics};
use crate::models::checkin::CheckIn;

#[derive(Debug, Clone, Serialize)]
pub struct InsightResponse {
    pub metrics: TeamMetrics,
    pub insight: Insight,
    /// True when the insight came from the cache without a generator call.
    pub cached: bool,
}

/// Team dashboard: one insight over every check-in, cached under [`CacheScope::Team`].
/// With no check-ins yet, the empty metrics come back with [`Insight::no_data`]
/// and the generator is not called.
pub async fn team_insight(
    cache: &InsightCache,
    generator: &dyn TextGenerator,
    records: &[CheckIn],
    today: NaiveDate,
) -> Result<InsightResponse, AppError> {
    let metrics = compute_team_metrics(records);
    if records.is_empty() {
        return Ok(InsightResponse {
            metrics,
            insight: Insight::no_data(),
            cached: false,
        });
    }

    let request = InsightRequest::Team {
        records,
        metrics: &metrics,
    };
    let (insight, cached) =
        cached_or_requested(cache, &CacheScope::Team, generator, records, request, today).await?;

    Ok(InsightResponse {
        metrics,
        insight,
        cached,
    })
}

/// Personal dashboard. Without `thoughts` the result is cached per person.
///
/// With `thoughts`, a free-text analysis runs after the check-in analysis and the
/// two are combined. Combined results bypass the cache: the fingerprint covers
/// check-ins only.
pub async fn person_insight(
    cache: &InsightCache,
    generator: &dyn TextGenerator,
    user_name: &str,
    records: &[CheckIn],
    thoughts: Option<&str>,
    today: NaiveDate,
) -> Result<InsightResponse, AppError> {
    let thoughts = thoughts.map(str::trim).filter(|t| !t.is_empty());
    if records.is_empty() && thoughts.is_none() {
        return Err(AppError::Validation(format!(
            "No check-ins found for '{user_name}'. Submit a check-in or share your thoughts first."
        )));
    }

    let metrics = compute_team_metrics(records);
    let request = InsightRequest::Person {
        user_name,
        records,
        metrics: &metrics,
    };

    let Some(text) = thoughts else {
        let scope = CacheScope::Person(user_name.to_string());
        let (insight, cached) =
            cached_or_requested(cache, &scope, generator, records, request, today).await?;
        return Ok(InsightResponse {
            metrics,
            insight,
            cached,
        });
    };

    let thoughts_request = InsightRequest::Thoughts { text };
    let insight = if records.is_empty() {
        request_insight(generator, thoughts_request).await
    } else {
        let checkin_insight = request_insight(generator, request).await;
        checkin_insight.combine(request_insight(generator, thoughts_request).await)
    };

    Ok(InsightResponse {
        metrics,
        insight,
        cached: false,
    })
}

async fn cached_or_requested(
    cache: &InsightCache,
    scope: &CacheScope,
    generator: &dyn TextGenerator,
    records: &[CheckIn],
    request: InsightRequest<'_>,
    today: NaiveDate,
) -> Result<(Insight, bool), AppError> {
    let source_hash = fingerprint(records)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to fingerprint check-ins: {e}")))?;

    if let Some(entry) = cache.load(scope).await {
        if !should_refetch(
            source_hash,
            Some(entry.last_fetch_date.as_str()),
            Some(entry.source_hash.as_str()),
            today,
        ) {
            info!("Insight cache hit for {scope}");
            return Ok((entry.insight, true));
        }
    }

    info!(
        "Insight cache miss for {scope}: requesting {} insight over {} check-ins",
        request.flavor(),
        records.len()
    );
    match try_request_insight(generator, request).await {
        Ok(insight) => {
            cache.store(scope, &insight, source_hash, today).await;
            Ok((insight, false))
        }
        // Fallbacks are not cached so the next load tries again.
        Err(e) => Ok((fallback_after(request.flavor(), &e), false)),
    }
}
