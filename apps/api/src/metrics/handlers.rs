use axum::{
    extract::{Query, State},
    Json,
};
use serde::Serialize;

use crate::checkins::handlers::UserNameQuery;
use crate::checkins::repository::list_check_ins;
use crate::errors::AppError;
use crate::metrics::calculator::{compute_team_metrics, TeamMetrics};
use crate::metrics::trends::{mood_distribution, trend_series, MoodDistribution, TrendPoint};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct MetricsResponse {
    pub metrics: TeamMetrics,
    pub mood_distribution: MoodDistribution,
    pub trend: Vec<TrendPoint>,
}

/// GET /api/v1/metrics
pub async fn handle_get_metrics(
    State(state): State<AppState>,
    Query(params): Query<UserNameQuery>,
) -> Result<Json<MetricsResponse>, AppError> {
    let check_ins = list_check_ins(&state.db, params.name()).await?;
    Ok(Json(MetricsResponse {
        metrics: compute_team_metrics(&check_ins),
        mood_distribution: mood_distribution(&check_ins),
        trend: trend_series(&check_ins),
    }))
}
