use axum::{extract::State, Json};
use chrono::Local;
use serde::Deserialize;

use crate::checkins::repository::list_check_ins;
use crate::errors::AppError;
use crate::insights::service::{person_insight, team_insight, InsightResponse};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct PersonInsightRequest {
    pub user_name: String,
    #[serde(default)]
    pub thoughts: Option<String>,
}

/// GET /api/v1/insights/team
pub async fn handle_team_insight(
    State(state): State<AppState>,
) -> Result<Json<InsightResponse>, AppError> {
    let check_ins = list_check_ins(&state.db, None).await?;
    let today = Local::now().date_naive();
    let response = team_insight(&state.insight_cache, state.llm.as_ref(), &check_ins, today).await?;
    Ok(Json(response))
}

/// POST /api/v1/insights/person
pub async fn handle_person_insight(
    State(state): State<AppState>,
    Json(req): Json<PersonInsightRequest>,
) -> Result<Json<InsightResponse>, AppError> {
    let user_name = req.user_name.trim();
    if user_name.is_empty() {
        return Err(AppError::Validation("Please enter your name".to_string()));
    }

    let check_ins = list_check_ins(&state.db, Some(user_name)).await?;
    let today = Local::now().date_naive();
    let response = person_insight(
        &state.insight_cache,
        state.llm.as_ref(),
        user_name,
        &check_ins,
        req.thoughts.as_deref(),
        today,
    )
    .await?;
    Ok(Json(response))
}
