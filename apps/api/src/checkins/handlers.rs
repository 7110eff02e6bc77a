use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tracing::info;

use crate::checkins::repository::{
    get_or_create_user, insert_check_in, list_check_ins, list_recent_check_ins,
};
use crate::checkins::validation::{validate_submission, CheckInSubmission};
use crate::errors::AppError;
use crate::models::checkin::CheckIn;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct UserNameQuery {
    pub user_name: Option<String>,
}

impl UserNameQuery {
    /// Trimmed name filter; blank means "everyone".
    pub fn name(&self) -> Option<&str> {
        name_filter(&self.user_name)
    }
}

fn name_filter(user_name: &Option<String>) -> Option<&str> {
    user_name.as_deref().map(str::trim).filter(|n| !n.is_empty())
}

/// Upper bound for `GET /api/v1/checkins?limit=`.
pub const MAX_RECENT: i64 = 100;

#[derive(Debug, Deserialize)]
pub struct CheckInListQuery {
    pub user_name: Option<String>,
    /// When set, only the newest `limit` check-ins are returned, newest first.
    pub limit: Option<i64>,
}

impl CheckInListQuery {
    pub fn name(&self) -> Option<&str> {
        name_filter(&self.user_name)
    }

    pub fn recent_limit(&self) -> Result<Option<i64>, AppError> {
        match self.limit {
            Some(limit) if !(1..=MAX_RECENT).contains(&limit) => Err(AppError::Validation(
                format!("limit must be between 1 and {MAX_RECENT}, got {limit}"),
            )),
            other => Ok(other),
        }
    }
}

/// POST /api/v1/checkins
pub async fn handle_submit_check_in(
    State(state): State<AppState>,
    Json(submission): Json<CheckInSubmission>,
) -> Result<(StatusCode, Json<CheckIn>), AppError> {
    let valid = validate_submission(&submission)?;

    let user = get_or_create_user(&state.db, &valid.user_name).await?;
    let stored = insert_check_in(&state.db, &user, &valid).await?;
    info!(
        "Stored check-in {} for {} (mood={}, stress={}, productivity={})",
        stored.id, user.name, valid.mood, valid.stress_level, valid.productivity_level
    );

    Ok((StatusCode::CREATED, Json(stored)))
}

/// GET /api/v1/checkins
pub async fn handle_list_check_ins(
    State(state): State<AppState>,
    Query(params): Query<CheckInListQuery>,
) -> Result<Json<Vec<CheckIn>>, AppError> {
    let check_ins = match params.recent_limit()? {
        Some(limit) => list_recent_check_ins(&state.db, params.name(), limit).await?,
        None => list_check_ins(&state.db, params.name()).await?,
    };
    Ok(Json(check_ins))
}
