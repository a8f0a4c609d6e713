use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{Datelike, Utc};
use tracing::{info, instrument};

use super::types::{RaceCountStateResponse, ResetRaceCountRequest, ResetRaceCountResponse};
use crate::shared::{AppError, AppState};

const MIN_YEAR: i32 = 2000;
const MAX_YEAR: i32 = 2100;

fn validate_year(year: i32) -> Result<(), AppError> {
    if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
        return Err(AppError::Validation(format!(
            "Year must be between {} and {}",
            MIN_YEAR, MAX_YEAR
        )));
    }
    Ok(())
}

/// HTTP handler for listing race counter state across all years
///
/// GET /api/championships/racecount
#[instrument(name = "get_all_race_counts", skip(state))]
pub async fn get_all_race_counts(
    State(state): State<AppState>,
) -> Result<Json<Vec<RaceCountStateResponse>>, AppError> {
    let states = state.race_count_store.get_all_states().await?;
    Ok(Json(
        states.into_iter().map(RaceCountStateResponse::from).collect(),
    ))
}

/// HTTP handler for one year's race counter state
///
/// GET /api/championships/racecount/{year}
#[instrument(name = "get_race_count_state", skip(state))]
pub async fn get_race_count_state(
    State(state): State<AppState>,
    Path(year): Path<i32>,
) -> Result<Json<RaceCountStateResponse>, AppError> {
    validate_year(year)?;

    let counter = state
        .race_count_store
        .get_state(year)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!("No race count data found for year {}", year))
        })?;

    Ok(Json(counter.into()))
}

/// HTTP handler for resetting a year's race counter
///
/// POST /api/championships/racecount/reset
/// The year defaults to the current year; the response reports the previous
/// and next counts and championship labels.
#[instrument(name = "reset_race_count", skip(state, request))]
pub async fn reset_race_count(
    State(state): State<AppState>,
    Json(request): Json<ResetRaceCountRequest>,
) -> Result<Json<ResetRaceCountResponse>, AppError> {
    let year = request.year.unwrap_or_else(|| Utc::now().year());
    validate_year(year)?;

    let current = state.race_count_store.get_state(year).await?;
    let previous_count = current.as_ref().map(|s| s.race_count).unwrap_or(0);
    let previous_championship = current.as_ref().map(|s| s.championship_key());

    state
        .race_count_store
        .reset_for_year(
            year,
            state.settings.races_per_championship,
            request.reason.as_deref(),
        )
        .await?;

    info!(
        year = year,
        previous_count = previous_count,
        reason = request.reason.as_deref().unwrap_or("none given"),
        "Race counter manually reset"
    );

    Ok(Json(ResetRaceCountResponse {
        year,
        previous_count,
        new_count: 0,
        previous_championship,
        next_championship: format!("{}-C01", year),
        message: format!(
            "Race counter reset for year {}. Next race will start Championship 1.",
            year
        ),
    }))
}
