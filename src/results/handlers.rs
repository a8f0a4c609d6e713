use axum::{extract::State, http::StatusCode, Json};
use tracing::{info, instrument};

use super::models::RaceResult;
use super::service::ResultIngestService;
use crate::grouping::strategy::GroupingResult;
use crate::shared::{AppError, AppState};

/// HTTP handler for uploading a race result
///
/// POST /api/results
/// Groups the result into a championship and records it in the downstream
/// summary; returns the resolved championship identity.
#[instrument(name = "upload_result", skip(state, result))]
pub async fn upload_result(
    State(state): State<AppState>,
    Json(result): Json<RaceResult>,
) -> Result<(StatusCode, Json<GroupingResult>), AppError> {
    info!(server = %result.server, track = %result.track, "Race result received");

    let service = ResultIngestService::new(state.strategy.clone(), state.summary.clone());
    let grouping = service.ingest(&result).await?;

    Ok((StatusCode::CREATED, Json(grouping)))
}
