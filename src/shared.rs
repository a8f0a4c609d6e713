use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;

use crate::championship::store::ConfigurationStore;
use crate::grouping::strategy::GroupingStrategy;
use crate::racecount::store::RaceCountStore;
use crate::settings::StorageSettings;
use crate::summary::SummaryAggregator;

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<StorageSettings>,
    pub configuration_store: Arc<ConfigurationStore>,
    pub race_count_store: Arc<RaceCountStore>,
    pub strategy: Arc<dyn GroupingStrategy + Send + Sync>,
    pub summary: Arc<dyn SummaryAggregator + Send + Sync>,
}

impl AppState {
    pub fn new(
        settings: Arc<StorageSettings>,
        configuration_store: Arc<ConfigurationStore>,
        race_count_store: Arc<RaceCountStore>,
        strategy: Arc<dyn GroupingStrategy + Send + Sync>,
        summary: Arc<dyn SummaryAggregator + Send + Sync>,
    ) -> Self {
        Self {
            settings,
            configuration_store,
            race_count_store,
            strategy,
            summary,
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal server error")]
    Internal,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::DatabaseError(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Database error: {}", msg),
            ),
            AppError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        let body = Json(json!({
            "error": error_message
        }));

        (status, body).into_response()
    }
}
