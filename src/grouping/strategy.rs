use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::results::models::RaceResult;
use crate::shared::AppError;

/// Championship identity resolved for one race result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupingResult {
    /// Stable short identifier, e.g. "2025-C01" or "2025-06"
    pub championship_key: String,
    /// Human label for the event
    pub event_name: String,
    /// Relative path the downstream summary lives under
    pub storage_folder: String,
}

/// Policy mapping one race result to a championship identity.
///
/// `event_name` is the side-effecting call: the RaceCount variant consumes a
/// race slot there, exactly once per processed result. `championship_key` and
/// `summary_folder` are reads and must be resolved before `event_name` so a
/// race at a batch boundary sees one consistent counter value.
#[async_trait]
pub trait GroupingStrategy: Send + Sync {
    async fn championship_key(&self, result: &RaceResult) -> Result<String, AppError>;

    async fn event_name(&self, result: &RaceResult) -> Result<String, AppError>;

    async fn summary_folder(&self, result: &RaceResult) -> Result<String, AppError>;
}
