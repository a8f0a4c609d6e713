use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::models::RaceResult;
use crate::grouping::strategy::{GroupingResult, GroupingStrategy};
use crate::shared::AppError;
use crate::summary::SummaryAggregator;

/// Service driving one result through the grouping lifecycle:
/// resolve key and folder, resolve the event name (which consumes a race
/// slot under the RaceCount strategy), then append to the summary.
pub struct ResultIngestService {
    strategy: Arc<dyn GroupingStrategy + Send + Sync>,
    summary: Arc<dyn SummaryAggregator + Send + Sync>,
}

impl ResultIngestService {
    pub fn new(
        strategy: Arc<dyn GroupingStrategy + Send + Sync>,
        summary: Arc<dyn SummaryAggregator + Send + Sync>,
    ) -> Self {
        Self { strategy, summary }
    }

    /// Assigns the result to a championship and records it downstream.
    ///
    /// Key and folder are resolved before the side-effecting `event_name`
    /// call so all three derive from the same observed counter value. A
    /// failed summary append does not roll back the counter increment:
    /// numbering may skip ahead on partial failure, but a summarized race is
    /// never double-counted.
    #[instrument(skip(self, result), fields(server = %result.server, start_time = %result.start_time))]
    pub async fn ingest(&self, result: &RaceResult) -> Result<GroupingResult, AppError> {
        let championship_key = self.strategy.championship_key(result).await?;
        let storage_folder = self.strategy.summary_folder(result).await?;
        let event_name = self.strategy.event_name(result).await?;

        let log_path = format!("{}/{}.json", storage_folder, result.log_stem());
        if let Err(e) = self.summary.append_entry(&storage_folder, &log_path).await {
            warn!(
                error = %e,
                championship_key = %championship_key,
                log_path = %log_path,
                "Summary append failed after race was numbered, counter is not rolled back"
            );
            return Err(e);
        }

        info!(
            championship_key = %championship_key,
            event_name = %event_name,
            storage_folder = %storage_folder,
            "Race result grouped"
        );

        Ok(GroupingResult {
            championship_key,
            event_name,
            storage_folder,
        })
    }
}
