use std::sync::Arc;
use tracing::info;

use super::custom::CustomGroupingStrategy;
use super::monthly::MonthlyGroupingStrategy;
use super::race_count::RaceCountGroupingStrategy;
use super::strategy::GroupingStrategy;
use crate::championship::store::ConfigurationStore;
use crate::racecount::store::RaceCountStore;
use crate::settings::{GroupingStrategyKind, StorageSettings};
use crate::shared::AppError;

/// Builds the single active grouping strategy from configuration.
///
/// Called once at startup; the result is injected everywhere grouping
/// decisions are needed. Building the RaceCount variant also runs the
/// startup batch-size reconciliation.
pub async fn build_strategy(
    settings: &StorageSettings,
    configuration_store: Arc<ConfigurationStore>,
    race_count_store: Arc<RaceCountStore>,
) -> Result<Arc<dyn GroupingStrategy + Send + Sync>, AppError> {
    info!(strategy = %settings.grouping_strategy, "Building grouping strategy");

    match settings.grouping_strategy {
        GroupingStrategyKind::Monthly => Ok(Arc::new(MonthlyGroupingStrategy)),
        GroupingStrategyKind::RaceCount => Ok(Arc::new(
            RaceCountGroupingStrategy::new(settings.races_per_championship, race_count_store)
                .await?,
        )),
        GroupingStrategyKind::Custom => {
            Ok(Arc::new(CustomGroupingStrategy::new(configuration_store)))
        }
    }
}
