// Library crate for the race result grouping server
// This file exposes the public API for integration tests

pub mod championship;
pub mod grouping;
pub mod racecount;
pub mod results;
pub mod settings;
pub mod shared;
pub mod summary;

// Re-export commonly used types for easier access in tests
pub use championship::models::ChampionshipConfiguration;
pub use championship::store::ConfigurationStore;
pub use grouping::{build_strategy, GroupingResult, GroupingStrategy};
pub use racecount::store::RaceCountStore;
pub use results::{RaceResult, ResultIngestService};
pub use settings::{GroupingStrategyKind, StorageSettings};
pub use shared::{AppError, AppState};
pub use summary::{InMemorySummaryAggregator, SummaryAggregator};
