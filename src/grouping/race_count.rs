use async_trait::async_trait;
use chrono::Datelike;
use std::sync::Arc;
use tracing::debug;

use super::strategy::GroupingStrategy;
use crate::racecount::models::{championship_key, championship_number, race_number};
use crate::racecount::store::RaceCountStore;
use crate::results::models::RaceResult;
use crate::shared::AppError;

/// Groups races into fixed-size batches per year: races 1..N form
/// championship 1, N+1..2N championship 2, and so on.
///
/// `event_name` consumes the race slot; the championship and race numbers in
/// the label derive from the count observed before that increment.
pub struct RaceCountGroupingStrategy {
    races_per_championship: u32,
    store: Arc<RaceCountStore>,
}

impl std::fmt::Debug for RaceCountGroupingStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RaceCountGroupingStrategy")
            .field("races_per_championship", &self.races_per_championship)
            .finish_non_exhaustive()
    }
}

impl RaceCountGroupingStrategy {
    /// Builds the strategy and reconciles persisted batch sizes for the
    /// current and next calendar year (a drifted year is reset to 0).
    pub async fn new(
        races_per_championship: u32,
        store: Arc<RaceCountStore>,
    ) -> Result<Self, AppError> {
        if races_per_championship == 0 {
            return Err(AppError::Validation(
                "Races per championship must be greater than 0".to_string(),
            ));
        }

        store.reconcile_batch_size(races_per_championship).await?;

        Ok(Self {
            races_per_championship,
            store,
        })
    }
}

#[async_trait]
impl GroupingStrategy for RaceCountGroupingStrategy {
    async fn championship_key(&self, result: &RaceResult) -> Result<String, AppError> {
        let year = result.start_time.year();
        let count = self.store.current_count(year).await?;
        Ok(championship_key(year, count, self.races_per_championship))
    }

    async fn event_name(&self, result: &RaceResult) -> Result<String, AppError> {
        let year = result.start_time.year();
        let observed = self
            .store
            .consume_slot(year, self.races_per_championship)
            .await?;

        let championship = championship_number(observed, self.races_per_championship);
        let race = race_number(observed, self.races_per_championship);
        debug!(
            year = year,
            championship = championship,
            race = race,
            "Assigned race slot"
        );

        Ok(format!(
            "Championship {} - Race {} ({})",
            championship, race, year
        ))
    }

    async fn summary_folder(&self, result: &RaceResult) -> Result<String, AppError> {
        let year = result.start_time.year();
        let count = self.store.current_count(year).await?;
        Ok(format!(
            "{}/champ{}",
            year,
            championship_number(count, self.races_per_championship)
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::racecount::repository::InMemoryRaceCountRepository;
    use chrono::{TimeZone, Utc};

    fn race_at(y: i32, m: u32, d: u32) -> RaceResult {
        RaceResult {
            server: "Club Races".to_string(),
            track: "Spa".to_string(),
            track_layout: String::new(),
            start_time: Utc.with_ymd_and_hms(y, m, d, 20, 0, 0).unwrap(),
        }
    }

    async fn strategy(batch: u32) -> RaceCountGroupingStrategy {
        let store = Arc::new(
            RaceCountStore::load(Arc::new(InMemoryRaceCountRepository::new()))
                .await
                .unwrap(),
        );
        RaceCountGroupingStrategy::new(batch, store).await.unwrap()
    }

    #[tokio::test]
    async fn test_rejects_zero_batch_size() {
        let store = Arc::new(
            RaceCountStore::load(Arc::new(InMemoryRaceCountRepository::new()))
                .await
                .unwrap(),
        );
        let err = RaceCountGroupingStrategy::new(0, store).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_batch_of_four_rolls_over_to_second_championship() {
        let strategy = strategy(4).await;
        let race = race_at(2025, 3, 1);

        // Races 1..4 belong to championship 1.
        for expected_race in 1..=4 {
            assert_eq!(
                strategy.championship_key(&race).await.unwrap(),
                "2025-C01"
            );
            assert_eq!(
                strategy.summary_folder(&race).await.unwrap(),
                "2025/champ1"
            );
            assert_eq!(
                strategy.event_name(&race).await.unwrap(),
                format!("Championship 1 - Race {} (2025)", expected_race)
            );
        }

        // The fifth race starts championship 2.
        assert_eq!(strategy.championship_key(&race).await.unwrap(), "2025-C02");
        assert_eq!(strategy.summary_folder(&race).await.unwrap(), "2025/champ2");
        assert_eq!(
            strategy.event_name(&race).await.unwrap(),
            "Championship 2 - Race 1 (2025)"
        );
    }

    #[tokio::test]
    async fn test_counters_are_year_scoped() {
        let strategy = strategy(4).await;

        strategy.event_name(&race_at(2024, 12, 31)).await.unwrap();
        strategy.event_name(&race_at(2024, 12, 31)).await.unwrap();

        // A new year starts numbering from race 1 again.
        assert_eq!(
            strategy.event_name(&race_at(2025, 1, 1)).await.unwrap(),
            "Championship 1 - Race 1 (2025)"
        );
    }

    #[tokio::test]
    async fn test_concurrent_event_names_are_distinct() {
        let strategy = Arc::new(strategy(4).await);

        let handles = (0..20)
            .map(|_| {
                let strategy = Arc::clone(&strategy);
                tokio::spawn(async move { strategy.event_name(&race_at(2025, 5, 10)).await })
            })
            .collect::<Vec<_>>();

        let results = futures::future::join_all(handles).await;
        let mut names: Vec<String> = results.into_iter().map(|r| r.unwrap().unwrap()).collect();
        names.sort();
        names.dedup();

        // No two results received the same championship/race number pair.
        assert_eq!(names.len(), 20);
    }

    #[tokio::test]
    async fn test_key_only_reads_do_not_consume_slots() {
        let strategy = strategy(4).await;
        let race = race_at(2025, 3, 1);

        for _ in 0..10 {
            strategy.championship_key(&race).await.unwrap();
            strategy.summary_folder(&race).await.unwrap();
        }

        assert_eq!(
            strategy.event_name(&race).await.unwrap(),
            "Championship 1 - Race 1 (2025)"
        );
    }
}
