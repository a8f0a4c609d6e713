use async_trait::async_trait;
use chrono::Datelike;
use std::sync::Arc;

use super::strategy::GroupingStrategy;
use crate::championship::models::ChampionshipConfiguration;
use crate::championship::store::ConfigurationStore;
use crate::results::models::RaceResult;
use crate::shared::AppError;

/// Groups races by operator-defined date ranges, auto-provisioning a
/// single-day championship when no configured range covers the race date.
pub struct CustomGroupingStrategy {
    store: Arc<ConfigurationStore>,
}

impl CustomGroupingStrategy {
    pub fn new(store: Arc<ConfigurationStore>) -> Self {
        Self { store }
    }

    async fn configuration_for(
        &self,
        result: &RaceResult,
    ) -> Result<ChampionshipConfiguration, AppError> {
        self.store.find_or_create_for_date(result.start_time).await
    }
}

/// Replaces everything outside [A-Za-z0-9_-] so championship names are safe
/// as folder components.
fn safe_folder_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[async_trait]
impl GroupingStrategy for CustomGroupingStrategy {
    async fn championship_key(&self, result: &RaceResult) -> Result<String, AppError> {
        Ok(self.configuration_for(result).await?.id)
    }

    async fn event_name(&self, result: &RaceResult) -> Result<String, AppError> {
        Ok(self.configuration_for(result).await?.name)
    }

    async fn summary_folder(&self, result: &RaceResult) -> Result<String, AppError> {
        let config = self.configuration_for(result).await?;
        Ok(format!(
            "{}/custom-championships/{}_{}",
            config.start_date.year(),
            safe_folder_name(&config.name),
            config.id
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::championship::repository::{
        ConfigurationRepository, InMemoryConfigurationRepository,
    };
    use chrono::{NaiveDate, TimeZone, Utc};

    fn race_at(y: i32, m: u32, d: u32) -> RaceResult {
        RaceResult {
            server: "Club Races".to_string(),
            track: "Zandvoort".to_string(),
            track_layout: String::new(),
            start_time: Utc.with_ymd_and_hms(y, m, d, 19, 30, 0).unwrap(),
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn strategy_with(repo: Arc<dyn ConfigurationRepository>) -> (CustomGroupingStrategy, Arc<ConfigurationStore>) {
        let store = Arc::new(ConfigurationStore::new(repo));
        (CustomGroupingStrategy::new(Arc::clone(&store)), store)
    }

    #[test]
    fn test_safe_folder_name_replaces_specials() {
        assert_eq!(safe_folder_name("Summer Cup #3!"), "Summer_Cup__3_");
        assert_eq!(safe_folder_name("plain-name_01"), "plain-name_01");
    }

    #[tokio::test]
    async fn test_resolves_configured_championship() {
        let (strategy, store) =
            strategy_with(Arc::new(InMemoryConfigurationRepository::new()));
        let season = ChampionshipConfiguration::new(
            "Summer Season".to_string(),
            date(2025, 6, 1),
            date(2025, 8, 31),
        );
        store.add(&season).await.unwrap();

        let race = race_at(2025, 7, 4);
        assert_eq!(strategy.championship_key(&race).await.unwrap(), season.id);
        assert_eq!(
            strategy.event_name(&race).await.unwrap(),
            "Summer Season"
        );
        assert_eq!(
            strategy.summary_folder(&race).await.unwrap(),
            format!("2025/custom-championships/Summer_Season_{}", season.id)
        );
    }

    #[tokio::test]
    async fn test_auto_provisions_single_day_championship() {
        let (strategy, store) =
            strategy_with(Arc::new(InMemoryConfigurationRepository::new()));

        let race = race_at(2025, 6, 14);
        let key = strategy.championship_key(&race).await.unwrap();
        assert_eq!(
            strategy.event_name(&race).await.unwrap(),
            "Race 2025-06-14 19:30"
        );

        let persisted = store.get(&key).await.unwrap().unwrap();
        assert_eq!(persisted.start_date, date(2025, 6, 14));
        assert_eq!(persisted.end_date, date(2025, 6, 14));
    }

    #[tokio::test]
    async fn test_concurrent_resolutions_provision_exactly_one_configuration() {
        let (strategy, store) =
            strategy_with(Arc::new(InMemoryConfigurationRepository::new()));
        let strategy = Arc::new(strategy);

        let handles = (0..50)
            .map(|_| {
                let strategy = Arc::clone(&strategy);
                tokio::spawn(async move { strategy.championship_key(&race_at(2025, 6, 14)).await })
            })
            .collect::<Vec<_>>();

        let results = futures::future::join_all(handles).await;
        let keys: Vec<String> = results.into_iter().map(|r| r.unwrap().unwrap()).collect();

        // All 50 calls observed the same championship key.
        assert!(keys.iter().all(|k| k == &keys[0]));

        // Exactly one configuration was persisted.
        let all = store.get_all(true).await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, keys[0]);
    }

    /// Repository that accepts reads but refuses every write, standing in
    /// for a backing store that fails at persist time.
    struct ReadOnlyConfigurationRepository;

    #[async_trait]
    impl ConfigurationRepository for ReadOnlyConfigurationRepository {
        async fn get(&self, _id: &str) -> Result<Option<ChampionshipConfiguration>, AppError> {
            Ok(None)
        }
        async fn get_for_date(
            &self,
            _date: NaiveDate,
        ) -> Result<Option<ChampionshipConfiguration>, AppError> {
            Ok(None)
        }
        async fn get_all(
            &self,
            _include_expired: bool,
        ) -> Result<Vec<ChampionshipConfiguration>, AppError> {
            Ok(Vec::new())
        }
        async fn add(&self, _config: &ChampionshipConfiguration) -> Result<(), AppError> {
            Err(AppError::DatabaseError("write refused".to_string()))
        }
        async fn update(&self, _config: &ChampionshipConfiguration) -> Result<(), AppError> {
            Err(AppError::DatabaseError("write refused".to_string()))
        }
        async fn remove(&self, _id: &str) -> Result<bool, AppError> {
            Err(AppError::DatabaseError("write refused".to_string()))
        }
        async fn find_overlapping(
            &self,
            _config: &ChampionshipConfiguration,
        ) -> Result<Option<ChampionshipConfiguration>, AppError> {
            Ok(None)
        }
    }

    #[tokio::test]
    async fn test_failed_persist_falls_back_to_transient_configuration() {
        let (strategy, _store) = strategy_with(Arc::new(ReadOnlyConfigurationRepository));

        // The upload still resolves; the configuration is just not durable.
        let race = race_at(2025, 6, 14);
        let name = strategy.event_name(&race).await.unwrap();
        assert_eq!(name, "Race 2025-06-14 19:30");
    }
}
