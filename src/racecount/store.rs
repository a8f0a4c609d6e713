use chrono::{Datelike, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::{debug, error, info, instrument, warn};

use super::models::RaceCountState;
use super::repository::RaceCountRepository;
use crate::shared::AppError;

/// Business rules over the race counter repository.
///
/// Keeps a per-year cache of the last durably committed counts, loaded once
/// at construction. `consume_slot` is the single critical section for
/// increments; the cache is only written after the repository persist
/// succeeds, so it never runs ahead of the backing store.
pub struct RaceCountStore {
    repository: Arc<dyn RaceCountRepository>,
    cache: Mutex<HashMap<i32, u32>>,
    increment_lock: tokio::sync::Mutex<()>,
}

impl RaceCountStore {
    /// Builds the store and warms the cache from persisted state.
    ///
    /// A failed initial load logs an error and starts with an empty cache;
    /// per-year reads fall back to the repository on demand.
    pub async fn load(repository: Arc<dyn RaceCountRepository>) -> Result<Self, AppError> {
        let cache = match repository.get_all_counts().await {
            Ok(counts) => {
                info!(years = counts.len(), "Loaded race count states");
                counts
            }
            Err(e) => {
                error!(error = %e, "Failed to load race count cache, starting empty");
                HashMap::new()
            }
        };

        Ok(Self {
            repository,
            cache: Mutex::new(cache),
            increment_lock: tokio::sync::Mutex::new(()),
        })
    }

    /// Current count for a year without consuming a slot.
    pub async fn current_count(&self, year: i32) -> Result<u32, AppError> {
        if let Some(count) = self.cache.lock().unwrap().get(&year).copied() {
            return Ok(count);
        }

        let count = self
            .repository
            .get_by_year(year)
            .await?
            .map(|s| s.race_count)
            .unwrap_or(0);
        self.cache.lock().unwrap().insert(year, count);
        Ok(count)
    }

    /// Consumes one race slot for the year: atomically increments and
    /// persists the counter, returning the count observed before the
    /// increment (the value championship and race numbers derive from).
    #[instrument(skip(self))]
    pub async fn consume_slot(
        &self,
        year: i32,
        races_per_championship: u32,
    ) -> Result<u32, AppError> {
        let _guard = self.increment_lock.lock().await;

        let new_count = self
            .repository
            .increment_and_get(year, races_per_championship)
            .await?;
        self.cache.lock().unwrap().insert(year, new_count);

        debug!(year = year, race_count = new_count, "Race slot consumed");
        Ok(new_count - 1)
    }

    /// Non-mutating snapshot of a year's persisted state.
    pub async fn get_state(&self, year: i32) -> Result<Option<RaceCountState>, AppError> {
        self.repository.get_by_year(year).await
    }

    /// All persisted states, ordered by year.
    pub async fn get_all_states(&self) -> Result<Vec<RaceCountState>, AppError> {
        let counts = self.repository.get_all_counts().await?;
        let mut years: Vec<i32> = counts.keys().copied().collect();
        years.sort_unstable();

        let mut states = Vec::with_capacity(years.len());
        for year in years {
            if let Some(state) = self.repository.get_by_year(year).await? {
                states.push(state);
            }
        }
        Ok(states)
    }

    /// Whether the stored state agrees with the given batch size.
    ///
    /// Valid when no state exists or the stored count is 0 (nothing has been
    /// numbered yet, any batch size may take over). Invalid only when races
    /// have already been counted under a different batch size.
    pub async fn validate_configuration(
        &self,
        year: i32,
        races_per_championship: u32,
    ) -> Result<bool, AppError> {
        let state = match self.repository.get_by_year(year).await? {
            Some(state) => state,
            None => return Ok(true),
        };

        if state.race_count > 0 && state.races_per_championship != races_per_championship {
            warn!(
                year = year,
                stored_batch = state.races_per_championship,
                configured_batch = races_per_championship,
                race_count = state.race_count,
                "Race count batch size drift detected"
            );
            return Ok(false);
        }

        Ok(true)
    }

    /// Resets a year's counter to 0 with the given batch size.
    #[instrument(skip(self))]
    pub async fn reset_for_year(
        &self,
        year: i32,
        races_per_championship: u32,
        reason: Option<&str>,
    ) -> Result<(), AppError> {
        let _guard = self.increment_lock.lock().await;

        self.repository
            .reset_for_year(year, races_per_championship, reason)
            .await?;
        self.cache.lock().unwrap().insert(year, 0);
        Ok(())
    }

    /// Startup drift detection for the current and next calendar year (races
    /// can span a year boundary). A year whose stored batch size disagrees
    /// with the configured one while races are already counted is reset to 0,
    /// with an explicit warning about the lost continuity.
    pub async fn reconcile_batch_size(&self, races_per_championship: u32) -> Result<(), AppError> {
        let current_year = Utc::now().year();

        for year in current_year..=current_year + 1 {
            if self
                .validate_configuration(year, races_per_championship)
                .await?
            {
                continue;
            }

            let state = self.repository.get_by_year(year).await?;
            warn!(
                year = year,
                stored_batch = state.as_ref().map(|s| s.races_per_championship),
                configured_batch = races_per_championship,
                "Batch size changed with races already counted, resetting year to 0"
            );
            self.reset_for_year(
                year,
                races_per_championship,
                Some("Configuration change detected on startup"),
            )
            .await?;
        }

        Ok(())
    }
}
