use chrono::{DateTime, NaiveDate, Utc};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use super::models::ChampionshipConfiguration;
use super::repository::ConfigurationRepository;
use crate::shared::AppError;

/// Business rules over the configuration repository.
///
/// Every mutation (add, update, remove, find-or-create) runs under one
/// store-wide async lock so that "read current state, validate, persist" is
/// a single atomic unit. Concurrent uploads must never commit two overlapping
/// configurations or auto-provision duplicates for the same date.
pub struct ConfigurationStore {
    repository: Arc<dyn ConfigurationRepository>,
    mutation_lock: Mutex<()>,
}

impl ConfigurationStore {
    pub fn new(repository: Arc<dyn ConfigurationRepository>) -> Self {
        Self {
            repository,
            mutation_lock: Mutex::new(()),
        }
    }

    /// Validates and persists a new configuration.
    #[instrument(skip(self, config))]
    pub async fn add(&self, config: &ChampionshipConfiguration) -> Result<(), AppError> {
        let _guard = self.mutation_lock.lock().await;
        self.add_locked(config).await
    }

    /// Updates an existing configuration, re-running validation and the
    /// overlap check with the record's own id excluded.
    #[instrument(skip(self))]
    pub async fn update(
        &self,
        id: &str,
        name: String,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<ChampionshipConfiguration, AppError> {
        let _guard = self.mutation_lock.lock().await;

        let existing = self.repository.get(id).await?.ok_or_else(|| {
            AppError::NotFound(format!(
                "Championship configuration with ID '{}' not found",
                id
            ))
        })?;

        let updated = ChampionshipConfiguration {
            id: existing.id.clone(),
            name,
            start_date,
            end_date,
            created_at: existing.created_at,
        };

        updated.validate().map_err(AppError::Validation)?;

        if let Some(conflicting) = self.repository.find_overlapping(&updated).await? {
            return Err(overlap_conflict(&conflicting));
        }

        self.repository.update(&updated).await?;

        info!(config_id = %updated.id, name = %updated.name, "Championship configuration updated");
        Ok(updated)
    }

    /// Removes a configuration, returning whether a record existed.
    #[instrument(skip(self))]
    pub async fn remove(&self, id: &str) -> Result<bool, AppError> {
        let _guard = self.mutation_lock.lock().await;
        let existed = self.repository.remove(id).await?;

        if existed {
            info!(config_id = %id, "Championship configuration removed");
        }
        Ok(existed)
    }

    pub async fn get(&self, id: &str) -> Result<Option<ChampionshipConfiguration>, AppError> {
        self.repository.get(id).await
    }

    pub async fn get_for_date(
        &self,
        date: NaiveDate,
    ) -> Result<Option<ChampionshipConfiguration>, AppError> {
        self.repository.get_for_date(date).await
    }

    pub async fn get_all(
        &self,
        include_expired: bool,
    ) -> Result<Vec<ChampionshipConfiguration>, AppError> {
        self.repository.get_all(include_expired).await
    }

    /// Returns the configuration covering the race's date, auto-provisioning
    /// a single-day configuration when none exists.
    ///
    /// The whole read-decide-persist sequence holds the mutation lock, so N
    /// concurrent calls for the same uncovered date create exactly one record
    /// and all callers observe it. If persisting still fails (for example a
    /// racing caller on another process committed an overlapping record), the
    /// date is re-queried; as a last resort an unpersisted configuration is
    /// returned so the upload completes, at the cost of durability.
    #[instrument(skip(self))]
    pub async fn find_or_create_for_date(
        &self,
        start_time: DateTime<Utc>,
    ) -> Result<ChampionshipConfiguration, AppError> {
        let _guard = self.mutation_lock.lock().await;

        let race_date = start_time.date_naive();
        if let Some(config) = self.repository.get_for_date(race_date).await? {
            debug!(config_id = %config.id, date = %race_date, "Existing configuration covers race date");
            return Ok(config);
        }

        let new_config = ChampionshipConfiguration::new(
            format!("Race {}", start_time.format("%Y-%m-%d %H:%M")),
            race_date,
            race_date,
        );

        match self.add_locked(&new_config).await {
            Ok(()) => {
                info!(
                    config_id = %new_config.id,
                    name = %new_config.name,
                    date = %race_date,
                    "Auto-created single-day championship configuration"
                );
                Ok(new_config)
            }
            Err(e) => {
                warn!(
                    error = %e,
                    date = %race_date,
                    "Failed to auto-create championship configuration, re-querying"
                );

                if let Some(config) = self.repository.get_for_date(race_date).await? {
                    return Ok(config);
                }

                // Degraded path: the upload still completes, but this
                // configuration is not durable across restarts.
                warn!(
                    config_id = %new_config.id,
                    date = %race_date,
                    "No covering configuration found after failed create, using transient configuration"
                );
                Ok(new_config)
            }
        }
    }

    /// Validation + overlap check + persist. Callers must hold the mutation lock.
    async fn add_locked(&self, config: &ChampionshipConfiguration) -> Result<(), AppError> {
        config.validate().map_err(AppError::Validation)?;

        if let Some(conflicting) = self.repository.find_overlapping(config).await? {
            return Err(overlap_conflict(&conflicting));
        }

        self.repository.add(config).await?;

        info!(
            config_id = %config.id,
            name = %config.name,
            start_date = %config.start_date,
            end_date = %config.end_date,
            "Championship configuration added"
        );
        Ok(())
    }
}

fn overlap_conflict(conflicting: &ChampionshipConfiguration) -> AppError {
    AppError::Conflict(format!(
        "Championship period overlaps with existing championship '{}' ({} to {})",
        conflicting.name, conflicting.start_date, conflicting.end_date
    ))
}
