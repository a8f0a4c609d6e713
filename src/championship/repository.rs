use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use sqlx::{PgPool, Row};
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::{debug, instrument, warn};

use super::models::ChampionshipConfiguration;
use crate::shared::AppError;

/// Trait for championship configuration storage
#[async_trait]
pub trait ConfigurationRepository: Send + Sync {
    async fn get(&self, id: &str) -> Result<Option<ChampionshipConfiguration>, AppError>;

    /// Returns the configuration whose range contains the given date.
    ///
    /// The overlap invariant means at most one should match; if the store
    /// somehow holds more, the one with the earliest start date wins.
    async fn get_for_date(
        &self,
        date: NaiveDate,
    ) -> Result<Option<ChampionshipConfiguration>, AppError>;

    async fn get_all(
        &self,
        include_expired: bool,
    ) -> Result<Vec<ChampionshipConfiguration>, AppError>;

    async fn add(&self, config: &ChampionshipConfiguration) -> Result<(), AppError>;

    async fn update(&self, config: &ChampionshipConfiguration) -> Result<(), AppError>;

    /// Removes a configuration, returning whether a record existed.
    async fn remove(&self, id: &str) -> Result<bool, AppError>;

    /// Finds any stored configuration whose range overlaps the given one,
    /// excluding the record with the same id.
    async fn find_overlapping(
        &self,
        config: &ChampionshipConfiguration,
    ) -> Result<Option<ChampionshipConfiguration>, AppError>;

    async fn has_overlap(&self, config: &ChampionshipConfiguration) -> Result<bool, AppError> {
        Ok(self.find_overlapping(config).await?.is_some())
    }
}

/// In-memory implementation of ConfigurationRepository for development and testing
pub struct InMemoryConfigurationRepository {
    configurations: Mutex<HashMap<String, ChampionshipConfiguration>>,
}

impl Default for InMemoryConfigurationRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryConfigurationRepository {
    /// Creates a new empty in-memory repository
    pub fn new() -> Self {
        Self {
            configurations: Mutex::new(HashMap::new()),
        }
    }

    /// Creates an in-memory repository with pre-populated configurations
    pub fn with_configurations(configs: Vec<ChampionshipConfiguration>) -> Self {
        let mut map = HashMap::new();
        for config in configs {
            map.insert(config.id.clone(), config);
        }

        Self {
            configurations: Mutex::new(map),
        }
    }
}

#[async_trait]
impl ConfigurationRepository for InMemoryConfigurationRepository {
    #[instrument(skip(self))]
    async fn get(&self, id: &str) -> Result<Option<ChampionshipConfiguration>, AppError> {
        let configurations = self.configurations.lock().unwrap();
        Ok(configurations.get(id).cloned())
    }

    #[instrument(skip(self))]
    async fn get_for_date(
        &self,
        date: NaiveDate,
    ) -> Result<Option<ChampionshipConfiguration>, AppError> {
        let configurations = self.configurations.lock().unwrap();
        let mut matching: Vec<_> = configurations
            .values()
            .filter(|c| c.contains_date(date))
            .cloned()
            .collect();
        matching.sort_by_key(|c| c.start_date);

        match matching.first() {
            Some(c) => {
                debug!(date = %date, config_id = %c.id, "Configuration found for date");
                Ok(Some(c.clone()))
            }
            None => {
                debug!(date = %date, "No configuration covers date");
                Ok(None)
            }
        }
    }

    #[instrument(skip(self))]
    async fn get_all(
        &self,
        include_expired: bool,
    ) -> Result<Vec<ChampionshipConfiguration>, AppError> {
        let configurations = self.configurations.lock().unwrap();
        let today = Utc::now().date_naive();

        let mut all: Vec<_> = configurations
            .values()
            .filter(|c| include_expired || c.end_date >= today)
            .cloned()
            .collect();
        all.sort_by_key(|c| c.start_date);

        Ok(all)
    }

    #[instrument(skip(self, config))]
    async fn add(&self, config: &ChampionshipConfiguration) -> Result<(), AppError> {
        debug!(config_id = %config.id, name = %config.name, "Adding configuration in memory");

        let mut configurations = self.configurations.lock().unwrap();
        if configurations.contains_key(&config.id) {
            warn!(config_id = %config.id, "Configuration already exists in memory");
            return Err(AppError::DatabaseError(
                "Configuration already exists".to_string(),
            ));
        }
        configurations.insert(config.id.clone(), config.clone());

        Ok(())
    }

    #[instrument(skip(self, config))]
    async fn update(&self, config: &ChampionshipConfiguration) -> Result<(), AppError> {
        debug!(config_id = %config.id, "Updating configuration in memory");

        let mut configurations = self.configurations.lock().unwrap();
        if !configurations.contains_key(&config.id) {
            warn!(config_id = %config.id, "Configuration not found for update in memory");
            return Err(AppError::NotFound("Configuration not found".to_string()));
        }
        configurations.insert(config.id.clone(), config.clone());

        Ok(())
    }

    #[instrument(skip(self))]
    async fn remove(&self, id: &str) -> Result<bool, AppError> {
        let mut configurations = self.configurations.lock().unwrap();
        let existed = configurations.remove(id).is_some();

        debug!(config_id = %id, existed = existed, "Removed configuration from memory");
        Ok(existed)
    }

    #[instrument(skip(self, config))]
    async fn find_overlapping(
        &self,
        config: &ChampionshipConfiguration,
    ) -> Result<Option<ChampionshipConfiguration>, AppError> {
        let configurations = self.configurations.lock().unwrap();
        Ok(configurations
            .values()
            .find(|existing| existing.overlaps(config))
            .cloned())
    }
}

/// PostgreSQL implementation of ConfigurationRepository
pub struct PostgresConfigurationRepository {
    pool: PgPool,
}

impl PostgresConfigurationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn row_to_config(row: &sqlx::postgres::PgRow) -> ChampionshipConfiguration {
        ChampionshipConfiguration {
            id: row.get("id"),
            name: row.get("name"),
            start_date: row.get("start_date"),
            end_date: row.get("end_date"),
            created_at: row.get("created_at"),
        }
    }
}

#[async_trait]
impl ConfigurationRepository for PostgresConfigurationRepository {
    #[instrument(skip(self))]
    async fn get(&self, id: &str) -> Result<Option<ChampionshipConfiguration>, AppError> {
        let row = sqlx::query(
            "SELECT id, name, start_date, end_date, created_at FROM championship_configurations WHERE id = $1"
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, config_id = %id, "Failed to fetch configuration from database");
            AppError::DatabaseError(e.to_string())
        })?;

        Ok(row.as_ref().map(Self::row_to_config))
    }

    #[instrument(skip(self))]
    async fn get_for_date(
        &self,
        date: NaiveDate,
    ) -> Result<Option<ChampionshipConfiguration>, AppError> {
        let row = sqlx::query(
            "SELECT id, name, start_date, end_date, created_at FROM championship_configurations \
             WHERE start_date <= $1 AND end_date >= $1 ORDER BY start_date LIMIT 1",
        )
        .bind(date)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, date = %date, "Failed to fetch configuration for date from database");
            AppError::DatabaseError(e.to_string())
        })?;

        Ok(row.as_ref().map(Self::row_to_config))
    }

    #[instrument(skip(self))]
    async fn get_all(
        &self,
        include_expired: bool,
    ) -> Result<Vec<ChampionshipConfiguration>, AppError> {
        let query = if include_expired {
            sqlx::query(
                "SELECT id, name, start_date, end_date, created_at FROM championship_configurations \
                 ORDER BY start_date",
            )
        } else {
            sqlx::query(
                "SELECT id, name, start_date, end_date, created_at FROM championship_configurations \
                 WHERE end_date >= $1 ORDER BY start_date",
            )
            .bind(Utc::now().date_naive())
        };

        let rows = query.fetch_all(&self.pool).await.map_err(|e| {
            warn!(error = %e, "Failed to list configurations from database");
            AppError::DatabaseError(e.to_string())
        })?;

        Ok(rows.iter().map(Self::row_to_config).collect())
    }

    #[instrument(skip(self, config))]
    async fn add(&self, config: &ChampionshipConfiguration) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO championship_configurations (id, name, start_date, end_date, created_at) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(&config.id)
        .bind(&config.name)
        .bind(config.start_date)
        .bind(config.end_date)
        .bind(config.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, config_id = %config.id, "Failed to add configuration to database");
            AppError::DatabaseError(e.to_string())
        })?;

        debug!(config_id = %config.id, name = %config.name, "Configuration added to database");
        Ok(())
    }

    #[instrument(skip(self, config))]
    async fn update(&self, config: &ChampionshipConfiguration) -> Result<(), AppError> {
        let result = sqlx::query(
            "UPDATE championship_configurations SET name = $2, start_date = $3, end_date = $4 \
             WHERE id = $1",
        )
        .bind(&config.id)
        .bind(&config.name)
        .bind(config.start_date)
        .bind(config.end_date)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, config_id = %config.id, "Failed to update configuration in database");
            AppError::DatabaseError(e.to_string())
        })?;

        if result.rows_affected() == 0 {
            warn!(config_id = %config.id, "Configuration not found for update");
            return Err(AppError::NotFound("Configuration not found".to_string()));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn remove(&self, id: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM championship_configurations WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, config_id = %id, "Failed to delete configuration from database");
                AppError::DatabaseError(e.to_string())
            })?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self, config))]
    async fn find_overlapping(
        &self,
        config: &ChampionshipConfiguration,
    ) -> Result<Option<ChampionshipConfiguration>, AppError> {
        let row = sqlx::query(
            "SELECT id, name, start_date, end_date, created_at FROM championship_configurations \
             WHERE id <> $1 AND start_date <= $3 AND end_date >= $2 LIMIT 1",
        )
        .bind(&config.id)
        .bind(config.start_date)
        .bind(config.end_date)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to check for overlapping configurations in database");
            AppError::DatabaseError(e.to_string())
        })?;

        Ok(row.as_ref().map(Self::row_to_config))
    }
}
