use async_trait::async_trait;
use chrono::Utc;
use sqlx::{PgPool, Row};
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::{debug, instrument, warn};

use super::models::RaceCountState;
use crate::shared::AppError;

/// Trait for per-year race counter storage
#[async_trait]
pub trait RaceCountRepository: Send + Sync {
    async fn get_by_year(&self, year: i32) -> Result<Option<RaceCountState>, AppError>;

    /// Atomically increments the counter for a year and returns the new
    /// count, creating the state lazily on the first race of the year. The
    /// batch size in effect is persisted alongside the count.
    async fn increment_and_get(
        &self,
        year: i32,
        races_per_championship: u32,
    ) -> Result<u32, AppError>;

    async fn get_all_counts(&self) -> Result<HashMap<i32, u32>, AppError>;

    /// Sets the counter for a year back to 0 and stores the new batch size.
    async fn reset_for_year(
        &self,
        year: i32,
        races_per_championship: u32,
        reason: Option<&str>,
    ) -> Result<(), AppError>;
}

/// In-memory implementation of RaceCountRepository for development and testing
pub struct InMemoryRaceCountRepository {
    states: Mutex<HashMap<i32, RaceCountState>>,
}

impl Default for InMemoryRaceCountRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryRaceCountRepository {
    /// Creates a new empty in-memory repository
    pub fn new() -> Self {
        Self {
            states: Mutex::new(HashMap::new()),
        }
    }

    /// Creates an in-memory repository with pre-populated counter states
    pub fn with_states(states: Vec<RaceCountState>) -> Self {
        let mut map = HashMap::new();
        for state in states {
            map.insert(state.year, state);
        }

        Self {
            states: Mutex::new(map),
        }
    }
}

#[async_trait]
impl RaceCountRepository for InMemoryRaceCountRepository {
    #[instrument(skip(self))]
    async fn get_by_year(&self, year: i32) -> Result<Option<RaceCountState>, AppError> {
        let states = self.states.lock().unwrap();
        Ok(states.get(&year).cloned())
    }

    #[instrument(skip(self))]
    async fn increment_and_get(
        &self,
        year: i32,
        races_per_championship: u32,
    ) -> Result<u32, AppError> {
        // Read-modify-write stays atomic under the map mutex.
        let mut states = self.states.lock().unwrap();
        let state = states.entry(year).or_insert_with(|| RaceCountState {
            year,
            race_count: 0,
            races_per_championship,
            last_updated: Utc::now(),
        });

        state.race_count += 1;
        state.races_per_championship = races_per_championship;
        state.last_updated = Utc::now();

        debug!(
            year = year,
            race_count = state.race_count,
            races_per_championship = races_per_championship,
            "Incremented race count in memory"
        );
        Ok(state.race_count)
    }

    #[instrument(skip(self))]
    async fn get_all_counts(&self) -> Result<HashMap<i32, u32>, AppError> {
        let states = self.states.lock().unwrap();
        Ok(states.values().map(|s| (s.year, s.race_count)).collect())
    }

    #[instrument(skip(self))]
    async fn reset_for_year(
        &self,
        year: i32,
        races_per_championship: u32,
        reason: Option<&str>,
    ) -> Result<(), AppError> {
        let mut states = self.states.lock().unwrap();
        let previous = states.get(&year).map(|s| s.race_count).unwrap_or(0);

        states.insert(
            year,
            RaceCountState {
                year,
                race_count: 0,
                races_per_championship,
                last_updated: Utc::now(),
            },
        );

        if previous > 0 {
            warn!(
                year = year,
                previous_count = previous,
                races_per_championship = races_per_championship,
                reason = reason.unwrap_or("none given"),
                "Reset race count to 0"
            );
        }
        Ok(())
    }
}

/// PostgreSQL implementation of RaceCountRepository
pub struct PostgresRaceCountRepository {
    pool: PgPool,
}

impl PostgresRaceCountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RaceCountRepository for PostgresRaceCountRepository {
    #[instrument(skip(self))]
    async fn get_by_year(&self, year: i32) -> Result<Option<RaceCountState>, AppError> {
        let row = sqlx::query(
            "SELECT year, race_count, races_per_championship, last_updated \
             FROM race_count_states WHERE year = $1",
        )
        .bind(year)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, year = year, "Failed to fetch race count state from database");
            AppError::DatabaseError(e.to_string())
        })?;

        Ok(row.map(|row| RaceCountState {
            year: row.get("year"),
            race_count: row.get::<i32, _>("race_count") as u32,
            races_per_championship: row.get::<i32, _>("races_per_championship") as u32,
            last_updated: row.get("last_updated"),
        }))
    }

    #[instrument(skip(self))]
    async fn increment_and_get(
        &self,
        year: i32,
        races_per_championship: u32,
    ) -> Result<u32, AppError> {
        // Single atomic upsert so concurrent uploads never lose an increment.
        let row = sqlx::query(
            "INSERT INTO race_count_states (year, race_count, races_per_championship, last_updated) \
             VALUES ($1, 1, $2, $3) \
             ON CONFLICT (year) DO UPDATE SET \
                 race_count = race_count_states.race_count + 1, \
                 races_per_championship = EXCLUDED.races_per_championship, \
                 last_updated = EXCLUDED.last_updated \
             RETURNING race_count",
        )
        .bind(year)
        .bind(races_per_championship as i32)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, year = year, "Failed to increment race count in database");
            AppError::DatabaseError(e.to_string())
        })?;

        let new_count = row.get::<i32, _>("race_count") as u32;
        debug!(year = year, race_count = new_count, "Incremented race count in database");
        Ok(new_count)
    }

    #[instrument(skip(self))]
    async fn get_all_counts(&self) -> Result<HashMap<i32, u32>, AppError> {
        let rows = sqlx::query("SELECT year, race_count FROM race_count_states")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, "Failed to list race counts from database");
                AppError::DatabaseError(e.to_string())
            })?;

        Ok(rows
            .into_iter()
            .map(|row| (row.get("year"), row.get::<i32, _>("race_count") as u32))
            .collect())
    }

    #[instrument(skip(self))]
    async fn reset_for_year(
        &self,
        year: i32,
        races_per_championship: u32,
        reason: Option<&str>,
    ) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO race_count_states (year, race_count, races_per_championship, last_updated) \
             VALUES ($1, 0, $2, $3) \
             ON CONFLICT (year) DO UPDATE SET \
                 race_count = 0, \
                 races_per_championship = EXCLUDED.races_per_championship, \
                 last_updated = EXCLUDED.last_updated",
        )
        .bind(year)
        .bind(races_per_championship as i32)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, year = year, "Failed to reset race count in database");
            AppError::DatabaseError(e.to_string())
        })?;

        warn!(
            year = year,
            races_per_championship = races_per_championship,
            reason = reason.unwrap_or("none given"),
            "Reset race count to 0 in database"
        );
        Ok(())
    }
}
