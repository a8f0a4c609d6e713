use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Database model for an operator-defined championship date range.
///
/// The date range is inclusive on both ends. The persisted store never holds
/// two mutually overlapping configurations; that invariant is enforced by
/// `ConfigurationStore` before anything is written.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ChampionshipConfiguration {
    pub id: String,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl ChampionshipConfiguration {
    /// Creates a new configuration with a generated id.
    pub fn new(name: String, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name,
            start_date,
            end_date,
            created_at: Utc::now(),
        }
    }

    /// Whether today falls inside this configuration's date range.
    pub fn is_active(&self) -> bool {
        let today = Utc::now().date_naive();
        today >= self.start_date && today <= self.end_date
    }

    /// Whether this configuration's range lies entirely in the past.
    pub fn is_expired(&self) -> bool {
        Utc::now().date_naive() > self.end_date
    }

    /// Whether the given date falls inside this configuration's range.
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }

    /// Inclusive overlap check: ranges that merely touch on a boundary date
    /// count as overlapping. A configuration never overlaps itself.
    pub fn overlaps(&self, other: &ChampionshipConfiguration) -> bool {
        if self.id == other.id {
            return false;
        }
        self.start_date <= other.end_date && self.end_date >= other.start_date
    }

    /// Validates the fields an operator can set.
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Championship name is required".to_string());
        }
        if self.start_date > self.end_date {
            return Err("Start date must be before end date".to_string());
        }
        Ok(())
    }
}
