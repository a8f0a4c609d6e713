use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Championship number for a race observed at the given count.
///
/// Counts 0..batch map to championship 1, batch..2*batch to championship 2,
/// and so on.
pub fn championship_number(race_count: u32, races_per_championship: u32) -> u32 {
    race_count / races_per_championship + 1
}

/// One-based race number within the current championship at the given count.
pub fn race_number(race_count: u32, races_per_championship: u32) -> u32 {
    race_count % races_per_championship + 1
}

/// Short championship identifier, e.g. "2025-C01".
pub fn championship_key(year: i32, race_count: u32, races_per_championship: u32) -> String {
    format!(
        "{}-C{:02}",
        year,
        championship_number(race_count, races_per_championship)
    )
}

/// Database model tracking how many races a year has processed, and the
/// batch size that was in effect at the last write.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RaceCountState {
    pub year: i32,
    pub race_count: u32,
    pub races_per_championship: u32,
    pub last_updated: DateTime<Utc>,
}

impl RaceCountState {
    pub fn championship_number(&self) -> u32 {
        championship_number(self.race_count, self.races_per_championship)
    }

    pub fn race_number(&self) -> u32 {
        race_number(self.race_count, self.races_per_championship)
    }

    pub fn championship_key(&self) -> String {
        championship_key(self.year, self.race_count, self.races_per_championship)
    }
}
