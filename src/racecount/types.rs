use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::models::RaceCountState;

/// Response shape for per-year race counter state
#[derive(Debug, Serialize, Deserialize)]
pub struct RaceCountStateResponse {
    pub year: i32,
    pub race_count: u32,
    pub races_per_championship: u32,
    pub current_championship: String,
    pub next_race_number: u32,
    pub last_updated: DateTime<Utc>,
}

impl From<RaceCountState> for RaceCountStateResponse {
    fn from(state: RaceCountState) -> Self {
        Self {
            current_championship: state.championship_key(),
            next_race_number: state.race_number(),
            year: state.year,
            race_count: state.race_count,
            races_per_championship: state.races_per_championship,
            last_updated: state.last_updated,
        }
    }
}

/// Request payload for resetting a year's race counter
#[derive(Debug, Deserialize)]
pub struct ResetRaceCountRequest {
    /// Defaults to the current year when omitted
    pub year: Option<i32>,
    pub reason: Option<String>,
}

/// Response for a race counter reset
#[derive(Debug, Serialize, Deserialize)]
pub struct ResetRaceCountResponse {
    pub year: i32,
    pub previous_count: u32,
    pub new_count: u32,
    pub previous_championship: Option<String>,
    pub next_championship: String,
    pub message: String,
}
