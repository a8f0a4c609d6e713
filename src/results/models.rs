use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An uploaded race session result.
///
/// Only the fields the grouping subsystem consumes; the raw telemetry
/// payload (sessions, laps, incidents) is handled downstream and never
/// validated here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RaceResult {
    pub server: String,
    pub track: String,
    #[serde(default)]
    pub track_layout: String,
    pub start_time: DateTime<Utc>,
}

impl RaceResult {
    /// Filesystem-safe file stem for this result's raw log,
    /// e.g. "Club_Races_20250614-183000".
    pub fn log_stem(&self) -> String {
        let server: String = self
            .server
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        format!("{}_{}", server, self.start_time.format("%Y%m%d-%H%M%S"))
    }
}
