use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// Which grouping strategy assigns uploaded races to championships.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupingStrategyKind {
    Monthly,
    RaceCount,
    Custom,
}

impl fmt::Display for GroupingStrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GroupingStrategyKind::Monthly => "Monthly",
            GroupingStrategyKind::RaceCount => "RaceCount",
            GroupingStrategyKind::Custom => "Custom",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for GroupingStrategyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "monthly" => Ok(GroupingStrategyKind::Monthly),
            "racecount" => Ok(GroupingStrategyKind::RaceCount),
            "custom" => Ok(GroupingStrategyKind::Custom),
            other => Err(format!("unknown grouping strategy '{}'", other)),
        }
    }
}

/// File storage and grouping settings, read from the environment at startup.
#[derive(Debug, Clone)]
pub struct StorageSettings {
    pub grouping_strategy: GroupingStrategyKind,
    pub races_per_championship: u32,
    pub data_path: String,
    pub summary_file_name: String,
}

impl StorageSettings {
    /// Reads settings from environment variables, falling back to defaults.
    ///
    /// An unrecognized GROUPING_STRATEGY value logs a warning and defaults to
    /// Monthly rather than refusing to start.
    pub fn from_env() -> Self {
        let grouping_strategy = match std::env::var("GROUPING_STRATEGY") {
            Ok(value) => match value.parse::<GroupingStrategyKind>() {
                Ok(kind) => kind,
                Err(_) => {
                    warn!(
                        strategy = %value,
                        "Invalid GROUPING_STRATEGY value, defaulting to Monthly"
                    );
                    GroupingStrategyKind::Monthly
                }
            },
            Err(_) => GroupingStrategyKind::Monthly,
        };

        let races_per_championship = match std::env::var("RACES_PER_CHAMPIONSHIP") {
            Ok(value) => match value.parse::<u32>() {
                Ok(n) if n > 0 => n,
                _ => {
                    warn!(
                        value = %value,
                        "Invalid RACES_PER_CHAMPIONSHIP value, defaulting to 4"
                    );
                    4
                }
            },
            Err(_) => 4,
        };

        let data_path = std::env::var("DATA_PATH").unwrap_or_else(|_| "/app/data".to_string());
        let summary_file_name =
            std::env::var("SUMMARY_FILE_NAME").unwrap_or_else(|_| "summary".to_string());

        Self {
            grouping_strategy,
            races_per_championship,
            data_path,
            summary_file_name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_kind_parses_case_insensitively() {
        assert_eq!(
            "monthly".parse::<GroupingStrategyKind>().unwrap(),
            GroupingStrategyKind::Monthly
        );
        assert_eq!(
            "RaceCount".parse::<GroupingStrategyKind>().unwrap(),
            GroupingStrategyKind::RaceCount
        );
        assert_eq!(
            "CUSTOM".parse::<GroupingStrategyKind>().unwrap(),
            GroupingStrategyKind::Custom
        );
    }

    #[test]
    fn test_strategy_kind_rejects_unknown_values() {
        assert!("weekly".parse::<GroupingStrategyKind>().is_err());
        assert!("".parse::<GroupingStrategyKind>().is_err());
    }

    #[test]
    fn test_strategy_kind_round_trips_through_display() {
        for kind in [
            GroupingStrategyKind::Monthly,
            GroupingStrategyKind::RaceCount,
            GroupingStrategyKind::Custom,
        ] {
            assert_eq!(kind.to_string().parse::<GroupingStrategyKind>(), Ok(kind));
        }
    }
}
