use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::models::ChampionshipConfiguration;

/// Request payload for creating a championship configuration
#[derive(Debug, Deserialize)]
pub struct CreateConfigurationRequest {
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Request payload for updating a championship configuration
#[derive(Debug, Deserialize)]
pub struct UpdateConfigurationRequest {
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Response shape for championship configurations
#[derive(Debug, Serialize, Deserialize)]
pub struct ConfigurationResponse {
    pub id: String,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub is_active: bool,
    pub is_expired: bool,
    pub created_at: DateTime<Utc>,
}

impl From<ChampionshipConfiguration> for ConfigurationResponse {
    fn from(config: ChampionshipConfiguration) -> Self {
        Self {
            is_active: config.is_active(),
            is_expired: config.is_expired(),
            id: config.id,
            name: config.name,
            start_date: config.start_date,
            end_date: config.end_date,
            created_at: config.created_at,
        }
    }
}

/// Query parameters for listing configurations
#[derive(Debug, Deserialize)]
pub struct ListConfigurationsQuery {
    #[serde(default = "default_include_expired")]
    pub include_expired: bool,
}

fn default_include_expired() -> bool {
    true
}
