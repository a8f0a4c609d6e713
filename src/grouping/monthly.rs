use async_trait::async_trait;
use chrono::Datelike;

use super::strategy::GroupingStrategy;
use crate::results::models::RaceResult;
use crate::shared::AppError;

/// Groups races by the calendar month of their start time. Stateless.
pub struct MonthlyGroupingStrategy;

#[async_trait]
impl GroupingStrategy for MonthlyGroupingStrategy {
    async fn championship_key(&self, result: &RaceResult) -> Result<String, AppError> {
        Ok(format!(
            "{}-{:02}",
            result.start_time.year(),
            result.start_time.month()
        ))
    }

    async fn event_name(&self, result: &RaceResult) -> Result<String, AppError> {
        Ok(format!(
            "{} Race {}",
            result.start_time.format("%B"),
            result.start_time.year()
        ))
    }

    async fn summary_folder(&self, result: &RaceResult) -> Result<String, AppError> {
        Ok(format!(
            "{}/{:02}",
            result.start_time.year(),
            result.start_time.month()
        ))
    }
}
