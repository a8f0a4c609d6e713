use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::{debug, info, instrument};

use crate::shared::AppError;

/// Downstream consumer of grouping decisions: the per-championship summary
/// that lists the raw result logs belonging to each folder.
#[async_trait]
pub trait SummaryAggregator: Send + Sync {
    /// Records a result log under a championship folder. Idempotent: adding
    /// the same entry twice leaves a single entry.
    async fn append_entry(&self, folder: &str, log_path: &str) -> Result<(), AppError>;

    /// Removes a result log from a championship folder, dropping the
    /// folder's summary entirely once its last entry is gone. Returns
    /// whether an entry existed.
    async fn remove_entry(&self, folder: &str, log_path: &str) -> Result<bool, AppError>;
}

/// In-memory implementation of SummaryAggregator for development and testing
pub struct InMemorySummaryAggregator {
    entries: Mutex<HashMap<String, Vec<String>>>,
}

impl Default for InMemorySummaryAggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemorySummaryAggregator {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Entries currently recorded for a folder
    pub fn entries_for(&self, folder: &str) -> Vec<String> {
        self.entries
            .lock()
            .unwrap()
            .get(folder)
            .cloned()
            .unwrap_or_default()
    }

    /// Number of folders with at least one entry
    pub fn folder_count(&self) -> usize {
        self.entries.lock().unwrap().len()
    }
}

#[async_trait]
impl SummaryAggregator for InMemorySummaryAggregator {
    #[instrument(skip(self))]
    async fn append_entry(&self, folder: &str, log_path: &str) -> Result<(), AppError> {
        let mut entries = self.entries.lock().unwrap();
        let folder_entries = entries.entry(folder.to_string()).or_default();

        if folder_entries.iter().any(|e| e == log_path) {
            debug!(folder = %folder, log_path = %log_path, "Summary entry already present");
            return Ok(());
        }

        folder_entries.push(log_path.to_string());
        debug!(
            folder = %folder,
            log_path = %log_path,
            entry_count = folder_entries.len(),
            "Summary entry appended"
        );
        Ok(())
    }

    #[instrument(skip(self))]
    async fn remove_entry(&self, folder: &str, log_path: &str) -> Result<bool, AppError> {
        let mut entries = self.entries.lock().unwrap();
        let Some(folder_entries) = entries.get_mut(folder) else {
            return Ok(false);
        };

        let before = folder_entries.len();
        folder_entries.retain(|e| e != log_path);
        let existed = folder_entries.len() < before;

        if folder_entries.is_empty() {
            entries.remove(folder);
            info!(folder = %folder, "Last entry removed, dropping folder summary");
        }

        Ok(existed)
    }
}
