use async_trait::async_trait;
use std::sync::RwLock;

use super::client::{FetchEntriesRequest, JournalSource};
use super::error::InsightError;
use crate::models::{Lenient, RawJournalEntry};

/// Journal rows held in memory (tests, caches, embedding callers)
pub struct MemorySource {
    entries: RwLock<Vec<RawJournalEntry>>,
}

impl MemorySource {
    pub fn new(entries: Vec<RawJournalEntry>) -> Self {
        Self {
            entries: RwLock::new(entries),
        }
    }

    /// Append a row, e.g. after a journal submission
    pub fn insert(&self, entry: RawJournalEntry) -> Result<(), InsightError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| InsightError::SourceError(e.to_string()))?;
        entries.push(entry);
        Ok(())
    }

    /// Remove a row by id, returning whether it existed
    pub fn delete(&self, entry_id: &str) -> Result<bool, InsightError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| InsightError::SourceError(e.to_string()))?;
        let before = entries.len();
        entries.retain(|e| e.id.as_ref().and_then(Lenient::text).as_deref() != Some(entry_id));
        Ok(entries.len() != before)
    }
}

#[async_trait]
impl JournalSource for MemorySource {
    fn source_name(&self) -> &str {
        "memory"
    }

    async fn fetch_entries(
        &self,
        request: &FetchEntriesRequest,
    ) -> Result<Vec<RawJournalEntry>, InsightError> {
        let entries = self
            .entries
            .read()
            .map_err(|e| InsightError::SourceError(e.to_string()))?;

        Ok(entries
            .iter()
            .filter(|e| request.matches(e))
            .cloned()
            .collect())
    }
}
