use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::client::{FetchEntriesRequest, JournalSource};
use super::error::InsightError;
use crate::models::{AccountBook, RawJournalEntry, TradingAccount};

/// Full journal backup as written by `JournalExport::to_json`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalExport {
    pub entries: Vec<RawJournalEntry>,
    #[serde(default)]
    pub accounts: Vec<TradingAccount>,
    pub export_date: String,
    pub version: String,
}

impl JournalExport {
    pub fn new(entries: Vec<RawJournalEntry>, accounts: Vec<TradingAccount>) -> Self {
        Self {
            entries,
            accounts,
            export_date: Utc::now().to_rfc3339(),
            version: "1.0.0".to_string(),
        }
    }

    pub fn to_json(&self) -> Result<String, InsightError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Accepted file shapes: a full backup or a bare array of journal rows
#[derive(Deserialize)]
#[serde(untagged)]
enum ExportFile {
    Backup(JournalExport),
    Rows(Vec<RawJournalEntry>),
}

/// Journal rows read from a JSON export on disk. The file is re-read on
/// every fetch so each pipeline run sees the current contents.
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_export(&self) -> Result<JournalExport, InsightError> {
        let content = tokio::fs::read_to_string(&self.path).await?;
        let export = match serde_json::from_str::<ExportFile>(&content)? {
            ExportFile::Backup(export) => export,
            ExportFile::Rows(entries) => JournalExport {
                entries,
                accounts: Vec::new(),
                export_date: String::new(),
                version: String::new(),
            },
        };
        log::debug!(
            "Read {} journal rows and {} accounts from {:?}",
            export.entries.len(),
            export.accounts.len(),
            self.path
        );
        Ok(export)
    }

    /// Accounts stored alongside the entries (empty for bare row files)
    pub async fn load_accounts(&self) -> Result<AccountBook, InsightError> {
        let export = self.read_export().await?;
        Ok(AccountBook::from_accounts(export.accounts))
    }
}

#[async_trait]
impl JournalSource for JsonFileSource {
    fn source_name(&self) -> &str {
        "json-file"
    }

    async fn fetch_entries(
        &self,
        request: &FetchEntriesRequest,
    ) -> Result<Vec<RawJournalEntry>, InsightError> {
        let export = self.read_export().await?;
        Ok(export
            .entries
            .into_iter()
            .filter(|e| request.matches(e))
            .collect())
    }
}
