use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

use super::error::InsightError;
use crate::analytics::normalizer::parse_timestamp;
use crate::models::{Lenient, RawJournalEntry};

/// Request parameters for fetching journal rows
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FetchEntriesRequest {
    pub user_id: String,
    /// Optional account partition (None = every account)
    pub account_id: Option<String>,
    /// Inclusive lower bound on `created_at`
    pub since: Option<DateTime<Utc>>,
    /// Exclusive upper bound on `created_at`
    pub until: Option<DateTime<Utc>>,
}

impl FetchEntriesRequest {
    pub fn for_user(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            ..Default::default()
        }
    }

    /// Whether a stored row belongs in this request's result.
    ///
    /// Rows whose timestamp cannot be parsed are kept so the normalizer can
    /// report them instead of dropping them here without a trace.
    pub fn matches(&self, entry: &RawJournalEntry) -> bool {
        if text(&entry.user_id).as_deref() != Some(self.user_id.as_str()) {
            return false;
        }
        if let Some(account_id) = &self.account_id {
            if text(&entry.account_id).as_deref() != Some(account_id.as_str()) {
                return false;
            }
        }

        let created_at = match text(&entry.created_at).as_deref().and_then(parse_timestamp) {
            Some(ts) => ts,
            None => return true,
        };
        if let Some(since) = self.since {
            if created_at < since {
                return false;
            }
        }
        if let Some(until) = self.until {
            if created_at >= until {
                return false;
            }
        }
        true
    }
}

fn text(value: &Option<Lenient<String>>) -> Option<Cow<'_, str>> {
    value.as_ref().and_then(Lenient::text)
}

/// Seam between the analytics pipeline and wherever journal rows live.
/// The fetch is the only asynchronous step of a pipeline run.
#[async_trait]
pub trait JournalSource: Send + Sync {
    /// Name used in logs (e.g., "memory", "json-file")
    fn source_name(&self) -> &str;

    /// Fetch every stored row matching the request
    async fn fetch_entries(
        &self,
        request: &FetchEntriesRequest,
    ) -> Result<Vec<RawJournalEntry>, InsightError>;
}
