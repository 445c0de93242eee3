use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::lenient::Lenient;
use super::trade::{RawTrade, Trade};
use crate::source::InsightError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionKind {
    Pre,
    Post,
    Trade,
}

impl SessionKind {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "pre" => Some(SessionKind::Pre),
            "post" => Some(SessionKind::Post),
            "trade" => Some(SessionKind::Trade),
            _ => None,
        }
    }
}

/// Self-reported emotion label. Anything other than the three canonical
/// values is kept verbatim in `Other` so it round-trips unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Emotion {
    Positive,
    Neutral,
    Negative,
    Other(String),
}

impl Emotion {
    pub fn as_str(&self) -> &str {
        match self {
            Emotion::Positive => "positive",
            Emotion::Neutral => "neutral",
            Emotion::Negative => "negative",
            Emotion::Other(label) => label,
        }
    }

    pub fn is_canonical(&self) -> bool {
        !matches!(self, Emotion::Other(_))
    }
}

impl From<String> for Emotion {
    fn from(value: String) -> Self {
        match value.trim().to_lowercase().as_str() {
            "positive" => Emotion::Positive,
            "neutral" => Emotion::Neutral,
            "negative" => Emotion::Negative,
            _ => Emotion::Other(value),
        }
    }
}

impl From<Emotion> for String {
    fn from(value: Emotion) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Session result as tagged by the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Win,
    Loss,
    Breakeven,
}

impl Outcome {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "win" | "won" => Some(Outcome::Win),
            "loss" | "lost" => Some(Outcome::Loss),
            "breakeven" | "break-even" | "be" => Some(Outcome::Breakeven),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataIssueReason {
    Missing,
    Unparseable,
    InvalidDate,
    UnknownDirection,
    UnknownSessionKind,
    UnknownOutcome,
    WrongType,
}

/// A value the normalizer had to default or drop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataIssue {
    pub field: String, // e.g. "trades[2].pnl"
    pub raw: Option<String>,
    pub reason: DataIssueReason,
}

/// Journal row as stored: snake_case entry keys, nested trade array may be null.
/// Every field tolerates the wrong JSON type; see [`Lenient`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawJournalEntry {
    pub id: Option<Lenient<String>>,
    pub user_id: Option<Lenient<String>>,
    pub account_id: Option<Lenient<String>>,
    pub created_at: Option<Lenient<String>>,
    pub session_type: Option<Lenient<String>>,
    pub emotion: Option<Lenient<String>>,
    pub notes: Option<Lenient<String>>,
    pub trades: Option<Lenient<Vec<Lenient<RawTrade>>>>,
    pub followed_rules: Option<TagList>,
    pub mistakes: Option<TagList>,
    pub market_conditions: Option<TagList>,
    pub pre_trading_activities: Option<TagList>,
    pub outcome: Option<Lenient<String>>,
    /// Issues from an earlier normalization of this row
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub data_issues: Vec<DataIssue>,
}

/// Tag array; a bare string arrives as `Invalid` and becomes a single tag
pub type TagList = Lenient<Vec<Lenient<String>>>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub id: String,
    pub user_id: Option<String>,
    pub account_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub session_type: SessionKind,
    pub emotion: Option<Emotion>,
    pub notes: Option<String>,
    pub trades: Vec<Trade>,
    pub followed_rules: Vec<String>,
    pub mistakes: Vec<String>,
    pub market_conditions: Vec<String>,
    pub pre_trading_activities: Vec<String>,
    pub outcome: Option<Outcome>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub data_issues: Vec<DataIssue>,
}

impl JournalEntry {
    pub fn total_pnl(&self) -> f64 {
        self.trades.iter().map(|t| t.pnl).sum()
    }

    /// Sum of losing-trade magnitudes (positive number)
    pub fn loss_magnitude(&self) -> f64 {
        self.trades
            .iter()
            .filter(|t| t.pnl < 0.0)
            .map(|t| -t.pnl)
            .sum()
    }

    /// Calendar day of the entry in the caller's timezone
    pub fn local_date(&self, offset: &FixedOffset) -> NaiveDate {
        self.created_at.with_timezone(offset).date_naive()
    }

    /// Lowercased notes and tag text the keyword classifier scans
    pub fn searchable_text(&self) -> String {
        let mut parts: Vec<&str> = Vec::new();
        if let Some(notes) = &self.notes {
            parts.push(notes);
        }
        parts.extend(self.mistakes.iter().map(String::as_str));
        parts.extend(self.market_conditions.iter().map(String::as_str));
        parts.join(" ").to_lowercase()
    }

    pub fn append_trade(&mut self, trade: Trade) {
        self.trades.push(trade);
    }

    /// Replace the trade with the same id in place
    pub fn replace_trade(&mut self, trade: Trade) -> Result<(), InsightError> {
        let slot = self
            .trades
            .iter_mut()
            .find(|t| t.id == trade.id)
            .ok_or_else(|| InsightError::TradeNotFound(trade.id.clone()))?;
        *slot = trade;
        Ok(())
    }

    pub fn remove_trade(&mut self, trade_id: &str) -> Option<Trade> {
        let index = self.trades.iter().position(|t| t.id == trade_id)?;
        Some(self.trades.remove(index))
    }
}
