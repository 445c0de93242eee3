//! Psychology and performance analytics over trading-journal entries.
//!
//! Journal rows come in through a [`source::JournalSource`], get normalized
//! into typed [`models::JournalEntry`] values and then run through
//! independent feature extractors in [`analytics`]. The caller-facing
//! operations live in [`commands`].

pub mod analytics;
pub mod commands;
pub mod models;
pub mod source;

pub use analytics::{JournalInsights, MonthlyWrapped};
pub use commands::{
    get_journal_insights, get_monthly_wrapped, get_psychology_profile, DateRange,
    PsychologyProfile,
};
pub use models::InsightSettings;
pub use source::{FetchEntriesRequest, InsightError, JournalSource, JsonFileSource, MemorySource};
