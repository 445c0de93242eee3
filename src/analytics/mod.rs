pub mod classifier;
pub mod duration;
pub mod emotion;
pub mod insights;
pub mod instruments;
pub mod keyword_tables;
pub mod mistakes;
pub mod normalizer;
pub mod risk;
pub mod timing;
pub mod wrapped;

use chrono::{DateTime, Utc};
use std::collections::HashMap;

use crate::models::{JournalEntry, Trade};

pub use classifier::{classify_entries, classify_entry, label_distribution, Classification, LabelShare};
pub use insights::{compose_insights, extract_features, FeatureSet, JournalInsights};
pub use keyword_tables::KeywordTableKind;
pub use normalizer::{normalize_entries, NormalizedJournal, RejectedEntry};
pub use wrapped::{monthly_wrapped, wrapped_for_month, MonthlyWrapped};

/// Every trade paired with its parent entry, in entry order
pub fn flatten_trades(entries: &[JournalEntry]) -> Vec<(&JournalEntry, &Trade)> {
    entries
        .iter()
        .flat_map(|entry| entry.trades.iter().map(move |trade| (entry, trade)))
        .collect()
}

/// When a trade happened: its own entry time, else the journal entry's
pub fn trade_time(entry: &JournalEntry, trade: &Trade) -> DateTime<Utc> {
    trade.entry_date.unwrap_or(entry.created_at)
}

/// Most frequent value; ties go to the alphabetically first
pub(crate) fn most_common<I>(values: I) -> Option<String>
where
    I: IntoIterator<Item = String>,
{
    let mut counts: HashMap<String, usize> = HashMap::new();
    for value in values {
        *counts.entry(value).or_insert(0) += 1;
    }

    counts
        .into_iter()
        .max_by(|a, b| a.1.cmp(&b.1).then_with(|| b.0.cmp(&a.0)))
        .map(|(value, _)| value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_most_common_breaks_ties_alphabetically() {
        let values = ["b", "a", "c", "b", "a"].iter().map(|s| s.to_string());
        assert_eq!(most_common(values), Some("a".to_string()));
        assert_eq!(most_common(Vec::<String>::new()), None);
    }
}
