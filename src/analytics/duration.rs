use serde::{Deserialize, Serialize};

use crate::models::JournalEntry;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeDuration {
    pub trade_id: String,
    pub instrument: String,
    pub hours: f64,
    pub pnl: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DurationBucket {
    pub label: String,
    pub trades: usize,
    pub total_pnl: f64,
    pub average_pnl: f64,
}

const BUCKETS: [(&str, f64); 4] = [
    ("< 1 hour", 1.0),
    ("1-4 hours", 4.0),
    ("4-24 hours", 24.0),
    ("> 1 day", f64::INFINITY),
];

/// Holding time for every trade with both timestamps. Trades missing either
/// timestamp, or closing before they open, are left out.
pub fn trade_duration_analysis(entries: &[JournalEntry]) -> Vec<TradeDuration> {
    entries
        .iter()
        .flat_map(|entry| entry.trades.iter())
        .filter_map(|trade| {
            let hours = trade.duration_hours()?;
            if hours < 0.0 {
                log::debug!("Trade {} exits before it enters, skipping duration", trade.id);
                return None;
            }
            Some(TradeDuration {
                trade_id: trade.id.clone(),
                instrument: trade.instrument.clone(),
                hours,
                pnl: trade.pnl,
            })
        })
        .collect()
}

/// Group durations into fixed holding-time ranges; empty input gives no buckets
pub fn duration_distribution(durations: &[TradeDuration]) -> Vec<DurationBucket> {
    if durations.is_empty() {
        return Vec::new();
    }

    let mut buckets: Vec<DurationBucket> = BUCKETS
        .iter()
        .map(|(label, _)| DurationBucket {
            label: label.to_string(),
            trades: 0,
            total_pnl: 0.0,
            average_pnl: 0.0,
        })
        .collect();

    for duration in durations {
        let index = BUCKETS
            .iter()
            .position(|(_, upper)| duration.hours < *upper)
            .unwrap_or(BUCKETS.len() - 1);
        buckets[index].trades += 1;
        buckets[index].total_pnl += duration.pnl;
    }

    for bucket in buckets.iter_mut().filter(|b| b.trades > 0) {
        bucket.average_pnl = bucket.total_pnl / bucket.trades as f64;
    }

    buckets
}
