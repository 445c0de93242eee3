//! Monthly "wrapped" summaries.

use chrono::{Datelike, FixedOffset, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::{most_common, trade_time};
use crate::models::{InsightSettings, JournalEntry, Trade};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MonthlyWrapped {
    pub month: String, // YYYY-MM
    pub total_entries: usize,
    pub total_trades: usize,
    pub wins: usize,
    pub losses: usize,
    pub win_rate: f64,
    pub total_pnl: f64,
    pub best_trade: f64,
    pub worst_trade: f64,
    pub favorite_setup: Option<String>,
    pub favorite_instrument: Option<String>,
    pub dominant_emotion: Option<String>,
    pub top_mistake: Option<String>,
    pub most_active_weekday: Option<String>,
    pub longest_win_streak: usize,
    pub rules_followed: usize,
}

fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

fn longest_win_streak(trades: &[(&JournalEntry, &Trade)], breakeven_threshold: f64) -> usize {
    let mut ordered: Vec<&(&JournalEntry, &Trade)> = trades.iter().collect();
    ordered.sort_by_key(|(entry, trade)| trade_time(entry, trade));

    let mut longest = 0;
    let mut current = 0;
    for (_, trade) in ordered {
        if trade.is_win(breakeven_threshold) {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }
    longest
}

fn summarize(month: String, entries: &[&JournalEntry], offset: &FixedOffset, threshold: f64) -> MonthlyWrapped {
    let trades: Vec<(&JournalEntry, &Trade)> = entries
        .iter()
        .flat_map(|entry| entry.trades.iter().map(move |trade| (*entry, trade)))
        .collect();

    let wins = trades.iter().filter(|(_, t)| t.is_win(threshold)).count();
    let losses = trades.iter().filter(|(_, t)| t.is_loss(threshold)).count();
    let closed = wins + losses;

    let pnls = trades.iter().map(|(_, t)| t.pnl);

    MonthlyWrapped {
        month,
        total_entries: entries.len(),
        total_trades: trades.len(),
        wins,
        losses,
        win_rate: if closed > 0 {
            (wins as f64 / closed as f64) * 100.0
        } else {
            0.0
        },
        total_pnl: pnls.clone().sum(),
        best_trade: pnls.clone().reduce(f64::max).unwrap_or(0.0),
        worst_trade: pnls.reduce(f64::min).unwrap_or(0.0),
        favorite_setup: most_common(trades.iter().filter_map(|(_, t)| t.setup.clone())),
        favorite_instrument: most_common(trades.iter().map(|(_, t)| t.instrument.clone())),
        dominant_emotion: most_common(
            entries
                .iter()
                .filter_map(|e| e.emotion.as_ref().map(|em| em.as_str().to_string())),
        ),
        top_mistake: most_common(entries.iter().flat_map(|e| e.mistakes.iter().cloned())),
        most_active_weekday: most_common(trades.iter().map(|(entry, trade)| {
            let day = trade_time(entry, trade).with_timezone(offset).weekday();
            weekday_name(day).to_string()
        })),
        longest_win_streak: longest_win_streak(&trades, threshold),
        rules_followed: entries.iter().map(|e| e.followed_rules.len()).sum(),
    }
}

/// Wrapped summary for one calendar month in local time. A month with no
/// entries yields a zeroed record.
pub fn wrapped_for_month(
    entries: &[JournalEntry],
    year: i32,
    month: u32,
    settings: &InsightSettings,
) -> MonthlyWrapped {
    let offset = settings.offset();
    let in_month: Vec<&JournalEntry> = entries
        .iter()
        .filter(|e| {
            let date = e.local_date(&offset);
            date.year() == year && date.month() == month
        })
        .collect();

    summarize(
        format!("{:04}-{:02}", year, month),
        &in_month,
        &offset,
        settings.breakeven_threshold,
    )
}

/// One summary per month that has entries, oldest first
pub fn monthly_wrapped(entries: &[JournalEntry], settings: &InsightSettings) -> Vec<MonthlyWrapped> {
    let offset = settings.offset();
    let months: BTreeSet<(i32, u32)> = entries
        .iter()
        .map(|e| {
            let date = e.local_date(&offset);
            (date.year(), date.month())
        })
        .collect();

    months
        .into_iter()
        .map(|(year, month)| wrapped_for_month(entries, year, month, settings))
        .collect()
}
