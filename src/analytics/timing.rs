use chrono::{FixedOffset, NaiveDate, Timelike};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use super::{flatten_trades, trade_time};
use crate::models::JournalEntry;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyPerformance {
    pub hour: u32, // 0-23, local time
    pub trades: usize,
    pub wins: usize,
    pub total_pnl: f64,
    pub average_pnl: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TradingFrequency {
    pub active_days: usize,
    pub total_trades: usize,
    pub trades_per_day: f64,
}

/// Trade performance per local hour of day, hours without trades omitted
pub fn time_of_day_performance(
    entries: &[JournalEntry],
    offset: &FixedOffset,
    breakeven_threshold: f64,
) -> Vec<HourlyPerformance> {
    let mut by_hour: BTreeMap<u32, HourlyPerformance> = BTreeMap::new();

    for (entry, trade) in flatten_trades(entries) {
        let hour = trade_time(entry, trade).with_timezone(offset).hour();
        let slot = by_hour.entry(hour).or_insert_with(|| HourlyPerformance {
            hour,
            trades: 0,
            wins: 0,
            total_pnl: 0.0,
            average_pnl: 0.0,
        });
        slot.trades += 1;
        slot.total_pnl += trade.pnl;
        if trade.is_win(breakeven_threshold) {
            slot.wins += 1;
        }
    }

    by_hour
        .into_values()
        .map(|mut slot| {
            slot.average_pnl = slot.total_pnl / slot.trades as f64;
            slot
        })
        .collect()
}

/// Best and worst hour by total P&L among hours with enough trades.
/// Ties go to the earlier hour.
pub fn best_and_worst_hour(hours: &[HourlyPerformance], min_trades: usize) -> Option<(u32, u32)> {
    let eligible: Vec<&HourlyPerformance> = hours
        .iter()
        .filter(|h| h.trades >= min_trades.max(1))
        .collect();

    let best = eligible
        .iter()
        .copied()
        .reduce(|best, h| if h.total_pnl > best.total_pnl { h } else { best })?;
    let worst = eligible
        .iter()
        .copied()
        .reduce(|worst, h| if h.total_pnl < worst.total_pnl { h } else { worst })?;

    Some((best.hour, worst.hour))
}

/// "14:00 - 15:00"; hour 23 wraps to "00:00"
pub fn format_hour_range(hour: u32) -> String {
    format!("{:02}:00 - {:02}:00", hour % 24, (hour + 1) % 24)
}

/// Average trades per local day on which at least one trade happened
pub fn trading_frequency(entries: &[JournalEntry], offset: &FixedOffset) -> TradingFrequency {
    let trades = flatten_trades(entries);
    let days: BTreeSet<NaiveDate> = trades
        .iter()
        .map(|(entry, trade)| trade_time(entry, trade).with_timezone(offset).date_naive())
        .collect();

    let trades_per_day = if days.is_empty() {
        0.0
    } else {
        trades.len() as f64 / days.len() as f64
    };

    TradingFrequency {
        active_days: days.len(),
        total_trades: trades.len(),
        trades_per_day,
    }
}
