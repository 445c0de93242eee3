use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::Trade;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct InstrumentStats {
    pub trades: usize,
    pub wins: usize,
    pub losses: usize,
    pub total_pnl: f64,
    pub win_rate: f64, // percent of all trades on the instrument
}

/// Group a flattened trade list by instrument symbol
pub fn instrument_stats<'a, I>(trades: I, breakeven_threshold: f64) -> BTreeMap<String, InstrumentStats>
where
    I: IntoIterator<Item = &'a Trade>,
{
    let mut stats: BTreeMap<String, InstrumentStats> = BTreeMap::new();

    for trade in trades {
        let entry = stats.entry(trade.instrument.clone()).or_default();
        entry.trades += 1;
        entry.total_pnl += trade.pnl;
        if trade.is_win(breakeven_threshold) {
            entry.wins += 1;
        } else if trade.is_loss(breakeven_threshold) {
            entry.losses += 1;
        }
    }

    for entry in stats.values_mut() {
        entry.win_rate = (entry.wins as f64 / entry.trades as f64) * 100.0;
    }

    stats
}
