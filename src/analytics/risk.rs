use chrono::{FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{flatten_trades, trade_time};
use crate::models::{JournalEntry, Trade};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskRewardPoint {
    pub trade_id: String,
    pub instrument: String,
    pub planned_rr: f64,
    pub realized_r: Option<f64>, // needs quantity
    pub pnl: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolatilityPoint {
    pub date: NaiveDate,
    pub daily_pnl: f64,
    pub rolling_std_dev: f64,
}

fn risk_reward_for(trade: &Trade) -> Option<RiskRewardPoint> {
    let entry = trade.entry_price?;
    let stop = trade.stop_loss?;
    let target = trade.take_profit?;

    let risk_per_unit = (entry - stop).abs();
    if risk_per_unit == 0.0 {
        return None;
    }

    let realized_r = trade
        .quantity
        .filter(|q| *q != 0.0)
        .map(|q| trade.pnl / (risk_per_unit * q.abs()));

    Some(RiskRewardPoint {
        trade_id: trade.id.clone(),
        instrument: trade.instrument.clone(),
        planned_rr: (target - entry).abs() / risk_per_unit,
        realized_r,
        pnl: trade.pnl,
    })
}

/// Planned and realized reward-to-risk for trades with entry, stop and target
pub fn risk_reward(entries: &[JournalEntry]) -> Vec<RiskRewardPoint> {
    flatten_trades(entries)
        .into_iter()
        .filter_map(|(_, trade)| risk_reward_for(trade))
        .collect()
}

/// Daily P&L with a trailing population standard deviation over the last
/// `window` trading days (the current day included)
pub fn pnl_volatility(entries: &[JournalEntry], offset: &FixedOffset, window: usize) -> Vec<VolatilityPoint> {
    let window = window.max(1);
    let mut daily: BTreeMap<NaiveDate, f64> = BTreeMap::new();

    for (entry, trade) in flatten_trades(entries) {
        let day = trade_time(entry, trade).with_timezone(offset).date_naive();
        *daily.entry(day).or_insert(0.0) += trade.pnl;
    }

    let series: Vec<(NaiveDate, f64)> = daily.into_iter().collect();

    series
        .iter()
        .enumerate()
        .map(|(i, (date, daily_pnl))| {
            let start = (i + 1).saturating_sub(window);
            let values: Vec<f64> = series[start..=i].iter().map(|(_, pnl)| *pnl).collect();
            VolatilityPoint {
                date: *date,
                daily_pnl: *daily_pnl,
                rolling_std_dev: std_dev(&values),
            }
        })
        .collect()
}

fn std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}
