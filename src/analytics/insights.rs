//! Insight composer.
//!
//! [`extract_features`] runs every extractor over the normalized entries;
//! [`compose_insights`] adds headline totals and the summary sentences.
//! Neither step can fail, and an empty journal still yields a fully
//! populated result with placeholder summaries.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::classifier::{classify_entries, label_distribution, LabelShare};
use super::duration::{duration_distribution, trade_duration_analysis, DurationBucket, TradeDuration};
use super::emotion::{
    emotion_recovery, emotion_trend, performance_by_emotion, win_rate_by_emotion,
    EmotionPerformance, EmotionTrendPoint, EmotionWinRate, RecoveryBuckets,
};
use super::flatten_trades;
use super::instruments::{instrument_stats, InstrumentStats};
use super::keyword_tables::KeywordTableKind;
use super::mistakes::{mistake_frequency, MistakeStat};
use super::normalizer::{NormalizedJournal, RejectedEntry};
use super::risk::{pnl_volatility, risk_reward, RiskRewardPoint, VolatilityPoint};
use super::timing::{
    best_and_worst_hour, format_hour_range, time_of_day_performance, trading_frequency,
    HourlyPerformance, TradingFrequency,
};
use crate::models::{InsightSettings, JournalEntry};

pub const NO_ENTRIES_SUMMARY: &str = "No journal entries found";
pub const NO_TRADES_SUMMARY: &str = "No trades recorded yet";
pub const NO_HOURLY_SUMMARY: &str = "Not enough trades to compare trading hours";

/// Output of every feature extractor for one journal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureSet {
    pub performance_by_emotion: EmotionPerformance,
    pub win_rate_by_emotion: Vec<EmotionWinRate>,
    pub emotion_trend: Vec<EmotionTrendPoint>,
    pub mistake_frequency: BTreeMap<String, MistakeStat>,
    pub trade_durations: Vec<TradeDuration>,
    pub duration_distribution: Vec<DurationBucket>,
    pub emotion_recovery: RecoveryBuckets,
    pub instrument_stats: BTreeMap<String, InstrumentStats>,
    pub time_of_day: Vec<HourlyPerformance>,
    pub trading_frequency: TradingFrequency,
    pub risk_reward: Vec<RiskRewardPoint>,
    pub volatility: Vec<VolatilityPoint>,
    pub classifier_table: KeywordTableKind,
    pub trait_distribution: Vec<LabelShare>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalInsights {
    pub total_entries: usize,
    pub total_trades: usize,
    pub total_pnl: f64,
    pub win_rate: f64, // wins / (wins + losses), percent
    #[serde(flatten)]
    pub features: FeatureSet,
    pub data_issue_count: usize,
    pub rejected_entries: Vec<RejectedEntry>,
    pub frequency_summary: String,
    pub time_of_day_summary: String,
}

pub fn extract_features(entries: &[JournalEntry], settings: &InsightSettings) -> FeatureSet {
    let offset = settings.offset();
    let threshold = settings.breakeven_threshold;

    let trade_durations = trade_duration_analysis(entries);
    let duration_distribution = duration_distribution(&trade_durations);
    let table = settings.classifier_table.table();

    FeatureSet {
        performance_by_emotion: performance_by_emotion(entries),
        win_rate_by_emotion: win_rate_by_emotion(entries, threshold),
        emotion_trend: emotion_trend(entries, &offset),
        mistake_frequency: mistake_frequency(entries),
        trade_durations,
        duration_distribution,
        emotion_recovery: emotion_recovery(entries),
        instrument_stats: instrument_stats(
            entries.iter().flat_map(|e| e.trades.iter()),
            threshold,
        ),
        time_of_day: time_of_day_performance(entries, &offset, threshold),
        trading_frequency: trading_frequency(entries, &offset),
        risk_reward: risk_reward(entries),
        volatility: pnl_volatility(entries, &offset, settings.volatility_window),
        classifier_table: settings.classifier_table,
        trait_distribution: label_distribution(&classify_entries(entries, table)),
    }
}

fn frequency_summary(entries: &[JournalEntry], frequency: &TradingFrequency) -> String {
    if entries.is_empty() {
        NO_ENTRIES_SUMMARY.to_string()
    } else if frequency.total_trades == 0 {
        NO_TRADES_SUMMARY.to_string()
    } else {
        format!("Your average is {:.1} trades per day", frequency.trades_per_day)
    }
}

fn time_of_day_summary(hours: &[HourlyPerformance], min_trades: usize) -> String {
    match best_and_worst_hour(hours, min_trades) {
        Some((best, worst)) if best != worst => format!(
            "You trade best between {} and worst between {}",
            format_hour_range(best),
            format_hour_range(worst)
        ),
        Some((best, _)) => format!("All of your trades fall between {}", format_hour_range(best)),
        None => NO_HOURLY_SUMMARY.to_string(),
    }
}

pub fn compose_insights(
    journal: &NormalizedJournal,
    features: FeatureSet,
    settings: &InsightSettings,
) -> JournalInsights {
    let entries = &journal.entries;
    let threshold = settings.breakeven_threshold;
    let trades = flatten_trades(entries);

    let wins = trades.iter().filter(|(_, t)| t.is_win(threshold)).count();
    let losses = trades.iter().filter(|(_, t)| t.is_loss(threshold)).count();
    let win_rate = if wins + losses > 0 {
        (wins as f64 / (wins + losses) as f64) * 100.0
    } else {
        0.0
    };

    let data_issue_count = entries.iter().map(|e| e.data_issues.len()).sum();
    if data_issue_count > 0 {
        log::warn!("{} data issues found while normalizing the journal", data_issue_count);
    }

    let frequency_summary = frequency_summary(entries, &features.trading_frequency);
    let time_of_day_summary = time_of_day_summary(&features.time_of_day, settings.min_trades_per_hour);

    JournalInsights {
        total_entries: entries.len(),
        total_trades: trades.len(),
        total_pnl: trades.iter().map(|(_, t)| t.pnl).sum(),
        win_rate,
        features,
        data_issue_count,
        rejected_entries: journal.rejected.clone(),
        frequency_summary,
        time_of_day_summary,
    }
}
