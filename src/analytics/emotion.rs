use chrono::{FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::trade_time;
use crate::models::{Emotion, JournalEntry, Outcome, SessionKind};

/// Summed trade P&L per canonical emotion label
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EmotionPerformance {
    pub positive: f64,
    pub neutral: f64,
    pub negative: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionWinRate {
    pub emotion: Emotion,
    pub trades: usize,
    pub wins: usize,
    pub win_rate: f64, // percent
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionTrendPoint {
    pub date: NaiveDate,
    pub total_pnl: f64,
    pub emotion: Emotion,
}

/// How long after the previous win each loss arrived
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecoveryBuckets {
    #[serde(rename = "< 1 day")]
    pub under_one_day: usize,
    #[serde(rename = "1-2 days")]
    pub one_to_two_days: usize,
    #[serde(rename = "2-3 days")]
    pub two_to_three_days: usize,
    #[serde(rename = "> 3 days")]
    pub over_three_days: usize,
}

impl RecoveryBuckets {
    fn record(&mut self, days: f64) {
        if days < 1.0 {
            self.under_one_day += 1;
        } else if days < 2.0 {
            self.one_to_two_days += 1;
        } else if days <= 3.0 {
            self.two_to_three_days += 1;
        } else {
            self.over_three_days += 1;
        }
    }

    pub fn total(&self) -> usize {
        self.under_one_day + self.one_to_two_days + self.two_to_three_days + self.over_three_days
    }
}

/// Entries without trades add nothing; non-canonical emotions land in no bucket
pub fn performance_by_emotion(entries: &[JournalEntry]) -> EmotionPerformance {
    let mut performance = EmotionPerformance::default();

    for entry in entries {
        let pnl = entry.total_pnl();
        match entry.emotion {
            Some(Emotion::Positive) => performance.positive += pnl,
            Some(Emotion::Neutral) => performance.neutral += pnl,
            Some(Emotion::Negative) => performance.negative += pnl,
            _ => {}
        }
    }

    performance
}

/// Win rate per canonical emotion, only for emotions that have trades
pub fn win_rate_by_emotion(entries: &[JournalEntry], breakeven_threshold: f64) -> Vec<EmotionWinRate> {
    [Emotion::Positive, Emotion::Neutral, Emotion::Negative]
        .into_iter()
        .filter_map(|emotion| {
            let (trades, wins) = entries
                .iter()
                .filter(|e| e.emotion.as_ref() == Some(&emotion))
                .flat_map(|e| e.trades.iter())
                .fold((0usize, 0usize), |(trades, wins), t| {
                    (trades + 1, wins + usize::from(t.is_win(breakeven_threshold)))
                });

            if trades == 0 {
                return None;
            }

            Some(EmotionWinRate {
                emotion,
                trades,
                wins,
                win_rate: (wins as f64 / trades as f64) * 100.0,
            })
        })
        .collect()
}

/// Daily P&L joined with that day's pre-session emotion.
///
/// One point per local day that has trades. The emotion is the last
/// pre-session entry of the day in input order, `neutral` when there is none.
pub fn emotion_trend(entries: &[JournalEntry], offset: &FixedOffset) -> Vec<EmotionTrendPoint> {
    let mut emotion_by_day: BTreeMap<NaiveDate, Emotion> = BTreeMap::new();
    let mut pnl_by_day: BTreeMap<NaiveDate, f64> = BTreeMap::new();

    for entry in entries {
        if entry.session_type == SessionKind::Pre {
            if let Some(emotion) = &entry.emotion {
                emotion_by_day.insert(entry.local_date(offset), emotion.clone());
            }
        }

        for trade in &entry.trades {
            let day = trade_time(entry, trade).with_timezone(offset).date_naive();
            *pnl_by_day.entry(day).or_insert(0.0) += trade.pnl;
        }
    }

    pnl_by_day
        .into_iter()
        .map(|(date, total_pnl)| EmotionTrendPoint {
            date,
            total_pnl,
            emotion: emotion_by_day
                .get(&date)
                .cloned()
                .unwrap_or(Emotion::Neutral),
        })
        .collect()
}

/// For each losing session, the time elapsed since the most recent winning
/// session before it. Losses with no earlier win are not counted.
pub fn emotion_recovery(entries: &[JournalEntry]) -> RecoveryBuckets {
    let mut ordered: Vec<&JournalEntry> = entries.iter().collect();
    ordered.sort_by_key(|e| e.created_at);

    let mut buckets = RecoveryBuckets::default();

    for (i, entry) in ordered.iter().enumerate() {
        if entry.outcome != Some(Outcome::Loss) {
            continue;
        }

        let last_win = ordered[..i]
            .iter()
            .rev()
            .find(|e| e.outcome == Some(Outcome::Win));

        if let Some(win) = last_win {
            let days = (entry.created_at - win.created_at).num_seconds() as f64 / 86_400.0;
            buckets.record(days);
        }
    }

    buckets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::normalizer::normalize_entries;
    use crate::models::RawJournalEntry;
    use serde_json::json;

    fn entries(rows: serde_json::Value) -> Vec<JournalEntry> {
        let raw: Vec<RawJournalEntry> = serde_json::from_value(rows).unwrap();
        normalize_entries(raw).entries
    }

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    #[test]
    fn test_string_pnl_counts_toward_positive() {
        let e = entries(json!([{
            "created_at": "2024-01-01T09:00:00Z",
            "emotion": "positive",
            "trades": [{"instrument": "ES", "pnl": "150.50"}]
        }]));

        let perf = performance_by_emotion(&e);
        assert_eq!(perf.positive, 150.5);
        assert_eq!(perf.neutral, 0.0);
        assert_eq!(perf.negative, 0.0);
    }

    #[test]
    fn test_unknown_emotion_is_excluded_from_buckets() {
        let e = entries(json!([
            {"created_at": "2024-01-01T09:00:00Z", "emotion": "frustrated",
             "trades": [{"instrument": "ES", "pnl": -80}]},
            {"created_at": "2024-01-01T10:00:00Z", "emotion": "negative",
             "trades": [{"instrument": "ES", "pnl": -20}, {"instrument": "NQ", "pnl": 5}]},
            {"created_at": "2024-01-01T11:00:00Z", "emotion": "neutral"}
        ]));

        let perf = performance_by_emotion(&e);
        assert_eq!(perf, EmotionPerformance { positive: 0.0, neutral: 0.0, negative: -15.0 });
        assert_eq!(e[0].emotion, Some(Emotion::Other("frustrated".to_string())));
    }

    #[test]
    fn test_win_rate_by_emotion() {
        let e = entries(json!([
            {"created_at": "2024-01-01T09:00:00Z", "emotion": "positive",
             "trades": [{"instrument": "ES", "pnl": 10}, {"instrument": "ES", "pnl": -5},
                        {"instrument": "ES", "pnl": 3}, {"instrument": "ES", "pnl": 1}]},
            {"created_at": "2024-01-02T09:00:00Z", "emotion": "negative",
             "trades": [{"instrument": "ES", "pnl": -10}]}
        ]));

        let rates = win_rate_by_emotion(&e, 0.0);
        assert_eq!(rates.len(), 2);
        assert_eq!(rates[0].emotion, Emotion::Positive);
        assert_eq!(rates[0].win_rate, 75.0);
        assert_eq!(rates[1].emotion, Emotion::Negative);
        assert_eq!(rates[1].wins, 0);

        // A threshold turns the 1.0 trade into a breakeven
        let rates = win_rate_by_emotion(&e, 2.0);
        assert_eq!(rates[0].wins, 2);
    }

    #[test]
    fn test_emotion_trend_sorted_and_joined() {
        let e = entries(json!([
            {"created_at": "2024-01-03T08:00:00Z", "session_type": "pre", "emotion": "negative"},
            {"created_at": "2024-01-03T12:00:00Z", "session_type": "trade", "emotion": "positive",
             "trades": [{"instrument": "ES", "pnl": -40, "entryDate": "2024-01-03T13:00:00Z"}]},
            {"created_at": "2024-01-03T18:00:00Z", "session_type": "post", "emotion": "positive"},
            {"created_at": "2024-01-01T08:00:00Z", "session_type": "pre", "emotion": "neutral"},
            {"created_at": "2024-01-01T08:30:00Z", "session_type": "pre", "emotion": "positive"},
            {"created_at": "2024-01-05T12:00:00Z", "session_type": "trade", "emotion": "negative",
             "trades": [{"instrument": "ES", "pnl": 25, "entryDate": "2024-01-01T14:00:00Z"},
                        {"instrument": "NQ", "pnl": 5}]}
        ]));

        let trend = emotion_trend(&e, &utc());
        let dates: Vec<String> = trend.iter().map(|p| p.date.to_string()).collect();
        assert_eq!(dates, vec!["2024-01-01", "2024-01-03", "2024-01-05"]);

        // Trade keyed by its own entry date, last pre-session emotion wins
        assert_eq!(trend[0].total_pnl, 25.0);
        assert_eq!(trend[0].emotion, Emotion::Positive);
        // Later post and trade session emotions on the same day are ignored
        assert_eq!(trend[1].emotion, Emotion::Negative);
        assert_eq!(trend[1].total_pnl, -40.0);
        // No pre-session entry that day; the trade session's own emotion does not count
        assert_eq!(trend[2].emotion, Emotion::Neutral);
        assert_eq!(trend[2].total_pnl, 5.0);

        for pair in trend.windows(2) {
            assert!(pair[0].date < pair[1].date);
        }
    }

    #[test]
    fn test_emotion_recovery_buckets() {
        let e = entries(json!([
            {"created_at": "2024-01-01T09:00:00Z", "outcome": "loss"},
            {"created_at": "2024-01-02T09:00:00Z", "outcome": "win"},
            {"created_at": "2024-01-02T15:00:00Z", "outcome": "loss"},
            {"created_at": "2024-01-03T21:00:00Z", "outcome": "loss"},
            {"created_at": "2024-01-04T12:00:00Z", "outcome": "loss"},
            {"created_at": "2024-01-09T09:00:00Z", "outcome": "loss"},
            {"created_at": "2024-01-10T09:00:00Z", "outcome": "breakeven"}
        ]));

        let buckets = emotion_recovery(&e);
        assert_eq!(buckets.under_one_day, 1);
        assert_eq!(buckets.one_to_two_days, 1);
        assert_eq!(buckets.two_to_three_days, 1);
        assert_eq!(buckets.over_three_days, 1);
        assert_eq!(buckets.total(), 4);

        let json = serde_json::to_value(buckets).unwrap();
        assert_eq!(json["< 1 day"], 1);
        assert_eq!(json["> 3 days"], 1);
    }
}
