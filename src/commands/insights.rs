use chrono::{DateTime, Duration, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::analytics::{
    classify_entries, compose_insights, extract_features, label_distribution, normalize_entries,
    wrapped_for_month, Classification, JournalInsights, KeywordTableKind, LabelShare,
    MonthlyWrapped, NormalizedJournal,
};
use crate::models::InsightSettings;
use crate::source::{FetchEntriesRequest, InsightError, JournalSource};

/// Look-back window for a fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateRange {
    Today,
    Week,
    Month,
    #[serde(rename = "3months")]
    ThreeMonths,
    #[serde(rename = "6months")]
    SixMonths,
    Year,
    All,
}

impl DateRange {
    /// Earliest `created_at` included, relative to `now`. `Today` starts at
    /// local midnight in `offset`.
    pub fn lower_bound(self, now: DateTime<Utc>, offset: &FixedOffset) -> Option<DateTime<Utc>> {
        match self {
            DateRange::Today => {
                let midnight = now.with_timezone(offset).date_naive().and_hms_opt(0, 0, 0)?;
                let midnight = midnight.and_local_timezone(*offset).single()?;
                Some(midnight.with_timezone(&Utc))
            }
            DateRange::Week => Some(now - Duration::days(7)),
            DateRange::Month => Some(now - Duration::days(30)),
            DateRange::ThreeMonths => Some(now - Duration::days(90)),
            DateRange::SixMonths => Some(now - Duration::days(180)),
            DateRange::Year => Some(now - Duration::days(365)),
            DateRange::All => None,
        }
    }

    pub fn apply(self, request: &mut FetchEntriesRequest, now: DateTime<Utc>, offset: &FixedOffset) {
        request.since = self.lower_bound(now, offset);
    }
}

impl FromStr for DateRange {
    type Err = InsightError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "today" => Ok(DateRange::Today),
            "week" => Ok(DateRange::Week),
            "month" => Ok(DateRange::Month),
            "3months" => Ok(DateRange::ThreeMonths),
            "6months" => Ok(DateRange::SixMonths),
            "year" => Ok(DateRange::Year),
            "all" => Ok(DateRange::All),
            other => Err(InsightError::InvalidDateRange(other.to_string())),
        }
    }
}

/// Parse "YYYY-MM" into a (year, month) pair
pub fn parse_month(value: &str) -> Result<(i32, u32), InsightError> {
    let invalid = || InsightError::InvalidMonth(value.to_string());

    let (year, month) = value.trim().split_once('-').ok_or_else(invalid)?;
    let year: i32 = year.parse().map_err(|_| invalid())?;
    let month: u32 = month.parse().map_err(|_| invalid())?;

    if !(1..=12).contains(&month) {
        return Err(invalid());
    }
    Ok((year, month))
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PsychologyProfile {
    pub table: KeywordTableKind,
    pub total_entries: usize,
    pub unmatched: usize,
    pub distribution: Vec<LabelShare>,
    pub classifications: Vec<Classification>,
}

async fn fetch_journal(
    source: &dyn JournalSource,
    request: &FetchEntriesRequest,
) -> Result<NormalizedJournal, InsightError> {
    let raw = source.fetch_entries(request).await?;
    log::info!(
        "Fetched {} journal rows for user {} from {}",
        raw.len(),
        request.user_id,
        source.source_name()
    );
    Ok(normalize_entries(raw))
}

/// Fetch, normalize, extract and compose in one pass
pub async fn get_journal_insights(
    source: &dyn JournalSource,
    request: &FetchEntriesRequest,
    settings: &InsightSettings,
) -> Result<JournalInsights, InsightError> {
    let journal = fetch_journal(source, request).await?;
    let features = extract_features(&journal.entries, settings);
    let insights = compose_insights(&journal, features, settings);

    log::info!(
        "Composed insights: {} entries, {} trades, {} rejected",
        insights.total_entries,
        insights.total_trades,
        insights.rejected_entries.len()
    );
    Ok(insights)
}

pub async fn get_monthly_wrapped(
    source: &dyn JournalSource,
    request: &FetchEntriesRequest,
    settings: &InsightSettings,
    year: i32,
    month: u32,
) -> Result<MonthlyWrapped, InsightError> {
    if !(1..=12).contains(&month) {
        return Err(InsightError::InvalidMonth(format!("{:04}-{:02}", year, month)));
    }

    let journal = fetch_journal(source, request).await?;
    Ok(wrapped_for_month(&journal.entries, year, month, settings))
}

pub async fn get_psychology_profile(
    source: &dyn JournalSource,
    request: &FetchEntriesRequest,
    table: KeywordTableKind,
) -> Result<PsychologyProfile, InsightError> {
    let journal = fetch_journal(source, request).await?;
    let classifications = classify_entries(&journal.entries, table.table());

    Ok(PsychologyProfile {
        table,
        total_entries: journal.entries.len(),
        unmatched: classifications
            .iter()
            .filter(|c| c.label == crate::analytics::classifier::UNKNOWN_LABEL)
            .count(),
        distribution: label_distribution(&classifications),
        classifications,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RawJournalEntry;
    use crate::source::MemorySource;
    use chrono::TimeZone;
    use serde_json::json;

    fn source() -> MemorySource {
        let rows: Vec<RawJournalEntry> = serde_json::from_value(json!([
            {"id": "a", "user_id": "u1", "created_at": "2024-03-04T08:00:00Z", "emotion": "positive",
             "notes": "Stayed disciplined and waited for the setup",
             "trades": [{"instrument": "ES", "pnl": 200, "entryDate": "2024-03-04T09:30:00Z"}]},
            {"id": "b", "user_id": "u1", "created_at": "2024-03-05T08:00:00Z", "emotion": "negative",
             "notes": "fomo chase after the open",
             "trades": [{"instrument": "NQ", "pnl": "-75.5", "entryDate": "2024-03-05T09:45:00Z"}]},
            {"id": "c", "user_id": "u2", "created_at": "2024-03-05T08:00:00Z",
             "trades": [{"instrument": "CL", "pnl": 999}]}
        ]))
        .unwrap();
        MemorySource::new(rows)
    }

    #[test]
    fn test_parse_date_range() {
        assert_eq!("3months".parse::<DateRange>().unwrap(), DateRange::ThreeMonths);
        assert_eq!("ALL".parse::<DateRange>().unwrap(), DateRange::All);
        assert!(matches!(
            "fortnight".parse::<DateRange>(),
            Err(InsightError::InvalidDateRange(_))
        ));
    }

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    #[test]
    fn test_lower_bound() {
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 15, 30, 0).unwrap();
        assert_eq!(
            DateRange::Today.lower_bound(now, &utc()),
            Some(Utc.with_ymd_and_hms(2024, 3, 10, 0, 0, 0).unwrap())
        );
        assert_eq!(
            DateRange::Week.lower_bound(now, &utc()),
            Some(Utc.with_ymd_and_hms(2024, 3, 3, 15, 30, 0).unwrap())
        );
        assert_eq!(DateRange::All.lower_bound(now, &utc()), None);
    }

    #[test]
    fn test_today_starts_at_local_midnight() {
        // 22:00 on March 5th in UTC-5
        let now = Utc.with_ymd_and_hms(2024, 3, 6, 3, 0, 0).unwrap();
        let new_york = FixedOffset::west_opt(5 * 3600).unwrap();
        assert_eq!(
            DateRange::Today.lower_bound(now, &new_york),
            Some(Utc.with_ymd_and_hms(2024, 3, 5, 5, 0, 0).unwrap())
        );

        let tokyo = FixedOffset::east_opt(9 * 3600).unwrap();
        assert_eq!(
            DateRange::Today.lower_bound(now, &tokyo),
            Some(Utc.with_ymd_and_hms(2024, 3, 5, 15, 0, 0).unwrap())
        );
    }

    #[tokio::test]
    async fn test_today_range_uses_settings_offset() {
        let rows: Vec<RawJournalEntry> = serde_json::from_value(json!([
            {"id": "evening", "user_id": "u1", "created_at": "2024-03-05T20:00:00Z",
             "trades": [{"instrument": "ES", "pnl": 50}]},
            {"id": "yesterday", "user_id": "u1", "created_at": "2024-03-05T04:00:00Z",
             "trades": [{"instrument": "ES", "pnl": -10}]}
        ]))
        .unwrap();
        let source = MemorySource::new(rows);
        let settings = InsightSettings {
            utc_offset_minutes: -300,
            ..InsightSettings::default()
        };

        let mut request = FetchEntriesRequest::for_user("u1");
        let now = Utc.with_ymd_and_hms(2024, 3, 6, 3, 0, 0).unwrap();
        DateRange::Today.apply(&mut request, now, &settings.offset());

        let insights = get_journal_insights(&source, &request, &settings).await.unwrap();
        assert_eq!(insights.total_entries, 1);
        assert_eq!(insights.total_pnl, 50.0);
    }

    #[test]
    fn test_parse_month() {
        assert_eq!(parse_month("2024-03").unwrap(), (2024, 3));
        assert!(matches!(parse_month("2024-13"), Err(InsightError::InvalidMonth(_))));
        assert!(parse_month("March").is_err());
    }

    #[tokio::test]
    async fn test_insights_for_one_user() {
        let source = source();
        let insights = get_journal_insights(
            &source,
            &FetchEntriesRequest::for_user("u1"),
            &InsightSettings::default(),
        )
        .await
        .unwrap();

        assert_eq!(insights.total_entries, 2);
        assert_eq!(insights.total_pnl, 124.5);
        assert_eq!(insights.features.performance_by_emotion.negative, -75.5);
        assert_eq!(insights.frequency_summary, "Your average is 1.0 trades per day");
    }

    #[tokio::test]
    async fn test_range_filters_fetch() {
        let source = source();
        let mut request = FetchEntriesRequest::for_user("u1");
        let now = Utc.with_ymd_and_hms(2024, 3, 5, 12, 0, 0).unwrap();
        DateRange::Today.apply(&mut request, now, &utc());

        let insights = get_journal_insights(&source, &request, &InsightSettings::default())
            .await
            .unwrap();
        assert_eq!(insights.total_entries, 1);
        assert_eq!(insights.total_pnl, -75.5);
    }

    #[tokio::test]
    async fn test_monthly_wrapped() {
        let source = source();
        let request = FetchEntriesRequest::for_user("u1");
        let settings = InsightSettings::default();

        let wrapped = get_monthly_wrapped(&source, &request, &settings, 2024, 3).await.unwrap();
        assert_eq!(wrapped.total_trades, 2);
        assert_eq!(wrapped.best_trade, 200.0);

        let err = get_monthly_wrapped(&source, &request, &settings, 2024, 0).await;
        assert!(matches!(err, Err(InsightError::InvalidMonth(_))));
    }

    #[tokio::test]
    async fn test_psychology_profile() {
        let source = source();
        let profile = get_psychology_profile(
            &source,
            &FetchEntriesRequest::for_user("u1"),
            KeywordTableKind::BehavioralPatterns,
        )
        .await
        .unwrap();

        assert_eq!(profile.total_entries, 2);
        assert_eq!(profile.classifications[0].label, "Plan Adherence");
        assert_eq!(profile.classifications[1].label, "FOMO");
        assert_eq!(profile.unmatched, 0);
        assert_eq!(profile.distribution.len(), 2);
    }
}
