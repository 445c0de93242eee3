//! Entry normalizer: turns stored journal rows into typed entries.
//!
//! Coercion is permissive: an unusable P&L becomes `0.0`, an unknown session
//! kind becomes `pre`, a value of the wrong JSON type is stringified or
//! dropped. Every such fallback is recorded as a [`DataIssue`] on
//! the entry so callers can surface data quality instead of hiding it.
//! The only hard rejection is an entry without a usable `created_at`.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::borrow::Cow;
use std::sync::OnceLock;

use crate::models::{
    DataIssue, DataIssueReason, Direction, Emotion, JournalEntry, Lenient, NumericValue, Outcome,
    RawJournalEntry, RawTrade, SessionKind, TagList, Trade,
};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NormalizedJournal {
    pub entries: Vec<JournalEntry>,
    pub rejected: Vec<RejectedEntry>,
}

/// A stored row that could not be placed on the timeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RejectedEntry {
    pub index: usize,
    pub id: Option<String>,
    pub reason: String,
}

pub fn normalize_entries(raw: Vec<RawJournalEntry>) -> NormalizedJournal {
    let mut journal = NormalizedJournal::default();

    for (index, row) in raw.into_iter().enumerate() {
        match normalize_entry(row, index) {
            Ok(entry) => {
                if !entry.data_issues.is_empty() {
                    log::debug!(
                        "Entry {} normalized with {} data issues",
                        entry.id,
                        entry.data_issues.len()
                    );
                }
                journal.entries.push(entry);
            }
            Err(rejected) => {
                log::warn!(
                    "Skipping journal row {} ({:?}): {}",
                    rejected.index,
                    rejected.id,
                    rejected.reason
                );
                journal.rejected.push(rejected);
            }
        }
    }

    journal
}

pub fn normalize_entry(raw: RawJournalEntry, index: usize) -> Result<JournalEntry, RejectedEntry> {
    let mut issues = Vec::new();

    let id = text_field("id", raw.id, &mut issues).filter(|id| !id.trim().is_empty());

    let created_at = match &raw.created_at {
        Some(value) => value
            .text()
            .as_deref()
            .and_then(parse_timestamp)
            .ok_or_else(|| RejectedEntry {
                index,
                id: id.clone(),
                reason: format!("Invalid created_at: {}", value.raw_text()),
            })?,
        None => {
            return Err(RejectedEntry {
                index,
                id,
                reason: "Missing created_at".to_string(),
            });
        }
    };

    let id = id.unwrap_or_else(|| format!("ENTRY-{}-{}", created_at.timestamp_millis(), index));

    let session_type = match text_field("session_type", raw.session_type, &mut issues) {
        Some(value) => SessionKind::parse(&value).unwrap_or_else(|| {
            issues.push(DataIssue {
                field: "session_type".to_string(),
                raw: Some(value),
                reason: DataIssueReason::UnknownSessionKind,
            });
            SessionKind::Pre
        }),
        None => SessionKind::Pre,
    };

    let emotion = text_field("emotion", raw.emotion, &mut issues)
        .filter(|e| !e.trim().is_empty())
        .map(Emotion::from);

    let outcome = match text_field("outcome", raw.outcome, &mut issues).as_deref().map(str::trim) {
        Some("") | None => None,
        Some(value) => {
            let parsed = Outcome::parse(value);
            if parsed.is_none() {
                issues.push(DataIssue {
                    field: "outcome".to_string(),
                    raw: Some(value.to_string()),
                    reason: DataIssueReason::UnknownOutcome,
                });
            }
            parsed
        }
    };

    let mut trades = Vec::new();
    match raw.trades {
        None => {}
        Some(Lenient::Valid(slots)) => {
            for (i, slot) in slots.into_iter().enumerate() {
                match slot {
                    Lenient::Valid(trade) => trades.push(normalize_trade(trade, &id, i, &mut issues)),
                    Lenient::Invalid(other) => issues.push(wrong_type(format!("trades[{}]", i), &other)),
                }
            }
        }
        Some(Lenient::Invalid(other)) => issues.push(wrong_type("trades".to_string(), &other)),
    }

    let user_id = text_field("user_id", raw.user_id, &mut issues);
    let account_id = text_field("account_id", raw.account_id, &mut issues);
    let notes = text_field("notes", raw.notes, &mut issues).filter(|n| !n.trim().is_empty());
    let followed_rules = clean_tags("followed_rules", raw.followed_rules, &mut issues);
    let mistakes = clean_tags("mistakes", raw.mistakes, &mut issues);
    let market_conditions = clean_tags("market_conditions", raw.market_conditions, &mut issues);
    let pre_trading_activities =
        clean_tags("pre_trading_activities", raw.pre_trading_activities, &mut issues);

    // Issues from an earlier pass come first
    let mut data_issues = raw.data_issues;
    for issue in issues {
        if !data_issues.contains(&issue) {
            data_issues.push(issue);
        }
    }

    Ok(JournalEntry {
        id,
        user_id,
        account_id,
        created_at,
        session_type,
        emotion,
        notes,
        trades,
        followed_rules,
        mistakes,
        market_conditions,
        pre_trading_activities,
        outcome,
        data_issues,
    })
}

pub(crate) fn normalize_trade(raw: RawTrade, entry_id: &str, index: usize, issues: &mut Vec<DataIssue>) -> Trade {
    let field = |name: &str| format!("trades[{}].{}", index, name);

    let mut text = |name: &str, value: Option<Lenient<String>>| text_field(&field(name), value, issues);
    let id = text("id", raw.id);
    let instrument = text("instrument", raw.instrument);
    let direction = text("direction", raw.direction);
    let entry_date = text("entryDate", raw.entry_date);
    let exit_date = text("exitDate", raw.exit_date);
    let setup = text("setup", raw.setup);
    let import_fingerprint = text("importFingerprint", raw.import_fingerprint);

    let mut numeric = |name: &str, value: Option<NumericValue>| -> Option<f64> {
        let value = value?;
        let parsed = parse_numeric(&value);
        if parsed.is_none() {
            let reason = match value {
                NumericValue::Other(_) => DataIssueReason::WrongType,
                _ => DataIssueReason::Unparseable,
            };
            issues.push(DataIssue {
                field: field(name),
                raw: Some(value.raw_text()),
                reason,
            });
        }
        parsed
    };

    let entry_price = numeric("entryPrice", raw.entry_price);
    let exit_price = numeric("exitPrice", raw.exit_price);
    let stop_loss = numeric("stopLoss", raw.stop_loss);
    let take_profit = numeric("takeProfit", raw.take_profit);
    let quantity = numeric("quantity", raw.quantity);
    let fees = numeric("fees", raw.fees);
    let pnl_missing = raw.pnl.is_none();
    let pnl = numeric("pnl", raw.pnl);

    if pnl_missing {
        issues.push(DataIssue {
            field: field("pnl"),
            raw: None,
            reason: DataIssueReason::Missing,
        });
    }

    let mut date = |name: &str, value: Option<String>| -> Option<DateTime<Utc>> {
        let value = value.filter(|v| !v.trim().is_empty())?;
        let parsed = parse_timestamp(&value);
        if parsed.is_none() {
            issues.push(DataIssue {
                field: field(name),
                raw: Some(value),
                reason: DataIssueReason::InvalidDate,
            });
        }
        parsed
    };

    let entry_date = date("entryDate", entry_date);
    let exit_date = date("exitDate", exit_date);

    let direction = match direction.as_deref().map(str::trim) {
        Some("") | None => None,
        Some(value) => {
            let parsed = Direction::parse(value);
            if parsed.is_none() {
                issues.push(DataIssue {
                    field: field("direction"),
                    raw: Some(value.to_string()),
                    reason: DataIssueReason::UnknownDirection,
                });
            }
            parsed
        }
    };

    let instrument = match instrument.map(|s| s.trim().to_string()) {
        Some(symbol) if !symbol.is_empty() => symbol,
        _ => {
            issues.push(DataIssue {
                field: field("instrument"),
                raw: None,
                reason: DataIssueReason::Missing,
            });
            "UNKNOWN".to_string()
        }
    };

    Trade {
        id: id
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| format!("{}-TRADE-{}", entry_id, index)),
        instrument,
        direction,
        entry_date,
        exit_date,
        entry_price,
        exit_price,
        stop_loss,
        take_profit,
        quantity,
        fees,
        pnl: pnl.unwrap_or(0.0),
        setup: setup.filter(|s| !s.trim().is_empty()),
        import_fingerprint,
    }
}

fn wrong_type(field: String, value: &Value) -> DataIssue {
    DataIssue {
        field,
        raw: Some(value.to_string()),
        reason: DataIssueReason::WrongType,
    }
}

/// Text field that may have arrived with the wrong JSON type. Numbers and
/// booleans are stringified, anything else is dropped; either way it is flagged.
fn text_field(field: &str, value: Option<Lenient<String>>, issues: &mut Vec<DataIssue>) -> Option<String> {
    let value = value?;
    if let Lenient::Invalid(other) = &value {
        issues.push(wrong_type(field.to_string(), other));
    }
    value.text().map(Cow::into_owned)
}

fn clean_tags(field: &str, tags: Option<TagList>, issues: &mut Vec<DataIssue>) -> Vec<String> {
    let tags = match tags {
        None => Vec::new(),
        Some(Lenient::Valid(items)) => items
            .into_iter()
            .enumerate()
            .filter_map(|(i, tag)| text_field(&format!("{}[{}]", field, i), Some(tag), issues))
            .collect(),
        Some(Lenient::Invalid(Value::String(tag))) => {
            issues.push(DataIssue {
                field: field.to_string(),
                raw: Some(tag.clone()),
                reason: DataIssueReason::WrongType,
            });
            vec![tag]
        }
        Some(Lenient::Invalid(other)) => {
            issues.push(wrong_type(field.to_string(), &other));
            Vec::new()
        }
    };

    tags.into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}

fn numeric_prefix() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    // Leading number of values like "-90.354USDT" or "1645.2INJ"
    RE.get_or_init(|| Regex::new(r"^([-+]?\d+(?:\.\d*)?)").ok())
        .as_ref()
}

fn grouped_integer() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    // Thousands separators: "1,250.75", "-12,000USDT"
    RE.get_or_init(|| Regex::new(r"^([-+]?\d{1,3}(?:,\d{3})+)(?:[^\d,]|$)").ok())
        .as_ref()
}

/// Parse a numeric-or-string field. Non-finite values count as unparseable.
pub fn parse_numeric(value: &NumericValue) -> Option<f64> {
    let parsed = match value {
        NumericValue::Number(n) => Some(*n),
        NumericValue::Text(text) => parse_numeric_str(text),
        NumericValue::Other(_) => None,
    };
    parsed.filter(|n| n.is_finite())
}

pub fn parse_numeric_str(text: &str) -> Option<f64> {
    let text = text.trim();
    // A currency sign may sit on either side of the minus: "-$50", "$-50"
    let (sign, body) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text.strip_prefix('+').unwrap_or(text)),
    };
    let body = body.strip_prefix('$').unwrap_or(body);

    let mut cleaned = format!("{}{}", sign, body);
    cleaned.retain(|c| c != '_');
    if cleaned.is_empty() {
        return None;
    }

    // Commas are only accepted as separators between groups of three digits
    if cleaned.contains(',') {
        let grouped = grouped_integer()?.captures(&cleaned)?.get(1)?;
        let integer = grouped.as_str().replace(',', "");
        cleaned = format!("{}{}", integer, &cleaned[grouped.end()..]);
    }

    if let Ok(n) = cleaned.parse::<f64>() {
        return Some(n);
    }

    let caps = numeric_prefix()?.captures(&cleaned)?;
    caps.get(1)?.as_str().parse::<f64>().ok()
}

/// Parse the timestamp formats seen in stored rows. Returns None rather than
/// an "invalid date" value so callers must handle the failure.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }

    // Postgres text output, e.g. "2024-01-01 10:00:00.123+00"
    for format in ["%Y-%m-%d %H:%M:%S%.f%#z", "%Y-%m-%dT%H:%M:%S%.f%#z"] {
        if let Ok(dt) = DateTime::parse_from_str(value, format) {
            return Some(dt.with_timezone(&Utc));
        }
    }

    for format in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn raw(value: serde_json::Value) -> RawJournalEntry {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_parse_numeric_variants() {
        assert_eq!(parse_numeric(&NumericValue::Text("150.50".into())), Some(150.5));
        assert_eq!(parse_numeric(&NumericValue::Text(" -90.354USDT".into())), Some(-90.354));
        assert_eq!(parse_numeric(&NumericValue::Text("$1,250.75".into())), Some(1250.75));
        assert_eq!(parse_numeric(&NumericValue::Number(42.0)), Some(42.0));
        assert_eq!(parse_numeric(&NumericValue::Text("abc".into())), None);
        assert_eq!(parse_numeric(&NumericValue::Text("NaN".into())), None);
        assert_eq!(parse_numeric(&NumericValue::Text("".into())), None);
        assert_eq!(parse_numeric(&NumericValue::Other(json!(true))), None);
    }

    #[test]
    fn test_currency_sign_and_thousands_separators() {
        assert_eq!(parse_numeric_str("-$50"), Some(-50.0));
        assert_eq!(parse_numeric_str("$-50"), Some(-50.0));
        assert_eq!(parse_numeric_str("+$50"), Some(50.0));
        assert_eq!(parse_numeric_str("-$1,050.00"), Some(-1050.0));
        assert_eq!(parse_numeric_str("12,345,678.9"), Some(12345678.9));
        assert_eq!(parse_numeric_str("-12,000USDT"), Some(-12000.0));

        // A comma that is not a thousands separator is ambiguous
        assert_eq!(parse_numeric_str("1,5"), None);
        assert_eq!(parse_numeric_str("1,2345"), None);
        assert_eq!(parse_numeric_str("1,500,00"), None);
        assert_eq!(parse_numeric_str("$"), None);
    }

    #[test]
    fn test_decimal_comma_pnl_is_flagged() {
        let journal = normalize_entries(vec![raw(json!({
            "id": "e1",
            "created_at": "2024-01-01T09:00:00Z",
            "trades": [{"id": "t1", "instrument": "DAX", "pnl": "1,5"}]
        }))]);

        let entry = &journal.entries[0];
        assert_eq!(entry.trades[0].pnl, 0.0);
        assert_eq!(
            entry.data_issues,
            vec![DataIssue {
                field: "trades[0].pnl".to_string(),
                raw: Some("1,5".to_string()),
                reason: DataIssueReason::Unparseable,
            }]
        );
    }

    #[test]
    fn test_parse_timestamp_formats() {
        let expected = Utc.with_ymd_and_hms(2024, 1, 1, 10, 30, 0).unwrap();
        assert_eq!(parse_timestamp("2024-01-01T10:30:00Z"), Some(expected));
        assert_eq!(parse_timestamp("2024-01-01T12:30:00+02:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-01-01 10:30:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-01-01T10:30"), Some(expected));
        assert_eq!(parse_timestamp("2024-01-01 10:30:00+00"), Some(expected));
        assert_eq!(
            parse_timestamp("2024-01-01"),
            Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
        );
        assert_eq!(parse_timestamp("Invalid Date"), None);
        assert_eq!(parse_timestamp("2024-13-45"), None);
    }

    #[test]
    fn test_string_pnl_is_parsed() {
        let journal = normalize_entries(vec![raw(json!({
            "id": "e1",
            "created_at": "2024-01-01T09:00:00Z",
            "session_type": "trade",
            "emotion": "positive",
            "trades": [{"id": "t1", "instrument": "ES", "pnl": "150.50"}]
        }))]);

        let entry = &journal.entries[0];
        assert_eq!(entry.trades[0].pnl, 150.5);
        assert_eq!(entry.session_type, SessionKind::Trade);
        assert!(entry.data_issues.is_empty());
    }

    #[test]
    fn test_bad_values_default_and_are_flagged() {
        let journal = normalize_entries(vec![raw(json!({
            "id": "e1",
            "created_at": "2024-01-01T09:00:00Z",
            "session_type": "during",
            "outcome": "maybe",
            "trades": [
                {"instrument": "ES", "pnl": "oops", "direction": "sideways", "entryDate": "yesterday"},
                {"instrument": "", "entryPrice": 10}
            ]
        }))]);

        let entry = &journal.entries[0];
        assert_eq!(entry.session_type, SessionKind::Pre);
        assert_eq!(entry.outcome, None);
        assert_eq!(entry.trades[0].pnl, 0.0);
        assert_eq!(entry.trades[0].direction, None);
        assert_eq!(entry.trades[0].entry_date, None);
        assert_eq!(entry.trades[0].id, "e1-TRADE-0");
        assert_eq!(entry.trades[1].pnl, 0.0);
        assert_eq!(entry.trades[1].instrument, "UNKNOWN");
        assert_eq!(entry.trades[1].entry_price, Some(10.0));

        let reasons: Vec<(&str, DataIssueReason)> = entry
            .data_issues
            .iter()
            .map(|i| (i.field.as_str(), i.reason))
            .collect();
        assert!(reasons.contains(&("session_type", DataIssueReason::UnknownSessionKind)));
        assert!(reasons.contains(&("outcome", DataIssueReason::UnknownOutcome)));
        assert!(reasons.contains(&("trades[0].pnl", DataIssueReason::Unparseable)));
        assert!(reasons.contains(&("trades[0].direction", DataIssueReason::UnknownDirection)));
        assert!(reasons.contains(&("trades[0].entryDate", DataIssueReason::InvalidDate)));
        assert!(reasons.contains(&("trades[1].pnl", DataIssueReason::Missing)));
        assert!(reasons.contains(&("trades[1].instrument", DataIssueReason::Missing)));
    }

    #[test]
    fn test_wrong_json_types_are_coerced_and_flagged() {
        let journal = normalize_entries(vec![raw(json!({
            "id": 1704186000000u64,
            "user_id": "u1",
            "created_at": "2024-01-02T09:00:00Z",
            "session_type": "post",
            "notes": {"text": "lost"},
            "mistakes": "fomo",
            "followed_rules": ["stop set", 7, ["nested"]],
            "trades": [
                {"id": 42, "instrument": "ES", "pnl": true, "quantity": 2},
                "not a trade",
                {"instrument": "NQ", "pnl": -20}
            ]
        }))]);

        assert!(journal.rejected.is_empty());
        let entry = &journal.entries[0];
        assert_eq!(entry.id, "1704186000000");
        assert_eq!(entry.notes, None);
        assert_eq!(entry.mistakes, vec!["fomo"]);
        assert_eq!(entry.followed_rules, vec!["stop set", "7"]);
        assert_eq!(entry.trades.len(), 2);
        assert_eq!(entry.trades[0].id, "42");
        assert_eq!(entry.trades[0].pnl, 0.0);
        assert_eq!(entry.trades[0].quantity, Some(2.0));
        assert_eq!(entry.trades[1].id, "1704186000000-TRADE-2");
        assert_eq!(entry.trades[1].pnl, -20.0);

        let flagged: Vec<(&str, Option<&str>)> = entry
            .data_issues
            .iter()
            .filter(|i| i.reason == DataIssueReason::WrongType)
            .map(|i| (i.field.as_str(), i.raw.as_deref()))
            .collect();
        assert_eq!(
            flagged,
            vec![
                ("id", Some("1704186000000")),
                ("trades[0].id", Some("42")),
                ("trades[0].pnl", Some("true")),
                ("trades[1]", Some("\"not a trade\"")),
                ("notes", Some(r#"{"text":"lost"}"#)),
                ("followed_rules[1]", Some("7")),
                ("followed_rules[2]", Some(r#"["nested"]"#)),
                ("mistakes", Some("fomo")),
            ]
        );
    }

    #[test]
    fn test_wrong_typed_created_at_is_rejected() {
        let journal = normalize_entries(vec![raw(json!({"id": "e1", "created_at": 1704186000000u64}))]);
        assert!(journal.entries.is_empty());
        assert_eq!(journal.rejected[0].reason, "Invalid created_at: 1704186000000");
    }

    #[test]
    fn test_rejects_entries_without_usable_timestamp() {
        let journal = normalize_entries(vec![
            raw(json!({"id": "no-date"})),
            raw(json!({"id": "bad-date", "created_at": "Invalid Date"})),
            raw(json!({"id": "ok", "created_at": "2024-02-01"})),
        ]);

        assert_eq!(journal.entries.len(), 1);
        assert_eq!(journal.entries[0].id, "ok");
        assert_eq!(journal.rejected.len(), 2);
        assert_eq!(journal.rejected[1].id.as_deref(), Some("bad-date"));
        assert_eq!(journal.rejected[1].index, 1);
    }

    #[test]
    fn test_unknown_emotion_kept_and_null_trades_allowed() {
        let journal = normalize_entries(vec![raw(json!({
            "created_at": "2024-01-01T09:00:00Z",
            "emotion": "frustrated",
            "trades": null,
            "mistakes": ["  overtrading ", ""]
        }))]);

        let entry = &journal.entries[0];
        assert_eq!(entry.emotion, Some(Emotion::Other("frustrated".to_string())));
        assert!(entry.trades.is_empty());
        assert_eq!(entry.mistakes, vec!["overtrading"]);
        assert!(entry.id.starts_with("ENTRY-"));
    }

    #[test]
    fn test_normalizing_twice_is_a_no_op() {
        let first = normalize_entries(vec![raw(json!({
            "id": "e1",
            "created_at": "2024-01-01 09:00:00",
            "session_type": "post",
            "emotion": "negative",
            "outcome": "loss",
            "trades": [{
                "id": "t1",
                "instrument": "NQ",
                "direction": "sell",
                "entryDate": "2024-01-01T09:30:00Z",
                "exitDate": "2024-01-01T10:15:00Z",
                "entryPrice": "17000.25",
                "quantity": 2,
                "pnl": "-120.5"
            }]
        }))]);

        let serialized = serde_json::to_value(&first.entries).unwrap();
        let rows: Vec<RawJournalEntry> = serde_json::from_value(serialized).unwrap();
        let second = normalize_entries(rows);

        assert_eq!(first.entries, second.entries);
        assert_eq!(second.entries[0].trades[0].pnl, -120.5);
        assert_eq!(second.entries[0].trades[0].direction, Some(Direction::Short));
    }

    #[test]
    fn test_renormalizing_keeps_data_issues() {
        let first = normalize_entries(vec![raw(json!({
            "id": 99,
            "created_at": "2024-01-01T09:00:00Z",
            "session_type": "during",
            "trades": [{"id": "t1", "instrument": "ES", "pnl": "oops"}]
        }))]);
        assert_eq!(first.entries[0].data_issues.len(), 3);

        let serialized = serde_json::to_value(&first.entries).unwrap();
        let rows: Vec<RawJournalEntry> = serde_json::from_value(serialized).unwrap();
        assert_eq!(rows[0].data_issues.len(), 3);
        let second = normalize_entries(rows);

        assert_eq!(first.entries, second.entries);
        let fields: Vec<&str> = second.entries[0]
            .data_issues
            .iter()
            .map(|i| i.field.as_str())
            .collect();
        assert_eq!(fields, vec!["id", "session_type", "trades[0].pnl"]);
    }

    #[test]
    fn test_carried_issues_come_first_without_duplicates() {
        let journal = normalize_entries(vec![raw(json!({
            "id": "e1",
            "created_at": "2024-01-01T09:00:00Z",
            "outcome": "maybe",
            "data_issues": [
                {"field": "trades[3].fees", "raw": "n/a", "reason": "unparseable"},
                {"field": "outcome", "raw": "maybe", "reason": "unknown_outcome"}
            ]
        }))]);

        let fields: Vec<&str> = journal.entries[0]
            .data_issues
            .iter()
            .map(|i| i.field.as_str())
            .collect();
        assert_eq!(fields, vec!["trades[3].fees", "outcome"]);
    }
}
