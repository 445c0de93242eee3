use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::lenient::Lenient;

/// Numeric field as it arrives from storage: a JSON number, a numeric
/// string, or anything else kept as raw JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumericValue {
    Number(f64),
    Text(String),
    Other(serde_json::Value),
}

impl NumericValue {
    /// Raw text form, used when reporting a value that failed to parse
    pub fn raw_text(&self) -> String {
        match self {
            NumericValue::Number(n) => n.to_string(),
            NumericValue::Text(s) => s.clone(),
            NumericValue::Other(value) => value.to_string(),
        }
    }
}

/// Position direction. Stored rows use both "buy"/"sell" and "LONG"/"SHORT";
/// everything past the normalizer only sees this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Long,
    Short,
}

impl Direction {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "buy" | "long" => Some(Direction::Long),
            "sell" | "short" => Some(Direction::Short),
            _ => None,
        }
    }
}

/// Trade object exactly as embedded in a journal row (camelCase keys)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTrade {
    pub id: Option<Lenient<String>>,
    pub instrument: Option<Lenient<String>>,
    pub direction: Option<Lenient<String>>,
    pub entry_date: Option<Lenient<String>>,
    pub exit_date: Option<Lenient<String>>,
    pub entry_price: Option<NumericValue>,
    pub exit_price: Option<NumericValue>,
    pub stop_loss: Option<NumericValue>,
    pub take_profit: Option<NumericValue>,
    pub quantity: Option<NumericValue>,
    #[serde(alias = "fee")]
    pub fees: Option<NumericValue>,
    pub pnl: Option<NumericValue>,
    pub setup: Option<Lenient<String>>,
    pub import_fingerprint: Option<Lenient<String>>,
}

/// Normalized trade: every numeric field parsed, P&L always present
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trade {
    pub id: String,
    pub instrument: String,
    pub direction: Option<Direction>,
    pub entry_date: Option<DateTime<Utc>>,
    pub exit_date: Option<DateTime<Utc>>,
    pub entry_price: Option<f64>,
    pub exit_price: Option<f64>,
    pub stop_loss: Option<f64>,
    pub take_profit: Option<f64>,
    pub quantity: Option<f64>,
    pub fees: Option<f64>,
    pub pnl: f64, // 0.0 when absent or unparseable, see JournalEntry::data_issues
    pub setup: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub import_fingerprint: Option<String>,
}

impl Trade {
    pub fn is_win(&self, breakeven_threshold: f64) -> bool {
        self.pnl > breakeven_threshold
    }

    pub fn is_loss(&self, breakeven_threshold: f64) -> bool {
        self.pnl < -breakeven_threshold
    }

    /// Holding time in hours, only when both timestamps are known
    pub fn duration_hours(&self) -> Option<f64> {
        let (entry, exit) = (self.entry_date?, self.exit_date?);
        Some((exit - entry).num_seconds() as f64 / 3600.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_aliases() {
        assert_eq!(Direction::parse("buy"), Some(Direction::Long));
        assert_eq!(Direction::parse("LONG"), Some(Direction::Long));
        assert_eq!(Direction::parse(" Sell "), Some(Direction::Short));
        assert_eq!(Direction::parse("SHORT"), Some(Direction::Short));
        assert_eq!(Direction::parse("hedge"), None);
    }

    #[test]
    fn test_raw_trade_accepts_numbers_and_strings() {
        let raw: RawTrade = serde_json::from_value(serde_json::json!({
            "id": "t1",
            "instrument": "EURUSD",
            "entryPrice": 1.0842,
            "pnl": "150.50",
            "fee": "2"
        }))
        .unwrap();

        assert_eq!(raw.entry_price, Some(NumericValue::Number(1.0842)));
        assert_eq!(raw.pnl, Some(NumericValue::Text("150.50".to_string())));
        assert_eq!(raw.fees, Some(NumericValue::Text("2".to_string())));
        assert!(raw.exit_date.is_none());
    }

    #[test]
    fn test_raw_trade_tolerates_wrong_types() {
        let raw: RawTrade = serde_json::from_value(serde_json::json!({
            "id": 1704186000000u64,
            "instrument": ["ES"],
            "pnl": true,
            "quantity": {"lots": 2}
        }))
        .unwrap();

        assert_eq!(raw.id.unwrap().text().as_deref(), Some("1704186000000"));
        assert_eq!(raw.instrument.unwrap().text(), None);
        assert_eq!(raw.pnl, Some(NumericValue::Other(serde_json::json!(true))));
        assert_eq!(raw.quantity.unwrap().raw_text(), r#"{"lots":2}"#);
    }

    #[test]
    fn test_direction_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&Direction::Short).unwrap(), "\"SHORT\"");
    }
}
