use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::analytics::normalizer::normalize_trade;
use crate::models::{Direction, JournalEntry, Lenient, NumericValue, RawTrade, Trade};
use crate::source::InsightError;

#[derive(Debug, Serialize, Deserialize)]
pub struct ImportPreview {
    pub row: usize,
    pub instrument: String,
    pub direction: Option<Direction>,
    pub entry_date: Option<String>,
    pub exit_date: Option<String>,
    pub quantity: Option<f64>,
    pub pnl: f64,
    pub fees: Option<f64>,
    pub fingerprint: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ImportResult {
    pub imported: usize,
    pub duplicates: usize,
    pub errors: Vec<String>,
}

/// One row of a trade CSV export; every column is optional text
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CsvTradeRow {
    instrument: Option<String>,
    direction: Option<String>,
    entry_date: Option<String>,
    exit_date: Option<String>,
    entry_price: Option<String>,
    exit_price: Option<String>,
    quantity: Option<String>,
    pnl: Option<String>,
    #[serde(alias = "fee")]
    fees: Option<String>,
    setup: Option<String>,
}

fn numeric(value: Option<String>) -> Option<NumericValue> {
    value
        .filter(|v| !v.trim().is_empty())
        .map(NumericValue::Text)
}

fn generate_trade_id() -> String {
    let uuid = uuid::Uuid::new_v4().simple().to_string();
    format!("TRADE-{}-{}", Utc::now().timestamp_millis(), &uuid[..8])
}

fn generate_fingerprint(trade: &Trade) -> String {
    let direction = trade
        .direction
        .map(|d| format!("{:?}", d).to_lowercase())
        .unwrap_or_default();
    let timestamp = |t: Option<chrono::DateTime<Utc>>| t.map(|t| t.to_rfc3339()).unwrap_or_default();

    format!(
        "csv|{}|{}|{}|{}|{:.8}|{:.8}",
        trade.instrument.to_lowercase(),
        direction,
        timestamp(trade.entry_date),
        timestamp(trade.exit_date),
        trade.quantity.unwrap_or(0.0),
        trade.pnl
    )
}

/// Turn one CSV row into a trade. Import is strict: any value the
/// normalizer would have to default makes the whole row an error.
fn parse_row(row: CsvTradeRow) -> Result<Trade, String> {
    let raw = RawTrade {
        id: Some(generate_trade_id().into()),
        instrument: row.instrument.map(Lenient::from),
        direction: row.direction.map(Lenient::from),
        entry_date: row.entry_date.map(Lenient::from),
        exit_date: row.exit_date.map(Lenient::from),
        entry_price: numeric(row.entry_price),
        exit_price: numeric(row.exit_price),
        stop_loss: None,
        take_profit: None,
        quantity: numeric(row.quantity),
        fees: numeric(row.fees),
        pnl: numeric(row.pnl),
        setup: row.setup.map(Lenient::from),
        import_fingerprint: None,
    };

    let mut issues = Vec::new();
    let mut trade = normalize_trade(raw, "", 0, &mut issues);

    if let Some(issue) = issues.first() {
        let field = issue.field.trim_start_matches("trades[0].");
        return Err(match &issue.raw {
            Some(raw) => format!("{}: {:?} ({})", field, issue.reason, raw),
            None => format!("{}: {:?}", field, issue.reason),
        });
    }

    trade.import_fingerprint = Some(generate_fingerprint(&trade));
    Ok(trade)
}

/// Parse every row; row numbers are 1-based and count the header as row 1
fn parse_csv(csv_content: &str) -> Result<Vec<(usize, Result<Trade, String>)>, InsightError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(csv_content.as_bytes());

    let mut rows = Vec::new();
    for (index, record) in reader.deserialize::<CsvTradeRow>().enumerate() {
        let row_num = index + 2;
        match record {
            Ok(row) => rows.push((row_num, parse_row(row))),
            Err(e) if e.is_io_error() => return Err(e.into()),
            Err(e) => rows.push((row_num, Err(e.to_string()))),
        }
    }

    Ok(rows)
}

/// Parse a trade CSV and return a preview of the trades it would create
pub fn preview_trade_csv(csv_content: &str) -> Result<Vec<ImportPreview>, InsightError> {
    let mut previews = Vec::new();

    for (row, parsed) in parse_csv(csv_content)? {
        match parsed {
            Ok(trade) => previews.push(ImportPreview {
                row,
                instrument: trade.instrument,
                direction: trade.direction,
                entry_date: trade.entry_date.map(|d| d.to_rfc3339()),
                exit_date: trade.exit_date.map(|d| d.to_rfc3339()),
                quantity: trade.quantity,
                pnl: trade.pnl,
                fees: trade.fees,
                fingerprint: trade.import_fingerprint.unwrap_or_default(),
            }),
            Err(e) => log::warn!("Error parsing row {}: {}", row, e),
        }
    }

    Ok(previews)
}

/// Append the CSV's trades to a journal entry, skipping rows already imported
pub fn import_trades_csv(entry: &mut JournalEntry, csv_content: &str) -> Result<ImportResult, InsightError> {
    let mut result = ImportResult::default();
    let mut seen: HashSet<String> = entry
        .trades
        .iter()
        .filter_map(|t| t.import_fingerprint.clone())
        .collect();

    for (row, parsed) in parse_csv(csv_content)? {
        match parsed {
            Ok(trade) => {
                let fingerprint = trade.import_fingerprint.clone().unwrap_or_default();
                if !seen.insert(fingerprint) {
                    result.duplicates += 1;
                    continue;
                }
                entry.append_trade(trade);
                result.imported += 1;
            }
            Err(e) => result.errors.push(format!("Row {}: {}", row, e)),
        }
    }

    log::info!(
        "CSV import into entry {}: {} imported, {} duplicates, {} errors",
        entry.id,
        result.imported,
        result.duplicates,
        result.errors.len()
    );

    Ok(result)
}
