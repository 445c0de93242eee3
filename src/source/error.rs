use thiserror::Error;

#[derive(Error, Debug)]
pub enum InsightError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid journal data: {0}")]
    ParseError(String),

    #[error("CSV error: {0}")]
    CsvError(String),

    #[error("Journal source error: {0}")]
    SourceError(String),

    #[error("Account not found: {0}")]
    AccountNotFound(String),

    #[error("Trade not found: {0}")]
    TradeNotFound(String),

    #[error("Invalid date range: {0}")]
    InvalidDateRange(String),

    #[error("Invalid month: {0}")]
    InvalidMonth(String),
}

impl From<serde_json::Error> for InsightError {
    fn from(err: serde_json::Error) -> Self {
        InsightError::ParseError(err.to_string())
    }
}

impl From<csv::Error> for InsightError {
    fn from(err: csv::Error) -> Self {
        InsightError::CsvError(err.to_string())
    }
}
