use chrono::{FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::analytics::keyword_tables::KeywordTableKind;
use crate::source::InsightError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InsightSettings {
    pub utc_offset_minutes: i32, // Local timezone for day and hour bucketing
    pub volatility_window: usize,
    pub min_trades_per_hour: usize,
    pub breakeven_threshold: f64, // |pnl| <= threshold is neither win nor loss
    pub classifier_table: KeywordTableKind,
}

impl Default for InsightSettings {
    fn default() -> Self {
        Self {
            utc_offset_minutes: 0,
            volatility_window: 7,
            min_trades_per_hour: 1,
            breakeven_threshold: 0.0,
            classifier_table: KeywordTableKind::CoreTraits,
        }
    }
}

impl InsightSettings {
    /// Read settings from a JSON file; missing keys keep their defaults
    pub fn load(path: &Path) -> Result<Self, InsightError> {
        let content = std::fs::read_to_string(path)?;
        let settings: InsightSettings = serde_json::from_str(&content)?;
        log::debug!("Loaded insight settings from {:?}", path);
        Ok(settings)
    }

    /// Offset outside +/-24h falls back to UTC
    pub fn offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_minutes.saturating_mul(60))
            .unwrap_or_else(|| Utc.fix())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateInsightSettingsInput {
    pub utc_offset_minutes: Option<i32>,
    pub volatility_window: Option<usize>,
    pub min_trades_per_hour: Option<usize>,
    pub breakeven_threshold: Option<f64>,
    pub classifier_table: Option<KeywordTableKind>,
}

impl UpdateInsightSettingsInput {
    pub fn apply(self, settings: &mut InsightSettings) {
        if let Some(val) = self.utc_offset_minutes {
            settings.utc_offset_minutes = val;
        }
        if let Some(val) = self.volatility_window {
            settings.volatility_window = val.max(1);
        }
        if let Some(val) = self.min_trades_per_hour {
            settings.min_trades_per_hour = val.max(1);
        }
        if let Some(val) = self.breakeven_threshold {
            settings.breakeven_threshold = val.abs();
        }
        if let Some(val) = self.classifier_table {
            settings.classifier_table = val;
        }
    }
}
