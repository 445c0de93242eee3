//! First-match-wins keyword classifier.
//!
//! One label per entry, tested in a fixed stage order:
//! direct keyword, emotion name, trading behavior, context, emotion detail,
//! then session/outcome heuristics. Falls through to [`UNKNOWN_LABEL`].
//! The keyword table is a parameter, so core traits, core needs and
//! behavioral patterns all run through the same code.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::keyword_tables::{KeywordRule, KeywordTable};
use crate::models::JournalEntry;

pub const UNKNOWN_LABEL: &str = "unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStage {
    DirectKeyword,
    EmotionName,
    Behavior,
    Context,
    EmotionDetail,
    Heuristic,
    Unmatched,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub entry_id: String,
    pub label: String,
    pub stage: MatchStage,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelShare {
    pub label: String,
    pub count: usize,
    pub percentage: f64,
}

/// Substring match anchored at a word start, so "patient" does not fire
/// inside "impatient" while stems like "overtrad" still match "overtrading".
fn contains_keyword(text: &str, keyword: &str) -> bool {
    text.match_indices(keyword).any(|(index, _)| {
        text[..index]
            .chars()
            .next_back()
            .is_none_or(|c| !c.is_alphanumeric())
    })
}

fn first_match(rules: &[KeywordRule], text: &str) -> Option<&'static str> {
    rules
        .iter()
        .find(|rule| rule.keywords.iter().any(|k| contains_keyword(text, k)))
        .map(|rule| rule.label)
}

pub fn classify_entry(entry: &JournalEntry, table: &KeywordTable) -> Classification {
    let text = entry.searchable_text();
    let emotion = entry
        .emotion
        .as_ref()
        .map(|e| e.as_str().to_lowercase())
        .unwrap_or_default();

    let text_stages = [
        (table.direct, MatchStage::DirectKeyword),
        (table.emotion_names, MatchStage::EmotionName),
        (table.behaviors, MatchStage::Behavior),
        (table.contexts, MatchStage::Context),
    ];

    let matched = text_stages
        .iter()
        .find_map(|(rules, stage)| first_match(rules, &text).map(|label| (label, *stage)))
        .or_else(|| {
            // Detail stems are plain substrings of the label ("frustrat" in "frustrated")
            table
                .emotion_details
                .iter()
                .find(|rule| rule.keywords.iter().any(|k| emotion.contains(k)))
                .map(|rule| (rule.label, MatchStage::EmotionDetail))
        })
        .or_else(|| {
            table
                .heuristics
                .iter()
                .find(|h| {
                    h.session.is_none_or(|s| s == entry.session_type)
                        && h.outcome.is_none_or(|o| entry.outcome == Some(o))
                        && h.emotion.is_none_or(|e| emotion == e)
                })
                .map(|h| (h.label, MatchStage::Heuristic))
        });

    let (label, stage) = matched.unwrap_or((UNKNOWN_LABEL, MatchStage::Unmatched));

    Classification {
        entry_id: entry.id.clone(),
        label: label.to_string(),
        stage,
    }
}

pub fn classify_entries(entries: &[JournalEntry], table: &KeywordTable) -> Vec<Classification> {
    let classifications: Vec<Classification> =
        entries.iter().map(|e| classify_entry(e, table)).collect();

    log::debug!(
        "Classified {} entries with {} table ({} unmatched)",
        classifications.len(),
        table.kind,
        classifications
            .iter()
            .filter(|c| c.stage == MatchStage::Unmatched)
            .count()
    );

    classifications
}

/// Label counts and shares, most frequent first (ties alphabetical)
pub fn label_distribution(classifications: &[Classification]) -> Vec<LabelShare> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for c in classifications {
        *counts.entry(c.label.as_str()).or_insert(0) += 1;
    }

    let total = classifications.len() as f64;
    let mut shares: Vec<LabelShare> = counts
        .into_iter()
        .map(|(label, count)| LabelShare {
            label: label.to_string(),
            count,
            percentage: (count as f64 / total) * 100.0,
        })
        .collect();

    shares.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));
    shares
}
