use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::JournalEntry;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MistakeStat {
    pub count: usize,
    pub loss: f64, // attributed losing magnitude, always >= 0
}

/// Count each tagged mistake and split the entry's losing magnitude evenly
/// across the mistakes listed on it.
pub fn mistake_frequency(entries: &[JournalEntry]) -> BTreeMap<String, MistakeStat> {
    let mut frequency: BTreeMap<String, MistakeStat> = BTreeMap::new();

    for entry in entries.iter().filter(|e| !e.mistakes.is_empty()) {
        let share = entry.loss_magnitude() / entry.mistakes.len() as f64;

        for mistake in &entry.mistakes {
            let stat = frequency.entry(mistake.clone()).or_default();
            stat.count += 1;
            stat.loss += share;
        }
    }

    frequency
}

/// Mistakes ordered by attributed loss, then count
pub fn costliest_mistakes(frequency: &BTreeMap<String, MistakeStat>) -> Vec<(String, MistakeStat)> {
    let mut ranked: Vec<(String, MistakeStat)> = frequency
        .iter()
        .map(|(name, stat)| (name.clone(), *stat))
        .collect();

    ranked.sort_by(|a, b| {
        b.1.loss
            .total_cmp(&a.1.loss)
            .then_with(|| b.1.count.cmp(&a.1.count))
            .then_with(|| a.0.cmp(&b.0))
    });
    ranked
}
