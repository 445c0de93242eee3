//! Static keyword tables for the entry classifier.
//!
//! Each table lists its rules per matching stage. Within a stage the first
//! rule (in table order) with any matching keyword wins, so more specific
//! labels are listed first.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::models::{Outcome, SessionKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeywordTableKind {
    CoreTraits,
    CoreNeeds,
    BehavioralPatterns,
}

impl KeywordTableKind {
    pub fn table(self) -> &'static KeywordTable {
        match self {
            KeywordTableKind::CoreTraits => &CORE_TRAITS,
            KeywordTableKind::CoreNeeds => &CORE_NEEDS,
            KeywordTableKind::BehavioralPatterns => &BEHAVIORAL_PATTERNS,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            KeywordTableKind::CoreTraits => "core_traits",
            KeywordTableKind::CoreNeeds => "core_needs",
            KeywordTableKind::BehavioralPatterns => "behavioral_patterns",
        }
    }
}

impl fmt::Display for KeywordTableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for KeywordTableKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "core_traits" | "traits" => Ok(KeywordTableKind::CoreTraits),
            "core_needs" | "needs" => Ok(KeywordTableKind::CoreNeeds),
            "behavioral_patterns" | "patterns" => Ok(KeywordTableKind::BehavioralPatterns),
            other => Err(format!("Unknown keyword table: {}", other)),
        }
    }
}

#[derive(Debug)]
pub struct KeywordRule {
    pub label: &'static str,
    pub keywords: &'static [&'static str],
}

/// Fallback on session metadata; `None` fields match anything
#[derive(Debug)]
pub struct HeuristicRule {
    pub session: Option<SessionKind>,
    pub outcome: Option<Outcome>,
    pub emotion: Option<&'static str>,
    pub label: &'static str,
}

#[derive(Debug)]
pub struct KeywordTable {
    pub kind: KeywordTableKind,
    pub direct: &'static [KeywordRule],
    pub emotion_names: &'static [KeywordRule],
    pub behaviors: &'static [KeywordRule],
    pub contexts: &'static [KeywordRule],
    pub emotion_details: &'static [KeywordRule],
    pub heuristics: &'static [HeuristicRule],
}

impl KeywordTable {
    /// Every label the table can produce, in first-seen order
    pub fn labels(&self) -> Vec<&'static str> {
        let mut labels: Vec<&'static str> = Vec::new();
        let stages = [self.direct, self.emotion_names, self.behaviors, self.contexts, self.emotion_details];
        let rule_labels = stages.iter().flat_map(|rules| rules.iter().map(|r| r.label));
        for label in rule_labels.chain(self.heuristics.iter().map(|h| h.label)) {
            if !labels.contains(&label) {
                labels.push(label);
            }
        }
        labels
    }
}

const fn rule(label: &'static str, keywords: &'static [&'static str]) -> KeywordRule {
    KeywordRule { label, keywords }
}

pub static CORE_TRAITS: KeywordTable = KeywordTable {
    kind: KeywordTableKind::CoreTraits,
    direct: &[
        rule("Discipline", &["discipline", "disciplined", "followed my plan", "stuck to the plan", "followed the rules", "rule-based"]),
        rule("Patience", &["patience", "patient", "waited for", "sat on my hands", "waiting for confirmation"]),
        rule("Impulsivity", &["impulsive", "impulse", "jumped in", "without thinking", "spur of the moment"]),
        rule("Fear", &["fear", "scared", "afraid", "terrified"]),
        rule("Greed", &["greed", "greedy", "wanted more", "not enough profit"]),
        rule("Overconfidence", &["overconfident", "over-confident", "invincible", "couldn't lose", "cocky"]),
        rule("Resilience", &["resilient", "resilience", "bounced back", "shook it off"]),
        rule("Self-Awareness", &["self-aware", "noticed myself", "realized i was", "caught myself"]),
    ],
    emotion_names: &[
        rule("Fear", &["anxious", "anxiety", "nervous", "worried", "panic", "fearful"]),
        rule("Greed", &["euphoric", "hungry", "envious"]),
        rule("Impulsivity", &["impatient", "restless", "bored", "frustrated", "angry"]),
        rule("Overconfidence", &["confident", "elated", "unstoppable"]),
        rule("Patience", &["calm", "relaxed", "centered", "composed"]),
        rule("Discipline", &["focused", "determined", "prepared"]),
    ],
    behaviors: &[
        rule("Impulsivity", &["revenge trade", "chased", "fomo", "entered early", "overtraded", "doubled down"]),
        rule("Fear", &["closed early", "cut my winner", "hesitated", "missed the entry", "moved stop to breakeven"]),
        rule("Greed", &["moved my target", "removed take profit", "oversized", "added to a winner"]),
        rule("Overconfidence", &["increased size", "ignored my stop", "no stop"]),
        rule("Discipline", &["set my stop", "honored my stop", "respected my stop", "took the setup", "journaled"]),
        rule("Patience", &["waited for the retest", "let it run", "waited for the setup"]),
    ],
    contexts: &[
        rule("Resilience", &["after a loss", "after losing", "losing streak", "drawdown", "red day"]),
        rule("Overconfidence", &["after a win", "winning streak", "green day", "big win"]),
        rule("Fear", &["news", "fomc", "cpi", "high volatility", "volatile"]),
        rule("Patience", &["choppy", "range day", "slow market", "low volume"]),
        rule("Self-Awareness", &["lesson", "learned", "next time", "reflect"]),
    ],
    emotion_details: &[
        rule("Fear", &["anxi", "fear", "nerv", "worr", "scare"]),
        rule("Impulsivity", &["frustrat", "angr", "impatien", "bore"]),
        rule("Greed", &["greed", "euphor", "excit"]),
        rule("Overconfidence", &["confiden", "cock"]),
        rule("Patience", &["calm", "relax", "content"]),
    ],
    heuristics: &[
        HeuristicRule { session: Some(SessionKind::Post), outcome: Some(Outcome::Loss), emotion: None, label: "Resilience" },
        HeuristicRule { session: Some(SessionKind::Post), outcome: Some(Outcome::Win), emotion: None, label: "Discipline" },
        HeuristicRule { session: Some(SessionKind::Pre), outcome: None, emotion: Some("negative"), label: "Fear" },
        HeuristicRule { session: Some(SessionKind::Pre), outcome: None, emotion: Some("positive"), label: "Patience" },
    ],
};

pub static CORE_NEEDS: KeywordTable = KeywordTable {
    kind: KeywordTableKind::CoreNeeds,
    direct: &[
        rule("Security", &["security", "safe", "protect my capital", "capital preservation", "risk of ruin"]),
        rule("Control", &["control", "in control", "out of control", "lost control"]),
        rule("Validation", &["prove", "validation", "right about", "show them", "ego"]),
        rule("Achievement", &["goal", "achievement", "record day", "milestone"]),
        rule("Freedom", &["freedom", "quit my job", "financial independence", "independent"]),
        rule("Certainty", &["certain", "certainty", "sure thing", "guarantee"]),
        rule("Growth", &["improve", "growth", "progress", "getting better", "learning"]),
    ],
    emotion_names: &[
        rule("Security", &["anxious", "worried", "nervous", "fearful", "scared"]),
        rule("Control", &["frustrated", "angry", "helpless", "overwhelmed"]),
        rule("Validation", &["embarrassed", "ashamed", "proud", "jealous"]),
        rule("Achievement", &["excited", "motivated", "ambitious", "satisfied"]),
        rule("Certainty", &["confused", "unsure", "doubtful", "hesitant"]),
        rule("Growth", &["curious", "grateful", "hopeful"]),
    ],
    behaviors: &[
        rule("Control", &["revenge trade", "moved my stop", "ignored my stop", "doubled down", "averaged down"]),
        rule("Security", &["closed early", "reduced size", "took profits early", "stayed out"]),
        rule("Validation", &["posted my trade", "told my friends", "screenshot", "bragged"]),
        rule("Achievement", &["hit my target", "daily target", "chasing the number", "overtraded"]),
        rule("Certainty", &["waited for confirmation", "second-guessed", "hesitated", "missed the entry"]),
        rule("Growth", &["reviewed my trades", "backtested", "journaled", "studied"]),
    ],
    contexts: &[
        rule("Security", &["drawdown", "account down", "margin call", "losing streak"]),
        rule("Achievement", &["end of month", "payout", "funded account", "evaluation", "challenge"]),
        rule("Certainty", &["news", "fomc", "cpi", "earnings", "uncertain market"]),
        rule("Freedom", &["day job", "before work", "after work"]),
        rule("Growth", &["lesson", "next time", "mentor", "course"]),
    ],
    emotion_details: &[
        rule("Security", &["anxi", "fear", "worr", "nerv"]),
        rule("Control", &["frustrat", "angr", "overwhelm"]),
        rule("Validation", &["embarrass", "asham", "proud"]),
        rule("Certainty", &["confus", "unsure", "doubt"]),
        rule("Achievement", &["excit", "motivat"]),
    ],
    heuristics: &[
        HeuristicRule { session: Some(SessionKind::Post), outcome: Some(Outcome::Loss), emotion: None, label: "Security" },
        HeuristicRule { session: Some(SessionKind::Post), outcome: Some(Outcome::Win), emotion: None, label: "Achievement" },
        HeuristicRule { session: Some(SessionKind::Pre), outcome: None, emotion: Some("negative"), label: "Certainty" },
        HeuristicRule { session: Some(SessionKind::Trade), outcome: None, emotion: None, label: "Control" },
    ],
};

pub static BEHAVIORAL_PATTERNS: KeywordTable = KeywordTable {
    kind: KeywordTableKind::BehavioralPatterns,
    direct: &[
        rule("Revenge Trading", &["revenge", "get it back", "make it back", "win it back"]),
        rule("FOMO", &["fomo", "fear of missing out", "missed the move", "chased"]),
        rule("Overtrading", &["overtrad", "too many trades", "couldn't stop trading"]),
        rule("Hesitation", &["hesitat", "froze", "second-guess", "didn't pull the trigger"]),
        rule("Cutting Winners Early", &["closed early", "cut my winner", "took profit too early", "left money on the table"]),
        rule("Moving Stops", &["moved my stop", "widened my stop", "removed my stop", "no stop"]),
        rule("Tilt", &["tilt", "lost my cool", "blew up"]),
        rule("Plan Adherence", &["followed my plan", "stuck to the plan", "followed the rules", "a+ setup"]),
    ],
    emotion_names: &[
        rule("Revenge Trading", &["angry", "furious", "vengeful"]),
        rule("FOMO", &["greedy", "envious", "impatient"]),
        rule("Hesitation", &["scared", "fearful", "nervous", "anxious"]),
        rule("Tilt", &["frustrated", "upset", "rage"]),
        rule("Plan Adherence", &["calm", "focused", "disciplined"]),
    ],
    behaviors: &[
        rule("Overtrading", &["took another trade", "kept trading", "traded all day", "one more trade"]),
        rule("Revenge Trading", &["doubled size", "doubled down", "right after the loss"]),
        rule("FOMO", &["entered late", "jumped in", "bought the top", "sold the bottom"]),
        rule("Cutting Winners Early", &["took profits", "scaled out too early", "small win"]),
        rule("Moving Stops", &["averaged down", "held the loser", "hoped it would come back"]),
    ],
    contexts: &[
        rule("Revenge Trading", &["after a loss", "after losing", "red day"]),
        rule("Overtrading", &["choppy", "slow market", "low volume", "range day"]),
        rule("FOMO", &["breakout", "big move", "gap up", "gap down", "news"]),
        rule("Hesitation", &["losing streak", "drawdown"]),
    ],
    emotion_details: &[
        rule("Tilt", &["frustrat", "angr", "upset"]),
        rule("FOMO", &["greed", "excit", "euphor"]),
        rule("Hesitation", &["anxi", "fear", "nerv"]),
    ],
    heuristics: &[
        HeuristicRule { session: Some(SessionKind::Post), outcome: Some(Outcome::Loss), emotion: Some("negative"), label: "Tilt" },
        HeuristicRule { session: None, outcome: Some(Outcome::Win), emotion: None, label: "Plan Adherence" },
    ],
};
