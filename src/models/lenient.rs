use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::borrow::Cow;

/// A stored value that either has the expected shape or is kept as raw JSON.
///
/// Journal rows are written by several clients, so one field of the wrong
/// type must not fail the whole fetch. The normalizer decides what to do
/// with an `Invalid` value and flags it on the entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Lenient<T> {
    Valid(T),
    Invalid(Value),
}

impl<T> From<T> for Lenient<T> {
    fn from(value: T) -> Self {
        Lenient::Valid(value)
    }
}

impl Lenient<String> {
    /// Text form of the value: numbers and booleans are stringified,
    /// arrays and objects have none
    pub fn text(&self) -> Option<Cow<'_, str>> {
        match self {
            Lenient::Valid(text) => Some(Cow::Borrowed(text)),
            Lenient::Invalid(Value::Number(n)) => Some(Cow::Owned(n.to_string())),
            Lenient::Invalid(Value::Bool(b)) => Some(Cow::Owned(b.to_string())),
            Lenient::Invalid(_) => None,
        }
    }

    pub fn raw_text(&self) -> String {
        match self {
            Lenient::Valid(text) => text.clone(),
            Lenient::Invalid(value) => value.to_string(),
        }
    }
}
