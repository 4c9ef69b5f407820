use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use super::catalog::{QuestionCatalog, QuestionId, QuestionKind};

/// Tagged answer value so scoring never coerces loose strings ad hoc.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerValue {
    YesNo(bool),
    Scale(u8),
    Choice(String),
    Text(String),
}

impl AnswerValue {
    pub fn is_affirmative(&self) -> bool {
        match self {
            AnswerValue::YesNo(value) => *value,
            AnswerValue::Choice(text) | AnswerValue::Text(text) => affirmative_text(text),
            AnswerValue::Scale(_) => false,
        }
    }

    pub fn as_scale(&self) -> Option<u8> {
        match self {
            AnswerValue::Scale(value) => Some(*value),
            _ => None,
        }
    }

    pub fn display(&self) -> String {
        match self {
            AnswerValue::YesNo(true) => "yes".to_string(),
            AnswerValue::YesNo(false) => "no".to_string(),
            AnswerValue::Scale(value) => value.to_string(),
            AnswerValue::Choice(text) | AnswerValue::Text(text) => text.clone(),
        }
    }

    /// Build a typed value from loose wire data; malformed input degrades
    /// to the non-affirmative / zero / empty default for the question kind.
    pub fn from_wire(kind: QuestionKind, raw: &Value) -> Self {
        match kind {
            QuestionKind::YesNo => match raw {
                Value::Bool(value) => AnswerValue::YesNo(*value),
                Value::Number(number) => {
                    AnswerValue::YesNo(number.as_u64().map(|n| n == 1).unwrap_or(false))
                }
                Value::String(text) => AnswerValue::YesNo(affirmative_text(text)),
                _ => AnswerValue::YesNo(false),
            },
            QuestionKind::Scale { max } => {
                let parsed = match raw {
                    Value::Number(number) => number.as_u64().unwrap_or(0),
                    Value::String(text) => text.trim().parse::<u64>().unwrap_or(0),
                    _ => 0,
                };
                AnswerValue::Scale(parsed.min(max as u64) as u8)
            }
            QuestionKind::SingleChoice { .. } => {
                AnswerValue::Choice(raw.as_str().unwrap_or_default().trim().to_string())
            }
            QuestionKind::FreeText => {
                AnswerValue::Text(raw.as_str().unwrap_or_default().trim().to_string())
            }
        }
    }
}

/// Central affirmative normalization used by scoring and report labeling.
pub fn affirmative_text(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "yes" | "true" | "1" | "y"
    )
}

/// Mapping from question id to a typed answer. Missing keys are legal and
/// read as non-affirmative / zero / empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerSet {
    entries: BTreeMap<QuestionId, AnswerValue>,
}

impl AnswerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: QuestionId, value: AnswerValue) {
        self.entries.insert(id, value);
    }

    pub fn get(&self, id: QuestionId) -> Option<&AnswerValue> {
        self.entries.get(&id)
    }

    pub fn is_affirmative(&self, id: QuestionId) -> bool {
        self.get(id).map(AnswerValue::is_affirmative).unwrap_or(false)
    }

    pub fn scale(&self, id: QuestionId) -> u8 {
        self.get(id).and_then(AnswerValue::as_scale).unwrap_or(0)
    }

    pub fn choice(&self, id: QuestionId) -> Option<&str> {
        match self.get(id) {
            Some(AnswerValue::Choice(text)) if !text.is_empty() => Some(text),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (QuestionId, &AnswerValue)> {
        self.entries.iter().map(|(id, value)| (*id, value))
    }

    /// Parse a loose wire map (question id -> JSON value) against the
    /// catalog. Unknown ids are skipped with a warning; nothing here fails.
    pub fn from_wire(catalog: &QuestionCatalog, raw: &BTreeMap<String, Value>) -> Self {
        let mut answers = Self::new();
        for (key, value) in raw {
            let Some(id) = QuestionId::parse(key) else {
                warn!(question = %key, "ignoring answer for unknown question id");
                continue;
            };
            let Some(definition) = catalog.definition(id) else {
                continue;
            };
            answers.insert(id, AnswerValue::from_wire(definition.kind, value));
        }
        answers
    }
}
