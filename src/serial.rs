//! Persisted block data and the conversions around it.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, warn};

use crate::markup::RichText;
use crate::model::ChecklistModel;

const PLAIN_TEXT_SEPARATOR: &str = ". ";

#[derive(Debug, Error)]
pub enum SerialError {
    #[error("invalid checklist JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Saved form of a checklist block.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockData {
    #[serde(default)]
    pub items: Vec<ItemData>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemData {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub checked: bool,
    #[serde(default)]
    pub level: usize,
}

impl ItemData {
    pub fn new(text: impl Into<String>, checked: bool, level: usize) -> Self {
        Self {
            text: text.into(),
            checked,
            level,
        }
    }
}

/// Builds a model from persisted JSON, tolerating missing or mistyped fields.
///
/// Anything without at least one usable item yields the default model.
pub fn load(value: &Value) -> ChecklistModel {
    let items = match value.get("items") {
        Some(Value::Array(items)) => items,
        Some(other) => {
            warn!(kind = json_kind(other), "checklist items are not an array, using defaults");
            return ChecklistModel::new();
        }
        None => return ChecklistModel::new(),
    };

    let mut model = ChecklistModel::empty();
    for (index, entry) in items.iter().enumerate() {
        let Value::Object(fields) = entry else {
            warn!(index, kind = json_kind(entry), "skipping checklist item that is not an object");
            continue;
        };
        let text = coerce_text(fields);
        model.push(
            RichText::from_markup(&text),
            coerce_checked(fields),
            coerce_level(fields),
        );
    }

    if model.is_empty() {
        debug!("no usable checklist items, using defaults");
        return ChecklistModel::new();
    }
    model
}

/// Parses persisted JSON. Only syntax errors fail; shape problems degrade.
pub fn from_json(source: &str) -> Result<ChecklistModel, SerialError> {
    let value: Value = serde_json::from_str(source)?;
    Ok(load(&value))
}

pub fn to_json(data: &BlockData) -> Result<String, SerialError> {
    Ok(serde_json::to_string_pretty(data)?)
}

/// Reads the live item state, dropping items whose text is blank.
pub fn save(model: &ChecklistModel) -> BlockData {
    let items = model
        .items()
        .iter()
        .filter(|item| !item.content.is_blank())
        .map(|item| ItemData::new(item.text(), item.checked, item.level))
        .collect();
    BlockData { items }
}

/// Saved data is only worth keeping when it has at least one item.
pub fn validate(data: &BlockData) -> bool {
    !data.items.is_empty()
}

pub fn export_plain_text(model: &ChecklistModel) -> String {
    model
        .items()
        .iter()
        .map(|item| item.text())
        .collect::<Vec<_>>()
        .join(PLAIN_TEXT_SEPARATOR)
}

/// Wraps a string from another block in a single item. The string is taken
/// as plain text, so markup characters in it stay visible.
pub fn import_plain_text(text: &str) -> ChecklistModel {
    let mut model = ChecklistModel::empty();
    model.push(RichText::from_plain_text(text), false, 0);
    model
}

fn coerce_text(fields: &Map<String, Value>) -> String {
    match fields.get("text") {
        Some(Value::String(text)) => text.clone(),
        Some(Value::Number(number)) => number.to_string(),
        _ => String::new(),
    }
}

fn coerce_checked(fields: &Map<String, Value>) -> bool {
    match fields.get("checked") {
        Some(Value::Bool(checked)) => *checked,
        Some(Value::String(text)) => text.eq_ignore_ascii_case("true"),
        _ => false,
    }
}

fn coerce_level(fields: &Map<String, Value>) -> usize {
    let level = match fields.get("level") {
        Some(Value::Number(number)) => number.as_u64(),
        Some(Value::String(text)) => text.trim().parse::<u64>().ok(),
        _ => None,
    };
    level
        .and_then(|level| usize::try_from(level).ok())
        .unwrap_or(0)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
#[path = "serial_tests.rs"]
mod serial_tests;
