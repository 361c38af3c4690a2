//! Mapping rows.
//!
//! A [`Mapping`] is a fixed record of the three required identifiers plus an
//! ordered map of optional slots. Which optional slots are allowed (and which
//! of them are multivalued or hold identifiers) is decided by a
//! [`MappingSchema`](crate::schema::MappingSchema) at table construction.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const SUBJECT_ID: &str = "subject_id";
pub const PREDICATE_ID: &str = "predicate_id";
pub const OBJECT_ID: &str = "object_id";
pub const SUBJECT_LABEL: &str = "subject_label";
pub const OBJECT_LABEL: &str = "object_label";
pub const PREDICATE_MODIFIER: &str = "predicate_modifier";
pub const MAPPING_JUSTIFICATION: &str = "mapping_justification";
pub const CONFIDENCE: &str = "confidence";
pub const CREATOR_ID: &str = "creator_id";
pub const COMMENT: &str = "comment";
pub const MATCH_TYPE: &str = "match_type";

/// The identifier fields every mapping carries.
pub const REQUIRED_FIELDS: [&str; 3] = [SUBJECT_ID, PREDICATE_ID, OBJECT_ID];

/// Separator for multivalued slots in their flat text form.
pub const MULTIVALUE_SEPARATOR: char = '|';

/// One parsed row as handed over by a reader: field name to JSON value.
pub type Record = BTreeMap<String, Value>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SlotValue {
    Number(f64),
    Text(String),
    List(Vec<String>),
}

impl SlotValue {
    /// Convert a reader value. Nulls and empty strings mean "absent".
    pub fn from_json(value: &Value, multivalued: bool) -> Option<SlotValue> {
        match value {
            Value::Null => None,
            Value::String(s) if s.is_empty() => None,
            Value::String(s) if multivalued => Some(SlotValue::List(
                s.split(MULTIVALUE_SEPARATOR)
                    .map(str::trim)
                    .filter(|v| !v.is_empty())
                    .map(str::to_string)
                    .collect(),
            )),
            Value::String(s) => Some(SlotValue::Text(s.clone())),
            Value::Number(n) => n.as_f64().map(SlotValue::Number),
            Value::Bool(b) => Some(SlotValue::Text(b.to_string())),
            Value::Array(items) => Some(SlotValue::List(
                items
                    .iter()
                    .filter_map(|item| match item {
                        Value::String(s) => Some(s.clone()),
                        Value::Null => None,
                        other => Some(other.to_string()),
                    })
                    .collect(),
            )),
            Value::Object(_) => Some(SlotValue::Text(value.to_string())),
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            SlotValue::Number(n) => serde_json::json!(n),
            SlotValue::Text(s) => Value::String(s.clone()),
            SlotValue::List(items) => Value::from(items.clone()),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            SlotValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric view; numeric text (as produced by TSV readers) parses too.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            SlotValue::Number(n) => Some(*n),
            SlotValue::Text(s) => s.trim().parse().ok(),
            SlotValue::List(_) => None,
        }
    }

    /// Every individual value, splitting flat multivalued text on `|`.
    pub fn values(&self) -> Vec<String> {
        match self {
            SlotValue::Number(n) => vec![n.to_string()],
            SlotValue::Text(s) => s
                .split(MULTIVALUE_SEPARATOR)
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
                .collect(),
            SlotValue::List(items) => items.clone(),
        }
    }

    fn identity(&self) -> String {
        match self {
            SlotValue::Number(n) => n.to_string(),
            SlotValue::Text(s) => s.clone(),
            SlotValue::List(items) => items.join("|"),
        }
    }
}

impl From<&str> for SlotValue {
    fn from(s: &str) -> Self {
        SlotValue::Text(s.to_string())
    }
}

impl From<String> for SlotValue {
    fn from(s: String) -> Self {
        SlotValue::Text(s)
    }
}

impl From<f64> for SlotValue {
    fn from(n: f64) -> Self {
        SlotValue::Number(n)
    }
}

impl From<Vec<String>> for SlotValue {
    fn from(items: Vec<String>) -> Self {
        SlotValue::List(items)
    }
}

/// Full-row identity: every field name with its rendered value, in name order.
///
/// Two rows differing in any slot (not only the identifiers) have different keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RowKey(Vec<(String, String)>);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mapping {
    pub subject_id: String,
    pub predicate_id: String,
    pub object_id: String,
    #[serde(flatten)]
    pub slots: BTreeMap<String, SlotValue>,
}

impl Mapping {
    pub fn new(
        subject_id: impl Into<String>,
        predicate_id: impl Into<String>,
        object_id: impl Into<String>,
    ) -> Self {
        Self {
            subject_id: subject_id.into(),
            predicate_id: predicate_id.into(),
            object_id: object_id.into(),
            slots: BTreeMap::new(),
        }
    }

    pub fn with_slot(mut self, name: impl Into<String>, value: impl Into<SlotValue>) -> Self {
        self.slots.insert(name.into(), value.into());
        self
    }

    /// Single-valued text of a field: one of the identifiers or a text slot.
    pub fn get_text(&self, field: &str) -> Option<&str> {
        match field {
            SUBJECT_ID => Some(&self.subject_id),
            PREDICATE_ID => Some(&self.predicate_id),
            OBJECT_ID => Some(&self.object_id),
            _ => self.slots.get(field).and_then(SlotValue::as_text),
        }
    }

    /// All values of a field, multivalued slots expanded.
    pub fn field_values(&self, field: &str) -> Vec<String> {
        match field {
            SUBJECT_ID | PREDICATE_ID | OBJECT_ID => {
                self.get_text(field).map(str::to_string).into_iter().collect()
            }
            _ => self.slots.get(field).map(SlotValue::values).unwrap_or_default(),
        }
    }

    pub fn set(&mut self, field: &str, value: SlotValue) {
        let identifier = match field {
            SUBJECT_ID => Some(&mut self.subject_id),
            PREDICATE_ID => Some(&mut self.predicate_id),
            OBJECT_ID => Some(&mut self.object_id),
            _ => None,
        };
        match identifier {
            Some(slot) => *slot = value.values().join("|"),
            None => {
                self.slots.insert(field.to_string(), value);
            }
        }
    }

    pub fn confidence(&self) -> Option<f64> {
        self.slots
            .get(CONFIDENCE)
            .and_then(SlotValue::as_f64)
            .filter(|c| !c.is_nan())
    }

    pub fn row_key(&self) -> RowKey {
        let mut fields: Vec<(String, String)> = REQUIRED_FIELDS
            .iter()
            .map(|f| (f.to_string(), self.get_text(f).unwrap_or_default().to_string()))
            .collect();
        fields.extend(
            self.slots
                .iter()
                .map(|(name, value)| (name.clone(), value.identity())),
        );
        fields.sort();
        RowKey(fields)
    }

    /// Flatten back into the record shape a writer consumes.
    pub fn to_record(&self) -> Record {
        let mut record: Record = self
            .slots
            .iter()
            .map(|(name, value)| (name.clone(), value.to_json()))
            .collect();
        record.insert(SUBJECT_ID.to_string(), Value::String(self.subject_id.clone()));
        record.insert(PREDICATE_ID.to_string(), Value::String(self.predicate_id.clone()));
        record.insert(OBJECT_ID.to_string(), Value::String(self.object_id.clone()));
        record
    }
}
