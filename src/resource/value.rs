//! Normalized resource state
//!
//! The state reader hands back one [`NormalizedValue`] per resource: a
//! provider-agnostic tree of scalars, lists and maps. Deserializers match on
//! the variants to build typed resources.

use serde_json::{Number, Value};
use std::collections::BTreeMap;

/// Dynamically-typed structural value
#[derive(Debug, Clone, PartialEq, Default)]
pub enum NormalizedValue {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    List(Vec<NormalizedValue>),
    Map(BTreeMap<String, NormalizedValue>),
}

impl NormalizedValue {
    /// Name of the variant, for error messages
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::List(_) => "list",
            Self::Map(_) => "map",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, NormalizedValue>> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Look up a key when this value is a map
    pub fn get(&self, key: &str) -> Option<&NormalizedValue> {
        self.as_map().and_then(|m| m.get(key))
    }

    /// Set a key, overwriting any previous value. No-op unless this is a map.
    pub fn set(&mut self, key: &str, value: NormalizedValue) {
        if let Self::Map(map) = self {
            map.insert(key.to_string(), value);
        }
    }

    /// Set a key only if it is absent. No-op unless this is a map.
    pub fn set_default(&mut self, key: &str, value: NormalizedValue) {
        if let Self::Map(map) = self {
            map.entry(key.to_string()).or_insert(value);
        }
    }
}

impl From<Value> for NormalizedValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => Self::Number(n),
            Value::String(s) => Self::String(s),
            Value::Array(items) => Self::List(items.into_iter().map(Self::from).collect()),
            Value::Object(map) => Self::Map(
                map.into_iter()
                    .map(|(k, v)| (k, Self::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<NormalizedValue> for Value {
    fn from(value: NormalizedValue) -> Self {
        match value {
            NormalizedValue::Null => Value::Null,
            NormalizedValue::Bool(b) => Value::Bool(b),
            NormalizedValue::Number(n) => Value::Number(n),
            NormalizedValue::String(s) => Value::String(s),
            NormalizedValue::List(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            NormalizedValue::Map(map) => Value::Object(
                map.into_iter()
                    .map(|(k, v)| (k, Value::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<&str> for NormalizedValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for NormalizedValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}
