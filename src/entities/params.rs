//! Typed parameter storage shared by cues and presets.
//!
//! Keys stay in insertion order (IndexMap) so the preset persistence format
//! round-trips as an ordered map.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Generic parameter value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ParamValue {
    Bool(bool),
    Str(String),
    Int(i64),
    UInt(u64),
    Float(f64),
    Uuid(Uuid),
    /// Structured payloads: OSC message lists, collection entries, raw bytes.
    Json(serde_json::Value),
}

impl ParamValue {
    /// Discriminant name for validation error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            ParamValue::Bool(_) => "Bool",
            ParamValue::Str(_) => "Str",
            ParamValue::Int(_) => "Int",
            ParamValue::UInt(_) => "UInt",
            ParamValue::Float(_) => "Float",
            ParamValue::Uuid(_) => "Uuid",
            ParamValue::Json(_) => "Json",
        }
    }
}

/// Parameter container: string key -> typed value, insertion-ordered.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Params {
    #[serde(default)]
    map: IndexMap<String, ParamValue>,
}

impl Params {
    pub fn new() -> Self {
        Self {
            map: IndexMap::new(),
        }
    }

    pub fn set(&mut self, key: impl Into<String>, value: ParamValue) {
        self.map.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.map.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        match self.map.get(key) {
            Some(ParamValue::Str(s)) => Some(s),
            _ => None,
        }
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        match self.map.get(key) {
            Some(ParamValue::Bool(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn get_int(&self, key: &str) -> Option<i64> {
        match self.map.get(key) {
            Some(ParamValue::Int(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn get_float(&self, key: &str) -> Option<f64> {
        match self.map.get(key) {
            Some(ParamValue::Float(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn get_uuid(&self, key: &str) -> Option<Uuid> {
        match self.map.get(key) {
            Some(ParamValue::Uuid(v)) => Some(*v),
            _ => None,
        }
    }

    /// Deserialize a Json value into a concrete type.
    pub fn get_json<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        match self.map.get(key) {
            Some(ParamValue::Json(v)) => serde_json::from_value(v.clone()).ok(),
            _ => None,
        }
    }

    /// Serialize a value into a Json parameter.
    pub fn set_json<T: Serialize>(&mut self, key: impl Into<String>, value: &T) {
        if let Ok(v) = serde_json::to_value(value) {
            self.map.insert(key.into(), ParamValue::Json(v));
        }
    }

    // Helpers with defaults (reduce boilerplate at dispatch sites)

    pub fn get_float_or(&self, key: &str, default: f64) -> f64 {
        self.get_float(key).unwrap_or(default)
    }

    pub fn get_bool_or(&self, key: &str, default: bool) -> bool {
        self.get_bool(key).unwrap_or(default)
    }

    pub fn get_int_or(&self, key: &str, default: i64) -> i64 {
        self.get_int(key).unwrap_or(default)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.map.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ParamValue)> {
        self.map.iter()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
