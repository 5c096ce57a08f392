//! Values flowing through the pipeline.
//!
//! `DataObject` is what output ports cache and input ports receive. Caches
//! hold it behind an `Rc`, so every consumer of a shared output sees the same
//! immutable value.
//!
//! `ParamValue` / `ParameterBag` hold node-local parameter state. The bag only
//! reports a change when a value actually differs, which is what drives the
//! node's parameter stamp.

use crate::pipeline::port::DataKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A cached pipeline value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DataObject {
    Bool(bool),
    Scalar(f64),
    Array(Vec<f64>),
    Text(String),
    Record(BTreeMap<String, DataObject>),
}

impl DataObject {
    pub fn kind(&self) -> DataKind {
        match self {
            DataObject::Bool(_) => DataKind::Bool,
            DataObject::Scalar(_) => DataKind::Scalar,
            DataObject::Array(_) => DataKind::Array,
            DataObject::Text(_) => DataKind::Text,
            DataObject::Record(_) => DataKind::Record,
        }
    }

    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            DataObject::Scalar(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[f64]> {
        match self {
            DataObject::Array(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            DataObject::Text(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            DataObject::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&BTreeMap<String, DataObject>> {
        match self {
            DataObject::Record(v) => Some(v),
            _ => None,
        }
    }
}

impl From<f64> for DataObject {
    fn from(v: f64) -> Self {
        DataObject::Scalar(v)
    }
}

impl From<Vec<f64>> for DataObject {
    fn from(v: Vec<f64>) -> Self {
        DataObject::Array(v)
    }
}

impl From<bool> for DataObject {
    fn from(v: bool) -> Self {
        DataObject::Bool(v)
    }
}

impl From<&str> for DataObject {
    fn from(v: &str) -> Self {
        DataObject::Text(v.to_string())
    }
}

impl From<String> for DataObject {
    fn from(v: String) -> Self {
        DataObject::Text(v)
    }
}

/// A node parameter value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ParamValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    FloatArray(Vec<f64>),
}

impl ParamValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ParamValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            ParamValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Floats, and integers widened to `f64`.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            ParamValue::Float(v) => Some(*v),
            ParamValue::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_float_array(&self) -> Option<&[f64]> {
        match self {
            ParamValue::FloatArray(v) => Some(v),
            _ => None,
        }
    }

    /// Convert into the data object a source would emit for this value.
    pub fn to_data(&self) -> DataObject {
        match self {
            ParamValue::Bool(v) => DataObject::Bool(*v),
            ParamValue::Int(v) => DataObject::Scalar(*v as f64),
            ParamValue::Float(v) => DataObject::Scalar(*v),
            ParamValue::String(v) => DataObject::Text(v.clone()),
            ParamValue::FloatArray(v) => DataObject::Array(v.clone()),
        }
    }
}

impl From<bool> for ParamValue {
    fn from(v: bool) -> Self {
        ParamValue::Bool(v)
    }
}

impl From<i64> for ParamValue {
    fn from(v: i64) -> Self {
        ParamValue::Int(v)
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        ParamValue::Float(v)
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        ParamValue::String(v.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(v: String) -> Self {
        ParamValue::String(v)
    }
}

impl From<Vec<f64>> for ParamValue {
    fn from(v: Vec<f64>) -> Self {
        ParamValue::FloatArray(v)
    }
}

/// Named parameter state of a node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParameterBag {
    values: BTreeMap<String, ParamValue>,
}

impl ParameterBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a value. Returns `true` if the stored value changed.
    pub fn set(&mut self, key: impl Into<String>, value: ParamValue) -> bool {
        let key = key.into();
        if self.values.get(&key) == Some(&value) {
            return false;
        }
        self.values.insert(key, value);
        true
    }

    /// Remove a value. Returns `true` if something was removed.
    pub fn remove(&mut self, key: &str) -> bool {
        self.values.remove(key).is_some()
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.values.get(key)
    }

    pub fn get_float(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(ParamValue::as_float)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(ParamValue::as_str)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(ParamValue::as_bool)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}
