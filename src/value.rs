//! Scalar values
//!
//! The closed set of value types a model field can carry, and checked
//! coercion from stored model values into the Rust types of live fields.

use crate::error::{type_mismatch, SyncResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Declared type of a property or field
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind", content = "type")]
pub enum ValueType {
    Bool,
    Int,
    Float,
    Text,
    /// A nested object described by another entry of the type table
    Composite(String),
}

impl ValueType {
    pub fn composite(type_name: impl Into<String>) -> Self {
        ValueType::Composite(type_name.into())
    }

    pub fn is_scalar(&self) -> bool {
        !matches!(self, ValueType::Composite(_))
    }

    /// Type name of the composite, `None` for scalars
    pub fn composite_name(&self) -> Option<&str> {
        match self {
            ValueType::Composite(name) => Some(name),
            _ => None,
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueType::Bool => write!(f, "bool"),
            ValueType::Int => write!(f, "int"),
            ValueType::Float => write!(f, "float"),
            ValueType::Text => write!(f, "text"),
            ValueType::Composite(name) => write!(f, "{}", name),
        }
    }
}

/// A concrete scalar stored in a model node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Value {
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Bool(_) => ValueType::Bool,
            Value::Int(_) => ValueType::Int,
            Value::Float(_) => ValueType::Float,
            Value::Text(_) => ValueType::Text,
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v as i64)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

/// Rust types that can back a synchronized field
pub trait Scalar: Sized {
    fn value_type() -> ValueType;

    /// Coerce a stored value, failing with `TypeMismatch` when it cannot be
    /// represented without loss.
    fn from_value(field: &str, value: &Value) -> SyncResult<Self>;
}

impl Scalar for bool {
    fn value_type() -> ValueType {
        ValueType::Bool
    }

    fn from_value(field: &str, value: &Value) -> SyncResult<Self> {
        match value {
            Value::Bool(b) => Ok(*b),
            other => Err(type_mismatch(field, ValueType::Bool, other.value_type())),
        }
    }
}

impl Scalar for i64 {
    fn value_type() -> ValueType {
        ValueType::Int
    }

    fn from_value(field: &str, value: &Value) -> SyncResult<Self> {
        match value {
            Value::Int(i) => Ok(*i),
            other => Err(type_mismatch(field, ValueType::Int, other.value_type())),
        }
    }
}

impl Scalar for i32 {
    fn value_type() -> ValueType {
        ValueType::Int
    }

    fn from_value(field: &str, value: &Value) -> SyncResult<Self> {
        match value {
            Value::Int(i) => i32::try_from(*i)
                .map_err(|_| type_mismatch(field, "int (32-bit)", format!("int {}", i))),
            other => Err(type_mismatch(field, ValueType::Int, other.value_type())),
        }
    }
}

impl Scalar for u32 {
    fn value_type() -> ValueType {
        ValueType::Int
    }

    fn from_value(field: &str, value: &Value) -> SyncResult<Self> {
        match value {
            Value::Int(i) => u32::try_from(*i)
                .map_err(|_| type_mismatch(field, "int (unsigned 32-bit)", format!("int {}", i))),
            other => Err(type_mismatch(field, ValueType::Int, other.value_type())),
        }
    }
}

impl Scalar for f64 {
    fn value_type() -> ValueType {
        ValueType::Float
    }

    fn from_value(field: &str, value: &Value) -> SyncResult<Self> {
        match value {
            Value::Float(f) => Ok(*f),
            // Integral literals are valid floats
            Value::Int(i) => Ok(*i as f64),
            other => Err(type_mismatch(field, ValueType::Float, other.value_type())),
        }
    }
}

impl Scalar for String {
    fn value_type() -> ValueType {
        ValueType::Text
    }

    fn from_value(field: &str, value: &Value) -> SyncResult<Self> {
        match value {
            Value::Text(s) => Ok(s.clone()),
            other => Err(type_mismatch(field, ValueType::Text, other.value_type())),
        }
    }
}
