//! Parsers for dependency manifests and lockfiles (go.mod, package.json, etc.)
//!
//! Each parser turns raw file text into [`RawLib`] candidates. Candidates are
//! not trusted yet: the [processor](crate::processor) checks their types,
//! sanitizes versions and validates both fields before producing [`Lib`]s.

use serde::{Deserialize, Serialize};

use crate::error::{ParseError, Result};

/// A validated library record extracted from a manifest file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lib {
    /// Package name
    pub name: String,
    /// Version or version constraint, when the manifest declares one
    pub version: Option<String>,
}

impl Lib {
    pub fn new(name: impl Into<String>, version: Option<String>) -> Self {
        Self {
            name: name.into(),
            version,
        }
    }

    /// `"name (version)"`, or just `"name"` when no version is known.
    pub fn display_name(&self) -> String {
        match &self.version {
            Some(version) => format!("{} ({})", self.name, version),
            None => self.name.clone(),
        }
    }
}

/// An untyped value pulled out of a manifest before validation.
///
/// Structured formats can put anything where a name or version is expected,
/// so the original shape is kept until the processor checks it.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Absent,
    Str(String),
    Int(i64),
    Float(f64),
    /// Any other node (array, table, boolean, ...) with its type name
    Other(&'static str),
}

impl RawValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            RawValue::Absent => "nil",
            RawValue::Str(_) => "String",
            RawValue::Int(_) => "Integer",
            RawValue::Float(_) => "Float",
            RawValue::Other(kind) => kind,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            RawValue::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Str(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        RawValue::Str(value)
    }
}

impl<T: Into<RawValue>> From<Option<T>> for RawValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(RawValue::Absent, Into::into)
    }
}

impl From<&serde_json::Value> for RawValue {
    fn from(value: &serde_json::Value) -> Self {
        use serde_json::Value;

        match value {
            Value::Null => RawValue::Absent,
            Value::String(s) => RawValue::Str(s.clone()),
            Value::Number(n) => match n.as_i64() {
                Some(i) => RawValue::Int(i),
                None => RawValue::Float(n.as_f64().unwrap_or_default()),
            },
            Value::Bool(_) => RawValue::Other("Boolean"),
            Value::Array(_) => RawValue::Other("Array"),
            Value::Object(_) => RawValue::Other("Hash"),
        }
    }
}

impl From<&serde_yaml::Value> for RawValue {
    fn from(value: &serde_yaml::Value) -> Self {
        use serde_yaml::Value;

        match value {
            Value::Null => RawValue::Absent,
            Value::String(s) => RawValue::Str(s.clone()),
            Value::Number(n) => match n.as_i64() {
                Some(i) => RawValue::Int(i),
                None => RawValue::Float(n.as_f64().unwrap_or_default()),
            },
            Value::Bool(_) => RawValue::Other("Boolean"),
            Value::Sequence(_) => RawValue::Other("Array"),
            Value::Mapping(_) => RawValue::Other("Hash"),
            Value::Tagged(_) => RawValue::Other("Tagged"),
        }
    }
}

impl From<&toml::Value> for RawValue {
    fn from(value: &toml::Value) -> Self {
        use toml::Value;

        match value {
            Value::String(s) => RawValue::Str(s.clone()),
            Value::Integer(i) => RawValue::Int(*i),
            Value::Float(f) => RawValue::Float(*f),
            Value::Boolean(_) => RawValue::Other("Boolean"),
            Value::Datetime(_) => RawValue::Other("Datetime"),
            Value::Array(_) => RawValue::Other("Array"),
            Value::Table(_) => RawValue::Other("Hash"),
        }
    }
}

/// A library candidate as extracted, before type checks and validation
#[derive(Debug, Clone, PartialEq)]
pub struct RawLib {
    pub name: RawValue,
    pub version: RawValue,
}

impl RawLib {
    pub fn new(name: impl Into<RawValue>, version: impl Into<RawValue>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }
}

/// Trait for extracting library candidates from one manifest grammar
pub trait Parser: Send + Sync {
    /// Parse the given file content and extract library candidates, in source order
    fn parse(&self, content: &str) -> Result<Vec<RawLib>>;
}

/// Parse a JSON document, mapping syntax errors to a deserialization error.
pub(crate) fn parse_json(content: &str) -> Result<serde_json::Value> {
    serde_json::from_str(content).map_err(|e| ParseError::Deserialization {
        format: "JSON",
        detail: Some(e.to_string()),
    })
}

/// The object stored under `key` in a JSON document root.
///
/// A missing key is `None`; a root or value that is not an object is an
/// unexpected node.
pub(crate) fn json_object<'a>(
    root: &'a serde_json::Value,
    key: &str,
) -> Result<Option<&'a serde_json::Map<String, serde_json::Value>>> {
    let root = root.as_object().ok_or(ParseError::UnexpectedNode)?;
    match root.get(key) {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(value) => value.as_object().map(Some).ok_or(ParseError::UnexpectedNode),
    }
}

/// The array stored under `key` in a JSON document root, with the same rules
/// as [`json_object`].
pub(crate) fn json_array<'a>(
    root: &'a serde_json::Value,
    key: &str,
) -> Result<Option<&'a Vec<serde_json::Value>>> {
    let root = root.as_object().ok_or(ParseError::UnexpectedNode)?;
    match root.get(key) {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(value) => value.as_array().map(Some).ok_or(ParseError::UnexpectedNode),
    }
}

pub mod conan;
pub mod conda;
pub mod csharp;
pub mod go;
pub mod gradle;
pub mod maven;
pub mod npm;
pub mod php;
pub mod python;
pub mod ruby;
pub mod vcpkg;
mod xml;
