//! Synthesized values.
//!
//! [`Value`] is a dynamically typed tree mirroring the type taxonomy. It
//! serializes with serde in a tagged form that round-trips exactly, and
//! [`Value::to_json`] renders the plain JSON a person would write by hand.

use chrono::{DateTime, SecondsFormat, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Fixed-point decimal: `mantissa * 10^-scale`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Decimal {
    pub mantissa: i64,
    pub scale: u32,
}

impl Decimal {
    pub const fn new(mantissa: i64, scale: u32) -> Self {
        Self { mantissa, scale }
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.mantissa.unsigned_abs().to_string();
        let sign = if self.mantissa < 0 { "-" } else { "" };
        let scale = self.scale as usize;
        if scale == 0 {
            return write!(f, "{sign}{digits}");
        }
        let padded = format!("{digits:0>width$}", width = scale + 1);
        let (whole, frac) = padded.split_at(padded.len() - scale);
        write!(f, "{sign}{whole}.{frac}")
    }
}

/// RGBA color.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn from_array([r, g, b, a]: [u8; 4]) -> Self {
        Self { r, g, b, a }
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
    }
}

/// A synthesized value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum Value {
    /// Default for a field whose own synthesis failed, or an absent slot.
    Null,
    Bool(bool),
    Int(i64),
    Double(f64),
    Float(f32),
    Char(char),
    Decimal(Decimal),
    Guid(Uuid),
    String(String),
    /// A regular expression, stored as its pattern.
    Regex(String),
    Date(DateTime<Utc>),
    Color(Rgba),
    Enum {
        type_name: String,
        member: String,
        ordinal: usize,
    },
    TypeHandle(String),
    MethodHandle(String),
    Array(Vec<Value>),
    /// Rank-2 array, row-major.
    Array2(Vec<Vec<Value>>),
    List(Vec<Value>),
    ReadOnlyList(Vec<Value>),
    Set(Vec<Value>),
    /// Entries in insertion order.
    Map(Vec<(Value, Value)>),
    Tuple(Vec<Value>),
    Record {
        type_name: String,
        fields: IndexMap<String, Value>,
    },
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Field of a record by exact name.
    pub fn field(&self, name: &str) -> Option<&Value> {
        match self {
            Self::Record { fields, .. } => fields.get(name),
            _ => None,
        }
    }

    /// Elements of any sequence-shaped value.
    pub fn elements(&self) -> Option<&[Value]> {
        match self {
            Self::Array(items)
            | Self::List(items)
            | Self::ReadOnlyList(items)
            | Self::Set(items)
            | Self::Tuple(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) | Self::Regex(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Plain JSON rendering.
    ///
    /// Scalars without a JSON counterpart become strings. Maps whose keys all
    /// render as strings become objects; other maps become arrays of
    /// `[key, value]` pairs.
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::Value as Json;

        match self {
            Self::Null => Json::Null,
            Self::Bool(b) => Json::Bool(*b),
            Self::Int(i) => Json::from(*i),
            Self::Double(d) => float_json(*d),
            // Go through the shortest display form so 42.42f32 stays 42.42.
            Self::Float(f) => float_json(f.to_string().parse().unwrap_or(f64::NAN)),
            Self::Decimal(d) => float_json(d.to_string().parse().unwrap_or(f64::NAN)),
            Self::Char(c) => Json::String(c.to_string()),
            Self::Guid(g) => Json::String(g.to_string()),
            Self::String(s) | Self::Regex(s) => Json::String(s.clone()),
            Self::Date(d) => Json::String(d.to_rfc3339_opts(SecondsFormat::Secs, true)),
            Self::Color(c) => Json::String(c.to_string()),
            Self::Enum { member, .. } => Json::String(member.clone()),
            Self::TypeHandle(name) | Self::MethodHandle(name) => Json::String(name.clone()),
            Self::Array(items)
            | Self::List(items)
            | Self::ReadOnlyList(items)
            | Self::Set(items)
            | Self::Tuple(items) => Json::Array(items.iter().map(Value::to_json).collect()),
            Self::Array2(rows) => Json::Array(
                rows.iter()
                    .map(|row| Json::Array(row.iter().map(Value::to_json).collect()))
                    .collect(),
            ),
            Self::Map(entries) => {
                let rendered: Vec<(Json, Json)> =
                    entries.iter().map(|(k, v)| (k.to_json(), v.to_json())).collect();
                if rendered.iter().all(|(k, _)| k.is_string()) {
                    let mut object = serde_json::Map::new();
                    for (k, v) in rendered {
                        if let Json::String(key) = k {
                            object.insert(key, v);
                        }
                    }
                    Json::Object(object)
                } else {
                    Json::Array(
                        rendered
                            .into_iter()
                            .map(|(k, v)| Json::Array(vec![k, v]))
                            .collect(),
                    )
                }
            }
            Self::Record { fields, .. } => Json::Object(
                fields
                    .iter()
                    .map(|(name, value)| (name.clone(), value.to_json()))
                    .collect(),
            ),
        }
    }
}

fn float_json(value: f64) -> serde_json::Value {
    serde_json::Number::from_f64(value)
        .map(serde_json::Value::Number)
        .unwrap_or(serde_json::Value::Null)
}

#[cfg(test)]
#[path = "tests/value_tests.rs"]
mod tests;
