//! Unvalidated coordinate records

use serde::{Serialize, Serializer};
use serde_json::Value;

/// One ordinate as it appeared upstream
#[derive(Debug, Clone, PartialEq)]
pub enum RawOrdinate {
    Number(f64),
    Text(String),
    Missing,
}

impl RawOrdinate {
    /// Converts to a finite `f64`, accepting numeric text with surrounding whitespace
    pub fn coerce(&self) -> Option<f64> {
        let value = match self {
            RawOrdinate::Number(n) => *n,
            RawOrdinate::Text(s) => s.trim().parse::<f64>().ok()?,
            RawOrdinate::Missing => return None,
        };
        value.is_finite().then_some(value)
    }

    /// Reads an ordinate out of a JSON field
    pub fn from_json(value: Option<&Value>) -> Self {
        match value {
            Some(Value::Number(n)) => n.as_f64().map_or(RawOrdinate::Missing, RawOrdinate::Number),
            Some(Value::String(s)) => RawOrdinate::Text(s.clone()),
            Some(Value::Null) | None => RawOrdinate::Missing,
            Some(other) => RawOrdinate::Text(other.to_string()),
        }
    }
}

impl From<f64> for RawOrdinate {
    fn from(value: f64) -> Self {
        RawOrdinate::Number(value)
    }
}

impl From<&str> for RawOrdinate {
    fn from(value: &str) -> Self {
        RawOrdinate::Text(value.to_string())
    }
}

impl Serialize for RawOrdinate {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            RawOrdinate::Number(n) => serializer.serialize_f64(*n),
            RawOrdinate::Text(s) => serializer.serialize_str(s),
            RawOrdinate::Missing => serializer.serialize_none(),
        }
    }
}

/// A coordinate-shaped record recovered from upstream text, not yet range-checked
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidatePoint {
    pub x: RawOrdinate,
    pub y: RawOrdinate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl CandidatePoint {
    /// Creates a candidate from any pair of ordinate-like values
    pub fn new(x: impl Into<RawOrdinate>, y: impl Into<RawOrdinate>) -> Self {
        Self {
            x: x.into(),
            y: y.into(),
            label: None,
        }
    }

    /// Attaches a point label
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Returns both ordinates as finite numbers, or `None` if either fails
    pub fn coerce(&self) -> Option<(f64, f64)> {
        Some((self.x.coerce()?, self.y.coerce()?))
    }
}
