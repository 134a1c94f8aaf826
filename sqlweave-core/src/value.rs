//! Runtime parameter values.
//!
//! [`ParamValue`] is the dynamic value model shared by the parameter view,
//! the expression evaluator, and the rendered argument list. Values convert
//! in from plain Rust types and from `serde_json::Value`, and convert out to
//! their SQL text form for `${…}` splices.

use std::fmt;

use indexmap::IndexMap;

/// A dynamically typed value bound into a rendered query.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    /// Null value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Signed integer value.
    Int(i64),
    /// Unsigned integer value (kept apart so `u64` above `i64::MAX` survives).
    Uint(u64),
    /// Float value.
    Float(f64),
    /// String value.
    String(String),
    /// Ordered sequence of values.
    List(Vec<ParamValue>),
    /// Keyed mapping, iterated in insertion order.
    Map(IndexMap<String, ParamValue>),
}

impl ParamValue {
    /// Check if this is a null value.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// The kind name used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Uint(_) => "uint",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::List(_) => "list",
            Self::Map(_) => "map",
        }
    }

    /// Truthiness as the condition nodes see it.
    ///
    /// Booleans are themselves, numbers are true when non-zero, strings are
    /// true when non-empty. Every other kind has no truth value and returns
    /// `None`; callers turn that into an evaluation error.
    pub fn truthy(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            Self::Int(i) => Some(*i != 0),
            Self::Uint(u) => Some(*u != 0),
            Self::Float(f) => Some(*f != 0.0),
            Self::String(s) => Some(!s.is_empty()),
            _ => None,
        }
    }

    /// Resolve one path segment against this value.
    ///
    /// Only maps have addressable members; descending into anything else
    /// (including null) yields `None` rather than an error.
    pub(crate) fn member(&self, segment: &str) -> Option<&ParamValue> {
        match self {
            Self::Map(entries) => entries.get(segment),
            _ => None,
        }
    }
}

impl fmt::Display for ParamValue {
    /// The literal text spliced in for a `${…}` substitution.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("NULL"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Uint(u) => write!(f, "{u}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::String(s) => f.write_str(s),
            Self::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                Ok(())
            }
            Self::Map(entries) => {
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                Ok(())
            }
        }
    }
}

impl From<bool> for ParamValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i8> for ParamValue {
    fn from(v: i8) -> Self {
        Self::Int(v as i64)
    }
}

impl From<i16> for ParamValue {
    fn from(v: i16) -> Self {
        Self::Int(v as i64)
    }
}

impl From<i32> for ParamValue {
    fn from(v: i32) -> Self {
        Self::Int(v as i64)
    }
}

impl From<i64> for ParamValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<isize> for ParamValue {
    fn from(v: isize) -> Self {
        Self::Int(v as i64)
    }
}

impl From<u8> for ParamValue {
    fn from(v: u8) -> Self {
        Self::Int(v as i64)
    }
}

impl From<u16> for ParamValue {
    fn from(v: u16) -> Self {
        Self::Int(v as i64)
    }
}

impl From<u32> for ParamValue {
    fn from(v: u32) -> Self {
        Self::Int(v as i64)
    }
}

impl From<u64> for ParamValue {
    fn from(v: u64) -> Self {
        Self::Uint(v)
    }
}

impl From<usize> for ParamValue {
    fn from(v: usize) -> Self {
        Self::Uint(v as u64)
    }
}

impl From<f32> for ParamValue {
    fn from(v: f32) -> Self {
        Self::Float(v as f64)
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl<T: Into<ParamValue>> From<Option<T>> for ParamValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

impl<T: Into<ParamValue>> From<Vec<T>> for ParamValue {
    fn from(v: Vec<T>) -> Self {
        Self::List(v.into_iter().map(Into::into).collect())
    }
}

impl From<serde_json::Value> for ParamValue {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Self::Int(i)
                } else if let Some(u) = n.as_u64() {
                    Self::Uint(u)
                } else {
                    Self::Float(n.as_f64().unwrap_or_default())
                }
            }
            serde_json::Value::String(s) => Self::String(s),
            serde_json::Value::Array(items) => {
                Self::List(items.into_iter().map(Into::into).collect())
            }
            serde_json::Value::Object(entries) => Self::Map(
                entries
                    .into_iter()
                    .map(|(key, value)| (key, value.into()))
                    .collect(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_primitives() {
        assert_eq!(ParamValue::from(42i32), ParamValue::Int(42));
        assert_eq!(ParamValue::from(42u64), ParamValue::Uint(42));
        assert_eq!(ParamValue::from(1.5f64), ParamValue::Float(1.5));
        assert_eq!(ParamValue::from(true), ParamValue::Bool(true));
        assert_eq!(
            ParamValue::from("hello"),
            ParamValue::String("hello".to_string())
        );
        assert_eq!(ParamValue::from(None::<i32>), ParamValue::Null);
        assert_eq!(ParamValue::from(Some(7)), ParamValue::Int(7));
    }

    #[test]
    fn test_from_vec() {
        let value = ParamValue::from(vec![10, 20, 30]);
        assert_eq!(
            value,
            ParamValue::List(vec![
                ParamValue::Int(10),
                ParamValue::Int(20),
                ParamValue::Int(30)
            ])
        );
    }

    #[test]
    fn test_from_json() {
        let value = ParamValue::from(json!({"id": 7, "tags": ["a", "b"], "deep": {"x": null}}));
        let ParamValue::Map(entries) = value else {
            panic!("expected map");
        };
        assert_eq!(entries.get("id"), Some(&ParamValue::Int(7)));
        assert_eq!(
            entries.get("tags"),
            Some(&ParamValue::List(vec![
                ParamValue::from("a"),
                ParamValue::from("b")
            ]))
        );
        let Some(ParamValue::Map(deep)) = entries.get("deep") else {
            panic!("expected nested map");
        };
        assert_eq!(deep.get("x"), Some(&ParamValue::Null));
    }

    #[test]
    fn test_truthiness() {
        assert_eq!(ParamValue::Bool(true).truthy(), Some(true));
        assert_eq!(ParamValue::Bool(false).truthy(), Some(false));
        assert_eq!(ParamValue::Int(0).truthy(), Some(false));
        assert_eq!(ParamValue::Int(-3).truthy(), Some(true));
        assert_eq!(ParamValue::Uint(1).truthy(), Some(true));
        assert_eq!(ParamValue::Float(0.0).truthy(), Some(false));
        assert_eq!(ParamValue::from("").truthy(), Some(false));
        assert_eq!(ParamValue::from("x").truthy(), Some(true));
        assert_eq!(ParamValue::Null.truthy(), None);
        assert_eq!(ParamValue::List(vec![]).truthy(), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(ParamValue::Null.to_string(), "NULL");
        assert_eq!(ParamValue::Int(-5).to_string(), "-5");
        assert_eq!(ParamValue::from("name").to_string(), "name");
        assert_eq!(ParamValue::from(vec![1, 2]).to_string(), "1, 2");
    }

    #[test]
    fn test_member_lookup() {
        let value = ParamValue::from(json!({"a": {"b": 3}}));
        let inner = value.member("a").expect("a");
        assert_eq!(inner.member("b"), Some(&ParamValue::Int(3)));
        assert_eq!(inner.member("missing"), None);
        assert_eq!(ParamValue::Int(1).member("a"), None);
    }
}
