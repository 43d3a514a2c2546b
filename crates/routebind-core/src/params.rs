//! Parameter declarations and typed values
//!
//! Every route carries a table of [`ParameterSpec`]s, built once at
//! registration. The binder consults the table for each request instead of
//! inspecting handler signatures.
//!
//! # Example
//!
//! ```rust
//! use routebind_core::{ParamType, ParameterSpec, Value};
//!
//! let needy = ParameterSpec::query("needy", ParamType::Str);
//! let skip = ParameterSpec::query_with_default("skip", ParamType::Int, 0);
//! let limit = ParameterSpec::query("limit", ParamType::optional(ParamType::Int));
//!
//! assert!(needy.is_required());
//! assert!(!skip.is_required());
//! assert!(!limit.is_required());
//! assert_eq!(ParamType::Int.coerce("42"), Some(Value::Int(42)));
//! ```

use serde::Serialize;
use std::fmt;

/// Declared type of a parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamType {
    Str,
    Int,
    Float,
    Bool,
    /// May be absent; binds `null` when no default is given.
    Optional(Box<ParamType>),
}

impl ParamType {
    /// Wrap `inner` as optional. Already-optional types are not nested.
    pub fn optional(inner: ParamType) -> Self {
        match inner {
            ParamType::Optional(_) => inner,
            other => ParamType::Optional(Box::new(other)),
        }
    }

    pub fn is_optional(&self) -> bool {
        matches!(self, ParamType::Optional(_))
    }

    /// Convert a raw request value. `None` means the text is not a valid
    /// value of this type.
    pub fn coerce(&self, raw: &str) -> Option<Value> {
        match self {
            ParamType::Str => Some(Value::Str(raw.to_string())),
            ParamType::Int => raw.parse::<i64>().ok().map(Value::Int),
            // NaN and infinities have no JSON representation.
            ParamType::Float => raw
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .map(Value::Float),
            ParamType::Bool => parse_bool(raw).map(Value::Bool),
            ParamType::Optional(inner) => inner.coerce(raw),
        }
    }

    /// Whether `value` is an acceptable value of this type (used to check
    /// declared defaults).
    pub fn accepts(&self, value: &Value) -> bool {
        match (self, value) {
            (ParamType::Optional(_), Value::Null) => true,
            (ParamType::Optional(inner), v) => inner.accepts(v),
            (ParamType::Str, Value::Str(_))
            | (ParamType::Int, Value::Int(_))
            | (ParamType::Float, Value::Int(_))
            | (ParamType::Bool, Value::Bool(_)) => true,
            (ParamType::Float, Value::Float(v)) => v.is_finite(),
            _ => false,
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamType::Str => f.write_str("string"),
            ParamType::Int => f.write_str("integer"),
            ParamType::Float => f.write_str("float"),
            ParamType::Bool => f.write_str("boolean"),
            ParamType::Optional(inner) => write!(f, "optional<{}>", inner),
        }
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "t" | "yes" | "y" | "on" => Some(true),
        "0" | "false" | "f" | "no" | "n" | "off" => Some(false),
        _ => None,
    }
}

/// A bound, typed parameter value.
///
/// Serializes as the plain JSON scalar (`Null` as `null`).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v.into())
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

/// Conversion from a bound [`Value`] into a handler-side Rust type.
pub trait FromValue: Sized {
    /// `None` when the value has a different type.
    fn from_value(value: &Value) -> Option<Self>;
}

impl FromValue for Value {
    fn from_value(value: &Value) -> Option<Self> {
        Some(value.clone())
    }
}

impl FromValue for String {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Str(s) => Some(s.clone()),
            _ => None,
        }
    }
}

impl FromValue for i64 {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }
}

impl FromValue for f64 {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Float(v) => Some(*v),
            Value::Int(v) => Some(*v as f64),
            _ => None,
        }
    }
}

impl FromValue for bool {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Null => Some(None),
            other => T::from_value(other).map(Some),
        }
    }
}

/// Where a parameter is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamLocation {
    Path,
    Query,
}

impl fmt::Display for ParamLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamLocation::Path => f.write_str("path"),
            ParamLocation::Query => f.write_str("query"),
        }
    }
}

/// Declaration of one handler parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterSpec {
    name: String,
    location: ParamLocation,
    ty: ParamType,
    default: Option<Value>,
}

impl ParameterSpec {
    /// A path parameter. Always required, never defaulted.
    pub fn path(name: impl Into<String>, ty: ParamType) -> Self {
        Self {
            name: name.into(),
            location: ParamLocation::Path,
            ty,
            default: None,
        }
    }

    /// A query parameter; required unless `ty` is optional.
    pub fn query(name: impl Into<String>, ty: ParamType) -> Self {
        Self {
            name: name.into(),
            location: ParamLocation::Query,
            ty,
            default: None,
        }
    }

    /// A query parameter that falls back to `default` when absent.
    pub fn query_with_default(
        name: impl Into<String>,
        ty: ParamType,
        default: impl Into<Value>,
    ) -> Self {
        Self {
            name: name.into(),
            location: ParamLocation::Query,
            ty,
            default: Some(default.into()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn location(&self) -> ParamLocation {
        self.location
    }

    pub fn ty(&self) -> &ParamType {
        &self.ty
    }

    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// Whether a request without this parameter must be rejected.
    pub fn is_required(&self) -> bool {
        match self.location {
            ParamLocation::Path => true,
            ParamLocation::Query => self.default.is_none() && !self.ty.is_optional(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coerce_integer() {
        assert_eq!(ParamType::Int.coerce("-7"), Some(Value::Int(-7)));
        assert_eq!(ParamType::Int.coerce("seven"), None);
        assert_eq!(ParamType::Int.coerce(""), None);
        assert_eq!(ParamType::Int.coerce("4.5"), None);
    }

    #[test]
    fn test_coerce_float_rejects_non_finite() {
        assert_eq!(ParamType::Float.coerce("2.5"), Some(Value::Float(2.5)));
        assert_eq!(ParamType::Float.coerce("3"), Some(Value::Float(3.0)));
        for raw in ["NaN", "nan", "inf", "-inf", "infinity", "1e999"] {
            assert_eq!(ParamType::Float.coerce(raw), None, "{raw}");
        }
        assert_eq!(ParamType::optional(ParamType::Float).coerce("NaN"), None);
        assert!(!ParamType::Float.accepts(&Value::Float(f64::NAN)));
    }

    #[test]
    fn test_coerce_bool_variants() {
        for raw in ["true", "TRUE", "1", "yes", "on"] {
            assert_eq!(ParamType::Bool.coerce(raw), Some(Value::Bool(true)), "{raw}");
        }
        for raw in ["false", "0", "No", "off"] {
            assert_eq!(ParamType::Bool.coerce(raw), Some(Value::Bool(false)), "{raw}");
        }
        assert_eq!(ParamType::Bool.coerce("maybe"), None);
    }

    #[test]
    fn test_optional_coerces_inner_type() {
        let ty = ParamType::optional(ParamType::Int);
        assert_eq!(ty.coerce("3"), Some(Value::Int(3)));
        assert_eq!(ty.coerce("x"), None);
        assert_eq!(ParamType::optional(ty.clone()), ty);
        assert_eq!(ty.to_string(), "optional<integer>");
    }

    #[test]
    fn test_accepts_defaults() {
        assert!(ParamType::Int.accepts(&Value::Int(0)));
        assert!(!ParamType::Int.accepts(&Value::Str("0".into())));
        assert!(ParamType::optional(ParamType::Int).accepts(&Value::Null));
        assert!(!ParamType::Int.accepts(&Value::Null));
    }

    #[test]
    fn test_required_rules() {
        assert!(ParameterSpec::path("item_id", ParamType::Str).is_required());
        assert!(ParameterSpec::query("needy", ParamType::Str).is_required());
        assert!(!ParameterSpec::query_with_default("skip", ParamType::Int, 0).is_required());
        assert!(!ParameterSpec::query("limit", ParamType::optional(ParamType::Int)).is_required());
    }

    #[test]
    fn test_value_serializes_as_scalar() {
        let values = vec![
            Value::from("42"),
            Value::from(0),
            Value::Null,
            Value::from(true),
        ];
        assert_eq!(
            serde_json::to_string(&values).unwrap(),
            r#"["42",0,null,true]"#
        );
    }

    #[test]
    fn test_from_value_option() {
        assert_eq!(Option::<i64>::from_value(&Value::Null), Some(None));
        assert_eq!(Option::<i64>::from_value(&Value::Int(5)), Some(Some(5)));
        assert_eq!(i64::from_value(&Value::Null), None);
    }
}
