//! Parameter binding
//!
//! Turns a matched route, the placeholder values captured by the router and
//! the request's query string into a [`BoundRequest`]: one typed value per
//! declared [`ParameterSpec`], in declaration order.
//!
//! Binding is a pure function of its inputs. Every failing parameter is
//! reported, not just the first one.

use crate::error::ApiError;
use crate::params::{FromValue, ParamLocation, ParamType, ParameterSpec, Value};
use crate::path_params::PathParams;
use crate::router::Route;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::fmt;

/// Decoded query string pairs.
///
/// When a name repeats, the last occurrence wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryValues {
    pairs: Vec<(String, String)>,
}

impl QueryValues {
    /// Parse a raw (still percent-encoded) query string.
    pub fn parse(query: Option<&str>) -> Result<Self, serde_urlencoded::de::Error> {
        let pairs = match query {
            Some(q) if !q.is_empty() => serde_urlencoded::from_str::<Vec<(String, String)>>(q)?,
            _ => Vec::new(),
        };
        Ok(Self { pairs })
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .rev()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for QueryValues {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            pairs: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// The resolved, typed arguments for one handler invocation.
///
/// Serializes as a JSON object whose keys follow declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoundRequest {
    values: Vec<(String, Value)>,
}

impl BoundRequest {
    /// Typed access to a bound parameter.
    ///
    /// Asking for a name the route never declared, or for the wrong Rust
    /// type, is a programming error and maps to a 500.
    pub fn get<T: FromValue>(&self, name: &str) -> Result<T, ApiError> {
        let value = self.value(name).ok_or_else(|| {
            ApiError::internal("Handler parameter error")
                .with_internal(format!("parameter `{}` is not declared on this route", name))
        })?;

        T::from_value(value).ok_or_else(|| {
            ApiError::internal("Handler parameter error").with_internal(format!(
                "parameter `{}` holds {:?}, which does not convert to {}",
                name,
                value,
                std::any::type_name::<T>()
            ))
        })
    }

    pub fn value(&self, name: &str) -> Option<&Value> {
        self.values
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v)
    }

    /// Iterate in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Serialize for BoundRequest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (name, value) in &self.values {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Why a single parameter failed to bind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamErrorKind {
    /// Required and absent.
    Missing,
    /// Present but not convertible to the declared type.
    TypeCoercion { expected: ParamType, value: String },
}

/// A binding failure for one named parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamError {
    pub name: String,
    pub location: ParamLocation,
    pub kind: ParamErrorKind,
}

impl ParamError {
    /// Short machine-readable code.
    pub fn code(&self) -> &'static str {
        match self.kind {
            ParamErrorKind::Missing => "missing",
            ParamErrorKind::TypeCoercion { .. } => "type_coercion",
        }
    }

    pub fn message(&self) -> String {
        match &self.kind {
            ParamErrorKind::Missing => "field required".to_string(),
            ParamErrorKind::TypeCoercion { expected, value } => {
                format!("expected {}, got \"{}\"", expected, value)
            }
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self.kind, ParamErrorKind::Missing)
    }

    pub fn is_type_coercion(&self) -> bool {
        matches!(self.kind, ParamErrorKind::TypeCoercion { .. })
    }
}

impl fmt::Display for ParamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} parameter `{}`: {}", self.location, self.name, self.message())
    }
}

impl std::error::Error for ParamError {}

/// Binding failed for one or more parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    errors: Vec<ParamError>,
}

impl ValidationError {
    /// All failures, in declaration order. Never empty.
    pub fn errors(&self) -> &[ParamError] {
        &self.errors
    }

    /// The failure for `name`, if that parameter failed.
    pub fn error_for(&self, name: &str) -> Option<&ParamError> {
        self.errors.iter().find(|e| e.name == name)
    }

    pub fn into_errors(self) -> Vec<ParamError> {
        self.errors
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("request validation failed")?;
        for (i, error) in self.errors.iter().enumerate() {
            f.write_str(if i == 0 { ": " } else { "; " })?;
            write!(f, "{}", error)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// Resolve every declared parameter of `route`.
pub fn bind(
    route: &Route,
    path_values: &PathParams,
    query_values: &QueryValues,
) -> Result<BoundRequest, ValidationError> {
    let specs = route.params();
    let mut values = Vec::with_capacity(specs.len());
    let mut errors = Vec::new();

    for spec in specs {
        match resolve(spec, path_values, query_values) {
            Ok(value) => values.push((spec.name().to_string(), value)),
            Err(kind) => errors.push(ParamError {
                name: spec.name().to_string(),
                location: spec.location(),
                kind,
            }),
        }
    }

    if errors.is_empty() {
        Ok(BoundRequest { values })
    } else {
        Err(ValidationError { errors })
    }
}

fn resolve(
    spec: &ParameterSpec,
    path_values: &PathParams,
    query_values: &QueryValues,
) -> Result<Value, ParamErrorKind> {
    let raw = match spec.location() {
        ParamLocation::Path => path_values.get(spec.name()),
        ParamLocation::Query => query_values.get(spec.name()),
    };

    match raw {
        Some(raw) => spec
            .ty()
            .coerce(raw)
            .ok_or_else(|| ParamErrorKind::TypeCoercion {
                expected: spec.ty().clone(),
                value: raw.to_string(),
            }),
        None => match spec.default_value() {
            Some(default) => Ok(default.clone()),
            None if spec.ty().is_optional() => Ok(Value::Null),
            None => Err(ParamErrorKind::Missing),
        },
    }
}
