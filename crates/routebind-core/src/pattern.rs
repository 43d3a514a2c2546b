//! Route pattern parsing and segment matching
//!
//! A pattern is a `/`-separated list of segments. Each segment is either
//! literal text, matched exactly, or a `{name}` placeholder that spans the
//! whole segment and binds any non-empty value.
//!
//! - `/` - Root, no segments
//! - `/items` - One literal segment
//! - `/items/{item_id}` - Literal followed by a placeholder
//!
//! # Valid patterns
//! - Must start with '/'
//! - No empty segments (double or trailing slashes), except the root pattern
//! - Placeholder names are identifiers (alphanumeric + underscore, not
//!   starting with a digit) and appear at most once per pattern
//!
//! ```
//! use routebind_core::pattern::Pattern;
//!
//! assert!(Pattern::parse("/").is_ok());
//! assert!(Pattern::parse("/items/{item_id}").is_ok());
//!
//! assert!(Pattern::parse("items").is_err()); // Missing leading /
//! assert!(Pattern::parse("/items//x").is_err()); // Double slash
//! assert!(Pattern::parse("/items/{").is_err()); // Unclosed brace
//! assert!(Pattern::parse("/items/{}").is_err()); // Empty parameter
//! assert!(Pattern::parse("/items/{1d}").is_err()); // Starts with digit
//! assert!(Pattern::parse("/items/id-{id}").is_err()); // Partial segment
//! ```

use crate::path_params::PathParams;
use std::collections::HashSet;
use std::fmt;

/// One segment of a route pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// Text that must match the request segment exactly (case-sensitive).
    Literal(String),
    /// Named placeholder, binds the request segment.
    Placeholder(String),
}

impl Segment {
    fn is_placeholder(&self) -> bool {
        matches!(self, Segment::Placeholder(_))
    }
}

/// Error returned when a route pattern is malformed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PatternError {
    #[error("route pattern must start with '/', got: \"{path}\"")]
    MustStartWithSlash { path: String },

    #[error("route pattern contains an empty segment: \"{path}\"")]
    EmptySegment { path: String },

    #[error("unclosed brace '{{' in route pattern (missing closing '}}'): \"{path}\"")]
    UnclosedBrace { path: String },

    #[error("unmatched closing brace '}}' at position {position} in route pattern: \"{path}\"")]
    UnmatchedClosingBrace { path: String, position: usize },

    #[error("empty parameter name '{{}}' at position {position} in route pattern: \"{path}\"")]
    EmptyParameterName { path: String, position: usize },

    #[error("invalid parameter name '{{{param_name}}}' at position {position} - parameter names must contain only alphanumeric characters and underscores: \"{path}\"")]
    InvalidParameterName {
        path: String,
        param_name: String,
        position: usize,
    },

    #[error("parameter name '{{{param_name}}}' cannot start with a digit at position {position}: \"{path}\"")]
    ParameterStartsWithDigit {
        path: String,
        param_name: String,
        position: usize,
    },

    #[error("placeholder must span the whole segment, got \"{segment}\" in route pattern: \"{path}\"")]
    PartialPlaceholder { path: String, segment: String },

    #[error("parameter '{{{param_name}}}' appears more than once in route pattern: \"{path}\"")]
    DuplicateParameter { path: String, param_name: String },

    #[error("invalid character '{character}' at position {position} in route pattern: \"{path}\"")]
    InvalidCharacter {
        path: String,
        character: char,
        position: usize,
    },
}

/// A parsed, immutable route pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    raw: String,
    segments: Vec<Segment>,
}

impl Pattern {
    /// Parse a pattern such as `/items/{item_id}`.
    pub fn parse(raw: &str) -> Result<Self, PatternError> {
        let Some(rest) = raw.strip_prefix('/') else {
            return Err(PatternError::MustStartWithSlash {
                path: raw.to_string(),
            });
        };

        let mut segments = Vec::new();
        if !rest.is_empty() {
            // Byte offset of the current segment inside `raw`.
            let mut offset = 1;
            for segment in rest.split('/') {
                if segment.is_empty() {
                    return Err(PatternError::EmptySegment {
                        path: raw.to_string(),
                    });
                }
                segments.push(parse_segment(raw, segment, offset)?);
                offset += segment.len() + 1;
            }
        }

        let mut seen = HashSet::new();
        for segment in &segments {
            if let Segment::Placeholder(name) = segment {
                if !seen.insert(name.as_str()) {
                    return Err(PatternError::DuplicateParameter {
                        path: raw.to_string(),
                        param_name: name.clone(),
                    });
                }
            }
        }

        Ok(Self {
            raw: raw.to_string(),
            segments,
        })
    }

    /// The pattern as it was written at registration.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Placeholder names in pattern order.
    pub fn placeholders(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Placeholder(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// Whether `name` is one of this pattern's placeholders.
    pub fn has_placeholder(&self, name: &str) -> bool {
        self.placeholders().any(|p| p == name)
    }

    /// Two patterns have the same shape when they match exactly the same set
    /// of paths, i.e. they differ at most in placeholder names.
    pub fn same_shape(&self, other: &Pattern) -> bool {
        self.segments.len() == other.segments.len()
            && self
                .segments
                .iter()
                .zip(&other.segments)
                .all(|(a, b)| match (a, b) {
                    (Segment::Literal(x), Segment::Literal(y)) => x == y,
                    _ => a.is_placeholder() && b.is_placeholder(),
                })
    }

    /// Whether some request path matches both patterns: same length, and at
    /// every position the literals agree or either side is a placeholder.
    pub fn overlaps(&self, other: &Pattern) -> bool {
        self.segments.len() == other.segments.len()
            && self
                .segments
                .iter()
                .zip(&other.segments)
                .all(|(a, b)| match (a, b) {
                    (Segment::Literal(x), Segment::Literal(y)) => x == y,
                    _ => true,
                })
    }

    /// Whether every path matched by `other` is also matched by `self`.
    ///
    /// A route whose pattern is covered by an earlier route of the same
    /// method can never be reached.
    pub fn covers(&self, other: &Pattern) -> bool {
        self.segments.len() == other.segments.len()
            && self
                .segments
                .iter()
                .zip(&other.segments)
                .all(|(a, b)| match (a, b) {
                    (Segment::Placeholder(_), _) => true,
                    (Segment::Literal(x), Segment::Literal(y)) => x == y,
                    (Segment::Literal(_), Segment::Placeholder(_)) => false,
                })
    }

    /// Match already-split request path segments against this pattern.
    ///
    /// Returns the placeholder bindings (percent-decoded) on success.
    pub fn capture(&self, path_segments: &[&str]) -> Option<PathParams> {
        if path_segments.len() != self.segments.len() {
            return None;
        }

        let mut params = PathParams::with_capacity(self.segments.len());
        for (segment, value) in self.segments.iter().zip(path_segments) {
            match segment {
                Segment::Literal(text) => {
                    if text != value {
                        return None;
                    }
                }
                Segment::Placeholder(name) => {
                    if value.is_empty() {
                        return None;
                    }
                    let decoded = urlencoding::decode(value)
                        .map(|v| v.into_owned())
                        .unwrap_or_else(|_| value.to_string());
                    params.insert(name.clone(), decoded);
                }
            }
        }
        Some(params)
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Split a request path into segments.
///
/// One leading `/` is stripped; `/` itself yields no segments.
pub fn split_path(path: &str) -> Vec<&str> {
    let rest = path.strip_prefix('/').unwrap_or(path);
    if rest.is_empty() {
        Vec::new()
    } else {
        rest.split('/').collect()
    }
}

fn parse_segment(raw: &str, segment: &str, offset: usize) -> Result<Segment, PatternError> {
    if let Some(inner) = segment.strip_prefix('{') {
        let Some(name) = inner.strip_suffix('}') else {
            return Err(if inner.contains('}') {
                PatternError::PartialPlaceholder {
                    path: raw.to_string(),
                    segment: segment.to_string(),
                }
            } else {
                PatternError::UnclosedBrace {
                    path: raw.to_string(),
                }
            });
        };
        validate_param_name(raw, name, offset + 1)?;
        return Ok(Segment::Placeholder(name.to_string()));
    }

    for (i, ch) in segment.char_indices() {
        match ch {
            '{' => {
                return Err(PatternError::PartialPlaceholder {
                    path: raw.to_string(),
                    segment: segment.to_string(),
                })
            }
            '}' => {
                return Err(PatternError::UnmatchedClosingBrace {
                    path: raw.to_string(),
                    position: offset + i,
                })
            }
            c if c.is_whitespace() || c.is_control() || c == '?' || c == '#' => {
                return Err(PatternError::InvalidCharacter {
                    path: raw.to_string(),
                    character: c,
                    position: offset + i,
                })
            }
            _ => {}
        }
    }

    Ok(Segment::Literal(segment.to_string()))
}

fn validate_param_name(raw: &str, name: &str, position: usize) -> Result<(), PatternError> {
    let Some(first) = name.chars().next() else {
        return Err(PatternError::EmptyParameterName {
            path: raw.to_string(),
            position: position - 1,
        });
    };

    if first.is_ascii_digit() {
        return Err(PatternError::ParameterStartsWithDigit {
            path: raw.to_string(),
            param_name: name.to_string(),
            position,
        });
    }

    if !name.chars().all(|c| c.is_alphanumeric() || c == '_') {
        return Err(PatternError::InvalidParameterName {
            path: raw.to_string(),
            param_name: name.to_string(),
            position,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_pattern_has_no_segments() {
        let pattern = Pattern::parse("/").unwrap();
        assert!(pattern.segments().is_empty());
        assert_eq!(pattern.as_str(), "/");
    }

    #[test]
    fn test_parse_mixed_segments() {
        let pattern = Pattern::parse("/users/{user_id}/posts/{post_id}").unwrap();
        assert_eq!(
            pattern.segments(),
            &[
                Segment::Literal("users".into()),
                Segment::Placeholder("user_id".into()),
                Segment::Literal("posts".into()),
                Segment::Placeholder("post_id".into()),
            ]
        );
        assert_eq!(
            pattern.placeholders().collect::<Vec<_>>(),
            vec!["user_id", "post_id"]
        );
    }

    #[test]
    fn test_invalid_patterns() {
        assert!(matches!(
            Pattern::parse("items"),
            Err(PatternError::MustStartWithSlash { .. })
        ));
        assert!(matches!(
            Pattern::parse("/items/"),
            Err(PatternError::EmptySegment { .. })
        ));
        assert!(matches!(
            Pattern::parse("/items/{id"),
            Err(PatternError::UnclosedBrace { .. })
        ));
        assert!(matches!(
            Pattern::parse("/items/id}"),
            Err(PatternError::UnmatchedClosingBrace { position: 9, .. })
        ));
        assert!(matches!(
            Pattern::parse("/items/{}"),
            Err(PatternError::EmptyParameterName { position: 7, .. })
        ));
        assert!(matches!(
            Pattern::parse("/items/{item-id}"),
            Err(PatternError::InvalidParameterName { .. })
        ));
        assert!(matches!(
            Pattern::parse("/items/{9id}"),
            Err(PatternError::ParameterStartsWithDigit { .. })
        ));
        assert!(matches!(
            Pattern::parse("/items/{id}.json"),
            Err(PatternError::PartialPlaceholder { .. })
        ));
        assert!(matches!(
            Pattern::parse("/a/{id}/b/{id}"),
            Err(PatternError::DuplicateParameter { .. })
        ));
        assert!(matches!(
            Pattern::parse("/items list"),
            Err(PatternError::InvalidCharacter { character: ' ', .. })
        ));
    }

    #[test]
    fn test_same_shape_ignores_placeholder_names() {
        let a = Pattern::parse("/items/{id}").unwrap();
        let b = Pattern::parse("/items/{item_id}").unwrap();
        let c = Pattern::parse("/items/latest").unwrap();
        assert!(a.same_shape(&b));
        assert!(!a.same_shape(&c));
    }

    #[test]
    fn test_overlaps_literal_after_placeholder() {
        let placeholder = Pattern::parse("/items/{id}").unwrap();
        let literal = Pattern::parse("/items/latest").unwrap();
        let other = Pattern::parse("/users/latest").unwrap();
        let longer = Pattern::parse("/items/{id}/tags").unwrap();

        assert!(placeholder.overlaps(&literal));
        assert!(literal.overlaps(&placeholder));
        assert!(!literal.overlaps(&other));
        assert!(!placeholder.overlaps(&longer));
    }

    #[test]
    fn test_overlaps_crossed_placeholders() {
        let a = Pattern::parse("/{kind}/latest").unwrap();
        let b = Pattern::parse("/items/{id}").unwrap();
        assert!(a.overlaps(&b));
        assert!(!a.covers(&b));
        assert!(!b.covers(&a));
    }

    #[test]
    fn test_covers_is_directional() {
        let placeholder = Pattern::parse("/items/{id}").unwrap();
        let literal = Pattern::parse("/items/latest").unwrap();
        let renamed = Pattern::parse("/items/{item_id}").unwrap();

        assert!(placeholder.covers(&literal));
        assert!(!literal.covers(&placeholder));
        assert!(placeholder.covers(&renamed));
        assert!(literal.covers(&literal));
    }

    #[test]
    fn test_split_path() {
        assert!(split_path("/").is_empty());
        assert_eq!(split_path("/items/42"), vec!["items", "42"]);
        assert_eq!(split_path("/items/"), vec!["items", ""]);
    }

    #[test]
    fn test_capture_rejects_empty_placeholder_value() {
        let pattern = Pattern::parse("/items/{id}").unwrap();
        assert!(pattern.capture(&split_path("/items/")).is_none());
        assert!(pattern.capture(&split_path("/items")).is_none());
    }

    #[test]
    fn test_capture_is_case_sensitive_and_decodes() {
        let pattern = Pattern::parse("/items/{id}").unwrap();
        assert!(pattern.capture(&split_path("/Items/1")).is_none());

        let params = pattern.capture(&split_path("/items/hello%20world")).unwrap();
        assert_eq!(params.get("id"), Some("hello world"));
    }
}
