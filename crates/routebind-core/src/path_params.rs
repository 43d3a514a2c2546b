//! Values captured from placeholder segments during route matching.

use smallvec::SmallVec;

/// Most patterns have at most a few placeholders; keep those on the stack.
pub const STACK_PARAMS_CAPACITY: usize = 4;

/// Ordered `(placeholder name, raw value)` pairs bound by the router.
///
/// Values are percent-decoded but not yet coerced to their declared type;
/// that is the binder's job.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathParams {
    inner: SmallVec<[(String, String); STACK_PARAMS_CAPACITY]>,
}

impl PathParams {
    #[inline]
    pub fn new() -> Self {
        Self {
            inner: SmallVec::new(),
        }
    }

    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: SmallVec::with_capacity(capacity),
        }
    }

    #[inline]
    pub fn insert(&mut self, name: String, value: String) {
        self.inner.push((name, value));
    }

    /// Raw value bound to `name`, if the pattern has such a placeholder.
    #[inline]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.inner
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Iterate in pattern order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.inner.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<'a> FromIterator<(&'a str, &'a str)> for PathParams {
    fn from_iter<I: IntoIterator<Item = (&'a str, &'a str)>>(iter: I) -> Self {
        Self {
            inner: iter
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keeps_pattern_order() {
        let params: PathParams = [("user_id", "7"), ("post_id", "9")].into_iter().collect();
        let names: Vec<_> = params.iter().map(|(k, _)| k).collect();
        assert_eq!(names, vec!["user_id", "post_id"]);
        assert_eq!(params.get("post_id"), Some("9"));
        assert_eq!(params.get("missing"), None);
    }

    #[test]
    fn test_small_params_stay_on_stack() {
        let mut params = PathParams::new();
        params.insert("item_id".to_string(), "42".to_string());
        assert_eq!(params.len(), 1);
        assert!(!params.inner.spilled());
    }
}
