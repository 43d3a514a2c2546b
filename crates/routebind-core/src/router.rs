//! Segment router
//!
//! Routes are registered with an HTTP method, a pattern and an endpoint.
//! Patterns use `{name}` placeholders:
//!
//! - `/` - Root
//! - `/items` - Static path
//! - `/items/{item_id}` - Single placeholder
//! - `/users/{user_id}/posts/{post_id}` - Multiple placeholders
//!
//! # Example
//!
//! ```rust,ignore
//! use routebind_core::{Router, get, ParamType};
//!
//! async fn root() -> &'static str { "root" }
//! async fn read_item(bound: BoundRequest) -> String { /* ... */ }
//!
//! let mut router = Router::new();
//! router.register("/", get(root))?;
//! router.register("/items/{item_id}", get(read_item).query("needy", ParamType::Str))?;
//! ```
//!
//! # Matching
//!
//! A request path is split on `/` and compared against every pattern with
//! the same number of segments. Literal segments match exactly and
//! case-sensitively; placeholders match any non-empty segment. When several
//! patterns match, the one registered first wins. Registering two routes of
//! identical shape (they differ only in placeholder names) for the same
//! method is accepted but logged as a warning, since the second one can
//! never be reached.

use crate::binder::BoundRequest;
use crate::handler::{BoxedHandler, Endpoint};
use crate::params::{ParamLocation, ParamType, ParameterSpec};
use crate::path_params::PathParams;
use crate::pattern::{split_path, Pattern, PatternError};
use crate::response::Response;
use http::Method;
use std::collections::HashSet;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use tracing::{debug, warn};

/// Error returned when a route cannot be registered.
///
/// Registration errors are programming errors and abort startup.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouteError {
    #[error("duplicate route: {method} {pattern} is already registered")]
    DuplicateRoute { method: Method, pattern: String },

    #[error(transparent)]
    InvalidPattern(#[from] PatternError),

    #[error("invalid parameter `{name}` on route {pattern}: {reason}")]
    InvalidParameter {
        pattern: String,
        name: String,
        reason: String,
    },
}

/// Error returned when no route accepts a request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MatchError {
    #[error("No route found for {method} {path}")]
    NotFound { method: Method, path: String },

    #[error("Method {method} not allowed for {path}")]
    MethodNotAllowed {
        method: Method,
        path: String,
        /// Methods registered for patterns matching `path`, in registration order
        allowed: Vec<Method>,
    },
}

/// A registered route.
pub struct Route {
    method: Method,
    pattern: Pattern,
    params: Vec<ParameterSpec>,
    handler: BoxedHandler,
}

impl Route {
    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    /// Parameter table in invocation order: undeclared placeholders first,
    /// then the endpoint's declarations.
    pub fn params(&self) -> &[ParameterSpec] {
        &self.params
    }

    /// Invoke the handler.
    pub(crate) fn call(
        &self,
        bound: BoundRequest,
    ) -> Pin<Box<dyn Future<Output = Response> + Send>> {
        (self.handler)(bound)
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("method", &self.method)
            .field("pattern", &self.pattern.as_str())
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

/// Successful match: the route and the values bound to its placeholders.
#[derive(Debug)]
pub struct RouteMatch<'a> {
    pub route: &'a Route,
    pub params: PathParams,
}

/// Route table, in registration order.
#[derive(Debug, Default)]
pub struct Router {
    routes: Vec<Route>,
}

impl Router {
    /// Create a new router
    pub fn new() -> Self {
        Self { routes: Vec::new() }
    }

    /// Register `endpoint` under `pattern` for the endpoint's method.
    ///
    /// Fails with [`RouteError::DuplicateRoute`] if the same method and
    /// pattern are already registered.
    pub fn register(&mut self, pattern: &str, endpoint: Endpoint) -> Result<(), RouteError> {
        let pattern = Pattern::parse(pattern)?;
        let (method, declared, handler) = endpoint.into_parts();

        if self
            .routes
            .iter()
            .any(|r| r.method == method && r.pattern.segments() == pattern.segments())
        {
            return Err(RouteError::DuplicateRoute {
                method,
                pattern: pattern.as_str().to_string(),
            });
        }

        let params = build_param_table(&pattern, declared)?;

        if let Some((earlier, shadowed)) = self.find_overlap(&method, &pattern) {
            if shadowed {
                warn!(
                    method = %method,
                    pattern = %pattern,
                    existing = %earlier.pattern,
                    "Unreachable route: every path it matches is taken by an earlier route"
                );
            } else {
                warn!(
                    method = %method,
                    pattern = %pattern,
                    existing = %earlier.pattern,
                    "Ambiguous route: an earlier overlapping route takes precedence"
                );
            }
        }

        debug!(method = %method, pattern = %pattern, params = params.len(), "Route registered");

        self.routes.push(Route {
            method,
            pattern,
            params,
            handler,
        });
        Ok(())
    }

    /// An earlier route for `method` overlapping `pattern`, preferring one
    /// that covers it completely, and whether it does.
    fn find_overlap(&self, method: &Method, pattern: &Pattern) -> Option<(&Route, bool)> {
        let mut overlapping = self
            .routes
            .iter()
            .filter(|r| r.method == *method && r.pattern.overlaps(pattern));
        let first = overlapping.next()?;
        if first.pattern.covers(pattern) {
            return Some((first, true));
        }
        let covering = overlapping.find(|r| r.pattern.covers(pattern));
        Some(covering.map_or((first, false), |r| (r, true)))
    }

    /// Find the route for `method` and `path`.
    ///
    /// Returns [`MatchError::MethodNotAllowed`] when some pattern matches the
    /// path but none is registered for `method`.
    pub fn match_route(&self, method: &Method, path: &str) -> Result<RouteMatch<'_>, MatchError> {
        let segments = split_path(path);
        let mut allowed: Vec<Method> = Vec::new();

        for route in &self.routes {
            let Some(params) = route.pattern.capture(&segments) else {
                continue;
            };
            if route.method == *method {
                return Ok(RouteMatch { route, params });
            }
            if !allowed.contains(&route.method) {
                allowed.push(route.method.clone());
            }
        }

        if allowed.is_empty() {
            Err(MatchError::NotFound {
                method: method.clone(),
                path: path.to_string(),
            })
        } else {
            Err(MatchError::MethodNotAllowed {
                method: method.clone(),
                path: path.to_string(),
                allowed,
            })
        }
    }

    /// Registered routes, in registration order.
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

/// Check the endpoint's declarations against the pattern and fill in string
/// path parameters for undeclared placeholders.
fn build_param_table(
    pattern: &Pattern,
    declared: Vec<ParameterSpec>,
) -> Result<Vec<ParameterSpec>, RouteError> {
    let invalid = |name: &str, reason: &str| RouteError::InvalidParameter {
        pattern: pattern.as_str().to_string(),
        name: name.to_string(),
        reason: reason.to_string(),
    };

    let mut seen: HashSet<String> = HashSet::new();
    for spec in &declared {
        if !seen.insert(spec.name().to_string()) {
            return Err(invalid(spec.name(), "declared more than once"));
        }

        match spec.location() {
            ParamLocation::Path => {
                if !pattern.has_placeholder(spec.name()) {
                    return Err(invalid(spec.name(), "no such placeholder in the pattern"));
                }
                if spec.ty().is_optional() || spec.default_value().is_some() {
                    return Err(invalid(
                        spec.name(),
                        "path parameters are always required",
                    ));
                }
            }
            ParamLocation::Query => {
                if pattern.has_placeholder(spec.name()) {
                    return Err(invalid(
                        spec.name(),
                        "declared as a query parameter but is a path placeholder",
                    ));
                }
                if let Some(default) = spec.default_value() {
                    if !spec.ty().accepts(default) {
                        return Err(invalid(
                            spec.name(),
                            &format!("default {:?} is not a valid {}", default, spec.ty()),
                        ));
                    }
                }
            }
        }
    }

    let mut params: Vec<ParameterSpec> = pattern
        .placeholders()
        .filter(|name| !seen.contains(*name))
        .map(|name| ParameterSpec::path(name, ParamType::Str))
        .collect();
    params.extend(declared);
    Ok(params)
}
