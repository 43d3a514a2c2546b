//! Handler trait and endpoint declarations

use crate::binder::BoundRequest;
use crate::params::{ParamType, ParameterSpec, Value};
use crate::response::{IntoResponse, Response};
use http::Method;
use std::fmt;
use std::future::Future;
use std::pin::Pin;

/// Trait representing an async handler function.
///
/// Implemented for async functions taking no arguments or a single
/// [`BoundRequest`].
pub trait Handler<T>: Clone + Send + Sync + Sized + 'static {
    /// The response future
    type Future: Future<Output = Response> + Send + 'static;

    /// Call the handler with the bound parameters
    fn call(self, bound: BoundRequest) -> Self::Future;
}

// 0 args
impl<F, Fut, Res> Handler<()> for F
where
    F: FnOnce() -> Fut + Clone + Send + Sync + 'static,
    Fut: Future<Output = Res> + Send + 'static,
    Res: IntoResponse,
{
    type Future = Pin<Box<dyn Future<Output = Response> + Send>>;

    fn call(self, _bound: BoundRequest) -> Self::Future {
        Box::pin(async move { self().await.into_response() })
    }
}

// bound parameters
impl<F, Fut, Res> Handler<(BoundRequest,)> for F
where
    F: FnOnce(BoundRequest) -> Fut + Clone + Send + Sync + 'static,
    Fut: Future<Output = Res> + Send + 'static,
    Res: IntoResponse,
{
    type Future = Pin<Box<dyn Future<Output = Response> + Send>>;

    fn call(self, bound: BoundRequest) -> Self::Future {
        Box::pin(async move { self(bound).await.into_response() })
    }
}

// Type-erased handler for storage in router
pub(crate) type BoxedHandler =
    Box<dyn Fn(BoundRequest) -> Pin<Box<dyn Future<Output = Response> + Send>> + Send + Sync>;

/// Create a boxed handler from any Handler
pub(crate) fn into_boxed_handler<H, T>(handler: H) -> BoxedHandler
where
    H: Handler<T>,
    T: 'static,
{
    Box::new(move |bound| {
        let handler = handler.clone();
        Box::pin(async move { handler.call(bound).await })
    })
}

/// A handler together with its HTTP method and parameter table.
///
/// Built with [`get`], [`post`], [`put`], [`patch`] or [`delete`] and
/// registered on a router under a pattern.
///
/// # Example
///
/// ```rust,ignore
/// use routebind_core::{get, BoundRequest, ParamType};
///
/// async fn read_item(bound: BoundRequest) -> String { /* ... */ }
///
/// let endpoint = get(read_item)
///     .query("needy", ParamType::Str)
///     .query_default("skip", ParamType::Int, 0)
///     .query("limit", ParamType::optional(ParamType::Int));
/// ```
pub struct Endpoint {
    method: Method,
    params: Vec<ParameterSpec>,
    handler: BoxedHandler,
}

impl Endpoint {
    /// Create an endpoint for any method.
    pub fn new<H, T>(method: Method, handler: H) -> Self
    where
        H: Handler<T>,
        T: 'static,
    {
        Self {
            method,
            params: Vec::new(),
            handler: into_boxed_handler(handler),
        }
    }

    /// Declare the type of a path placeholder.
    ///
    /// Placeholders that are never declared bind as strings.
    pub fn path(mut self, name: impl Into<String>, ty: ParamType) -> Self {
        self.params.push(ParameterSpec::path(name, ty));
        self
    }

    /// Declare a query parameter. Required unless `ty` is optional.
    pub fn query(mut self, name: impl Into<String>, ty: ParamType) -> Self {
        self.params.push(ParameterSpec::query(name, ty));
        self
    }

    /// Declare a query parameter that falls back to `default` when absent.
    pub fn query_default(
        mut self,
        name: impl Into<String>,
        ty: ParamType,
        default: impl Into<Value>,
    ) -> Self {
        self.params
            .push(ParameterSpec::query_with_default(name, ty, default));
        self
    }

    /// Declare a fully built parameter spec.
    pub fn param(mut self, spec: ParameterSpec) -> Self {
        self.params.push(spec);
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn params(&self) -> &[ParameterSpec] {
        &self.params
    }

    pub(crate) fn into_parts(self) -> (Method, Vec<ParameterSpec>, BoxedHandler) {
        (self.method, self.params, self.handler)
    }
}

impl fmt::Debug for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Endpoint")
            .field("method", &self.method)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

/// Create a GET endpoint
pub fn get<H, T>(handler: H) -> Endpoint
where
    H: Handler<T>,
    T: 'static,
{
    Endpoint::new(Method::GET, handler)
}

/// Create a POST endpoint
pub fn post<H, T>(handler: H) -> Endpoint
where
    H: Handler<T>,
    T: 'static,
{
    Endpoint::new(Method::POST, handler)
}

/// Create a PUT endpoint
pub fn put<H, T>(handler: H) -> Endpoint
where
    H: Handler<T>,
    T: 'static,
{
    Endpoint::new(Method::PUT, handler)
}

/// Create a PATCH endpoint
pub fn patch<H, T>(handler: H) -> Endpoint
where
    H: Handler<T>,
    T: 'static,
{
    Endpoint::new(Method::PATCH, handler)
}

/// Create a DELETE endpoint
pub fn delete<H, T>(handler: H) -> Endpoint
where
    H: Handler<T>,
    T: 'static,
{
    Endpoint::new(Method::DELETE, handler)
}
