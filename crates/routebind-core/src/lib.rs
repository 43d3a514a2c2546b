//! # routebind core
//!
//! Core library providing the router, the parameter binder and the HTTP
//! server for routebind.
//!
//! This crate is not meant to be used directly. Use `routebind-rs` instead.

mod app;
mod binder;
pub mod config;
mod error;
mod handler;
mod params;
mod path_params;
pub mod pattern;
mod response;
mod router;
mod server;
#[cfg(any(test, feature = "test-utils"))]
mod test_client;

// Public API
pub use app::App;
pub use binder::{bind, BoundRequest, ParamError, ParamErrorKind, QueryValues, ValidationError};
pub use config::{load_dotenv, ConfigError, ServerConfig};
pub use error::{ApiError, FieldError, Result};
pub use handler::{delete, get, patch, post, put, Endpoint, Handler};
pub use params::{FromValue, ParamLocation, ParamType, ParameterSpec, Value};
pub use path_params::PathParams;
pub use pattern::{Pattern, PatternError, Segment};
pub use response::{IntoResponse, Json, Response};
pub use router::{MatchError, Route, RouteError, RouteMatch, Router};
#[cfg(any(test, feature = "test-utils"))]
pub use test_client::{TestClient, TestRequest, TestResponse};
