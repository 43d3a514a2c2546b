//! # routebind
//!
//! Declarative HTTP routing with typed parameter binding.
//!
//! Each endpoint is registered under a path pattern such as
//! `/items/{item_id}` together with a table of the parameters it expects.
//! On every request the router picks the endpoint, the binder extracts the
//! declared path and query parameters, coerces them to their declared types
//! and applies defaults, and only then is the handler called. Requests that
//! fail binding get a `422` naming every offending parameter.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use routebind_rs::prelude::*;
//!
//! async fn root() -> Json<serde_json::Value> {
//!     Json(serde_json::json!({ "message": "Hello World" }))
//! }
//!
//! async fn read_item(bound: BoundRequest) -> Result<Json<BoundRequest>> {
//!     Ok(Json(bound))
//! }
//!
//! #[tokio::main]
//! async fn main() -> std::result::Result<(), Box<dyn std::error::Error + Send + Sync>> {
//!     App::new()
//!         .route("/", get(root))?
//!         .route(
//!             "/items/{item_id}",
//!             get(read_item)
//!                 .query("needy", ParamType::Str)
//!                 .query_default("skip", ParamType::Int, 0)
//!                 .query("limit", ParamType::optional(ParamType::Int)),
//!         )?
//!         .run("127.0.0.1:8000")
//!         .await
//! }
//! ```
//!
//! ## Optional Features
//!
//! - `test-utils` - in-process [`TestClient`] for exercising an [`App`]
//!   without binding a socket

// Re-export core functionality
pub use routebind_core::*;

/// Prelude module - import everything you need with `use routebind_rs::prelude::*`
pub mod prelude {
    pub use routebind_core::{
        delete,
        get,
        patch,
        post,
        put,
        // Error handling
        ApiError,
        // App builder
        App,
        // Parameter binding
        BoundRequest,
        Endpoint,
        FieldError,
        // Response types
        IntoResponse,
        Json,
        ParamLocation,
        ParamType,
        ParameterSpec,
        Response,
        Result,
        RouteError,
        // Router
        Router,
        // Configuration
        ServerConfig,
        Value,
    };

    #[cfg(feature = "test-utils")]
    pub use routebind_core::{TestClient, TestRequest, TestResponse};

    // Re-export commonly used external types
    pub use serde::{Deserialize, Serialize};
    pub use tracing::{debug, error, info, trace, warn};
}
