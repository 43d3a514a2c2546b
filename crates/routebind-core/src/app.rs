//! Application builder

use crate::config::ServerConfig;
use crate::handler::Endpoint;
use crate::router::{RouteError, Router};
use crate::server::Server;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Main application builder for routebind
///
/// Routes are collected at startup; once the app starts serving, the route
/// table is frozen and shared read-only between requests.
///
/// # Example
///
/// ```rust,ignore
/// use routebind_rs::prelude::*;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
///     App::new()
///         .route("/", get(root))?
///         .route("/items/{item_id}", get(read_item).query("needy", ParamType::Str))?
///         .run("127.0.0.1:8000")
///         .await
/// }
/// ```
pub struct App {
    router: Router,
}

impl App {
    /// Create a new application.
    ///
    /// Installs a `tracing` subscriber filtered by `RUST_LOG` (default
    /// `info,routebind_core=debug`) unless one is already set.
    pub fn new() -> Self {
        let _ = tracing_subscriber::registry()
            .with(
                EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| EnvFilter::new("info,routebind_core=debug")),
            )
            .with(tracing_subscriber::fmt::layer())
            .try_init();

        Self {
            router: Router::new(),
        }
    }

    /// Register an endpoint under `pattern`.
    ///
    /// Registration errors (duplicate routes, malformed patterns, parameter
    /// declarations that contradict the pattern) are returned so that
    /// startup can abort.
    pub fn route(mut self, pattern: &str, endpoint: Endpoint) -> Result<Self, RouteError> {
        self.router.register(pattern, endpoint)?;
        Ok(self)
    }

    /// The route table built so far.
    pub fn router(&self) -> &Router {
        &self.router
    }

    #[cfg(any(test, feature = "test-utils"))]
    pub(crate) fn into_router(self) -> Router {
        self.router
    }

    /// Run the server on `addr` (for example `"127.0.0.1:8000"`).
    pub async fn run(self, addr: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        Server::new(self.router).run(addr).await
    }

    /// Run the server on the address given by `config`.
    pub async fn serve(
        self,
        config: &ServerConfig,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        Server::new(self.router)
            .run((config.host.as_str(), config.port))
            .await
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}
