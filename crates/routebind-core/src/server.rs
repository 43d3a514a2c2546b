//! HTTP server implementation

use crate::binder::{bind, QueryValues};
use crate::error::ApiError;
use crate::response::{IntoResponse, Response};
use crate::router::Router;
use http::{Method, StatusCode, Uri};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use std::convert::Infallible;
use std::future::Future;
use std::sync::Arc;
use tokio::net::{TcpListener, ToSocketAddrs};
use tracing::{debug, error, info, warn};

/// Internal server struct
pub(crate) struct Server {
    router: Arc<Router>,
}

impl Server {
    /// The router is frozen from here on: it is only ever read.
    pub fn new(router: Router) -> Self {
        Self {
            router: Arc::new(router),
        }
    }

    /// Accept connections until Ctrl-C.
    pub async fn run<A: ToSocketAddrs>(
        self,
        addr: A,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let listener = TcpListener::bind(addr).await?;
        self.serve(listener, async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await
    }

    /// Accept connections on `listener` until `shutdown` completes.
    pub async fn serve<F>(
        self,
        listener: TcpListener,
        shutdown: F,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>
    where
        F: Future<Output = ()>,
    {
        let local_addr = listener.local_addr()?;
        info!(routes = self.router.len(), "routebind server running on http://{}", local_addr);

        tokio::pin!(shutdown);

        loop {
            let (stream, remote_addr) = tokio::select! {
                accepted = listener.accept() => accepted?,
                _ = &mut shutdown => {
                    info!("Shutdown signal received, no longer accepting connections");
                    return Ok(());
                }
            };

            let io = TokioIo::new(stream);
            let router = self.router.clone();

            tokio::spawn(async move {
                let service = service_fn(move |req: hyper::Request<Incoming>| {
                    let router = router.clone();
                    async move {
                        let (parts, _body) = req.into_parts();
                        let response = handle_request(&router, &parts.method, &parts.uri).await;
                        Ok::<_, Infallible>(response)
                    }
                });

                // Dropping the connection (client gone) drops any in-flight
                // handler future with it.
                if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                    warn!(remote = %remote_addr, "Connection error: {}", err);
                }
            });
        }
    }
}

/// Route, bind and invoke the handler for one request, and log the outcome.
pub(crate) async fn handle_request(router: &Router, method: &Method, uri: &Uri) -> Response {
    let start = std::time::Instant::now();
    let response = dispatch(router, method, uri).await;
    log_request(method, uri.path(), response.status(), start);
    response
}

async fn dispatch(router: &Router, method: &Method, uri: &Uri) -> Response {
    let matched = match router.match_route(method, uri.path()) {
        Ok(matched) => matched,
        Err(err) => return err.into_response(),
    };

    let query = match QueryValues::parse(uri.query()) {
        Ok(query) => query,
        Err(err) => {
            return ApiError::bad_request(format!("Invalid query string: {}", err)).into_response()
        }
    };

    let bound = match bind(matched.route, &matched.params, &query) {
        Ok(bound) => bound,
        Err(err) => {
            debug!(pattern = %matched.route.pattern(), "{}", err);
            return ApiError::from(err).into_response();
        }
    };

    matched.route.call(bound).await
}

/// Log request completion
fn log_request(method: &Method, path: &str, status: StatusCode, start: std::time::Instant) {
    let elapsed = start.elapsed();

    if status.is_server_error() {
        error!(
            method = %method,
            path = %path,
            status = %status.as_u16(),
            duration_ms = %elapsed.as_millis(),
            "Request failed"
        );
    } else {
        info!(
            method = %method,
            path = %path,
            status = %status.as_u16(),
            duration_ms = %elapsed.as_millis(),
            "Request completed"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::get;
    use crate::params::ParamType;
    use crate::response::Json;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;
    use tokio::sync::oneshot;

    async fn root() -> Json<serde_json::Value> {
        Json(serde_json::json!({ "message": "Hello World" }))
    }

    async fn send_raw(addr: std::net::SocketAddr, target: &str) -> String {
        let mut stream = TcpStream::connect(addr).await.unwrap();
        let request = format!(
            "GET {} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
            target
        );
        stream.write_all(request.as_bytes()).await.unwrap();

        let mut raw = Vec::new();
        stream.read_to_end(&mut raw).await.unwrap();
        String::from_utf8_lossy(&raw).into_owned()
    }

    #[tokio::test]
    async fn test_serves_requests_over_tcp_until_shutdown() {
        let mut router = Router::new();
        router.register("/", get(root)).unwrap();
        router
            .register("/items/{item_id}", get(root).query("needy", ParamType::Str))
            .unwrap();

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (stop, stopped) = oneshot::channel::<()>();
        let server = tokio::spawn(Server::new(router).serve(listener, async {
            let _ = stopped.await;
        }));

        let ok = send_raw(addr, "/").await;
        assert!(ok.starts_with("HTTP/1.1 200"), "{}", ok);
        assert!(ok.ends_with(r#"{"message":"Hello World"}"#), "{}", ok);

        let missing = send_raw(addr, "/items/1").await;
        assert!(missing.starts_with("HTTP/1.1 422"), "{}", missing);

        let unknown = send_raw(addr, "/nope").await;
        assert!(unknown.starts_with("HTTP/1.1 404"), "{}", unknown);

        stop.send(()).unwrap();
        server.await.unwrap().unwrap();
    }
}
