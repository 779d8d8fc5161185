//! Streamable HTTP transport.

use std::future::Future;
use std::io;

use axum::{Router, routing::get};
use rmcp::transport::streamable_http_server::{
    StreamableHttpServerConfig, StreamableHttpService, session::local::LocalSessionManager,
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::dispatch::QueryDispatcher;

use super::service::JmaService;

/// Build the HTTP application: MCP at `/mcp`, plus `/health`.
pub fn create_router(dispatcher: QueryDispatcher) -> Router {
    let mcp = StreamableHttpService::new(
        move || Ok::<_, io::Error>(JmaService::new(dispatcher.clone())),
        LocalSessionManager::default().into(),
        StreamableHttpServerConfig {
            stateful_mode: false,
            ..Default::default()
        },
    );

    Router::new()
        .route("/health", get(health))
        .nest_service("/mcp", mcp)
        .layer(TraceLayer::new_for_http())
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Serve on an already-bound listener until `shutdown` resolves.
pub async fn serve_http(
    listener: TcpListener,
    dispatcher: QueryDispatcher,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> io::Result<()> {
    let addr = listener.local_addr()?;
    info!(%addr, "MCP streamable HTTP server listening");

    axum::serve(listener, create_router(dispatcher))
        .with_graceful_shutdown(shutdown)
        .await
}

/// Resolves on Ctrl-C.
pub async fn ctrl_c() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("shutting down"),
        Err(e) => error!(error = %e, "failed to listen for ctrl-c"),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::DateTime;
    use tokio::sync::oneshot;

    use super::*;
    use crate::jma::MockWeather;
    use crate::stations::StationDirectory;

    fn dispatcher() -> QueryDispatcher {
        let latest = DateTime::parse_from_rfc3339("2025-12-01T12:00:00+09:00").unwrap();
        QueryDispatcher::new(
            Arc::new(StationDirectory::bundled().unwrap()),
            Arc::new(MockWeather::new(latest)),
        )
    }

    #[tokio::test]
    async fn health_route_answers_ok() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = oneshot::channel::<()>();
        let server = tokio::spawn(serve_http(listener, dispatcher(), async move {
            rx.await.ok();
        }));

        let body = reqwest::get(format!("http://{addr}/health"))
            .await
            .unwrap()
            .text()
            .await
            .unwrap();
        assert_eq!(body, "ok");

        let status = reqwest::get(format!("http://{addr}/nowhere"))
            .await
            .unwrap()
            .status();
        assert_eq!(status, reqwest::StatusCode::NOT_FOUND);

        tx.send(()).unwrap();
        server.await.unwrap().unwrap();
    }
}
