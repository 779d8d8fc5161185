//! MCP server: one tool per dispatcher operation.
//!
//! Two transports share the same [`JmaService`]: stdio (the default, for
//! desktop MCP clients) and streamable HTTP.

mod http;
mod service;

use rmcp::ServiceExt;
use rmcp::transport::stdio;
use tracing::info;

use crate::dispatch::QueryDispatcher;

pub use http::{create_router, ctrl_c, serve_http};
pub use service::JmaService;

/// Serve MCP over stdin/stdout until the client disconnects.
pub async fn serve_stdio(dispatcher: QueryDispatcher) -> Result<(), Box<dyn std::error::Error>> {
    info!("MCP server on stdio");
    let server = JmaService::new(dispatcher).serve(stdio()).await?;
    let reason = server.waiting().await?;
    info!(?reason, "MCP server stopped");
    Ok(())
}
