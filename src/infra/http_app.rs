use axum::{
    routing::{any_service, get, post},
    Router,
};
use std::sync::Arc;

use crate::infra::runtime::mcp_transport::{self, LocalSessionManager};
use crate::tools::pubmed::PubmedService;
use crate::tools::registry::ToolRegistry;
use crate::tools::router::factory_with_service;

/// Default app: `/healthz` + streamable MCP at `/mcp`.
pub fn build_app(service: Arc<PubmedService>) -> Router {
    let session_mgr = Arc::new(LocalSessionManager::default());
    let factory = move || factory_with_service(service.clone());
    let mcp_service = mcp_transport::make_streamable_http_service(factory, session_mgr);

    Router::new()
        .route("/healthz", get(|| async { "ok" }))
        .route_service("/mcp", any_service(mcp_service))
}

/// Default app **plus** the deprecated JSON-RPC shim at `/rpc`.
pub fn build_app_with_rpc(service: Arc<PubmedService>, registry: ToolRegistry) -> Router {
    let session_mgr = Arc::new(LocalSessionManager::default());
    let factory = move || factory_with_service(service.clone());
    let mcp_service = mcp_transport::make_streamable_http_service(factory, session_mgr);

    Router::new()
        .route("/healthz", get(|| async { "ok" }))
        .route_service("/mcp", any_service(mcp_service))
        .route("/rpc", post(crate::api::rpc::http))
        .with_state(registry)
}
