//! MCP tool router for the PubMed tools. Tool output is plain JSON of the
//! shape `{"results": [{"text": "..."}, ...]}`, delivered as
//! `structuredContent` to MCP clients.

use std::future::Future;
use std::sync::Arc;

use rmcp::{
    handler::server::tool::{Parameters, ToolRouter},
    model::JsonObject,
    ErrorData as McpError,
};

use crate::domain::ToolError;
use crate::infra::runtime::mcp_transport::ServerHandler;
use crate::tools::pubmed::PubmedService;

#[derive(Clone)]
pub struct PubmedSvc {
    pub service: Arc<PubmedService>,
}

impl ServerHandler for PubmedSvc {}

fn to_mcp_err(e: ToolError) -> McpError {
    let msg = e.to_string();
    match e {
        ToolError::InvalidArguments(_) => McpError::invalid_params(msg, None),
        _ => McpError::internal_error(msg, None),
    }
}

#[rmcp::tool_router]
impl PubmedSvc {
    #[rmcp::tool(
        name = "pubmed.search",
        description = "Search PubMed and return {\"results\": [...]} as JSON"
    )]
    async fn pubmed_search(
        &self,
        params: Parameters<JsonObject>,
    ) -> Result<rmcp::Json<serde_json::Value>, McpError> {
        let args = serde_json::Value::Object(params.0);
        let results = self.service.search(&args).await.map_err(to_mcp_err)?;
        Ok(rmcp::Json(serde_json::json!({ "results": results })))
    }

    #[rmcp::tool(
        name = "pubmed.get_details",
        description = "Fetch one article's summary and return {\"results\": [...]} as JSON"
    )]
    async fn pubmed_get_details(
        &self,
        params: Parameters<JsonObject>,
    ) -> Result<rmcp::Json<serde_json::Value>, McpError> {
        let args = serde_json::Value::Object(params.0);
        let results = self
            .service
            .publication_details(&args)
            .await
            .map_err(to_mcp_err)?;
        Ok(rmcp::Json(serde_json::json!({ "results": results })))
    }

    #[rmcp::tool(
        name = "pubmed.similar_articles",
        description = "List similar articles and return {\"results\": [...]} as JSON"
    )]
    async fn pubmed_similar_articles(
        &self,
        params: Parameters<JsonObject>,
    ) -> Result<rmcp::Json<serde_json::Value>, McpError> {
        let args = serde_json::Value::Object(params.0);
        let results = self
            .service
            .similar_articles(&args)
            .await
            .map_err(to_mcp_err)?;
        Ok(rmcp::Json(serde_json::json!({ "results": results })))
    }
}

pub type PubmedRouter = ToolRouter<PubmedSvc>;

impl PubmedSvc {
    pub fn new(service: Arc<PubmedService>) -> Self {
        Self { service }
    }

    pub fn router() -> PubmedRouter {
        // Wrapper to expose the macro-generated private tool_router
        Self::tool_router()
    }
}

/// Factory shape required by the rmcp stdio and streamable HTTP transports.
pub fn factory_with_service(service: Arc<PubmedService>) -> (PubmedSvc, PubmedRouter) {
    (PubmedSvc::new(service), PubmedSvc::router())
}
