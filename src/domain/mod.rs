use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),
    #[error("upstream request failed: {0}")]
    Upstream(String),
    #[error("no PubMed record found for {0}")]
    NotFound(String),
    #[error("unknown tool: {0}")]
    UnknownTool(String),
    #[error("configuration error: {0}")]
    Config(String),
}

/// One article as surfaced by an Entrez document summary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ArticleSummary {
    pub pmid: String,
    pub title: String,
    #[serde(default)]
    pub journal: String,
    #[serde(default)]
    pub pub_date: String,
    #[serde(default)]
    pub authors: Vec<String>,
}

/// Ordered text block returned by every tool operation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TextContent {
    pub text: String,
}

impl TextContent {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

#[async_trait::async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &'static str;
    fn description(&self) -> &'static str;
    fn input_schema(&self) -> serde_json::Value;
    async fn call(&self, arguments: &serde_json::Value) -> Result<serde_json::Value, ToolError>;
}
