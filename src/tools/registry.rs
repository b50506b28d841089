use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use super::pubmed::PubmedService;
use crate::domain::{Tool, ToolError};

#[derive(Clone)]
pub struct ToolRegistry {
    by_name: Arc<HashMap<&'static str, Arc<dyn Tool>>>,
}

impl ToolRegistry {
    pub fn with_tools<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = Arc<dyn Tool>>,
    {
        let mut map: HashMap<&'static str, Arc<dyn Tool>> = HashMap::new();
        for t in iter.into_iter() {
            map.insert(t.name(), t);
        }
        Self { by_name: Arc::new(map) }
    }

    /// Tool metadata, sorted by name so listings are deterministic.
    pub fn list(&self) -> Vec<ToolMeta> {
        let mut metas: Vec<ToolMeta> = self
            .by_name
            .values()
            .map(|t| ToolMeta {
                name: t.name(),
                description: t.description(),
                input_schema: t.input_schema(),
            })
            .collect();
        metas.sort_by_key(|m| m.name);
        metas
    }

    pub async fn call(
        &self,
        name: &str,
        args: &serde_json::Value,
    ) -> Result<serde_json::Value, ToolError> {
        let t = self
            .by_name
            .get(name)
            .ok_or_else(|| ToolError::UnknownTool(name.to_string()))?;
        t.call(args).await
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolMeta {
    pub name: &'static str,
    pub description: &'static str,
    pub input_schema: serde_json::Value,
}

struct SearchTool(Arc<PubmedService>);

#[async_trait]
impl Tool for SearchTool {
    fn name(&self) -> &'static str {
        "pubmed.search"
    }
    fn description(&self) -> &'static str {
        "Search PubMed by free-text query"
    }
    fn input_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "query": {"type": "string"},
                "max_results": {"type": "integer"},
                "sort": {"type": "string", "enum": ["relevance", "date"]}
            },
            "required": ["query"]
        })
    }
    async fn call(&self, arguments: &serde_json::Value) -> Result<serde_json::Value, ToolError> {
        let results = self.0.search(arguments).await?;
        Ok(json!({ "results": results }))
    }
}

struct DetailsTool(Arc<PubmedService>);

#[async_trait]
impl Tool for DetailsTool {
    fn name(&self) -> &'static str {
        "pubmed.get_details"
    }
    fn description(&self) -> &'static str {
        "Fetch the document summary of one PubMed article"
    }
    fn input_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {"pmid": {"type": "string"}},
            "required": ["pmid"]
        })
    }
    async fn call(&self, arguments: &serde_json::Value) -> Result<serde_json::Value, ToolError> {
        let results = self.0.publication_details(arguments).await?;
        Ok(json!({ "results": results }))
    }
}

struct SimilarTool(Arc<PubmedService>);

#[async_trait]
impl Tool for SimilarTool {
    fn name(&self) -> &'static str {
        "pubmed.similar_articles"
    }
    fn description(&self) -> &'static str {
        "List articles PubMed links as similar to a given article"
    }
    fn input_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "pmid": {"type": "string"},
                "max_results": {"type": "integer"}
            },
            "required": ["pmid"]
        })
    }
    async fn call(&self, arguments: &serde_json::Value) -> Result<serde_json::Value, ToolError> {
        let results = self.0.similar_articles(arguments).await?;
        Ok(json!({ "results": results }))
    }
}

pub fn build_registry(service: Arc<PubmedService>) -> ToolRegistry {
    ToolRegistry::with_tools([
        Arc::new(SearchTool(service.clone())) as Arc<dyn Tool>,
        Arc::new(DetailsTool(service.clone())) as Arc<dyn Tool>,
        Arc::new(SimilarTool(service)) as Arc<dyn Tool>,
    ])
}

pub fn build_registry_from_env() -> Result<ToolRegistry, ToolError> {
    let service = Arc::new(PubmedService::from_env()?);
    Ok(build_registry(service))
}
