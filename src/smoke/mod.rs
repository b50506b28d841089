//! In-process smoke tests: exercise the three PubMed operations directly on
//! the service (no MCP transport in between) and report per-operation
//! outcomes. The operations are independent of each other, so they run
//! concurrently; the rendered report is ordered by operation label, not by
//! completion order.

use serde_json::json;

use crate::domain::{TextContent, ToolError};
use crate::tools::pubmed::PubmedService;

/// How much of the first result block is shown per operation.
pub const PREVIEW_LIMIT: usize = 200;

#[derive(Debug, Clone)]
pub struct SmokeOptions {
    pub query: String,
    pub pmid: String,
    pub max_results: u32,
}

impl Default for SmokeOptions {
    fn default() -> Self {
        Self {
            query: "COVID-19 vaccine".to_string(),
            pmid: "33301246".to_string(),
            max_results: 3,
        }
    }
}

#[derive(Debug)]
pub struct SmokeOutcome {
    pub label: &'static str,
    /// Preview of the first result block on success, error text otherwise.
    pub result: Result<String, String>,
}

pub async fn run(service: &PubmedService, opts: &SmokeOptions) -> Vec<SmokeOutcome> {
    let search_args = json!({
        "query": opts.query,
        "max_results": opts.max_results,
        "sort": "date"
    });
    let detail_args = json!({ "pmid": opts.pmid });
    let similar_args = json!({ "pmid": opts.pmid, "max_results": opts.max_results });

    let (search, details, similar) = tokio::join!(
        service.search(&search_args),
        service.publication_details(&detail_args),
        service.similar_articles(&similar_args),
    );

    vec![
        outcome("PubMed search", search),
        outcome("Publication details", details),
        outcome("Similar articles", similar),
    ]
}

fn outcome(label: &'static str, result: Result<Vec<TextContent>, ToolError>) -> SmokeOutcome {
    let result = result
        .map_err(|e| e.to_string())
        .and_then(|blocks| match blocks.first() {
            Some(block) => Ok(preview(&block.text, PREVIEW_LIMIT)),
            None => Err("empty result set".to_string()),
        });
    SmokeOutcome { label, result }
}

/// Truncate to `limit` characters (not bytes), marking truncation.
pub fn preview(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        text.to_string()
    } else {
        let mut out: String = text.chars().take(limit).collect();
        out.push_str("...");
        out
    }
}

pub fn render(outcomes: &[SmokeOutcome]) -> String {
    let mut out = String::new();
    out.push_str("Testing PubMed MCP Gateway...\n");
    out.push_str(&"=".repeat(50));
    out.push('\n');

    for (i, o) in outcomes.iter().enumerate() {
        out.push_str(&format!("\n{}. Testing {}...\n", i + 1, o.label));
        match &o.result {
            Ok(preview) => {
                out.push_str(&format!("✅ {} successful!\n", o.label));
                out.push_str(&format!("Result preview: {preview}\n"));
            }
            Err(e) => out.push_str(&format!("❌ {} failed: {e}\n", o.label)),
        }
    }

    out.push('\n');
    out.push_str(&"=".repeat(50));
    out.push('\n');
    out.push_str("Testing complete!\n");
    if outcomes.iter().all(|o| o.result.is_ok()) {
        out.push_str("\nAll tests passed: the gateway is ready to use with your MCP host.\n");
    } else {
        out.push_str("\nSome tests failed: check your internet connection and API configuration.\n");
    }
    out
}
