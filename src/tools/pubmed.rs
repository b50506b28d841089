//! The PubMed service behind all three tools: argument parsing, Entrez
//! calls, and rendering of article summaries into ordered text blocks.

use serde_json::Value as JsonValue;
use std::fmt::Write as _;

use crate::clients::entrez::{EntrezClient, SortOrder};
use crate::domain::{ArticleSummary, TextContent, ToolError};
use crate::infra::config::AppConfig;

pub const DEFAULT_SEARCH_LIMIT: u32 = 10;
pub const DEFAULT_SIMILAR_LIMIT: u32 = 5;
pub const MAX_RESULT_LIMIT: u32 = 50;

#[derive(Clone)]
pub struct PubmedService {
    client: EntrezClient,
}

impl PubmedService {
    /// Zero-argument construction from process environment and the optional
    /// `config.toml`. Fails only on a malformed config file.
    pub fn from_env() -> Result<Self, ToolError> {
        let cfg = AppConfig::from_env_and_toml().map_err(ToolError::Config)?;
        Ok(Self::with_client(EntrezClient::from_config(&cfg.tools.pubmed)))
    }

    pub fn with_client(client: EntrezClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &EntrezClient {
        &self.client
    }

    /// Free-text search. Arguments: `query` (required), `max_results`
    /// (optional), `sort` of `"relevance"` or `"date"` (optional).
    pub async fn search(&self, args: &JsonValue) -> Result<Vec<TextContent>, ToolError> {
        let query = require_str(args, "query")?;
        let limit = optional_limit(args, "max_results", DEFAULT_SEARCH_LIMIT)?;
        let sort = match args.get("sort").and_then(JsonValue::as_str) {
            None => SortOrder::Relevance,
            Some(s) => SortOrder::parse(s).map_err(ToolError::InvalidArguments)?,
        };

        let ids = self
            .client
            .search_ids(query, limit, sort)
            .await
            .map_err(ToolError::Upstream)?;
        if ids.is_empty() {
            return Ok(vec![TextContent::new(format!(
                "No PubMed results for '{query}'."
            ))]);
        }
        let articles = self
            .client
            .summaries(&ids)
            .await
            .map_err(ToolError::Upstream)?;
        Ok(vec![TextContent::new(render_search(query, &articles))])
    }

    /// Document summary for one article. Arguments: `pmid` (required).
    pub async fn publication_details(
        &self,
        args: &JsonValue,
    ) -> Result<Vec<TextContent>, ToolError> {
        let pmid = require_str(args, "pmid")?;
        let articles = self
            .client
            .summaries(&[pmid.to_string()])
            .await
            .map_err(ToolError::Upstream)?;
        let article = articles
            .into_iter()
            .next()
            .ok_or_else(|| ToolError::NotFound(format!("PMID {pmid}")))?;
        Ok(vec![TextContent::new(render_details(&article))])
    }

    /// Articles Entrez links as neighbors of `pmid`. Arguments: `pmid`
    /// (required), `max_results` (optional).
    pub async fn similar_articles(&self, args: &JsonValue) -> Result<Vec<TextContent>, ToolError> {
        let pmid = require_str(args, "pmid")?;
        let limit = optional_limit(args, "max_results", DEFAULT_SIMILAR_LIMIT)?;

        let ids = self
            .client
            .neighbor_ids(pmid, limit as usize)
            .await
            .map_err(ToolError::Upstream)?;
        if ids.is_empty() {
            return Ok(vec![TextContent::new(format!(
                "No similar articles found for PMID {pmid}."
            ))]);
        }
        let articles = self
            .client
            .summaries(&ids)
            .await
            .map_err(ToolError::Upstream)?;
        Ok(vec![TextContent::new(render_similar(pmid, &articles))])
    }
}

fn require_str<'a>(args: &'a JsonValue, key: &str) -> Result<&'a str, ToolError> {
    args.get(key)
        .and_then(JsonValue::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ToolError::InvalidArguments(format!("missing required field: {key}")))
}

fn optional_limit(args: &JsonValue, key: &str, default: u32) -> Result<u32, ToolError> {
    match args.get(key) {
        None | Some(JsonValue::Null) => Ok(default),
        Some(v) => {
            let n = v.as_u64().ok_or_else(|| {
                ToolError::InvalidArguments(format!("'{key}' must be a positive integer"))
            })?;
            Ok(n.clamp(1, MAX_RESULT_LIMIT as u64) as u32)
        }
    }
}

fn render_entry(out: &mut String, index: usize, article: &ArticleSummary) {
    let _ = write!(out, "{}. {}", index + 1, article.title);
    if !article.authors.is_empty() {
        let shown: Vec<&str> = article.authors.iter().take(3).map(String::as_str).collect();
        let suffix = if article.authors.len() > 3 { ", et al." } else { "" };
        let _ = write!(out, "\n   Authors: {}{}", shown.join(", "), suffix);
    }
    if !article.journal.is_empty() {
        if article.pub_date.is_empty() {
            let _ = write!(out, "\n   Journal: {}", article.journal);
        } else {
            let _ = write!(out, "\n   Journal: {} ({})", article.journal, article.pub_date);
        }
    }
    let _ = write!(out, "\n   PMID: {}", article.pmid);
    let _ = write!(out, "\n   URL: https://pubmed.ncbi.nlm.nih.gov/{}/", article.pmid);
}

fn render_search(query: &str, articles: &[ArticleSummary]) -> String {
    let mut out = format!(
        "Found {} PubMed article(s) for '{}':\n",
        articles.len(),
        query
    );
    for (i, article) in articles.iter().enumerate() {
        out.push('\n');
        render_entry(&mut out, i, article);
        out.push('\n');
    }
    out
}

fn render_details(article: &ArticleSummary) -> String {
    let mut out = format!("Publication details for PMID {}:\n\n", article.pmid);
    let _ = write!(out, "Title: {}", article.title);
    if !article.authors.is_empty() {
        let _ = write!(out, "\nAuthors: {}", article.authors.join(", "));
    }
    if !article.journal.is_empty() {
        let _ = write!(out, "\nJournal: {}", article.journal);
    }
    if !article.pub_date.is_empty() {
        let _ = write!(out, "\nPublished: {}", article.pub_date);
    }
    let _ = write!(
        out,
        "\nURL: https://pubmed.ncbi.nlm.nih.gov/{}/",
        article.pmid
    );
    out
}

fn render_similar(pmid: &str, articles: &[ArticleSummary]) -> String {
    let mut out = format!(
        "Found {} article(s) similar to PMID {}:\n",
        articles.len(),
        pmid
    );
    for (i, article) in articles.iter().enumerate() {
        out.push('\n');
        render_entry(&mut out, i, article);
        out.push('\n');
    }
    out
}
