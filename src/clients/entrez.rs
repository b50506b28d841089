use reqwest::Client;
use serde::Deserialize;
use serde_json::Value as JsonValue;
use std::time::Instant;

use crate::domain::ArticleSummary;
use crate::infra::config::ToolConfig;
use crate::infra::http::headers::{add_standard_headers, generate_request_id};
use crate::infra::runtime::limits::{make_http_client, make_http_client_with, retry_async};

pub const DEFAULT_BASE_URL: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils";

/// Value sent as the E-utilities `tool` parameter.
const TOOL_PARAM: &str = "pubmed-mcp-gateway";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Relevance,
    PubDate,
}

impl SortOrder {
    pub fn parse(s: &str) -> Result<Self, String> {
        match s {
            "relevance" => Ok(SortOrder::Relevance),
            "date" | "pub_date" => Ok(SortOrder::PubDate),
            other => Err(format!("unsupported sort order: {other}")),
        }
    }

    fn as_query(self) -> &'static str {
        match self {
            SortOrder::Relevance => "relevance",
            SortOrder::PubDate => "pub_date",
        }
    }
}

/// NCBI Entrez E-utilities client (esearch / esummary / elink against the
/// `pubmed` database). API key and contact email are optional but raise the
/// request-rate ceiling when supplied.
#[derive(Clone)]
pub struct EntrezClient {
    base: String,
    http: Client,
    api_key: Option<String>,
    email: Option<String>,
    retries: u32,
}

impl EntrezClient {
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            http: make_http_client(),
            api_key: None,
            email: None,
            retries: 2,
        }
    }

    /// Build from the `[tools.pubmed]` table, with environment overrides:
    /// `ENTREZ_BASE_URL`, `PUBMED_API_KEY`, `PUBMED_EMAIL`.
    pub fn from_config(cfg: &ToolConfig) -> Self {
        let base = std::env::var("ENTREZ_BASE_URL")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .or_else(|| cfg.base_url.clone())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let api_key = std::env::var("PUBMED_API_KEY")
            .ok()
            .filter(|v| !v.trim().is_empty());
        let email = std::env::var("PUBMED_EMAIL")
            .ok()
            .filter(|v| !v.trim().is_empty());
        Self {
            base,
            http: make_http_client_with(cfg),
            api_key,
            email,
            retries: cfg.retries.unwrap_or(2),
        }
    }

    pub fn with_credentials(mut self, api_key: Option<String>, email: Option<String>) -> Self {
        self.api_key = api_key;
        self.email = email;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base
    }

    /// Run esearch and return matching PMIDs in rank order.
    pub async fn search_ids(
        &self,
        term: &str,
        retmax: u32,
        sort: SortOrder,
    ) -> Result<Vec<String>, String> {
        let params = vec![
            ("db".to_string(), "pubmed".to_string()),
            ("term".to_string(), term.to_string()),
            ("retmax".to_string(), retmax.to_string()),
            ("sort".to_string(), sort.as_query().to_string()),
        ];
        let wire: EsearchWire = self.get_json("esearch.fcgi", "pubmed.search", params).await?;
        Ok(wire.esearchresult.idlist)
    }

    /// Fetch document summaries for the given PMIDs, preserving their order.
    pub async fn summaries(&self, pmids: &[String]) -> Result<Vec<ArticleSummary>, String> {
        if pmids.is_empty() {
            return Ok(Vec::new());
        }
        let params = vec![
            ("db".to_string(), "pubmed".to_string()),
            ("id".to_string(), pmids.join(",")),
        ];
        let wire: EsummaryWire = self
            .get_json("esummary.fcgi", "pubmed.summary", params)
            .await?;
        Ok(wire.into_summaries())
    }

    /// Return up to `limit` PMIDs of articles Entrez links as neighbors of
    /// `pmid` (the origin article itself is filtered out).
    pub async fn neighbor_ids(&self, pmid: &str, limit: usize) -> Result<Vec<String>, String> {
        let params = vec![
            ("dbfrom".to_string(), "pubmed".to_string()),
            ("db".to_string(), "pubmed".to_string()),
            ("cmd".to_string(), "neighbor".to_string()),
            ("id".to_string(), pmid.to_string()),
        ];
        let wire: ElinkWire = self.get_json("elink.fcgi", "pubmed.similar", params).await?;
        Ok(wire.neighbor_ids(pmid, limit))
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        endpoint: &str,
        metric_scope: &str,
        mut params: Vec<(String, String)>,
    ) -> Result<T, String> {
        params.push(("retmode".to_string(), "json".to_string()));
        params.push(("tool".to_string(), TOOL_PARAM.to_string()));
        if let Some(key) = &self.api_key {
            params.push(("api_key".to_string(), key.clone()));
        }
        if let Some(email) = &self.email {
            params.push(("email".to_string(), email.clone()));
        }

        let url = format!("{}/{endpoint}", self.base.trim_end_matches('/'));
        tracing::debug!(endpoint = %url, "entrez request");
        let http = self.http.clone();
        let req_id = generate_request_id();
        let start = Instant::now();
        let attempts = self.retries;
        let res: Result<T, String> = retry_async(attempts, move |_| {
            let http = http.clone();
            let url = url.clone();
            let params = params.clone();
            let req_id = req_id.clone();
            async move {
                let (builder, _rid) = add_standard_headers(http.get(url).query(&params), Some(req_id));
                let resp = builder.send().await.map_err(|e| e.to_string())?;
                if !resp.status().is_success() {
                    if resp.status().is_server_error() {
                        return Err(format!("retryable status {}", resp.status()));
                    }
                    return Err(format!("upstream status {}", resp.status()));
                }
                resp.json::<T>().await.map_err(|e| e.to_string())
            }
        })
        .await;
        if res.is_err() {
            crate::infra::logging::log_metric(metric_scope, "remote_error_total", 1.0);
        }
        let elapsed_ms = start.elapsed().as_millis() as f64;
        crate::infra::logging::log_metric(metric_scope, "remote_latency_ms", elapsed_ms);
        res
    }
}

#[derive(Deserialize)]
struct EsearchWire {
    esearchresult: EsearchResult,
}

#[derive(Deserialize, Default)]
struct EsearchResult {
    #[serde(default)]
    idlist: Vec<String>,
}

#[derive(Deserialize)]
struct EsummaryWire {
    result: JsonValue,
}

impl EsummaryWire {
    fn into_summaries(self) -> Vec<ArticleSummary> {
        let uids: Vec<String> = self
            .result
            .get("uids")
            .and_then(JsonValue::as_array)
            .map(|a| {
                a.iter()
                    .filter_map(|v| v.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default();
        uids.iter()
            .filter_map(|uid| {
                let doc = self.result.get(uid)?;
                // Invalid ids come back as {"uid": "...", "error": "..."}.
                if doc.get("error").is_some() {
                    return None;
                }
                let doc: DocSumWire = serde_json::from_value(doc.clone()).ok()?;
                Some(doc.into_summary(uid))
            })
            .collect()
    }
}

#[derive(Deserialize, Default)]
struct DocSumWire {
    #[serde(default)]
    title: String,
    #[serde(default)]
    fulljournalname: String,
    #[serde(default)]
    source: String,
    #[serde(default)]
    pubdate: String,
    #[serde(default)]
    authors: Vec<AuthorWire>,
}

#[derive(Deserialize, Default)]
struct AuthorWire {
    #[serde(default)]
    name: String,
}

impl DocSumWire {
    fn into_summary(self, uid: &str) -> ArticleSummary {
        let journal = if self.fulljournalname.is_empty() {
            self.source
        } else {
            self.fulljournalname
        };
        ArticleSummary {
            pmid: uid.to_string(),
            title: self.title,
            journal,
            pub_date: self.pubdate,
            authors: self
                .authors
                .into_iter()
                .map(|a| a.name)
                .filter(|n| !n.is_empty())
                .collect(),
        }
    }
}

#[derive(Deserialize)]
struct ElinkWire {
    #[serde(default)]
    linksets: Vec<LinksetWire>,
}

#[derive(Deserialize, Default)]
struct LinksetWire {
    #[serde(default)]
    linksetdbs: Vec<LinksetDbWire>,
}

#[derive(Deserialize, Default)]
struct LinksetDbWire {
    #[serde(default)]
    linkname: String,
    // Ids have been observed both as strings and as bare numbers.
    #[serde(default)]
    links: Vec<JsonValue>,
}

impl ElinkWire {
    fn neighbor_ids(self, origin: &str, limit: usize) -> Vec<String> {
        self.linksets
            .into_iter()
            .flat_map(|ls| ls.linksetdbs)
            .find(|db| db.linkname == "pubmed_pubmed")
            .map(|db| {
                db.links
                    .into_iter()
                    .filter_map(|v| {
                        v.as_str()
                            .map(str::to_string)
                            .or_else(|| v.as_u64().map(|n| n.to_string()))
                    })
                    .filter(|id| id != origin)
                    .take(limit)
                    .collect()
            })
            .unwrap_or_default()
    }
}
