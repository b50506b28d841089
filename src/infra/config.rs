use serde::Deserialize;
use std::path::Path;

pub struct Config {
    pub mode: String, // "server" or "stdio"
    pub port: u16,
    pub rpc_shim: bool,
}

impl Config {
    pub fn from_env() -> Self {
        let mode = std::env::var("MODE").unwrap_or_else(|_| "server".into());
        let port = std::env::var("PORT")
            .ok()
            .and_then(|s| s.parse::<u16>().ok())
            .unwrap_or(8080);
        let rpc_shim = std::env::var("RPC_SHIM")
            .map(|v| !v.is_empty())
            .unwrap_or(false);

        Self { mode, port, rpc_shim }
    }
}

/// Optional `config.toml` settings. Environment variables still override the
/// values read here (see `EntrezClient::from_config`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub tools: ToolTables,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ToolTables {
    #[serde(default)]
    pub pubmed: ToolConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ToolConfig {
    pub base_url: Option<String>,
    pub timeout_ms: Option<u64>,
    pub connect_timeout_ms: Option<u64>,
    pub retries: Option<u32>,
}

impl AppConfig {
    /// Read `config.toml` from the working directory (or `CONFIG_PATH`).
    /// A missing file yields defaults; a malformed file is an error.
    pub fn from_env_and_toml() -> Result<Self, String> {
        let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".into());
        Self::from_file(Path::new(&path))
    }

    pub fn from_file(path: &Path) -> Result<Self, String> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)
            .map_err(|e| format!("read {}: {e}", path.display()))?;
        toml::from_str(&raw).map_err(|e| format!("parse {}: {e}", path.display()))
    }
}
