//! Launch-descriptor generation and inspection of the MCP host
//! application's own configuration file (Claude Desktop layout).

use serde_json::json;
use std::path::{Path, PathBuf};

/// Key the gateway registers under in the host's `mcpServers` table.
pub const SERVER_NAME: &str = "pubmed";

const HOST_CONFIG_FILE: &str = "claude_desktop_config.json";

/// The JSON block a host application needs to launch this gateway as a
/// stdio MCP server.
pub fn launch_descriptor(exe: &Path) -> serde_json::Value {
    json!({
        "mcpServers": {
            SERVER_NAME: {
                "command": exe.to_string_lossy(),
                "args": ["serve", "--stdio"],
                "env": { "RUST_LOG": "info" }
            }
        }
    })
}

/// Platform-specific location of the host application's config file.
/// Resolved from the environment only; `None` when the relevant variable is
/// unset.
pub fn default_path() -> Option<PathBuf> {
    if cfg!(target_os = "windows") {
        std::env::var_os("APPDATA")
            .map(|d| PathBuf::from(d).join("Claude").join(HOST_CONFIG_FILE))
    } else if cfg!(target_os = "macos") {
        std::env::var_os("HOME").map(|h| {
            PathBuf::from(h)
                .join("Library/Application Support/Claude")
                .join(HOST_CONFIG_FILE)
        })
    } else {
        std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))
            .map(|base| base.join("Claude").join(HOST_CONFIG_FILE))
    }
}

/// Whether `mcpServers.<name>` exists in the host config at `path`.
pub fn server_registered(path: &Path, name: &str) -> Result<bool, String> {
    let raw = std::fs::read_to_string(path).map_err(|e| e.to_string())?;
    let value: serde_json::Value = serde_json::from_str(&raw).map_err(|e| e.to_string())?;
    Ok(value
        .get("mcpServers")
        .and_then(|servers| servers.get(name))
        .is_some())
}
