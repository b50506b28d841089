//! Minimal dotenv-style parser. Keys are matched structurally, not by
//! substring scan, so a commented-out `PUBMED_API_KEY` does not count as
//! configured.

use std::collections::HashMap;
use std::io;
use std::path::Path;

/// Parse a `KEY=VALUE` file. Blank lines and `#` comments are skipped,
/// `export ` prefixes are tolerated, and values may be wrapped in single or
/// double quotes.
pub fn parse(path: &Path) -> io::Result<HashMap<String, String>> {
    Ok(parse_str(&std::fs::read_to_string(path)?))
}

pub fn parse_str(content: &str) -> HashMap<String, String> {
    let mut vars = HashMap::new();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let line = line.strip_prefix("export ").unwrap_or(line);
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let key = key.trim();
        if key.is_empty() {
            continue;
        }
        let value = value.trim();
        let value = value
            .strip_prefix('"')
            .and_then(|v| v.strip_suffix('"'))
            .or_else(|| value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')))
            .unwrap_or(value);
        vars.insert(key.to_string(), value.to_string());
    }
    vars
}

/// Load `dir/.env` into the process environment. Variables already set in
/// the environment win; a missing file is not an error. Returns how many
/// variables were applied.
pub fn load_into_env(dir: &Path) -> io::Result<usize> {
    let path = dir.join(".env");
    if !path.exists() {
        return Ok(0);
    }
    let vars = parse(&path)?;
    let mut applied = 0;
    for (key, value) in vars {
        if std::env::var_os(&key).is_none() {
            std::env::set_var(&key, &value);
            applied += 1;
        }
    }
    Ok(applied)
}
