//! The six readiness checks. Every function is infallible: anything that
//! goes wrong inside a check becomes a `Fail` line in its section.

use super::{host_config, CheckSection, DoctorEnv};
use crate::infra::env_file;

/// Files a deployment is expected to carry next to the gateway.
pub const REQUIRED_FILES: [&str; 3] = [".env", "config.toml", "README.md"];

/// Keys the environment file must define for full-rate PubMed access.
pub const ENV_KEYS: [&str; 2] = ["PUBMED_API_KEY", "PUBMED_EMAIL"];

pub fn runtime_environment(env: &DoctorEnv) -> CheckSection {
    let mut s = CheckSection::new("🦀 Runtime Environment");
    s.push_info(format!("Gateway version: {}", env!("CARGO_PKG_VERSION")));
    match &env.exe {
        Some(path) => s.push_info(format!("Executable: {}", path.display())),
        None => s.push_fail("Executable path unavailable"),
    }
    // Dependency presence is a compile-time fact for a static binary; what
    // can still fail at runtime is TLS/client setup.
    s.push_pass("Tool dependencies are statically linked");
    match reqwest::Client::builder().build() {
        Ok(_) => s.push_pass("HTTP client (rustls) initializes"),
        Err(e) => s.push_fail(format!("HTTP client failed to initialize: {e}")),
    }
    s
}

pub fn file_structure(env: &DoctorEnv) -> CheckSection {
    let mut s = CheckSection::new("📁 File Structure");
    for name in REQUIRED_FILES {
        if env.root.join(name).exists() {
            s.push_pass(format!("{name} exists"));
        } else {
            s.push_fail(format!("{name} is missing"));
        }
    }
    s
}

pub fn env_configuration(env: &DoctorEnv) -> CheckSection {
    let mut s = CheckSection::new("🔧 Environment Configuration");
    let path = env.root.join(".env");
    if !path.exists() {
        s.push_fail(".env file is missing");
        return s;
    }
    s.push_pass(".env file exists");
    match env_file::parse(&path) {
        Ok(vars) => {
            for key in ENV_KEYS {
                match vars.get(key).filter(|v| !v.is_empty()) {
                    Some(_) => s.push_pass(format!("{key} is configured")),
                    None => s.push_fail(format!("{key} is not set")),
                }
            }
        }
        Err(e) => s.push_fail(format!("Error reading .env file: {e}")),
    }
    s
}

pub fn launch_probe(env: &DoctorEnv) -> CheckSection {
    let mut s = CheckSection::new("🚀 Server Launch Probe");
    let Some(exe) = &env.exe else {
        s.push_fail("No executable path to probe");
        return s;
    };
    match std::process::Command::new(exe).arg("--version").output() {
        Ok(out) if out.status.success() => {
            let version = String::from_utf8_lossy(&out.stdout).trim().to_string();
            s.push_pass(format!("Server binary launches ({version})"));
        }
        Ok(out) => {
            s.push_fail(format!("Server binary exited with {}", out.status));
            let stderr = String::from_utf8_lossy(&out.stderr);
            if !stderr.trim().is_empty() {
                s.push_info(stderr.trim_end().to_string());
            }
        }
        Err(e) => s.push_fail(format!("Error launching server binary: {e}")),
    }
    s
}

pub fn tool_registry() -> CheckSection {
    let mut s = CheckSection::new("📦 Tool Registry");
    match crate::tools::registry::build_registry_from_env() {
        Ok(reg) => {
            s.push_pass("PubmedService constructed");
            let metas = reg.list();
            s.push_pass(format!("{} tool(s) registered", metas.len()));
            for meta in metas {
                s.push_info(format!("  {} — {}", meta.name, meta.description));
            }
        }
        Err(e) => s.push_fail(format!("Error building tool registry: {e}")),
    }
    s
}

pub fn host_configuration(env: &DoctorEnv) -> CheckSection {
    let mut s = CheckSection::new("⚙️ Host Configuration");
    match &env.exe {
        Some(exe) => {
            let descriptor = host_config::launch_descriptor(exe);
            s.push_info("Host launch configuration for this gateway:");
            match serde_json::to_string_pretty(&descriptor) {
                Ok(rendered) => s.push_info(rendered),
                Err(e) => s.push_fail(format!("Error rendering launch descriptor: {e}")),
            }
        }
        None => s.push_fail("Executable path unavailable; cannot render launch descriptor"),
    }

    match &env.host_config_path {
        None => s.push_info("Host application config location unknown on this platform"),
        Some(path) => {
            s.push_info(format!("Host config file should be at: {}", path.display()));
            if !path.exists() {
                s.push_fail("Host config file not found");
                return s;
            }
            s.push_pass("Host config file exists");
            match host_config::server_registered(path, host_config::SERVER_NAME) {
                Ok(true) => s.push_pass("pubmed server is configured in the host application"),
                Ok(false) => s.push_fail("pubmed server not found in host config"),
                Err(e) => s.push_fail(format!("Error reading host config: {e}")),
            }
        }
    }
    s
}
