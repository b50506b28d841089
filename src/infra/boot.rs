use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use crate::infra::config::Config;
use crate::infra::env_file;
use crate::tools::pubmed::PubmedService;

pub async fn run_server(stdio_override: bool) -> anyhow::Result<()> {
    // Mirror the host's launch environment: `.env` in the working directory
    // is applied before any configuration is read.
    if let Err(e) = env_file::load_into_env(Path::new(".")) {
        tracing::warn!(error = %e, "failed to load .env");
    }

    let cfg = Config::from_env();
    tracing::info!(
        mode = %cfg.mode,
        port = cfg.port,
        rpc_shim = cfg.rpc_shim,
        "BOOT pubmed-mcp-gateway"
    );

    let service =
        Arc::new(PubmedService::from_env().map_err(|e| anyhow::anyhow!(e.to_string()))?);

    // Stdio mode: run MCP over stdin/stdout ONLY (no HTTP).
    if stdio_override || cfg.mode == "stdio" {
        let factory = {
            let service = service.clone();
            move || crate::tools::router::factory_with_service(service)
        };
        crate::infra::runtime::mcp_transport::serve_stdio(factory)
            .await
            .map_err(|e| anyhow::anyhow!(e))?;
        return Ok(());
    }

    let app = if cfg.rpc_shim {
        let registry = crate::tools::registry::build_registry(service.clone());
        crate::infra::http_app::build_app_with_rpc(service, registry)
    } else {
        crate::infra::http_app::build_app(service)
    };

    let addr: SocketAddr = ([0, 0, 0, 0], cfg.port).into();
    axum::serve(tokio::net::TcpListener::bind(addr).await?, app).await?;
    Ok(())
}
