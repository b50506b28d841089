pub fn init() {
    // Initialize tracing subscriber once, honoring RUST_LOG if set.
    // Default to info level; allow override via RUST_LOG (e.g., "debug").
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .try_init();
}

/// Emit a metric both to the tracing stream and to the metrics recorder.
/// Counters end in `_total`; everything else is recorded as a histogram.
pub fn log_metric(tool: &str, metric: &str, value: f64) {
    tracing::info!(tool = tool, metric = metric, value = value, "metric");
    let key = format!("{tool}.{metric}");
    if metric.ends_with("_total") {
        metrics::counter!(key).increment(value as u64);
    } else {
        metrics::histogram!(key).record(value);
    }
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_is_idempotent() {
        super::init();
        super::init();
    }

    #[test]
    fn log_metric_accepts_counters_and_histograms() {
        super::log_metric("pubmed.search", "remote_error_total", 1.0);
        super::log_metric("pubmed.search", "remote_latency_ms", 12.5);
    }
}
