use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Longest RUST_LOG value we are willing to parse
const MAX_FILTER_LEN: usize = 4096;

const FALLBACK_DIRECTIVE: &str = "warn";

/// Pick the filter directive: a usable RUST_LOG wins over the configured
/// level, and an unusable configured level falls back to `warn`.
pub fn resolve_directive(env_value: Option<&str>, configured: &str) -> String {
    let usable = |raw: &str| {
        let raw = raw.trim();
        !raw.is_empty() && raw.len() <= MAX_FILTER_LEN && EnvFilter::try_new(raw).is_ok()
    };
    match env_value {
        Some(raw) if usable(raw) => raw.trim().to_string(),
        _ if usable(configured) => configured.trim().to_string(),
        _ => FALLBACK_DIRECTIVE.to_string(),
    }
}

/// Install the stderr subscriber. Later calls are ignored.
pub fn init_logging(configured: &str) {
    let env_value = std::env::var("RUST_LOG").ok();
    let directive = resolve_directive(env_value.as_deref(), configured);
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new(FALLBACK_DIRECTIVE));
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .try_init();
}
