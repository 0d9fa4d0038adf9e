use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const CRATES: [&str; 4] = ["wobs_cli", "wobs_core", "wobs_sources", "wobs_sinks"];

/// Filter used when RUST_LOG is unset
pub fn default_filter(verbose: bool) -> String {
    if verbose {
        let mut filter = String::from("info");
        for krate in CRATES {
            filter.push_str(&format!(",{}=debug", krate));
        }
        filter
    } else {
        "info".to_string()
    }
}

/// Initialize logging.
/// - Writes to stderr; stdout carries the interactive report
/// - RUST_LOG respected; otherwise [`default_filter`]
/// - `WOBS_LOG_FORMAT=json` for JSON lines
pub fn init(service_name: &str, verbose: bool) {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| default_filter(verbose));
    let json = std::env::var("WOBS_LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json"));

    let registry = tracing_subscriber::registry().with(EnvFilter::new(filter));
    // A subscriber may already be installed (tests); keep it.
    let _ = if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
    } else {
        registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .try_init()
    };

    tracing::debug!(service = %service_name, verbose, "logging initialized");
}
