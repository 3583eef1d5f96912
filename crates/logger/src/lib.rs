use std::env::var;

use tracing::{level_filters::LevelFilter, warn};
use tracing_subscriber::{Layer, filter::EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize tracing at INFO unless `RUST_LOG` says otherwise.
pub fn init_tracing() {
    init_tracing_with(LevelFilter::INFO);
}

/// Initialize tracing with the given default level.
///
/// Log lines go to stderr. Stdout belongs to the availability report, so
/// anything that reads the report line by line never sees diagnostics.
///
/// Set `RUST_LOG_FORMAT=json` for JSON lines, anything else gives the
/// compact human format.
pub fn init_tracing_with(level: LevelFilter) {
    let env_filter = EnvFilter::builder().with_default_directive(level.into()).from_env_lossy();

    let log_format = var("RUST_LOG_FORMAT").unwrap_or_default();

    let log_layer = match log_format.as_str() {
        "json" => tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_filter(env_filter)
            .boxed(),
        _ => tracing_subscriber::fmt::layer()
            .compact()
            .without_time()
            .with_writer(std::io::stderr)
            .with_filter(env_filter)
            .boxed(),
    };

    if let Err(error) = tracing_subscriber::registry().with(log_layer).try_init() {
        warn!("Tracing subscriber already installed, keeping it: {error}");
    }
}
