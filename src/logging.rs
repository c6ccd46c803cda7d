//! Logging initialization.
//!
//! Logs always go to stderr so they never mix with prompts or results on
//! stdout. `RUST_LOG` overrides the configured level.

use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

pub const DEFAULT_LOG_LEVEL: &str = "warn";

fn filter_directive(level: &str, env: Option<String>) -> String {
    env.filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| level.to_string())
}

pub fn init_logging(level: &str) -> Result<(), TryInitError> {
    let directive = filter_directive(level, std::env::var("RUST_LOG").ok());
    let filter = EnvFilter::new(directive);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .try_init()
}
