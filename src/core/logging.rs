use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::core::config::LogFormat;

fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "cost_tracker=debug,info"
    } else {
        "cost_tracker=info,warn"
    }
}

/// Install the global subscriber. Logs go to stderr; stdout carries the report.
/// `RUST_LOG` takes precedence over the verbosity default.
pub fn init(verbose: bool, format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

    let registry = tracing_subscriber::registry().with(filter);
    let result = match format {
        LogFormat::Text => registry
            .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
            .try_init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
    };

    if let Err(e) = result {
        eprintln!("Logging already initialized: {}", e);
    }
}
