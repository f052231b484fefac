//! Logging setup for the CLI
//!
//! `RUST_LOG` is honored when set; otherwise debug builds log the library at
//! `debug` and release builds stay at `info`.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

pub fn setup_logging() {
    let default_filter = if cfg!(debug_assertions) {
        "info,route_select_lib=debug"
    } else {
        "info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(filter);
    let registry = tracing_subscriber::registry().with(fmt_layer);
    registry.init();

    tracing::debug!("Logging initialized");
}
