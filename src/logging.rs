//! Log output for the command line tools.

use std::io::IsTerminal;

use tracing::Level;
use tracing_subscriber::{
    EnvFilter, Registry,
    fmt::{layer, writer::MakeWriterExt},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

/// Installs the logger, filtered by `RUST_LOG` (default `info`).
///
/// Warnings and errors go to stderr, everything else to stdout. Messages
/// carry no timestamps or targets since child output is relayed through the
/// parent's logger.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let writer = std::io::stderr
        .with_max_level(Level::WARN)
        .or_else(std::io::stdout);

    let _ = Registry::default()
        .with(filter)
        .with(
            layer()
                .with_writer(writer)
                .with_ansi(std::io::stdout().is_terminal())
                .with_target(false)
                .without_time(),
        )
        .try_init();
}
