//! Diagnostics go to stderr so rendered reports on stdout stay clean.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// Installs the global subscriber. `RUST_LOG` wins over the CLI flags.
pub fn init(verbose: u8, quiet: bool) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level(verbose, quiet)));

    let console_layer = fmt::layer()
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr);

    // A second init (tests, embedding) keeps the first subscriber.
    let _ = Registry::default()
        .with(env_filter)
        .with(console_layer)
        .try_init();
}

fn default_level(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        return "error";
    }
    match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}
