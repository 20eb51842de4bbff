use std::io::stderr;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt};

/// Initialize logging to stderr.
///
/// `RUST_LOG` takes precedence; otherwise `info`, or `debug` when `verbose` is set.
pub fn init(verbose: bool) -> Result<(), TryInitError> {
    let default_level = if verbose { "debug" } else { "info" };
    let format_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let subscriber_layer = tracing_subscriber::fmt::layer()
        .with_writer(stderr)
        .without_time()
        .with_target(false)
        .with_filter(format_filter);

    tracing_subscriber::registry()
        .with(subscriber_layer)
        .try_init()
}
