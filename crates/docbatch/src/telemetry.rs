//! Installation of the global tracing subscriber.

use std::sync::OnceLock;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{fmt, EnvFilter, Layer, Registry};

static LOGGER_INITIALIZED: OnceLock<bool> = OnceLock::new();

/// Installs a `fmt` subscriber (plain or JSON lines) filtered by `RUST_LOG`,
/// falling back to `default_filter`, and bridges `log` records into it.
///
/// Only the first call does anything. Returns whether a subscriber from this
/// crate is active; `false` means another global subscriber was already set.
pub fn init_logging(default_filter: &str, json: bool) -> bool {
    *LOGGER_INITIALIZED.get_or_init(|| install(default_filter, json))
}

fn install(default_filter: &str, json: bool) -> bool {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let layer: Box<dyn Layer<Registry> + Send + Sync> = if json {
        fmt::layer()
            .json()
            .with_target(true)
            .with_filter(filter)
            .boxed()
    } else {
        fmt::layer()
            .with_target(true)
            .with_thread_ids(true)
            .with_filter(filter)
            .boxed()
    };

    let subscriber = tracing_subscriber::registry().with(layer);
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        return false;
    }

    if let Err(e) = tracing_log::LogTracer::init() {
        tracing::debug!("log bridge not installed: {}", e);
    }

    tracing::debug!(json, "Logging initialized");
    true
}
