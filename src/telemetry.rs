use tracing::metadata::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Initialize tracing-subscriber.
/// Structured JSON output by default; human readable with the `local` feature.
pub fn init_tracing_subscriber() {
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();

    #[cfg(not(feature = "local"))]
    let fmt_layer = tracing_subscriber::fmt::layer().json().flatten_event(true).boxed();
    #[cfg(feature = "local")]
    let fmt_layer = tracing_subscriber::fmt::layer().with_thread_names(true).boxed();

    tracing_subscriber::registry().with(env_filter).with(fmt_layer).init();
}
