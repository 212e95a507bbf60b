//! Subscriber setup.

use opentelemetry::trace::TracerProvider as _;
use opentelemetry_sdk::resource::Resource;
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use super::tracer;
use crate::infrastructure::paths;
use crate::Config;

const SERVICE_NAME: &str = "chordsource";

/// Installs the global subscriber: an `EnvFilter` at `config.trace_level`
/// feeding an OpenTelemetry layer that exports to the data directory.
///
/// Observability is optional. If the data directory cannot be created the
/// function returns without installing anything, and a second call after a
/// successful one is a no-op.
///
/// # Example
///
/// ```no_run
/// use chordsource::observability::init_tracing;
/// use chordsource::Config;
///
/// init_tracing(&Config {
///     trace_level: "debug".to_string(),
///     ..Config::default()
/// });
/// tracing::debug!("tracing is now active");
/// ```
pub fn init_tracing(config: &Config) {
    if std::fs::create_dir_all(paths::get_data_dir()).is_err() {
        return;
    }

    let resource = Resource::new(vec![opentelemetry::KeyValue::new(
        "service.name",
        SERVICE_NAME,
    )]);
    let provider = tracer::create_tracer_provider(paths::otlp_export_path(), resource);
    let otel_layer = OpenTelemetryLayer::new(provider.tracer(SERVICE_NAME));

    let filter = EnvFilter::try_new(&config.trace_level).unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(otel_layer)
        .try_init();
}
