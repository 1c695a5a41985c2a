use crate::config::Environment;
use tracing_subscriber::{Layer, Registry, layer::SubscriberExt, util::SubscriberInitExt};

pub(crate) type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

/// Initialize tracing subscriber with pretty formatting for development
/// and JSON formatting for production.
///
/// Uses RUST_LOG environment variable for filtering (defaults to "info" if not set).
///
/// Also adds an OpenTelemetry layer that exports traces if a global tracer provider
/// has been initialized.
pub fn setup_logging(environment: Environment) {
    install(environment, tracing_opentelemetry::layer().boxed());
}

/// Install the global subscriber with the given OpenTelemetry layer.
///
/// Does nothing if a global subscriber is already set, so tests and
/// binaries can call it more than once.
pub(crate) fn install(environment: Environment, otel_layer: BoxedLayer) {
    let env_filter =
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());

    let registry = tracing_subscriber::registry()
        .with(otel_layer)
        .with(env_filter);

    let result = match environment {
        Environment::Production => registry
            .with(tracing_subscriber::fmt::layer().json().with_level(true))
            .try_init(),
        Environment::Development => registry
            .with(tracing_subscriber::fmt::layer().pretty().with_ansi(true))
            .try_init(),
    };

    if let Err(e) = result {
        tracing::debug!(error = %e, "Global subscriber already installed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setup_logging_is_idempotent() {
        setup_logging(Environment::Development);
        setup_logging(Environment::Production);
        tracing::info!("still logging after second setup");
    }
}
