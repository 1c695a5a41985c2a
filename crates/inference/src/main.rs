use common::TelemetryGuard;
use inference::{
    ClassificationService, Classifier, ClassifierConfig, logging::setup_logging, picker,
    picker::PathPicker,
};
use tokio::io::BufReader;

#[cfg(feature = "ort-backend")]
use inference::backend::ort::OrtBackend as Backend;

#[cfg(not(feature = "ort-backend"))]
compile_error!("A backend feature must be enabled: 'ort-backend'");

/// Reads one image path per line on stdin and prints the prediction after
/// each. An empty line is a cancelled pick.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ClassifierConfig::from_env()?;

    let _telemetry = match config.otel_endpoint.as_deref() {
        Some(endpoint) => Some(TelemetryGuard::init(
            "classify",
            endpoint,
            config.environment,
        )?),
        None => {
            setup_logging(&config);
            None
        }
    };

    tracing::info!(
        config = ?config,
        "Loaded configuration"
    );

    tracing::info!("Loading classification model");
    let classifier = Classifier::<Backend>::load(&config);

    let (picker, requests) = picker::channel(1);
    let provider = tokio::spawn(PathPicker::new(BufReader::new(tokio::io::stdin())).serve(requests));

    let service = ClassificationService::new(classifier);
    let view = service
        .run(picker, config.pick_source, tokio::io::stdout())
        .await?;

    provider.await??;

    tracing::info!(final_text = view.text(), "Done");
    Ok(())
}
