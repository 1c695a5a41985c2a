use crate::{
    backend::ClassifierBackend,
    classifier::{ClassificationResult, Classifier},
    error::ClassifyError,
    state::{ClassificationRequest, RequestState},
};
use opentelemetry::{
    KeyValue, global,
    metrics::{Counter, Histogram},
};
use preprocess::{Normalizer, SourceImage};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

struct PipelineMetrics {
    duration: Histogram<f64>,
    completed: Counter<u64>,
    failed: Counter<u64>,
}

fn init_metrics(meter_name: &'static str) -> PipelineMetrics {
    let meter = global::meter(meter_name);
    let latency_buckets = [
        0.005, 0.01, 0.02, 0.03, 0.05, 0.075, 0.1, 0.15, 0.2, 0.3, 0.5, 1.0, 2.0,
    ];

    PipelineMetrics {
        duration: meter
            .f64_histogram("classification_duration_seconds")
            .with_description("Time to classify one image (normalize + infer)")
            .with_unit("s")
            .with_boundaries(latency_buckets.to_vec())
            .build(),
        completed: meter
            .u64_counter("classifications_total")
            .with_description("Total successful classifications")
            .build(),
        failed: meter
            .u64_counter("classification_failures_total")
            .with_description("Total classification requests that produced no result")
            .build(),
    }
}

/// One blocking normalize -> classify unit of work per image.
///
/// Shares nothing mutable between requests apart from the request counter.
pub struct Pipeline<B> {
    classifier: Classifier<B>,
    metrics: PipelineMetrics,
    next_request: AtomicU64,
}

impl<B: ClassifierBackend> Pipeline<B> {
    pub fn new(classifier: Classifier<B>) -> Self {
        Self {
            classifier,
            metrics: init_metrics("inference"),
            next_request: AtomicU64::new(1),
        }
    }

    pub fn classifier(&self) -> &Classifier<B> {
        &self.classifier
    }

    pub fn process(&self, source: &SourceImage) -> Result<ClassificationResult, ClassifyError> {
        let id = self.next_request.fetch_add(1, Ordering::Relaxed);
        let span = tracing::info_span!(
            "classification_request",
            request = id,
            width = source.width(),
            height = source.height()
        );
        let _enter = span.enter();

        let mut request = ClassificationRequest::new(id);
        let start = Instant::now();
        let outcome = self.run(&mut request, source);

        self.metrics
            .duration
            .record(start.elapsed().as_secs_f64(), &[]);

        match &outcome {
            Ok(result) => {
                self.metrics.completed.add(1, &[]);
                tracing::info!(
                    label = result.cleaned_label(),
                    probability = %result.formatted_probability(),
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Classification done"
                );
            }
            Err(e) => {
                self.metrics
                    .failed
                    .add(1, &[KeyValue::new("error", e.kind())]);
                tracing::warn!(error = %e, "Classification failed");
            }
        }

        outcome
    }

    fn run(
        &self,
        request: &mut ClassificationRequest,
        source: &SourceImage,
    ) -> Result<ClassificationResult, ClassifyError> {
        // No model: fail before spending time on normalization
        let Some(spec) = self.classifier.input_spec() else {
            request.advance(RequestState::Inferring);
            request.advance(RequestState::Failed);
            return Err(ClassifyError::ModelUnavailable);
        };

        request.advance(RequestState::Normalizing);
        let buffer = match Normalizer::new(spec).normalize(source) {
            Ok(buffer) => buffer,
            Err(e) => {
                request.advance(RequestState::Failed);
                return Err(e.into());
            }
        };

        request.advance(RequestState::Inferring);
        let outcome = {
            let _infer_span = tracing::info_span!("model_inference").entered();
            self.classifier.classify(&buffer)
        };

        request.advance(if outcome.is_ok() {
            RequestState::Done
        } else {
            RequestState::Failed
        });

        outcome
    }
}
