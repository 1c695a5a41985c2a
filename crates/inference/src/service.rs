use crate::{
    backend::ClassifierBackend,
    classifier::{ClassificationResult, Classifier},
    error::ClassifyError,
    picker::{PickOutcome, PickSource, PickerHandle},
    pipeline::Pipeline,
    presentation::PredictionView,
};
use preprocess::SourceImage;
use std::sync::Arc;
use tokio::io::{AsyncWrite, AsyncWriteExt};

/// Drives picks through the pipeline one at a time and keeps the displayed
/// prediction up to date.
pub struct ClassificationService<B> {
    pipeline: Arc<Pipeline<B>>,
    view: PredictionView,
}

impl<B: ClassifierBackend + 'static> ClassificationService<B> {
    pub fn new(classifier: Classifier<B>) -> Self {
        Self {
            pipeline: Arc::new(Pipeline::new(classifier)),
            view: PredictionView::new(),
        }
    }

    pub fn view(&self) -> &PredictionView {
        &self.view
    }

    /// Serve picks from `source` until the picker shuts down, writing the
    /// prediction text after every picked image.
    pub async fn run<W>(
        mut self,
        picker: PickerHandle,
        source: PickSource,
        mut out: W,
    ) -> anyhow::Result<PredictionView>
    where
        W: AsyncWrite + Unpin,
    {
        tracing::info!(
            model_available = self.pipeline.classifier().is_available(),
            %source,
            "Classification service starting"
        );

        let mut picked = 0u64;
        let mut updated = 0u64;

        // Awaiting each request before the next pick keeps one request in flight
        while let Some(outcome) = picker.pick(source).await {
            let image = match outcome {
                PickOutcome::Picked(image) => image,
                PickOutcome::Cancelled => continue,
            };
            picked += 1;

            let outcome = self.submit(image).await;
            if self.view.apply(&outcome) {
                updated += 1;
            }

            out.write_all(self.view.text().as_bytes()).await?;
            out.write_all(b"\n").await?;
            out.flush().await?;
        }

        tracing::info!(picked, updated, "Classification service stopped");
        Ok(self.view)
    }

    /// Run one normalize -> classify unit on a blocking worker and hand the
    /// outcome back to the caller's task.
    pub async fn submit(&self, source: SourceImage) -> Result<ClassificationResult, ClassifyError> {
        let pipeline = Arc::clone(&self.pipeline);
        match tokio::task::spawn_blocking(move || pipeline.process(&source)).await {
            Ok(outcome) => outcome,
            Err(e) => Err(ClassifyError::Inference(anyhow::anyhow!(
                "classification worker failed: {e}"
            ))),
        }
    }
}
