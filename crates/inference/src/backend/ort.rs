use super::{ClassifierBackend, Prediction};
use crate::config::{ClassifierConfig, ExecutionProvider};
use crate::labels::Labels;
use crate::postprocessing::build_prediction;
use ort::{
    session::{Session, builder::GraphOptimizationLevel},
    value::TensorRef,
};
use preprocess::{IMAGENET_MEAN, IMAGENET_STD, InputSpec, ModelInputBuffer};
use std::sync::Mutex;

/// ONNX Runtime classifier taking a `[1, 3, H, W]` ImageNet-normalized
/// tensor and producing one score per label.
pub struct OrtBackend {
    // ort needs `&mut Session` to run
    session: Mutex<Session>,
    labels: Labels,
    input_spec: InputSpec,
    apply_softmax: bool,
}

impl OrtBackend {
    /// Load model with specified execution provider
    pub fn load_model_with_provider(
        config: &ClassifierConfig,
        provider: ExecutionProvider,
    ) -> anyhow::Result<Self> {
        let labels = Labels::from_file(&config.labels_path)?;

        // Initialize ORT environment (idempotent)
        let _ = ort::init().commit();

        let mut builder = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .with_intra_threads(config.intra_threads)?;

        match provider {
            ExecutionProvider::Cuda => {
                tracing::info!("Initializing ONNX Runtime with CUDA execution provider");
                builder = builder.with_execution_providers([
                    ort::execution_providers::CUDAExecutionProvider::default()
                        .with_device_id(0)
                        .build()
                        .error_on_failure(),
                ])?;
            }
            ExecutionProvider::Cpu => {
                tracing::info!("Initializing ONNX Runtime with CPU execution provider");
            }
        }

        let session = builder.commit_from_file(&config.model_path)?;

        tracing::info!(
            model_path = %config.model_path,
            labels = labels.len(),
            input = %config.input_spec,
            "Model loaded"
        );

        Ok(Self {
            session: Mutex::new(session),
            labels,
            input_spec: config.input_spec,
            apply_softmax: config.apply_softmax,
        })
    }
}

impl ClassifierBackend for OrtBackend {
    fn load_model(config: &ClassifierConfig) -> anyhow::Result<Self> {
        Self::load_model_with_provider(config, config.execution_provider)
    }

    fn input_spec(&self) -> InputSpec {
        self.input_spec
    }

    fn predict(&self, input: &ModelInputBuffer) -> anyhow::Result<Prediction> {
        let images = input.to_nchw_tensor(IMAGENET_MEAN, IMAGENET_STD)?;

        let scores: Vec<f32> = {
            let mut session = self
                .session
                .lock()
                .map_err(|_| anyhow::anyhow!("ONNX session lock poisoned"))?;

            let outputs =
                session.run(ort::inputs![TensorRef::from_array_view(images.view())?])?;

            outputs[0].try_extract_array::<f32>()?.iter().copied().collect()
        };

        tracing::trace!(scores = scores.len(), "Model produced scores");

        build_prediction(&self.labels, &scores, self.apply_softmax)
    }
}
