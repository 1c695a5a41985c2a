use preprocess::AllocationError;
use thiserror::Error;

/// Why a classification request produced no result.
///
/// Every variant leaves the displayed prediction unchanged.
#[derive(Error, Debug)]
pub enum ClassifyError {
    #[error("Model failed to load: {0:#}")]
    ModelLoad(anyhow::Error),

    #[error("Input buffer allocation failed: {0}")]
    Allocation(#[from] AllocationError),

    #[error("Inference failed: {0:#}")]
    Inference(anyhow::Error),

    #[error("No model loaded")]
    ModelUnavailable,
}

impl ClassifyError {
    /// Short stable name, used as a metric attribute.
    pub fn kind(&self) -> &'static str {
        match self {
            ClassifyError::ModelLoad(_) => "model_load",
            ClassifyError::Allocation(_) => "allocation",
            ClassifyError::Inference(_) => "inference",
            ClassifyError::ModelUnavailable => "model_unavailable",
        }
    }
}
