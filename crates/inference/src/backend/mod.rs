use crate::config::ClassifierConfig;
use preprocess::{InputSpec, ModelInputBuffer};
use std::collections::HashMap;

#[cfg(feature = "ort-backend")]
pub mod ort;

/// A loaded image classifier.
///
/// Handles are immutable once loaded and shared read-only across requests.
pub trait ClassifierBackend: Send + Sync {
    fn load_model(config: &ClassifierConfig) -> anyhow::Result<Self>
    where
        Self: Sized;

    /// Shape and pixel format `predict` accepts.
    fn input_spec(&self) -> InputSpec;

    /// Run one forward pass on the calling thread.
    fn predict(&self, input: &ModelInputBuffer) -> anyhow::Result<Prediction>;
}

/// Raw classifier output.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    /// Most likely label, possibly with a comma-separated qualifier.
    pub class_label: String,
    pub class_label_probs: HashMap<String, f32>,
}
