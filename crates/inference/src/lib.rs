pub mod backend;
pub mod classifier;
pub mod config;
pub mod error;
pub mod labels;
pub mod logging;
pub mod picker;
pub mod pipeline;
pub mod postprocessing;
pub mod presentation;
pub mod service;
pub mod state;

// Re-export commonly used types for convenience
pub use backend::{ClassifierBackend, Prediction};
pub use classifier::{ClassificationResult, Classifier};
pub use config::{ClassifierConfig, ExecutionProvider};
pub use error::ClassifyError;
pub use pipeline::Pipeline;
pub use presentation::{PredictionView, display_text};
pub use service::ClassificationService;
