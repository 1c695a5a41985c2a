use crate::picker::PickSource;
use common::{env_flag, env_or, env_parse};
use preprocess::{DEFAULT_INPUT_SIZE, InputSpec, PixelFormat};
use std::env;
use std::fmt;
use std::str::FromStr;

pub use common::Environment;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionProvider {
    #[default]
    Cpu,
    Cuda,
}

impl FromStr for ExecutionProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cpu" => Ok(ExecutionProvider::Cpu),
            "cuda" | "gpu" => Ok(ExecutionProvider::Cuda),
            other => Err(format!("unknown execution provider: {other}")),
        }
    }
}

impl fmt::Display for ExecutionProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionProvider::Cpu => f.write_str("cpu"),
            ExecutionProvider::Cuda => f.write_str("cuda"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    pub environment: Environment,
    pub model_path: String,
    pub labels_path: String,
    pub input_spec: InputSpec,
    pub apply_softmax: bool,
    pub intra_threads: usize,
    pub execution_provider: ExecutionProvider,
    pub pick_source: PickSource,
    pub otel_endpoint: Option<String>,
}

impl ClassifierConfig {
    /// Load configuration from environment variables with sensible defaults
    pub fn from_env() -> anyhow::Result<Self> {
        let environment = Environment::from_env();

        let model_path = env_or("MODEL_PATH", "models/resnet50-v2-7.onnx");
        let labels_path = env_or("LABELS_PATH", "models/imagenet_labels.txt");

        let input_width = env_parse("INPUT_WIDTH", DEFAULT_INPUT_SIZE.0);
        let input_height = env_parse("INPUT_HEIGHT", DEFAULT_INPUT_SIZE.1);
        if input_width == 0 || input_height == 0 {
            anyhow::bail!("INPUT_WIDTH and INPUT_HEIGHT must be non-zero");
        }

        let pixel_format = env_or("PIXEL_FORMAT", "argb32")
            .parse::<PixelFormat>()
            .map_err(anyhow::Error::msg)?;

        let execution_provider = env_or("EXECUTION_PROVIDER", "cpu")
            .parse::<ExecutionProvider>()
            .map_err(anyhow::Error::msg)?;

        let pick_source = env_or("PICK_SOURCE", "library")
            .parse::<PickSource>()
            .map_err(anyhow::Error::msg)?;

        let otel_endpoint = env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
            .ok()
            .filter(|s| !s.trim().is_empty());

        Ok(Self {
            environment,
            model_path,
            labels_path,
            input_spec: InputSpec::new(input_width, input_height, pixel_format),
            apply_softmax: env_flag("APPLY_SOFTMAX", true),
            intra_threads: env_parse("INTRA_THREADS", 4),
            execution_provider,
            pick_source,
            otel_endpoint,
        })
    }

    /// Create default configuration for testing
    #[cfg(test)]
    pub fn test_default() -> Self {
        Self {
            environment: Environment::Development,
            model_path: "/models/resnet50.onnx".to_string(),
            labels_path: "/models/labels.txt".to_string(),
            input_spec: InputSpec::default(),
            apply_softmax: true,
            intra_threads: 1,
            execution_provider: ExecutionProvider::Cpu,
            pick_source: PickSource::Library,
            otel_endpoint: None,
        }
    }
}
