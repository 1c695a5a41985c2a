use crate::backend::ClassifierBackend;
use crate::config::ClassifierConfig;
use crate::error::ClassifyError;
use crate::postprocessing::{clean_label, format_probability};
use preprocess::{InputSpec, ModelInputBuffer};

/// Outcome of one successful inference.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationResult {
    raw_label: String,
    cleaned_label: String,
    probability: f32,
}

impl ClassificationResult {
    /// Clamps `probability` into [0, 1]; NaN becomes 0.
    pub fn new(raw_label: impl Into<String>, probability: f32) -> Self {
        let raw_label = raw_label.into();
        let cleaned_label = clean_label(&raw_label).to_string();
        let probability = if probability.is_nan() {
            0.0
        } else {
            probability.clamp(0.0, 1.0)
        };

        Self {
            raw_label,
            cleaned_label,
            probability,
        }
    }

    pub fn raw_label(&self) -> &str {
        &self.raw_label
    }

    pub fn cleaned_label(&self) -> &str {
        &self.cleaned_label
    }

    pub fn probability(&self) -> f32 {
        self.probability
    }

    pub fn formatted_probability(&self) -> String {
        format_probability(self.probability)
    }
}

/// Holds the model handle, or nothing if it failed to load.
pub struct Classifier<B> {
    model: Option<B>,
}

impl<B: ClassifierBackend> Classifier<B> {
    pub fn new(model: B) -> Self {
        Self { model: Some(model) }
    }

    /// A classifier whose every request fails with `ModelUnavailable`.
    pub fn unavailable() -> Self {
        Self { model: None }
    }

    pub fn try_load(config: &ClassifierConfig) -> Result<Self, ClassifyError> {
        B::load_model(config)
            .map(Self::new)
            .map_err(ClassifyError::ModelLoad)
    }

    /// Load the model once. A failure is logged and leaves the classifier
    /// unavailable for the rest of the run.
    pub fn load(config: &ClassifierConfig) -> Self {
        match Self::try_load(config) {
            Ok(classifier) => classifier,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    model_path = %config.model_path,
                    "Classification disabled"
                );
                Self::unavailable()
            }
        }
    }

    pub fn is_available(&self) -> bool {
        self.model.is_some()
    }

    pub fn input_spec(&self) -> Option<InputSpec> {
        self.model.as_ref().map(B::input_spec)
    }

    #[tracing::instrument(skip_all, fields(width = input.width(), height = input.height()))]
    pub fn classify(&self, input: &ModelInputBuffer) -> Result<ClassificationResult, ClassifyError> {
        let model = self.model.as_ref().ok_or(ClassifyError::ModelUnavailable)?;

        let expected = model.input_spec();
        if input.spec() != expected {
            return Err(ClassifyError::Inference(anyhow::anyhow!(
                "input is {} but model expects {}",
                input.spec(),
                expected
            )));
        }

        let prediction = model.predict(input).map_err(ClassifyError::Inference)?;

        let probability = prediction
            .class_label_probs
            .get(&prediction.class_label)
            .copied()
            .unwrap_or(0.0);

        let result = ClassificationResult::new(prediction.class_label, probability);

        tracing::debug!(
            label = result.cleaned_label(),
            probability = result.probability(),
            "Classified"
        );

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::Prediction;
    use preprocess::PixelFormat;
    use std::collections::HashMap;

    struct FixedBackend {
        label: &'static str,
        probs: Vec<(&'static str, f32)>,
    }

    impl ClassifierBackend for FixedBackend {
        fn load_model(_: &ClassifierConfig) -> anyhow::Result<Self> {
            anyhow::bail!("model file missing")
        }

        fn input_spec(&self) -> InputSpec {
            InputSpec::default()
        }

        fn predict(&self, _: &ModelInputBuffer) -> anyhow::Result<Prediction> {
            Ok(Prediction {
                class_label: self.label.to_string(),
                class_label_probs: self
                    .probs
                    .iter()
                    .map(|(l, p)| (l.to_string(), *p))
                    .collect::<HashMap<_, _>>(),
            })
        }
    }

    fn input() -> ModelInputBuffer {
        ModelInputBuffer::allocate(224, 224, PixelFormat::Argb32).unwrap()
    }

    #[test]
    fn test_goldfish() {
        let classifier = Classifier::new(FixedBackend {
            label: "goldfish, Carassius auratus",
            probs: vec![("goldfish, Carassius auratus", 0.9123)],
        });

        let result = classifier.classify(&input()).unwrap();
        assert_eq!(result.raw_label(), "goldfish, Carassius auratus");
        assert_eq!(result.cleaned_label(), "goldfish");
        assert_eq!(result.formatted_probability(), "91.23%");
    }

    #[test]
    fn test_missing_probability_defaults_to_zero() {
        let classifier = Classifier::new(FixedBackend {
            label: "mug",
            probs: vec![("cup", 0.4)],
        });

        let result = classifier.classify(&input()).unwrap();
        assert_eq!(result.probability(), 0.0);
        assert_eq!(result.formatted_probability(), "0.00%");
    }

    #[test]
    fn test_probability_is_clamped() {
        assert_eq!(ClassificationResult::new("a", 1.7).probability(), 1.0);
        assert_eq!(ClassificationResult::new("a", -0.2).probability(), 0.0);
        assert_eq!(ClassificationResult::new("a", f32::NAN).probability(), 0.0);
    }

    #[test]
    fn test_unavailable_model() {
        let classifier = Classifier::<FixedBackend>::unavailable();
        assert!(!classifier.is_available());
        assert!(classifier.input_spec().is_none());
        assert!(matches!(
            classifier.classify(&input()),
            Err(ClassifyError::ModelUnavailable)
        ));
    }

    #[test]
    fn test_failed_load_leaves_classifier_unavailable() {
        let config = ClassifierConfig::test_default();

        assert!(matches!(
            Classifier::<FixedBackend>::try_load(&config),
            Err(ClassifyError::ModelLoad(_))
        ));

        let classifier = Classifier::<FixedBackend>::load(&config);
        assert!(!classifier.is_available());
        assert!(matches!(
            classifier.classify(&input()),
            Err(ClassifyError::ModelUnavailable)
        ));
    }

    #[test]
    fn test_mismatched_input_is_rejected() {
        let classifier = Classifier::new(FixedBackend {
            label: "mug",
            probs: vec![("mug", 0.5)],
        });

        let wrong_size = ModelInputBuffer::allocate(112, 112, PixelFormat::Argb32).unwrap();
        let wrong_format = ModelInputBuffer::allocate(224, 224, PixelFormat::Bgra32).unwrap();

        for buffer in [wrong_size, wrong_format] {
            let err = classifier.classify(&buffer).unwrap_err();
            assert!(matches!(err, ClassifyError::Inference(_)));
            assert!(err.to_string().contains("model expects 224x224 argb32"));
        }
    }
}
