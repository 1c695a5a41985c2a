use crate::classifier::ClassificationResult;
use crate::error::ClassifyError;

pub const PLACEHOLDER_TEXT: &str = "I think this is a ...";

pub fn display_text(result: &ClassificationResult) -> String {
    format!(
        "I think this is a {} with probability {}.",
        result.cleaned_label(),
        result.formatted_probability()
    )
}

/// The text shown under the photo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredictionView {
    text: String,
}

impl PredictionView {
    pub fn new() -> Self {
        Self {
            text: PLACEHOLDER_TEXT.to_string(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Show a successful result. Failures keep the previous text.
    /// Returns whether the text changed.
    pub fn apply(&mut self, outcome: &Result<ClassificationResult, ClassifyError>) -> bool {
        match outcome {
            Ok(result) => {
                self.text = display_text(result);
                true
            }
            Err(_) => false,
        }
    }
}

impl Default for PredictionView {
    fn default() -> Self {
        Self::new()
    }
}
