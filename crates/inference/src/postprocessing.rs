use crate::backend::Prediction;
use crate::labels::Labels;
use std::collections::HashMap;

/// Drop the qualifier after the first comma: `"tabby cat, tabby"` -> `"tabby cat"`.
pub fn clean_label(label: &str) -> &str {
    match label.find(',') {
        Some(idx) => &label[..idx],
        None => label,
    }
}

/// `0.8734` -> `"87.34%"`
pub fn format_probability(probability: f32) -> String {
    format!("{:.2}%", f64::from(probability) * 100.0)
}

/// Numerically stable softmax.
pub fn softmax(scores: &[f32]) -> Vec<f32> {
    let max = scores.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = scores.iter().map(|&s| (s - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}

/// Turn one score per label into a [`Prediction`].
///
/// Labels that appear more than once keep their highest probability, so the
/// top label always maps to its own score.
pub fn build_prediction(
    labels: &Labels,
    scores: &[f32],
    apply_softmax: bool,
) -> anyhow::Result<Prediction> {
    if scores.is_empty() {
        anyhow::bail!("model produced no scores");
    }
    if scores.len() != labels.len() {
        anyhow::bail!(
            "Score count mismatch: model produced {} scores for {} labels",
            scores.len(),
            labels.len()
        );
    }

    let probs = if apply_softmax {
        softmax(scores)
    } else {
        scores.to_vec()
    };

    let (top, _) = probs
        .iter()
        .enumerate()
        .filter(|(_, p)| !p.is_nan())
        .fold((0usize, f32::NEG_INFINITY), |best, (i, &p)| {
            if p > best.1 { (i, p) } else { best }
        });

    let mut class_label_probs = HashMap::with_capacity(labels.len());
    for (label, &p) in labels.iter().zip(&probs) {
        class_label_probs
            .entry(label.to_string())
            .and_modify(|existing: &mut f32| *existing = existing.max(p))
            .or_insert(p);
    }

    let class_label = labels
        .get(top)
        .ok_or_else(|| anyhow::anyhow!("no label for class index {top}"))?
        .to_string();

    Ok(Prediction {
        class_label,
        class_label_probs,
    })
}
