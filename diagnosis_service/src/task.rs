use crate::model_service::ModelError;
use serde::Serialize;

pub const TUMOR_LABELS: [&str; 4] = [
    "glioma_tumor",
    "meningioma_tumor",
    "no_tumor",
    "pituitary_tumor",
];

pub const SKIN_LABELS: [&str; 2] = ["malignant", "benign"];

/// A classification problem served by its own model and label table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Task {
    Tumor,
    Skin,
}

impl Task {
    pub fn as_str(&self) -> &'static str {
        match self {
            Task::Tumor => "tumor",
            Task::Skin => "skin",
        }
    }

    /// Class names ordered by model output index.
    pub fn labels(&self) -> &'static [&'static str] {
        match self {
            Task::Tumor => &TUMOR_LABELS,
            Task::Skin => &SKIN_LABELS,
        }
    }

    /// Maps a score vector to the label of its highest score.
    pub fn resolve_label(&self, scores: &[f32]) -> Result<&'static str, ModelError> {
        let labels = self.labels();
        if scores.len() != labels.len() {
            return Err(ModelError::OutputShape {
                expected: labels.len(),
                actual: scores.len(),
            });
        }

        argmax(scores)
            .map(|index| labels[index])
            .ok_or(ModelError::EmptyOutput)
    }
}

/// Index of the largest score. Ties go to the earliest index and NaN never wins.
pub fn argmax(scores: &[f32]) -> Option<usize> {
    scores
        .iter()
        .copied()
        .enumerate()
        .filter(|(_, score)| !score.is_nan())
        .reduce(|best, candidate| if candidate.1 > best.1 { candidate } else { best })
        .map(|(index, _)| index)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argmax_picks_first_of_equal_maxima() {
        assert_eq!(argmax(&[0.1, 0.7, 0.2, 0.7]), Some(1));
        assert_eq!(argmax(&[0.25, 0.25, 0.25, 0.25]), Some(0));
    }

    #[test]
    fn test_argmax_skips_nan() {
        assert_eq!(argmax(&[f32::NAN, 0.3, 0.9]), Some(2));
        assert_eq!(argmax(&[f32::NAN, f32::NAN]), None);
        assert_eq!(argmax(&[]), None);
    }

    #[test]
    fn test_resolve_label() {
        assert_eq!(
            Task::Tumor.resolve_label(&[0.05, 0.1, 0.05, 0.8]).unwrap(),
            "pituitary_tumor"
        );
        assert_eq!(Task::Skin.resolve_label(&[0.9, 0.1]).unwrap(), "malignant");
        assert_eq!(Task::Skin.resolve_label(&[0.4, 0.6]).unwrap(), "benign");
    }

    #[test]
    fn test_resolve_label_rejects_mismatched_output() {
        let err = Task::Skin.resolve_label(&[0.9]).unwrap_err();
        assert!(matches!(
            err,
            ModelError::OutputShape {
                expected: 2,
                actual: 1
            }
        ));
    }

    #[test]
    fn test_resolve_label_all_nan_is_empty_output() {
        let err = Task::Skin.resolve_label(&[f32::NAN, f32::NAN]).unwrap_err();
        assert!(matches!(err, ModelError::EmptyOutput));
    }
}
