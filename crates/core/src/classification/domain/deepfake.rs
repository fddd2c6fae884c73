use std::fmt;

use serde::Serialize;

use crate::sampling::domain::frame_batch::FrameBatch;

/// Scores each sampled frame with the probability that it is synthetic.
pub trait FrameScorer: Send {
    /// Returns one score in [0, 1] per frame, in batch order.
    fn score(&mut self, batch: &FrameBatch) -> Result<Vec<f32>, Box<dyn std::error::Error>>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum DeepfakeLabel {
    Real,
    Fake,
}

impl fmt::Display for DeepfakeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeepfakeLabel::Real => f.write_str("Real"),
            DeepfakeLabel::Fake => f.write_str("Fake"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DeepfakeVerdict {
    pub label: DeepfakeLabel,
    pub confidence: f32,
    pub mean_score: f32,
    pub frames_used: usize,
}

impl DeepfakeVerdict {
    /// Averages per-frame scores into a clip-level verdict.
    ///
    /// A clip is `Fake` when the mean score is strictly above `threshold`.
    /// Confidence is the mean for fakes and its complement for real clips.
    /// Returns `None` when there are no scores to average.
    pub fn from_scores(scores: &[f32], threshold: f32) -> Option<Self> {
        if scores.is_empty() {
            return None;
        }
        let mean_score = scores.iter().sum::<f32>() / scores.len() as f32;
        let (label, confidence) = if mean_score > threshold {
            (DeepfakeLabel::Fake, mean_score)
        } else {
            (DeepfakeLabel::Real, 1.0 - mean_score)
        };
        Some(Self {
            label,
            confidence,
            mean_score,
            frames_used: scores.len(),
        })
    }

    pub fn is_fake(&self) -> bool {
        self.label == DeepfakeLabel::Fake
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[test]
    fn test_empty_scores_give_no_verdict() {
        assert!(DeepfakeVerdict::from_scores(&[], 0.5).is_none());
    }

    #[test]
    fn test_fake_when_mean_above_threshold() {
        let v = DeepfakeVerdict::from_scores(&[0.9, 0.7, 0.8], 0.5).unwrap();
        assert_eq!(v.label, DeepfakeLabel::Fake);
        assert_relative_eq!(v.mean_score, 0.8, epsilon = 1e-6);
        assert_relative_eq!(v.confidence, 0.8, epsilon = 1e-6);
        assert_eq!(v.frames_used, 3);
        assert!(v.is_fake());
    }

    #[test]
    fn test_real_confidence_is_complement() {
        let v = DeepfakeVerdict::from_scores(&[0.1, 0.3], 0.5).unwrap();
        assert_eq!(v.label, DeepfakeLabel::Real);
        assert_relative_eq!(v.confidence, 0.8, epsilon = 1e-6);
    }

    #[rstest]
    #[case(0.5, DeepfakeLabel::Real)]
    #[case(0.5001, DeepfakeLabel::Fake)]
    fn test_threshold_is_strict(#[case] score: f32, #[case] expected: DeepfakeLabel) {
        let v = DeepfakeVerdict::from_scores(&[score], 0.5).unwrap();
        assert_eq!(v.label, expected);
    }

    #[test]
    fn test_label_display() {
        assert_eq!(DeepfakeLabel::Fake.to_string(), "Fake");
        assert_eq!(DeepfakeLabel::Real.to_string(), "Real");
    }
}
