use serde::Serialize;

use crate::classification::domain::skin_condition::SkinCondition;
use crate::shared::frame::Frame;

/// Assigns one of the known skin conditions to a face image.
pub trait SkinClassifier: Send {
    fn classify(&mut self, image: &Frame) -> Result<SkinPrediction, Box<dyn std::error::Error>>;
}

/// Classifier output: the winning condition plus per-class probabilities
/// in [`SkinCondition::ALL`] order.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SkinPrediction {
    pub condition: SkinCondition,
    pub probabilities: Vec<f32>,
}

impl SkinPrediction {
    /// Builds a prediction from raw logits. Returns `None` unless there is
    /// exactly one logit per condition.
    pub fn from_logits(logits: &[f32]) -> Option<Self> {
        if logits.len() != SkinCondition::ALL.len() {
            return None;
        }
        let probabilities = softmax(logits);
        let condition = SkinCondition::from_index(argmax(&probabilities)?)?;
        Some(Self {
            condition,
            probabilities,
        })
    }

    pub fn confidence(&self) -> f32 {
        self.probability(self.condition)
    }

    pub fn probability(&self, condition: SkinCondition) -> f32 {
        self.probabilities
            .get(condition.index())
            .copied()
            .unwrap_or(0.0)
    }

    /// Conditions paired with their probabilities, most likely first.
    pub fn ranked(&self) -> Vec<(SkinCondition, f32)> {
        let mut ranked: Vec<_> = SkinCondition::ALL
            .iter()
            .map(|&c| (c, self.probability(c)))
            .collect();
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        ranked
    }
}

/// Numerically stable softmax.
pub fn softmax(logits: &[f32]) -> Vec<f32> {
    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = logits.iter().map(|&x| (x - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    if sum == 0.0 || !sum.is_finite() {
        return vec![0.0; logits.len()];
    }
    exps.into_iter().map(|e| e / sum).collect()
}

/// Index of the largest value; the first one wins ties.
pub fn argmax(values: &[f32]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (i, &v) in values.iter().enumerate() {
        match best {
            Some((_, b)) if v <= b => {}
            _ => best = Some((i, v)),
        }
    }
    best.map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_softmax_sums_to_one() {
        let probs = softmax(&[1.0, 2.0, 3.0, 4.0]);
        assert_relative_eq!(probs.iter().sum::<f32>(), 1.0, epsilon = 1e-6);
        assert!(probs.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_softmax_large_logits_stable() {
        let probs = softmax(&[1000.0, 1000.0]);
        assert_relative_eq!(probs[0], 0.5, epsilon = 1e-6);
    }

    #[test]
    fn test_argmax_first_wins_ties() {
        assert_eq!(argmax(&[0.2, 0.4, 0.4]), Some(1));
        assert_eq!(argmax(&[]), None);
    }

    #[test]
    fn test_prediction_from_logits() {
        let pred = SkinPrediction::from_logits(&[0.1, 3.0, 0.2, -1.0]).unwrap();
        assert_eq!(pred.condition, SkinCondition::DarkSpots);
        assert!(pred.confidence() > 0.8);
        assert_eq!(pred.ranked()[0].0, SkinCondition::DarkSpots);
    }

    #[test]
    fn test_prediction_rejects_wrong_class_count() {
        assert!(SkinPrediction::from_logits(&[1.0, 2.0]).is_none());
    }
}
