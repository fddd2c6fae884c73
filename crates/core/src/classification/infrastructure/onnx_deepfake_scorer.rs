use std::path::Path;

use crate::classification::domain::deepfake::FrameScorer;
use crate::classification::domain::tensor::{frames_to_tensor, ChannelOrder, TensorLayout};
use crate::sampling::domain::frame_batch::FrameBatch;
use crate::shared::onnx_session::load_session;

/// Per-frame deepfake classifier with a sigmoid or two-class softmax head.
///
/// Frames are fed as one NHWC batch in BGR order, scaled to [0, 1].
pub struct OnnxDeepfakeScorer {
    session: ort::session::Session,
}

impl OnnxDeepfakeScorer {
    pub fn new(model_path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        Ok(Self {
            session: load_session(model_path)?,
        })
    }
}

impl FrameScorer for OnnxDeepfakeScorer {
    fn score(&mut self, batch: &FrameBatch) -> Result<Vec<f32>, Box<dyn std::error::Error>> {
        if batch.is_empty() {
            return Ok(Vec::new());
        }
        let tensor = frames_to_tensor(batch.frames(), TensorLayout::Nhwc, ChannelOrder::Bgr)?;

        let input_value = ort::value::Tensor::from_array(tensor)?;
        let outputs = self.session.run(ort::inputs![input_value])?;
        if outputs.len() == 0 {
            return Err("Deepfake model produced no outputs".into());
        }
        let scores = outputs[0].try_extract_array::<f32>()?;
        let shape = scores.shape().to_vec();
        let data: Vec<f32> = scores.iter().copied().collect();

        fake_scores(&data, &shape, batch.len())
    }
}

/// Extracts one fake probability per frame from the model output.
///
/// Sigmoid heads give `[N, 1]` or `[N]`; softmax heads give `[N, 2]`
/// with the fake class in column 1.
fn fake_scores(
    data: &[f32],
    shape: &[usize],
    frames: usize,
) -> Result<Vec<f32>, Box<dyn std::error::Error>> {
    match shape {
        [n] | [n, 1] if *n == frames => Ok(data.to_vec()),
        [n, 2] if *n == frames => Ok(data.chunks_exact(2).map(|row| row[1]).collect()),
        _ => Err(format!("Unexpected deepfake output shape {shape:?} for {frames} frames").into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sigmoid_column_output() {
        let scores = fake_scores(&[0.1, 0.9, 0.4], &[3, 1], 3).unwrap();
        assert_eq!(scores, vec![0.1, 0.9, 0.4]);
    }

    #[test]
    fn test_flat_output() {
        let scores = fake_scores(&[0.2, 0.3], &[2], 2).unwrap();
        assert_eq!(scores, vec![0.2, 0.3]);
    }

    #[test]
    fn test_softmax_output_uses_fake_column() {
        let scores = fake_scores(&[0.8, 0.2, 0.3, 0.7], &[2, 2], 2).unwrap();
        assert_eq!(scores, vec![0.2, 0.7]);
    }

    #[test]
    fn test_batch_mismatch_is_error() {
        assert!(fake_scores(&[0.5, 0.5], &[2, 1], 3).is_err());
        assert!(fake_scores(&[0.0; 6], &[2, 3], 2).is_err());
    }
}
