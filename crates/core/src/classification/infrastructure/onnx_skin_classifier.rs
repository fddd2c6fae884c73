use std::path::Path;

use crate::classification::domain::skin_classifier::{SkinClassifier, SkinPrediction};
use crate::classification::domain::tensor::{frames_to_tensor, ChannelOrder, TensorLayout};
use crate::shared::constants::DEFAULT_SAMPLE_SIZE;
use crate::shared::frame::Frame;
use crate::shared::onnx_session::{input_dimension, load_session};

/// ResNet-style skin classifier exported to ONNX.
///
/// Expects a `[1, 3, H, W]` RGB input in [0, 1] and produces one logit per
/// skin condition.
pub struct OnnxSkinClassifier {
    session: ort::session::Session,
    input_width: u32,
    input_height: u32,
}

impl OnnxSkinClassifier {
    pub fn new(model_path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let session = load_session(model_path)?;
        let input_height = input_dimension(&session, 2).unwrap_or(DEFAULT_SAMPLE_SIZE);
        let input_width = input_dimension(&session, 3).unwrap_or(DEFAULT_SAMPLE_SIZE);
        log::debug!("Skin classifier input: {input_width}x{input_height}");
        Ok(Self {
            session,
            input_width,
            input_height,
        })
    }
}

impl SkinClassifier for OnnxSkinClassifier {
    fn classify(&mut self, image: &Frame) -> Result<SkinPrediction, Box<dyn std::error::Error>> {
        let resized = image
            .resize(self.input_width, self.input_height)
            .ok_or("Cannot resize image for classification")?;
        let tensor = frames_to_tensor(&[resized], TensorLayout::Nchw, ChannelOrder::Rgb)?;

        let input_value = ort::value::Tensor::from_array(tensor)?;
        let outputs = self.session.run(ort::inputs![input_value])?;
        if outputs.len() == 0 {
            return Err("Skin classifier produced no outputs".into());
        }
        let logits = outputs[0].try_extract_array::<f32>()?;
        let logits: Vec<f32> = logits.iter().copied().collect();

        SkinPrediction::from_logits(&logits).ok_or_else(|| {
            format!("Expected 4 class logits, model produced {}", logits.len()).into()
        })
    }
}
