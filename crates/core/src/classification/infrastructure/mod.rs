pub mod onnx_deepfake_scorer;
pub mod onnx_skin_classifier;
