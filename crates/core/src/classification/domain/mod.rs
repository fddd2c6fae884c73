pub mod deepfake;
pub mod skin_classifier;
pub mod skin_condition;
pub mod tensor;
