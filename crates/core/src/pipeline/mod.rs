pub mod analyze_skin_use_case;
pub mod detect_deepfake_use_case;
pub mod evaluate_detector_use_case;
pub mod pipeline_logger;
