pub const FACE_MODEL_NAME: &str = "yolo11n-pose_widerface.onnx";
pub const FACE_MODEL_URL: &str =
    "https://github.com/neutrinographics/faceguard/releases/download/v0.1.0/yolo11n-pose_widerface.onnx";

/// Four-class skin condition classifier (acne, dark spots, pigmentation, wrinkles).
pub const SKIN_MODEL_NAME: &str = "skin_classifier.onnx";

/// Binary real/fake frame classifier.
pub const DEEPFAKE_MODEL_NAME: &str = "deepfake_detector.onnx";

/// Frames sampled per video clip for deepfake scoring.
pub const DEFAULT_FRAMES_PER_CLIP: usize = 10;

/// Square edge length frames and images are resized to before inference.
pub const DEFAULT_SAMPLE_SIZE: u32 = 224;

/// Mean fake probability above which a clip is labelled fake.
pub const DEFAULT_FAKE_THRESHOLD: f32 = 0.5;

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tiff", "tif", "webp"];
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "avi", "mov"];

/// Dataset layout used by evaluation: real clips and synthesized clips.
pub const REAL_CLIPS_DIR: &str = "Celeb-real";
pub const FAKE_CLIPS_DIR: &str = "Celeb-synthesis";

pub const REPORT_DIR_NAME: &str = "prescriptions";
pub const REPORT_PREFIX: &str = "AuraDerm";
