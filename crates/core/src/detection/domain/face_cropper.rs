use crate::detection::domain::face_detector::FaceDetector;
use crate::shared::frame::Frame;
use crate::shared::region::Region;

/// Result of [`FaceCropper::crop`].
#[derive(Clone, Debug)]
pub struct FaceCrop {
    pub frame: Frame,
    /// The region that was cropped, or `None` when the input came back as is.
    pub region: Option<Region>,
}

impl FaceCrop {
    pub fn face_found(&self) -> bool {
        self.region.is_some()
    }
}

/// Crops an image down to its first detected face.
///
/// When no face is found, or the best box falls outside the image, the
/// original image is returned so analysis can still run on it.
pub struct FaceCropper {
    detector: Box<dyn FaceDetector>,
}

impl FaceCropper {
    pub fn new(detector: Box<dyn FaceDetector>) -> Self {
        Self { detector }
    }

    pub fn crop(&mut self, image: Frame) -> Result<FaceCrop, Box<dyn std::error::Error>> {
        let regions = self.detector.detect(&image)?;

        let Some(first) = regions.first() else {
            log::info!("No face detected; analysing the full image");
            return Ok(FaceCrop {
                frame: image,
                region: None,
            });
        };

        match image.crop(first) {
            Some(face) => {
                log::debug!(
                    "Cropped face at ({}, {}) {}x{} (confidence {:.2})",
                    first.x,
                    first.y,
                    first.width,
                    first.height,
                    first.confidence
                );
                Ok(FaceCrop {
                    frame: face,
                    region: first.clamp(image.width(), image.height()),
                })
            }
            None => {
                log::info!("Detected face lies outside the image; analysing the full image");
                Ok(FaceCrop {
                    frame: image,
                    region: None,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    struct StubDetector {
        regions: Vec<Region>,
        calls: Arc<Mutex<usize>>,
    }

    impl StubDetector {
        fn new(regions: Vec<Region>) -> Self {
            Self {
                regions,
                calls: Arc::new(Mutex::new(0)),
            }
        }
    }

    impl FaceDetector for StubDetector {
        fn detect(&mut self, _frame: &Frame) -> Result<Vec<Region>, Box<dyn std::error::Error>> {
            *self.calls.lock().unwrap() += 1;
            Ok(self.regions.clone())
        }
    }

    struct FailingDetector;

    impl FaceDetector for FailingDetector {
        fn detect(&mut self, _frame: &Frame) -> Result<Vec<Region>, Box<dyn std::error::Error>> {
            Err("model exploded".into())
        }
    }

    fn image(w: u32, h: u32) -> Frame {
        Frame::new(vec![90; (w * h * 3) as usize], w, h, 3, 0)
    }

    #[test]
    fn test_crops_first_region() {
        let detector = StubDetector::new(vec![
            Region::new(10, 20, 30, 40, 0.9),
            Region::new(50, 50, 10, 10, 0.6),
        ]);
        let calls = detector.calls.clone();
        let mut cropper = FaceCropper::new(Box::new(detector));

        let crop = cropper.crop(image(100, 100)).unwrap();

        assert!(crop.face_found());
        assert_eq!((crop.frame.width(), crop.frame.height()), (30, 40));
        assert_eq!(crop.region, Some(Region::new(10, 20, 30, 40, 0.9)));
        assert_eq!(*calls.lock().unwrap(), 1);
    }

    #[test]
    fn test_no_face_returns_original() {
        let mut cropper = FaceCropper::new(Box::new(StubDetector::new(vec![])));
        let crop = cropper.crop(image(80, 60)).unwrap();

        assert!(!crop.face_found());
        assert_eq!((crop.frame.width(), crop.frame.height()), (80, 60));
    }

    #[test]
    fn test_region_is_clamped_to_image() {
        let mut cropper = FaceCropper::new(Box::new(StubDetector::new(vec![Region::new(
            -10, 70, 50, 50, 0.8,
        )])));
        let crop = cropper.crop(image(100, 100)).unwrap();

        assert_eq!(crop.region, Some(Region::new(0, 70, 40, 30, 0.8)));
        assert_eq!((crop.frame.width(), crop.frame.height()), (40, 30));
    }

    #[test]
    fn test_region_outside_image_returns_original() {
        let mut cropper = FaceCropper::new(Box::new(StubDetector::new(vec![Region::new(
            500, 500, 20, 20, 0.8,
        )])));
        let crop = cropper.crop(image(100, 100)).unwrap();

        assert!(!crop.face_found());
        assert_eq!(crop.frame.width(), 100);
    }

    #[test]
    fn test_detector_error_propagates() {
        let mut cropper = FaceCropper::new(Box::new(FailingDetector));
        assert!(cropper.crop(image(10, 10)).is_err());
    }
}
