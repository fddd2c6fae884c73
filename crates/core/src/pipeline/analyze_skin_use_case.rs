use std::path::Path;

use serde::Serialize;

use crate::advice::domain::recommendation::{Recommendation, RecommendationCatalog};
use crate::classification::domain::skin_classifier::{SkinClassifier, SkinPrediction};
use crate::detection::domain::face_cropper::FaceCropper;
use crate::report::domain::analysis_report::AnalysisReport;
use crate::video::domain::image_reader::ImageReader;

#[derive(Clone, Debug, Serialize)]
pub struct SkinAnalysis {
    pub prediction: SkinPrediction,
    pub recommendation: Recommendation,
    /// Whether a face was found and cropped before classification.
    pub face_found: bool,
}

impl SkinAnalysis {
    pub fn into_report(self, user: &str) -> AnalysisReport {
        AnalysisReport::new(user, self.prediction.condition, self.recommendation)
            .with_probabilities(self.prediction.ranked())
    }
}

/// Single-image skin pipeline: read → crop face → classify → look up advice.
pub struct AnalyzeSkinUseCase {
    reader: Box<dyn ImageReader>,
    cropper: Option<FaceCropper>,
    classifier: Box<dyn SkinClassifier>,
    catalog: Box<dyn RecommendationCatalog>,
}

impl AnalyzeSkinUseCase {
    /// `cropper: None` classifies the whole image.
    pub fn new(
        reader: Box<dyn ImageReader>,
        cropper: Option<FaceCropper>,
        classifier: Box<dyn SkinClassifier>,
        catalog: Box<dyn RecommendationCatalog>,
    ) -> Self {
        Self {
            reader,
            cropper,
            classifier,
            catalog,
        }
    }

    pub fn execute(&mut self, image_path: &Path) -> Result<SkinAnalysis, Box<dyn std::error::Error>> {
        let image = self.reader.read(image_path)?;
        log::debug!(
            "Read {} ({}x{})",
            image_path.display(),
            image.width(),
            image.height()
        );

        let (subject, face_found) = match self.cropper.as_mut() {
            Some(cropper) => {
                let crop = cropper.crop(image)?;
                let found = crop.face_found();
                (crop.frame, found)
            }
            None => (image, false),
        };

        let prediction = self.classifier.classify(&subject)?;
        log::info!(
            "Detected {} ({:.1}%)",
            prediction.condition,
            prediction.confidence() * 100.0
        );
        let recommendation = self.catalog.recommend(prediction.condition);

        Ok(SkinAnalysis {
            prediction,
            recommendation,
            face_found,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advice::infrastructure::static_catalog::StaticCatalog;
    use crate::classification::domain::skin_condition::SkinCondition;
    use crate::detection::domain::face_detector::FaceDetector;
    use crate::shared::frame::Frame;
    use crate::shared::region::Region;
    use std::sync::{Arc, Mutex};

    // --- Stubs ---

    struct StubReader {
        width: u32,
        height: u32,
    }

    impl ImageReader for StubReader {
        fn read(&self, _path: &Path) -> Result<Frame, Box<dyn std::error::Error>> {
            let data = vec![100u8; (self.width * self.height * 3) as usize];
            Ok(Frame::new(data, self.width, self.height, 3, 0))
        }
    }

    struct FailingReader;

    impl ImageReader for FailingReader {
        fn read(&self, path: &Path) -> Result<Frame, Box<dyn std::error::Error>> {
            Err(format!("cannot open {}", path.display()).into())
        }
    }

    struct StubDetector {
        regions: Vec<Region>,
    }

    impl FaceDetector for StubDetector {
        fn detect(&mut self, _frame: &Frame) -> Result<Vec<Region>, Box<dyn std::error::Error>> {
            Ok(self.regions.clone())
        }
    }

    /// Records the size of every image it sees and returns fixed logits.
    struct StubClassifier {
        logits: Vec<f32>,
        seen: Arc<Mutex<Vec<(u32, u32)>>>,
    }

    impl SkinClassifier for StubClassifier {
        fn classify(&mut self, image: &Frame) -> Result<SkinPrediction, Box<dyn std::error::Error>> {
            self.seen.lock().unwrap().push((image.width(), image.height()));
            Ok(SkinPrediction::from_logits(&self.logits).unwrap())
        }
    }

    fn classifier(logits: &[f32]) -> (Box<StubClassifier>, Arc<Mutex<Vec<(u32, u32)>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let stub = StubClassifier {
            logits: logits.to_vec(),
            seen: seen.clone(),
        };
        (Box::new(stub), seen)
    }

    fn cropper(regions: Vec<Region>) -> FaceCropper {
        FaceCropper::new(Box::new(StubDetector { regions }))
    }

    #[test]
    fn test_crops_face_before_classifying() {
        let (classifier, seen) = classifier(&[0.0, 0.0, 0.0, 5.0]);
        let mut use_case = AnalyzeSkinUseCase::new(
            Box::new(StubReader { width: 200, height: 150 }),
            Some(cropper(vec![Region::new(20, 10, 80, 90, 0.9)])),
            classifier,
            Box::new(StaticCatalog::new()),
        );

        let analysis = use_case.execute(Path::new("face.jpg")).unwrap();

        assert!(analysis.face_found);
        assert_eq!(analysis.prediction.condition, SkinCondition::Wrinkles);
        assert_eq!(analysis.recommendation.condition, "wrinkles");
        assert_eq!(*seen.lock().unwrap(), vec![(80, 90)]);
    }

    #[test]
    fn test_no_face_classifies_full_image() {
        let (classifier, seen) = classifier(&[4.0, 0.0, 0.0, 0.0]);
        let mut use_case = AnalyzeSkinUseCase::new(
            Box::new(StubReader { width: 64, height: 48 }),
            Some(cropper(vec![])),
            classifier,
            Box::new(StaticCatalog::new()),
        );

        let analysis = use_case.execute(Path::new("face.jpg")).unwrap();

        assert!(!analysis.face_found);
        assert_eq!(analysis.prediction.condition, SkinCondition::Acne);
        assert_eq!(*seen.lock().unwrap(), vec![(64, 48)]);
    }

    #[test]
    fn test_without_cropper_uses_full_image() {
        let (classifier, seen) = classifier(&[0.0, 3.0, 0.0, 0.0]);
        let mut use_case = AnalyzeSkinUseCase::new(
            Box::new(StubReader { width: 30, height: 20 }),
            None,
            classifier,
            Box::new(StaticCatalog::new()),
        );

        let analysis = use_case.execute(Path::new("face.jpg")).unwrap();

        assert!(!analysis.face_found);
        assert_eq!(analysis.recommendation.acids[0], "Vitamin C");
        assert_eq!(*seen.lock().unwrap(), vec![(30, 20)]);
    }

    #[test]
    fn test_read_error_propagates() {
        let (classifier, seen) = classifier(&[1.0, 0.0, 0.0, 0.0]);
        let mut use_case = AnalyzeSkinUseCase::new(
            Box::new(FailingReader),
            None,
            classifier,
            Box::new(StaticCatalog::new()),
        );

        assert!(use_case.execute(Path::new("missing.jpg")).is_err());
        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn test_into_report_ranks_probabilities() {
        let (classifier, _) = classifier(&[0.5, 0.0, 3.0, 1.0]);
        let mut use_case = AnalyzeSkinUseCase::new(
            Box::new(StubReader { width: 8, height: 8 }),
            None,
            classifier,
            Box::new(StaticCatalog::new()),
        );

        let report = use_case
            .execute(Path::new("face.jpg"))
            .unwrap()
            .into_report("lee");

        assert_eq!(report.condition, SkinCondition::Pigmentation);
        assert_eq!(report.probabilities.len(), 4);
        assert_eq!(report.probabilities[0].0, SkinCondition::Pigmentation);
        assert_eq!(report.user, "lee");
    }
}
