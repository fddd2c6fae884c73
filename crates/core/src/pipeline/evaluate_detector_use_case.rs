use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::Serialize;

use crate::pipeline::detect_deepfake_use_case::DetectDeepfakeUseCase;
use crate::sampling::domain::frame_batch::FrameBatch;
use crate::sampling::domain::frame_sampler::FrameSampler;
use crate::sampling::domain::sample_request::SampleRequest;
use crate::shared::constants::{FAKE_CLIPS_DIR, REAL_CLIPS_DIR};
use crate::video::domain::seekable_source::SourceOpener;

const DEFAULT_CHANNEL_CAPACITY: usize = 4;

type SendError = Box<dyn std::error::Error + Send + Sync>;

/// A video with its ground-truth label.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LabeledClip {
    pub path: PathBuf,
    pub is_fake: bool,
}

/// Lists `.mp4` clips under `<data_dir>/Celeb-real` (real) and
/// `<data_dir>/Celeb-synthesis` (fake), sorted by name.
///
/// `limit` caps the number of clips taken per class. A missing class
/// directory is skipped with a warning; finding no clips at all is an error.
pub fn discover_dataset(
    data_dir: &Path,
    limit: Option<usize>,
) -> Result<Vec<LabeledClip>, Box<dyn std::error::Error>> {
    let mut clips = Vec::new();

    for (dir_name, is_fake) in [(REAL_CLIPS_DIR, false), (FAKE_CLIPS_DIR, true)] {
        let dir = data_dir.join(dir_name);
        if !dir.is_dir() {
            log::warn!("Dataset directory {} not found, skipping", dir.display());
            continue;
        }

        let mut paths: Vec<PathBuf> = std::fs::read_dir(&dir)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_file() && is_mp4(path))
            .collect();
        paths.sort();
        if let Some(n) = limit {
            paths.truncate(n);
        }

        log::info!("Found {} clips in {}", paths.len(), dir.display());
        clips.extend(paths.into_iter().map(|path| LabeledClip { path, is_fake }));
    }

    if clips.is_empty() {
        return Err(format!(
            "No .mp4 clips found under {} ({REAL_CLIPS_DIR}/, {FAKE_CLIPS_DIR}/)",
            data_dir.display()
        )
        .into());
    }
    Ok(clips)
}

fn is_mp4(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("mp4"))
}

/// Confusion counts with fake as the positive class.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct EvaluationMetrics {
    pub true_positives: usize,
    pub false_positives: usize,
    pub true_negatives: usize,
    pub false_negatives: usize,
    /// Clips that could not be opened, sampled or scored.
    pub unprocessable: usize,
}

impl EvaluationMetrics {
    pub fn record(&mut self, actual_fake: bool, predicted_fake: bool) {
        match (actual_fake, predicted_fake) {
            (true, true) => self.true_positives += 1,
            (false, true) => self.false_positives += 1,
            (false, false) => self.true_negatives += 1,
            (true, false) => self.false_negatives += 1,
        }
    }

    /// Clips that received a verdict.
    pub fn evaluated(&self) -> usize {
        self.true_positives + self.false_positives + self.true_negatives + self.false_negatives
    }

    pub fn accuracy(&self) -> f64 {
        ratio(self.true_positives + self.true_negatives, self.evaluated())
    }

    pub fn precision(&self) -> f64 {
        ratio(self.true_positives, self.true_positives + self.false_positives)
    }

    pub fn recall(&self) -> f64 {
        ratio(self.true_positives, self.true_positives + self.false_negatives)
    }
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

/// Scores a labeled dataset and tallies the confusion counts.
///
/// Layout: `reader [open + sample] → main [score + tally]`. The reader
/// thread works one clip ahead so decoding overlaps inference.
pub struct EvaluateDetectorUseCase {
    opener: Option<Box<dyn SourceOpener>>,
    detector: DetectDeepfakeUseCase,
    cancelled: Arc<AtomicBool>,
    channel_capacity: usize,
}

impl EvaluateDetectorUseCase {
    pub fn new(opener: Box<dyn SourceOpener>, detector: DetectDeepfakeUseCase) -> Self {
        Self {
            opener: Some(opener),
            detector,
            cancelled: Arc::new(AtomicBool::new(false)),
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }

    /// Flag that stops the run between clips once set.
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        self.cancelled.clone()
    }

    pub fn execute(
        &mut self,
        clips: &[LabeledClip],
    ) -> Result<EvaluationMetrics, Box<dyn std::error::Error>> {
        let opener = self.opener.take().ok_or("Evaluation already running")?;
        let total = clips.len();
        let (tx, rx) = crossbeam_channel::bounded::<(LabeledClip, Result<FrameBatch, SendError>)>(
            self.channel_capacity,
        );

        let reader_handle = spawn_reader(
            opener,
            clips.to_vec(),
            *self.detector.request(),
            tx,
            self.cancelled.clone(),
        );

        let mut metrics = EvaluationMetrics::default();
        let mut done = 0;
        for (clip, sampled) in rx {
            if self.cancelled.load(Ordering::Relaxed) {
                break;
            }
            done += 1;

            let verdict = sampled
                .map_err(|e| e.to_string())
                .and_then(|batch| self.detector.verdict_for(&batch).map_err(|e| e.to_string()));
            match verdict {
                Ok(Some(v)) => metrics.record(clip.is_fake, v.is_fake()),
                Ok(None) => {
                    log::warn!("Unable to process {}", clip.path.display());
                    metrics.unprocessable += 1;
                }
                Err(e) => {
                    log::warn!("Skipping {}: {e}", clip.path.display());
                    metrics.unprocessable += 1;
                }
            }
            self.detector.logger_mut().progress(done, total);
        }

        let opener = reader_handle
            .join()
            .map_err(|_| "Reader thread panicked")?;
        self.opener = Some(opener);

        self.detector.finish();
        Ok(metrics)
    }
}

fn spawn_reader(
    opener: Box<dyn SourceOpener>,
    clips: Vec<LabeledClip>,
    request: SampleRequest,
    tx: crossbeam_channel::Sender<(LabeledClip, Result<FrameBatch, SendError>)>,
    cancelled: Arc<AtomicBool>,
) -> std::thread::JoinHandle<Box<dyn SourceOpener>> {
    std::thread::spawn(move || {
        let sampler = FrameSampler::new();
        for clip in clips {
            if cancelled.load(Ordering::Relaxed) {
                break;
            }
            let sampled = match opener.open(&clip.path) {
                Ok(mut source) => sampler
                    .sample(source.as_mut(), &request)
                    .map_err(|e| -> SendError { e.to_string().into() }),
                Err(e) => Err(e.to_string().into()),
            };
            if tx.send((clip, sampled)).is_err() {
                break;
            }
        }
        opener
    })
}
