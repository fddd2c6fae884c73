use std::time::Instant;

use crate::classification::domain::deepfake::{DeepfakeVerdict, FrameScorer};
use crate::pipeline::pipeline_logger::PipelineLogger;
use crate::sampling::domain::frame_batch::FrameBatch;
use crate::sampling::domain::frame_sampler::FrameSampler;
use crate::sampling::domain::sample_request::SampleRequest;
use crate::shared::constants::{DEFAULT_FAKE_THRESHOLD, DEFAULT_FRAMES_PER_CLIP, DEFAULT_SAMPLE_SIZE};
use crate::video::domain::seekable_source::SeekableSource;

/// Clip-level deepfake detection: sample → score → average.
pub struct DetectDeepfakeUseCase {
    sampler: FrameSampler,
    scorer: Box<dyn FrameScorer>,
    request: SampleRequest,
    threshold: f32,
    logger: Box<dyn PipelineLogger>,
}

impl DetectDeepfakeUseCase {
    pub fn new(
        scorer: Box<dyn FrameScorer>,
        request: SampleRequest,
        threshold: f32,
        logger: Box<dyn PipelineLogger>,
    ) -> Self {
        Self {
            sampler: FrameSampler::new(),
            scorer,
            request,
            threshold,
            logger,
        }
    }

    /// Ten 224x224 frames and a 0.5 threshold.
    pub fn with_defaults(scorer: Box<dyn FrameScorer>, logger: Box<dyn PipelineLogger>) -> Self {
        Self::new(
            scorer,
            SampleRequest::new(
                DEFAULT_FRAMES_PER_CLIP,
                (DEFAULT_SAMPLE_SIZE, DEFAULT_SAMPLE_SIZE),
            ),
            DEFAULT_FAKE_THRESHOLD,
            logger,
        )
    }

    pub fn request(&self) -> &SampleRequest {
        &self.request
    }

    /// Samples an opened source and scores it.
    ///
    /// Returns `Ok(None)` when no frame could be sampled.
    pub fn execute(
        &mut self,
        source: &mut dyn SeekableSource,
    ) -> Result<Option<DeepfakeVerdict>, Box<dyn std::error::Error>> {
        let started = Instant::now();
        let batch = self.sampler.sample(source, &self.request)?;
        self.logger
            .timing("sample", started.elapsed().as_secs_f64() * 1000.0);

        self.verdict_for(&batch)
    }

    /// Scores an already sampled batch.
    pub fn verdict_for(
        &mut self,
        batch: &FrameBatch,
    ) -> Result<Option<DeepfakeVerdict>, Box<dyn std::error::Error>> {
        self.logger.metric("frames_sampled", batch.len() as f64);
        self.logger.metric("frames_skipped", batch.skipped() as f64);

        if batch.is_empty() {
            self.logger.info("No frames could be sampled");
            return Ok(None);
        }

        let started = Instant::now();
        let scores = self.scorer.score(batch)?;
        self.logger
            .timing("score", started.elapsed().as_secs_f64() * 1000.0);

        if scores.len() != batch.len() {
            return Err(format!(
                "Scorer returned {} scores for {} frames",
                scores.len(),
                batch.len()
            )
            .into());
        }

        let verdict = DeepfakeVerdict::from_scores(&scores, self.threshold);
        if let Some(v) = &verdict {
            log::debug!(
                "Mean fake score {:.4} over {} frames → {}",
                v.mean_score,
                v.frames_used,
                v.label
            );
        }
        Ok(verdict)
    }

    pub fn logger_mut(&mut self) -> &mut dyn PipelineLogger {
        &mut *self.logger
    }

    pub fn finish(&self) {
        self.logger.summary();
    }
}
