use crate::sampling::domain::frame_batch::FrameBatch;
use crate::sampling::domain::sample_request::{SampleError, SampleRequest};
use crate::video::domain::seekable_source::SeekableSource;

/// Reduces a video to a small, evenly spread batch of fixed-size frames.
///
/// Walks source indices `0, step, 2*step, ...` with `step = max(1, T / N)`,
/// seeking and decoding each one and resizing it to the requested size.
/// The walk stops once `N` frames are collected or the indices run past
/// the end of the source. Frames that fail to seek, decode or resize are
/// skipped without retry, so the batch may hold fewer than `N` frames.
///
/// The source is only read; opening and closing it stays with the caller.
/// Its read position is left wherever the walk ended.
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameSampler;

impl FrameSampler {
    pub fn new() -> Self {
        Self
    }

    pub fn sample(
        &self,
        source: &mut dyn SeekableSource,
        request: &SampleRequest,
    ) -> Result<FrameBatch, SampleError> {
        request.validate()?;

        let total = source.frame_count();
        let step = request.step(total);
        let (width, height) = request.output_size;
        let mut batch = FrameBatch::default();

        log::debug!(
            "Sampling {} of {total} frames (step {step}) at {width}x{height}",
            request.target_count
        );

        for index in (0..total).step_by(step) {
            if batch.len() >= request.target_count {
                break;
            }

            let frame = match source.seek(index) {
                Ok(()) => source.read_current(),
                Err(e) => {
                    log::debug!("Seek to frame {index} failed: {e}");
                    None
                }
            };

            match frame.and_then(|f| f.resize(width, height)) {
                Some(resized) => {
                    batch.record_attempt(true);
                    batch.push(resized.with_index(index));
                }
                None => {
                    log::debug!("Skipping frame {index}: no picture");
                    batch.record_attempt(false);
                }
            }
        }

        if batch.skipped() > 0 {
            log::warn!(
                "Sampled {}/{} frames; {} of {} reads failed",
                batch.len(),
                request.target_count,
                batch.skipped(),
                batch.attempted()
            );
        }

        Ok(batch)
    }
}
