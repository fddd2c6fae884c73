use thiserror::Error;

/// Rejected sampling configuration. Raised before any source I/O.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SampleError {
    #[error("target frame count must be at least 1, got {0}")]
    InvalidTargetCount(usize),
    #[error("output size must be positive, got {width}x{height}")]
    InvalidOutputSize { width: u32, height: u32 },
}

/// How many frames to take from a source and the size to resize them to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SampleRequest {
    pub target_count: usize,
    pub output_size: (u32, u32),
}

impl SampleRequest {
    pub fn new(target_count: usize, output_size: (u32, u32)) -> Self {
        Self {
            target_count,
            output_size,
        }
    }

    pub fn validate(&self) -> Result<(), SampleError> {
        if self.target_count < 1 {
            return Err(SampleError::InvalidTargetCount(self.target_count));
        }
        let (width, height) = self.output_size;
        if width == 0 || height == 0 {
            return Err(SampleError::InvalidOutputSize { width, height });
        }
        Ok(())
    }

    /// Walk stride over a source of `total_frames`: `max(1, T / N)`.
    pub fn step(&self, total_frames: usize) -> usize {
        (total_frames / self.target_count.max(1)).max(1)
    }
}
