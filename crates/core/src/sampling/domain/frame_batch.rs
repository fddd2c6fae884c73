use crate::shared::frame::Frame;

/// Ordered frames produced by one sampling pass.
///
/// Frames are in source order and all share the requested output size.
/// `attempted` counts visited source indices; `skipped` counts the visited
/// indices that yielded no frame, so a short batch can be told apart from
/// a short video.
#[derive(Clone, Debug, Default)]
pub struct FrameBatch {
    frames: Vec<Frame>,
    attempted: usize,
    skipped: usize,
}

impl FrameBatch {
    pub fn new(frames: Vec<Frame>, attempted: usize, skipped: usize) -> Self {
        Self {
            frames,
            attempted,
            skipped,
        }
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn into_frames(self) -> Vec<Frame> {
        self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn attempted(&self) -> usize {
        self.attempted
    }

    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Source indices of the sampled frames, in output order.
    pub fn indices(&self) -> Vec<usize> {
        self.frames.iter().map(Frame::index).collect()
    }

    pub(crate) fn push(&mut self, frame: Frame) {
        self.frames.push(frame);
    }

    pub(crate) fn record_attempt(&mut self, succeeded: bool) {
        self.attempted += 1;
        if !succeeded {
            self.skipped += 1;
        }
    }
}
