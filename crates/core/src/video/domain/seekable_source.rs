use crate::shared::frame::Frame;

/// A finite, randomly seekable sequence of decoded frames.
///
/// The source keeps a read position. `seek` moves it to a 0-based frame
/// index and `read_current` decodes the frame at that position, then
/// advances past it. Seeking mutates shared state, so a source must not be
/// used by two callers at once.
pub trait SeekableSource: Send {
    /// Total number of frames in the source (may be 0).
    fn frame_count(&self) -> usize;

    /// Moves the read position to `index`.
    fn seek(&mut self, index: usize) -> Result<(), Box<dyn std::error::Error>>;

    /// Decodes the frame at the read position, or `None` if it cannot be
    /// read (end of stream, corrupt packet, codec produced no picture).
    fn read_current(&mut self) -> Option<Frame>;
}

/// Opens seekable sources by path, for callers that walk many videos.
pub trait SourceOpener: Send {
    fn open(&self, path: &std::path::Path) -> Result<Box<dyn SeekableSource>, Box<dyn std::error::Error>>;
}
