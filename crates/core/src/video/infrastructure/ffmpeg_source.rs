use std::path::Path;

use crate::shared::frame::Frame;
use crate::shared::video_metadata::VideoMetadata;
use crate::video::domain::seekable_source::{SeekableSource, SourceOpener};

/// ffmpeg's internal timestamp unit (microseconds), used for container seeks.
const AV_TIME_BASE: f64 = 1_000_000.0;

/// Random-access video source backed by ffmpeg-next.
///
/// Seeks land on the nearest preceding keyframe; `read_current` then
/// decodes forward until it reaches the requested frame, converting it to
/// RGB24.
pub struct FfmpegSource {
    video: Option<OpenVideo>,
    metadata: Option<VideoMetadata>,
}

// Safety: FfmpegSource is only used from a single thread at a time.
// The raw pointers inside ffmpeg types are not shared across threads.
unsafe impl Send for FfmpegSource {}

struct OpenVideo {
    ictx: ffmpeg_next::format::context::Input,
    decoder: ffmpeg_next::decoder::Video,
    scaler: ffmpeg_next::software::scaling::Context,
    stream_index: usize,
    time_base: ffmpeg_next::Rational,
    start_pts: i64,
    fps: f64,
    width: u32,
    height: u32,
    total_frames: usize,
    position: usize,
    eof: bool,
}

impl FfmpegSource {
    pub fn new() -> Self {
        Self {
            video: None,
            metadata: None,
        }
    }

    /// Convenience constructor: creates a source and opens `path`.
    pub fn open_path(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let mut source = Self::new();
        source.open(path)?;
        Ok(source)
    }

    /// Opens a video file and returns its metadata.
    pub fn open(&mut self, path: &Path) -> Result<VideoMetadata, Box<dyn std::error::Error>> {
        ffmpeg_next::init()?;

        let ictx = ffmpeg_next::format::input(path)?;
        let container_duration = ictx.duration();

        let (stream_index, time_base, start_pts, fps, reported_frames, stream_duration, params) = {
            let stream = ictx
                .streams()
                .best(ffmpeg_next::media::Type::Video)
                .ok_or("No video stream found")?;

            let rate = stream.avg_frame_rate();
            let rate = if rate.denominator() != 0 && rate.numerator() != 0 {
                rate
            } else {
                stream.rate()
            };
            let fps = if rate.denominator() != 0 {
                rate.numerator() as f64 / rate.denominator() as f64
            } else {
                0.0
            };
            let start = stream.start_time();
            let start_pts = if start == i64::MIN { 0 } else { start };

            (
                stream.index(),
                stream.time_base(),
                start_pts,
                fps,
                stream.frames(),
                stream.duration(),
                stream.parameters(),
            )
        };

        let codec_ctx = ffmpeg_next::codec::context::Context::from_parameters(params)?;
        let decoder = codec_ctx.decoder().video()?;
        let width = decoder.width();
        let height = decoder.height();

        let scaler = ffmpeg_next::software::scaling::Context::get(
            decoder.format(),
            width,
            height,
            ffmpeg_next::format::Pixel::RGB24,
            width,
            height,
            ffmpeg_next::software::scaling::Flags::BILINEAR,
        )?;

        let total_frames = estimate_frame_count(
            reported_frames,
            stream_duration,
            time_base,
            container_duration,
            fps,
        );

        let metadata = VideoMetadata {
            width,
            height,
            fps,
            total_frames,
            codec: decoder
                .codec()
                .map(|c| c.name().to_string())
                .unwrap_or_default(),
            source_path: Some(path.to_path_buf()),
        };
        log::debug!(
            "Opened {}: {}x{} @ {:.2} fps, {} frames",
            path.display(),
            width,
            height,
            fps,
            total_frames
        );

        self.video = Some(OpenVideo {
            ictx,
            decoder,
            scaler,
            stream_index,
            time_base,
            start_pts,
            fps,
            width,
            height,
            total_frames,
            position: 0,
            eof: false,
        });
        self.metadata = Some(metadata.clone());

        Ok(metadata)
    }

    pub fn metadata(&self) -> Option<&VideoMetadata> {
        self.metadata.as_ref()
    }

    /// Releases the container and decoder. Safe to call repeatedly.
    pub fn close(&mut self) {
        self.video = None;
        self.metadata = None;
    }
}

impl Default for FfmpegSource {
    fn default() -> Self {
        Self::new()
    }
}

impl SeekableSource for FfmpegSource {
    fn frame_count(&self) -> usize {
        self.video.as_ref().map_or(0, |v| v.total_frames)
    }

    fn seek(&mut self, index: usize) -> Result<(), Box<dyn std::error::Error>> {
        let video = self.video.as_mut().ok_or("FfmpegSource: not opened")?;
        let ts = frame_to_seek_timestamp(index, video.fps);
        video.ictx.seek(ts, ..ts)?;
        video.decoder.flush();
        video.position = index;
        video.eof = false;
        Ok(())
    }

    fn read_current(&mut self) -> Option<Frame> {
        let video = self.video.as_mut()?;
        match video.decode_at_position() {
            Ok(frame) => frame,
            Err(e) => {
                log::debug!("Decode failed at frame {}: {e}", video.position);
                None
            }
        }
    }
}

/// Opens each path as a fresh [`FfmpegSource`].
#[derive(Clone, Copy, Debug, Default)]
pub struct FfmpegSourceOpener;

impl SourceOpener for FfmpegSourceOpener {
    fn open(&self, path: &Path) -> Result<Box<dyn SeekableSource>, Box<dyn std::error::Error>> {
        Ok(Box::new(FfmpegSource::open_path(path)?))
    }
}

impl OpenVideo {
    /// Decodes forward until a frame at or past `position` comes out.
    fn decode_at_position(&mut self) -> Result<Option<Frame>, Box<dyn std::error::Error>> {
        loop {
            let mut decoded = ffmpeg_next::util::frame::video::Video::empty();
            while self.decoder.receive_frame(&mut decoded).is_ok() {
                if let Some(frame) = self.accept(&decoded)? {
                    return Ok(Some(frame));
                }
            }

            if self.eof {
                return Ok(None);
            }

            match next_packet(&mut self.ictx, self.stream_index) {
                Some(packet) => {
                    if let Err(e) = self.decoder.send_packet(&packet) {
                        log::debug!("Skipping undecodable packet: {e}");
                    }
                }
                None => {
                    let _ = self.decoder.send_eof();
                    self.eof = true;
                }
            }
        }
    }

    /// Converts `decoded` to RGB if it is the frame at `position` or later.
    fn accept(
        &mut self,
        decoded: &ffmpeg_next::util::frame::video::Video,
    ) -> Result<Option<Frame>, Box<dyn std::error::Error>> {
        let index = decoded
            .timestamp()
            .or_else(|| decoded.pts())
            .and_then(|pts| pts_to_frame_index(pts - self.start_pts, self.time_base, self.fps))
            .unwrap_or(self.position);
        if index < self.position {
            return Ok(None);
        }

        let mut rgb_frame = ffmpeg_next::util::frame::video::Video::empty();
        self.scaler.run(decoded, &mut rgb_frame)?;
        let pixels = extract_rgb_pixels(&rgb_frame, self.width, self.height);

        self.position = index + 1;
        Ok(Some(Frame::new(pixels, self.width, self.height, 3, index)))
    }
}

fn next_packet(
    ictx: &mut ffmpeg_next::format::context::Input,
    stream_index: usize,
) -> Option<ffmpeg_next::Packet> {
    for (stream, packet) in ictx.packets() {
        if stream.index() == stream_index {
            return Some(packet);
        }
    }
    None
}

/// Frame count reported by the container, or estimated from duration when
/// the container leaves it at 0.
fn estimate_frame_count(
    reported: i64,
    stream_duration: i64,
    time_base: ffmpeg_next::Rational,
    container_duration: i64,
    fps: f64,
) -> usize {
    if reported > 0 {
        return reported as usize;
    }
    if fps <= 0.0 {
        return 0;
    }

    let secs = if stream_duration > 0 && time_base.denominator() != 0 {
        stream_duration as f64 * time_base.numerator() as f64 / time_base.denominator() as f64
    } else if container_duration > 0 {
        container_duration as f64 / AV_TIME_BASE
    } else {
        return 0;
    };

    (secs * fps).round() as usize
}

/// Container seek timestamp (in `AV_TIME_BASE` units) for a frame index.
fn frame_to_seek_timestamp(index: usize, fps: f64) -> i64 {
    if fps <= 0.0 {
        return 0;
    }
    (index as f64 / fps * AV_TIME_BASE) as i64
}

fn pts_to_frame_index(pts: i64, time_base: ffmpeg_next::Rational, fps: f64) -> Option<usize> {
    if fps <= 0.0 || time_base.denominator() == 0 {
        return None;
    }
    let secs = pts as f64 * time_base.numerator() as f64 / time_base.denominator() as f64;
    Some((secs * fps).round().max(0.0) as usize)
}

/// Copies pixel data from an ffmpeg frame into a contiguous RGB buffer,
/// dropping any row padding (stride > width*3).
fn extract_rgb_pixels(
    rgb_frame: &ffmpeg_next::util::frame::video::Video,
    width: u32,
    height: u32,
) -> Vec<u8> {
    let stride = rgb_frame.stride(0);
    let data = rgb_frame.data(0);
    let w = width as usize;
    let h = height as usize;

    let mut pixels = Vec::with_capacity(w * h * 3);
    for row in 0..h {
        let row_start = row * stride;
        pixels.extend_from_slice(&data[row_start..row_start + w * 3]);
    }
    pixels
}
