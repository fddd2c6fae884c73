use ndarray::Array4;

use crate::shared::frame::Frame;

/// Axis order of a 4-D image batch tensor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TensorLayout {
    /// `[batch, channels, height, width]`.
    Nchw,
    /// `[batch, height, width, channels]`.
    Nhwc,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChannelOrder {
    Rgb,
    Bgr,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TensorError {
    #[error("Cannot build a tensor from an empty batch")]
    EmptyBatch,
    #[error("Frame {index} has {channels} channels, expected 3")]
    Channels { index: usize, channels: u8 },
    #[error("Frame {index} is {width}x{height}, expected {expected_width}x{expected_height}")]
    Size {
        index: usize,
        width: u32,
        height: u32,
        expected_width: u32,
        expected_height: u32,
    },
}

/// Stacks equally sized RGB frames into a float tensor scaled to [0, 1].
///
/// The batch size, height and width come from the frames themselves; the
/// first frame sets the expected size.
pub fn frames_to_tensor(
    frames: &[Frame],
    layout: TensorLayout,
    order: ChannelOrder,
) -> Result<Array4<f32>, TensorError> {
    let first = frames.first().ok_or(TensorError::EmptyBatch)?;
    let (w, h) = (first.width(), first.height());

    for (i, frame) in frames.iter().enumerate() {
        if frame.channels() != 3 {
            return Err(TensorError::Channels {
                index: i,
                channels: frame.channels(),
            });
        }
        if frame.width() != w || frame.height() != h {
            return Err(TensorError::Size {
                index: i,
                width: frame.width(),
                height: frame.height(),
                expected_width: w,
                expected_height: h,
            });
        }
    }

    let (n, h, w) = (frames.len(), h as usize, w as usize);
    let mut tensor = match layout {
        TensorLayout::Nchw => Array4::<f32>::zeros((n, 3, h, w)),
        TensorLayout::Nhwc => Array4::<f32>::zeros((n, h, w, 3)),
    };

    for (b, frame) in frames.iter().enumerate() {
        let src = frame.as_ndarray();
        for y in 0..h {
            for x in 0..w {
                for c in 0..3 {
                    let src_c = match order {
                        ChannelOrder::Rgb => c,
                        ChannelOrder::Bgr => 2 - c,
                    };
                    let value = src[[y, x, src_c]] as f32 / 255.0;
                    match layout {
                        TensorLayout::Nchw => tensor[[b, c, y, x]] = value,
                        TensorLayout::Nhwc => tensor[[b, y, x, c]] = value,
                    }
                }
            }
        }
    }

    Ok(tensor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn solid(width: u32, height: u32, rgb: [u8; 3]) -> Frame {
        let data = rgb
            .iter()
            .copied()
            .cycle()
            .take((width * height * 3) as usize)
            .collect();
        Frame::new(data, width, height, 3, 0)
    }

    #[test]
    fn test_nchw_rgb_shape_and_values() {
        let frames = vec![solid(4, 2, [255, 0, 51]); 2];
        let t = frames_to_tensor(&frames, TensorLayout::Nchw, ChannelOrder::Rgb).unwrap();
        assert_eq!(t.shape(), &[2, 3, 2, 4]);
        assert_relative_eq!(t[[1, 0, 1, 3]], 1.0);
        assert_relative_eq!(t[[1, 1, 1, 3]], 0.0);
        assert_relative_eq!(t[[1, 2, 1, 3]], 0.2, epsilon = 1e-6);
    }

    #[test]
    fn test_nhwc_bgr_swaps_channels() {
        let frames = vec![solid(3, 3, [10, 20, 255])];
        let t = frames_to_tensor(&frames, TensorLayout::Nhwc, ChannelOrder::Bgr).unwrap();
        assert_eq!(t.shape(), &[1, 3, 3, 3]);
        assert_relative_eq!(t[[0, 2, 2, 0]], 1.0);
        assert_relative_eq!(t[[0, 2, 2, 2]], 10.0 / 255.0);
    }

    #[test]
    fn test_empty_batch_rejected() {
        assert_eq!(
            frames_to_tensor(&[], TensorLayout::Nchw, ChannelOrder::Rgb),
            Err(TensorError::EmptyBatch)
        );
    }

    #[test]
    fn test_mismatched_size_rejected() {
        let frames = vec![solid(4, 4, [0, 0, 0]), solid(4, 2, [0, 0, 0])];
        let err = frames_to_tensor(&frames, TensorLayout::Nchw, ChannelOrder::Rgb).unwrap_err();
        assert!(matches!(err, TensorError::Size { index: 1, .. }));
    }

    #[test]
    fn test_non_rgb_rejected() {
        let gray = Frame::new(vec![0u8; 16], 4, 4, 1, 0);
        let err = frames_to_tensor(&[gray], TensorLayout::Nhwc, ChannelOrder::Rgb).unwrap_err();
        assert_eq!(err, TensorError::Channels { index: 0, channels: 1 });
    }
}
