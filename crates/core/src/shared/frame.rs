use image::imageops::FilterType;
use ndarray::{ArrayView3, ArrayViewMut3};

use crate::shared::region::Region;

/// A single decoded frame or still image: contiguous pixel bytes in
/// row-major order.
///
/// `index` is the frame's position in its source (0 for still images).
/// Format conversion happens at I/O boundaries only.
#[derive(Clone, Debug)]
pub struct Frame {
    data: Vec<u8>,
    width: u32,
    height: u32,
    channels: u8,
    index: usize,
}

impl Frame {
    pub fn new(data: Vec<u8>, width: u32, height: u32, channels: u8, index: usize) -> Self {
        debug_assert_eq!(
            data.len(),
            (width as usize) * (height as usize) * (channels as usize),
            "data length must equal width * height * channels"
        );
        Self {
            data,
            width,
            height,
            channels,
            index,
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Returns the same pixels tagged with a different source index.
    pub fn with_index(mut self, index: usize) -> Self {
        self.index = index;
        self
    }

    pub fn as_ndarray(&self) -> ArrayView3<'_, u8> {
        ArrayView3::from_shape(self.shape(), &self.data)
            .expect("Frame data length must match dimensions")
    }

    pub fn as_ndarray_mut(&mut self) -> ArrayViewMut3<'_, u8> {
        ArrayViewMut3::from_shape(self.shape(), &mut self.data)
            .expect("Frame data length must match dimensions")
    }

    /// Bilinear resize to exactly `width` x `height`.
    ///
    /// Returns `None` for zero target dimensions or an unsupported channel
    /// count (only 1, 3 and 4 channels are handled). A frame that already
    /// has the requested size is copied unchanged.
    pub fn resize(&self, width: u32, height: u32) -> Option<Frame> {
        if width == 0 || height == 0 {
            return None;
        }
        if width == self.width && height == self.height {
            return Some(self.clone());
        }

        let data = self.data.clone();
        let resized = match self.channels {
            1 => resize_pixels::<image::Luma<u8>>(data, self.width, self.height, width, height),
            3 => resize_pixels::<image::Rgb<u8>>(data, self.width, self.height, width, height),
            4 => resize_pixels::<image::Rgba<u8>>(data, self.width, self.height, width, height),
            _ => None,
        }?;

        Some(Frame::new(resized, width, height, self.channels, self.index))
    }

    /// Copies the pixels inside `region`, clamped to the frame bounds.
    ///
    /// Returns `None` when the clamped region is empty.
    pub fn crop(&self, region: &Region) -> Option<Frame> {
        let clamped = region.clamp(self.width, self.height)?;
        let x = clamped.x as usize;
        let y = clamped.y as usize;
        let w = clamped.width as usize;
        let h = clamped.height as usize;
        let c = self.channels as usize;
        let stride = self.width as usize * c;

        let mut pixels = Vec::with_capacity(w * h * c);
        for row in y..y + h {
            let start = row * stride + x * c;
            pixels.extend_from_slice(&self.data[start..start + w * c]);
        }

        Some(Frame::new(
            pixels,
            clamped.width as u32,
            clamped.height as u32,
            self.channels,
            self.index,
        ))
    }

    fn shape(&self) -> (usize, usize, usize) {
        (
            self.height as usize,
            self.width as usize,
            self.channels as usize,
        )
    }
}

fn resize_pixels<P>(
    data: Vec<u8>,
    width: u32,
    height: u32,
    new_width: u32,
    new_height: u32,
) -> Option<Vec<u8>>
where
    P: image::Pixel<Subpixel = u8> + 'static,
{
    let buffer = image::ImageBuffer::<P, Vec<u8>>::from_raw(width, height, data)?;
    Some(image::imageops::resize(&buffer, new_width, new_height, FilterType::Triangle).into_raw())
}

#[cfg(test)]
mod tests {
    use super::*;

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
    fn test_construction_and_accessors() {
        let data = vec![0u8; 12]; // 2x2x3
        let frame = Frame::new(data.clone(), 2, 2, 3, 5);
        assert_eq!(frame.width(), 2);
        assert_eq!(frame.height(), 2);
        assert_eq!(frame.channels(), 3);
        assert_eq!(frame.index(), 5);
        assert_eq!(frame.data(), &data[..]);
    }

    #[test]
    fn test_clone_is_independent() {
        let frame = Frame::new(vec![100u8; 12], 2, 2, 3, 0);
        let mut cloned = frame.clone();
        cloned.data_mut()[0] = 0;
        assert_eq!(frame.data()[0], 100);
        assert_eq!(cloned.data()[0], 0);
    }

    #[test]
    #[should_panic(expected = "data length must equal width * height * channels")]
    fn test_mismatched_data_length_panics_in_debug() {
        Frame::new(vec![0u8; 10], 2, 2, 3, 0);
    }

    #[test]
    fn test_as_ndarray_pixel_access() {
        let mut data = vec![0u8; 12];
        data[6] = 255; // row=1, col=0, R
        let frame = Frame::new(data, 2, 2, 3, 0);
        let arr = frame.as_ndarray();
        assert_eq!(arr.shape(), &[2, 2, 3]);
        assert_eq!(arr[[1, 0, 0]], 255);
        assert_eq!(arr[[1, 0, 1]], 0);
    }

    #[test]
    fn test_with_index_keeps_pixels() {
        let frame = solid(4, 4, [1, 2, 3]).with_index(42);
        assert_eq!(frame.index(), 42);
        assert_eq!(&frame.data()[..3], &[1, 2, 3]);
    }

    #[test]
    fn test_resize_to_exact_dimensions() {
        let frame = solid(320, 180, [10, 20, 30]).with_index(7);
        let resized = frame.resize(224, 224).unwrap();
        assert_eq!(resized.width(), 224);
        assert_eq!(resized.height(), 224);
        assert_eq!(resized.channels(), 3);
        assert_eq!(resized.index(), 7);
        assert_eq!(resized.data().len(), 224 * 224 * 3);
    }

    #[test]
    fn test_resize_preserves_solid_color() {
        let resized = solid(64, 48, [50, 100, 200]).resize(16, 16).unwrap();
        assert_eq!(&resized.data()[..3], &[50, 100, 200]);
    }

    #[test]
    fn test_resize_upscales() {
        let resized = solid(2, 2, [9, 9, 9]).resize(8, 6).unwrap();
        assert_eq!((resized.width(), resized.height()), (8, 6));
    }

    #[test]
    fn test_resize_same_size_is_copy() {
        let frame = solid(5, 5, [1, 1, 1]);
        let resized = frame.resize(5, 5).unwrap();
        assert_eq!(resized.data(), frame.data());
    }

    #[test]
    fn test_resize_zero_dimension_returns_none() {
        assert!(solid(5, 5, [1, 1, 1]).resize(0, 5).is_none());
        assert!(solid(5, 5, [1, 1, 1]).resize(5, 0).is_none());
    }

    #[test]
    fn test_resize_unsupported_channels_returns_none() {
        let frame = Frame::new(vec![0u8; 8], 2, 2, 2, 0);
        assert!(frame.resize(4, 4).is_none());
    }

    #[test]
    fn test_crop_copies_region() {
        // 4x2 frame where column index is encoded in the red channel
        let mut data = Vec::new();
        for _row in 0..2 {
            for col in 0..4u8 {
                data.extend_from_slice(&[col, 0, 0]);
            }
        }
        let frame = Frame::new(data, 4, 2, 3, 3);
        let crop = frame.crop(&Region::new(1, 0, 2, 2, 1.0)).unwrap();
        assert_eq!((crop.width(), crop.height()), (2, 2));
        assert_eq!(crop.index(), 3);
        assert_eq!(crop.as_ndarray()[[0, 0, 0]], 1);
        assert_eq!(crop.as_ndarray()[[1, 1, 0]], 2);
    }

    #[test]
    fn test_crop_clamps_to_bounds() {
        let frame = solid(10, 10, [0, 0, 0]);
        let crop = frame.crop(&Region::new(-5, 5, 10, 20, 1.0)).unwrap();
        assert_eq!((crop.width(), crop.height()), (5, 5));
    }

    #[test]
    fn test_crop_outside_frame_returns_none() {
        let frame = solid(10, 10, [0, 0, 0]);
        assert!(frame.crop(&Region::new(20, 20, 5, 5, 1.0)).is_none());
    }
}
