use serde::Serialize;

/// An axis-aligned pixel box with the detector's confidence.
///
/// Coordinates may extend past the frame edges; call [`Region::clamp`]
/// before indexing pixels.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Region {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub confidence: f64,
}

impl Region {
    pub fn new(x: i32, y: i32, width: i32, height: i32, confidence: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
            confidence,
        }
    }

    /// Builds a region from corner coordinates, rounding outward.
    pub fn from_corners(x1: f64, y1: f64, x2: f64, y2: f64, confidence: f64) -> Self {
        let left = x1.floor() as i32;
        let top = y1.floor() as i32;
        let right = x2.ceil() as i32;
        let bottom = y2.ceil() as i32;
        Self::new(left, top, right - left, bottom - top, confidence)
    }

    pub fn area(&self) -> i64 {
        self.width.max(0) as i64 * self.height.max(0) as i64
    }

    /// Intersects the region with a `frame_w` x `frame_h` frame.
    ///
    /// Returns `None` when nothing of the region lies inside the frame.
    pub fn clamp(&self, frame_w: u32, frame_h: u32) -> Option<Region> {
        let x1 = self.x.max(0);
        let y1 = self.y.max(0);
        let x2 = (self.x + self.width).min(frame_w as i32);
        let y2 = (self.y + self.height).min(frame_h as i32);
        if x2 <= x1 || y2 <= y1 {
            return None;
        }
        Some(Region::new(x1, y1, x2 - x1, y2 - y1, self.confidence))
    }

    pub fn iou(&self, other: &Region) -> f64 {
        let ix1 = self.x.max(other.x);
        let iy1 = self.y.max(other.y);
        let ix2 = (self.x + self.width).min(other.x + other.width);
        let iy2 = (self.y + self.height).min(other.y + other.height);

        let inter = (ix2 - ix1).max(0) as f64 * (iy2 - iy1).max(0) as f64;
        if inter == 0.0 {
            return 0.0;
        }

        let area_a = self.area() as f64;
        let area_b = other.area() as f64;
        inter / (area_a + area_b - inter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    fn region(x: i32, y: i32, w: i32, h: i32) -> Region {
        Region::new(x, y, w, h, 0.9)
    }

    #[test]
    fn test_from_corners_rounds_outward() {
        let r = Region::from_corners(10.4, 20.6, 30.2, 40.1, 0.8);
        assert_eq!(r, Region::new(10, 20, 21, 21, 0.8));
    }

    #[test]
    fn test_area() {
        assert_eq!(region(0, 0, 10, 20).area(), 200);
        assert_eq!(region(0, 0, -5, 20).area(), 0);
    }

    #[test]
    fn test_iou_identical() {
        let a = region(0, 0, 100, 100);
        assert_relative_eq!(a.iou(&a), 1.0);
    }

    #[test]
    fn test_iou_disjoint() {
        assert_relative_eq!(region(0, 0, 10, 10).iou(&region(50, 50, 10, 10)), 0.0);
    }

    #[test]
    fn test_iou_half_overlap() {
        let a = region(0, 0, 100, 100);
        let b = region(50, 0, 100, 100);
        assert_relative_eq!(a.iou(&b), 5000.0 / 15000.0);
    }

    #[rstest]
    #[case::zero_width(region(0, 0, 0, 100), region(0, 0, 50, 50), 0.0)]
    #[case::zero_height(region(0, 0, 100, 0), region(0, 0, 50, 50), 0.0)]
    fn test_iou_degenerate(#[case] a: Region, #[case] b: Region, #[case] expected: f64) {
        assert_relative_eq!(a.iou(&b), expected);
    }

    #[rstest]
    #[case::inside(region(10, 10, 20, 20), Some(region(10, 10, 20, 20)))]
    #[case::left_edge(region(-10, 0, 30, 10), Some(region(0, 0, 20, 10)))]
    #[case::bottom_right(region(90, 90, 30, 30), Some(region(90, 90, 10, 10)))]
    #[case::outside(region(150, 150, 10, 10), None)]
    #[case::empty(region(10, 10, 0, 10), None)]
    fn test_clamp(#[case] input: Region, #[case] expected: Option<Region>) {
        assert_eq!(input.clamp(100, 100), expected);
    }
}
