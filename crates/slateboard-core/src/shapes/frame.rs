//! Corner geometry shared by every shape.

use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// Two opposite corners of an axis-aligned box.
///
/// Corners are not ordered: `x1` may exceed `x2`. `width` and `height` are
/// derived from the corners and refreshed by every mutator, so they can never
/// be set on their own.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "FrameCorners")]
pub struct Frame {
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
    width: f64,
    height: f64,
}

/// Wire form used on deserialize; stored extents are ignored and recomputed.
#[derive(Deserialize)]
struct FrameCorners {
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
}

impl From<FrameCorners> for Frame {
    fn from(c: FrameCorners) -> Self {
        Frame::new(c.x1, c.y1, c.x2, c.y2)
    }
}

impl Frame {
    /// Create a frame from two corners.
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self {
            x1,
            y1,
            x2,
            y2,
            width: (x2 - x1).abs(),
            height: (y2 - y1).abs(),
        }
    }

    /// Create a frame covering a rectangle.
    pub fn from_rect(rect: Rect) -> Self {
        Self::new(rect.x0, rect.y0, rect.x1, rect.y1)
    }

    /// Create a frame from a top-left origin and a size.
    pub fn with_size(origin: Point, width: f64, height: f64) -> Self {
        Self::new(origin.x, origin.y, origin.x + width, origin.y + height)
    }

    pub fn x1(&self) -> f64 {
        self.x1
    }

    pub fn y1(&self) -> f64 {
        self.y1
    }

    pub fn x2(&self) -> f64 {
        self.x2
    }

    pub fn y2(&self) -> f64 {
        self.y2
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    /// Corners as `(x1, y1, x2, y2)`.
    pub fn corners(&self) -> (f64, f64, f64, f64) {
        (self.x1, self.y1, self.x2, self.y2)
    }

    /// Replace all four corners.
    pub fn set_corners(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) {
        *self = Self::new(x1, y1, x2, y2);
    }

    /// Normalized bounding rectangle.
    pub fn bounds(&self) -> Rect {
        Rect::new(self.x1, self.y1, self.x2, self.y2).abs()
    }

    pub fn center(&self) -> Point {
        Point::new((self.x1 + self.x2) / 2.0, (self.y1 + self.y2) / 2.0)
    }

    /// Translated copy.
    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        Self::new(self.x1 + dx, self.y1 + dy, self.x2 + dx, self.y2 + dy)
    }

    /// Copy with `f` applied to both x coordinates and `g` to both y coordinates.
    pub fn mapped(&self, f: impl Fn(f64) -> f64, g: impl Fn(f64) -> f64) -> Self {
        Self::new(f(self.x1), g(self.y1), f(self.x2), g(self.y2))
    }

    /// True if the frame encloses no area.
    pub fn is_degenerate(&self) -> bool {
        self.width < f64::EPSILON || self.height < f64::EPSILON
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extent_follows_corners() {
        let mut frame = Frame::new(10.0, 20.0, 0.0, 0.0);
        assert!((frame.width() - 10.0).abs() < f64::EPSILON);
        assert!((frame.height() - 20.0).abs() < f64::EPSILON);

        frame.set_corners(0.0, 0.0, 5.0, -5.0);
        assert!((frame.width() - 5.0).abs() < f64::EPSILON);
        assert!((frame.height() - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_bounds_normalized() {
        let frame = Frame::new(100.0, 50.0, 20.0, 10.0);
        assert_eq!(frame.bounds(), Rect::new(20.0, 10.0, 100.0, 50.0));
    }

    #[test]
    fn test_deserialize_recomputes_extent() {
        let json = r#"{"x1":0.0,"y1":0.0,"x2":30.0,"y2":40.0,"width":999.0,"height":-1.0}"#;
        let frame: Frame = serde_json::from_str(json).unwrap();
        assert!((frame.width() - 30.0).abs() < f64::EPSILON);
        assert!((frame.height() - 40.0).abs() < f64::EPSILON);
    }
}
