//! Leaf shapes.

use super::{Frame, ShapeId, ShapeStyle, ShapeTrait};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What a leaf shape draws.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ElementKind {
    Rectangle,
    Ellipse,
    Text {
        #[serde(default)]
        content: String,
    },
    Image {
        /// Asset reference (URL or storage key).
        source: String,
    },
    Calendar,
    BoardLink,
}

impl ElementKind {
    /// Short lowercase name, used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            ElementKind::Rectangle => "rectangle",
            ElementKind::Ellipse => "ellipse",
            ElementKind::Text { .. } => "text",
            ElementKind::Image { .. } => "image",
            ElementKind::Calendar => "calendar",
            ElementKind::BoardLink => "board-link",
        }
    }
}

/// A leaf shape: anything that is not a component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub(crate) id: ShapeId,
    #[serde(flatten)]
    pub kind: ElementKind,
    frame: Frame,
    #[serde(default)]
    pub z_index: i64,
    #[serde(default)]
    pub level: u32,
    #[serde(default)]
    pub style: ShapeStyle,
    /// Board this shape navigates to when activated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub board_id: Option<String>,
}

impl Element {
    /// Create a new top-level element.
    pub fn new(kind: ElementKind, frame: Frame) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            frame,
            z_index: 0,
            level: 0,
            style: ShapeStyle::default(),
            board_id: None,
        }
    }

    /// Create an element with a specific ID (for storage / tests).
    pub fn with_id(id: ShapeId, kind: ElementKind, frame: Frame) -> Self {
        Self {
            id,
            ..Self::new(kind, frame)
        }
    }

    /// Builder-style z-index.
    pub fn at_z(mut self, z_index: i64) -> Self {
        self.z_index = z_index;
        self
    }

    pub fn frame(&self) -> Frame {
        self.frame
    }

    pub fn set_frame(&mut self, frame: Frame) {
        self.frame = frame;
    }
}

impl ShapeTrait for Element {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn bounds(&self) -> Rect {
        self.frame.bounds()
    }

    fn z_index(&self) -> i64 {
        self.z_index
    }

    fn level(&self) -> u32 {
        self.level
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        let bounds = self.bounds();
        match self.kind {
            ElementKind::Ellipse => {
                let rx = bounds.width() / 2.0 + tolerance;
                let ry = bounds.height() / 2.0 + tolerance;
                if rx < f64::EPSILON || ry < f64::EPSILON {
                    return false;
                }
                let center = bounds.center();
                let dx = (point.x - center.x) / rx;
                let dy = (point.y - center.y) / ry;
                dx * dx + dy * dy <= 1.0
            }
            _ => bounds.inflate(tolerance, tolerance).contains(point),
        }
    }

    fn style(&self) -> &ShapeStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut ShapeStyle {
        &mut self.style
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rectangle_hit_test() {
        let rect = Element::new(ElementKind::Rectangle, Frame::new(0.0, 0.0, 100.0, 100.0));
        assert!(rect.hit_test(Point::new(50.0, 50.0), 0.0));
        assert!(!rect.hit_test(Point::new(150.0, 50.0), 0.0));
        assert!(rect.hit_test(Point::new(105.0, 50.0), 10.0));
    }

    #[test]
    fn test_ellipse_hit_test_skips_corners() {
        let ellipse = Element::new(ElementKind::Ellipse, Frame::new(0.0, 0.0, 100.0, 50.0));
        assert!(ellipse.hit_test(Point::new(50.0, 25.0), 0.0));
        assert!(!ellipse.hit_test(Point::new(2.0, 2.0), 0.0));
    }

    #[test]
    fn test_kind_serializes_inline() {
        let text = Element::new(
            ElementKind::Text { content: "hello".into() },
            Frame::new(0.0, 0.0, 10.0, 10.0),
        );
        let json = serde_json::to_value(&text).unwrap();
        assert_eq!(json["kind"], "text");
        assert_eq!(json["content"], "hello");
        let back: Element = serde_json::from_value(json).unwrap();
        assert_eq!(back, text);
    }
}
