//! Shape definitions for the board.
//!
//! A board holds a flat list of top-level [`Shape`]s. Leaves are [`Element`]s;
//! a [`Component`] wraps an ordered list of elements one level deep. Because a
//! component's children are `Element`s rather than `Shape`s, nested components
//! cannot be represented.

mod component;
mod element;
mod frame;

pub use component::Component;
pub use element::{Element, ElementKind};
pub use frame::Frame;

use kurbo::{Point, Rect};
use peniko::Color;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for shapes.
pub type ShapeId = Uuid;

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    pub fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Presentation properties. Geometry operations never touch these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeStyle {
    /// Foreground (text / stroke) color.
    pub color: SerializableColor,
    /// Background fill (None = transparent).
    #[serde(default)]
    pub background: Option<SerializableColor>,
    /// Border color.
    pub border_color: SerializableColor,
    /// Border width in world units.
    pub border_width: f64,
    /// Font family name used by text-bearing shapes.
    #[serde(default = "default_font_family")]
    pub font_family: String,
    /// Font size in world units.
    #[serde(default = "default_font_size")]
    pub font_size: f64,
    /// Overall opacity (0.0 = fully transparent, 1.0 = fully opaque).
    #[serde(default = "default_opacity")]
    pub opacity: f64,
    /// Rotation in radians around the shape center. Purely presentational.
    #[serde(default)]
    pub rotation: f64,
}

fn default_font_family() -> String {
    "sans-serif".to_string()
}

fn default_font_size() -> f64 {
    16.0
}

fn default_opacity() -> f64 {
    1.0
}

impl ShapeStyle {
    /// Background color with opacity applied, for rendering consumers.
    pub fn background_with_opacity(&self) -> Option<Color> {
        self.background.map(|c| {
            let alpha = (c.a as f64 * self.opacity) as u8;
            Color::from_rgba8(c.r, c.g, c.b, alpha)
        })
    }

    /// Border color as a peniko Color.
    pub fn border(&self) -> Color {
        self.border_color.into()
    }
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self {
            color: SerializableColor::black(),
            background: None,
            border_color: SerializableColor::black(),
            border_width: 1.0,
            font_family: default_font_family(),
            font_size: default_font_size(),
            opacity: 1.0,
            rotation: 0.0,
        }
    }
}

/// Common trait for everything that lives on the board.
pub trait ShapeTrait {
    /// Get the unique identifier.
    fn id(&self) -> ShapeId;

    /// Get the normalized bounding box in world coordinates.
    fn bounds(&self) -> Rect;

    /// Paint / selection order.
    fn z_index(&self) -> i64;

    /// Nesting depth (0 for top-level shapes).
    fn level(&self) -> u32;

    /// Check if a point (in world coordinates) hits this shape.
    fn hit_test(&self, point: Point, tolerance: f64) -> bool;

    /// Get the style.
    fn style(&self) -> &ShapeStyle;

    /// Get mutable style.
    fn style_mut(&mut self) -> &mut ShapeStyle;
}

/// A top-level board entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Shape {
    Element(Element),
    Component(Component),
}

impl Shape {
    pub fn id(&self) -> ShapeId {
        match self {
            Shape::Element(s) => s.id(),
            Shape::Component(s) => s.id(),
        }
    }

    pub fn bounds(&self) -> Rect {
        match self {
            Shape::Element(s) => s.bounds(),
            Shape::Component(s) => s.bounds(),
        }
    }

    pub fn frame(&self) -> Frame {
        match self {
            Shape::Element(s) => s.frame(),
            Shape::Component(s) => s.frame(),
        }
    }

    pub fn z_index(&self) -> i64 {
        match self {
            Shape::Element(s) => s.z_index,
            Shape::Component(s) => s.z_index,
        }
    }

    pub fn level(&self) -> u32 {
        match self {
            Shape::Element(s) => s.level,
            Shape::Component(s) => s.level,
        }
    }

    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        match self {
            Shape::Element(s) => s.hit_test(point, tolerance),
            Shape::Component(s) => s.hit_test(point, tolerance),
        }
    }

    pub fn style(&self) -> &ShapeStyle {
        match self {
            Shape::Element(s) => s.style(),
            Shape::Component(s) => s.style(),
        }
    }

    pub fn style_mut(&mut self) -> &mut ShapeStyle {
        match self {
            Shape::Element(s) => s.style_mut(),
            Shape::Component(s) => s.style_mut(),
        }
    }

    /// Number of z slots this shape occupies: itself plus its children.
    pub fn block_size(&self) -> i64 {
        match self {
            Shape::Element(_) => 1,
            Shape::Component(c) => 1 + c.children().len() as i64,
        }
    }

    /// Shift this shape's z-index, carrying component children along.
    pub fn shift_z(&mut self, delta: i64) {
        match self {
            Shape::Element(e) => e.z_index += delta,
            Shape::Component(c) => c.shift_z(delta),
        }
    }

    /// Move the shape so its z-index becomes `z`; children keep their offsets.
    pub fn place_at_z(&mut self, z: i64) {
        let delta = z - self.z_index();
        self.shift_z(delta);
    }

    /// Check if this shape is a component.
    pub fn is_component(&self) -> bool {
        matches!(self, Shape::Component(_))
    }

    /// Get the component if this shape is one.
    pub fn as_component(&self) -> Option<&Component> {
        match self {
            Shape::Component(c) => Some(c),
            _ => None,
        }
    }

    /// Get the element if this shape is a leaf.
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Shape::Element(e) => Some(e),
            _ => None,
        }
    }

    /// True if `id` names this shape or one of its children.
    pub fn contains_id(&self, id: ShapeId) -> bool {
        match self {
            Shape::Element(e) => e.id() == id,
            Shape::Component(c) => c.id() == id || c.children().iter().any(|e| e.id() == id),
        }
    }

    /// Test if this shape intersects (or is contained by) a rectangle.
    pub fn intersects_rect(&self, rect: Rect) -> bool {
        let rect = rect.abs();
        let bounds = self.bounds();
        bounds.x0 <= rect.x1 && bounds.x1 >= rect.x0 && bounds.y0 <= rect.y1 && bounds.y1 >= rect.y0
    }
}

impl From<Element> for Shape {
    fn from(element: Element) -> Self {
        Shape::Element(element)
    }
}

impl From<Component> for Shape {
    fn from(component: Component) -> Self {
        Shape::Component(component)
    }
}

/// Union of the bounding boxes of the given shapes, or None if empty.
pub fn union_bounds<'a>(shapes: impl IntoIterator<Item = &'a Shape>) -> Option<Rect> {
    shapes
        .into_iter()
        .map(Shape::bounds)
        .reduce(|acc, b| acc.union(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(x1: f64, y1: f64, x2: f64, y2: f64) -> Shape {
        Shape::Element(Element::new(ElementKind::Rectangle, Frame::new(x1, y1, x2, y2)))
    }

    #[test]
    fn test_union_bounds() {
        let shapes = vec![rect(0.0, 0.0, 10.0, 10.0), rect(50.0, 60.0, 20.0, 30.0)];
        let bounds = union_bounds(&shapes).unwrap();
        assert_eq!(bounds, Rect::new(0.0, 0.0, 50.0, 60.0));
        assert!(union_bounds(std::iter::empty::<&Shape>()).is_none());
    }

    #[test]
    fn test_intersects_rect_contains_and_touches() {
        let shape = rect(10.0, 10.0, 20.0, 20.0);
        assert!(shape.intersects_rect(Rect::new(0.0, 0.0, 100.0, 100.0)));
        assert!(shape.intersects_rect(Rect::new(15.0, 15.0, 30.0, 30.0)));
        // Dragged from bottom-right to top-left.
        assert!(shape.intersects_rect(Rect::new(30.0, 30.0, 15.0, 15.0)));
        assert!(!shape.intersects_rect(Rect::new(25.0, 25.0, 30.0, 30.0)));
    }

    #[test]
    fn test_block_size_and_shift() {
        let a = Element::new(ElementKind::Rectangle, Frame::new(0.0, 0.0, 10.0, 10.0));
        let b = Element::new(ElementKind::Ellipse, Frame::new(20.0, 0.0, 30.0, 10.0));
        let mut shape = Shape::Component(Component::new(vec![a, b], 4));
        assert_eq!(shape.block_size(), 3);
        shape.place_at_z(1);
        let component = shape.as_component().unwrap();
        assert_eq!(component.z_index, 1);
        let child_z: Vec<i64> = component.children().iter().map(|c| c.z_index).collect();
        assert_eq!(child_z, vec![2, 3]);
    }

    #[test]
    fn test_style_color_roundtrip() {
        let color = SerializableColor::new(10, 20, 30, 255);
        let peniko_color: Color = color.into();
        assert_eq!(SerializableColor::from(peniko_color), color);
    }

    #[test]
    fn test_shape_json_tagging() {
        let shape = rect(0.0, 0.0, 10.0, 5.0);
        let json = serde_json::to_value(&shape).unwrap();
        assert_eq!(json["type"], "element");
        assert_eq!(json["frame"]["width"], 10.0);
        let back: Shape = serde_json::from_value(json).unwrap();
        assert_eq!(back, shape);
    }
}
