//! Move and resize of shapes, including proportional propagation into
//! component children.
//!
//! Every function here is pure: it takes shapes by reference and returns new
//! ones, never touching the input.

use crate::handles::ResizeDirection;
use crate::shapes::{Element, Frame, Shape, ShapeId};
use kurbo::Rect;
use serde::{Deserialize, Serialize};

/// Smallest anchor extent (world units) accepted by [`resize_shape`].
pub const MIN_ANCHOR_EXTENT: f64 = 1.0;

/// Which edges of the selection bounds are being dragged.
///
/// Two adjacent flags set means a corner drag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edges {
    pub top: bool,
    pub bottom: bool,
    pub left: bool,
    pub right: bool,
}

impl Edges {
    pub const NONE: Edges = Edges {
        top: false,
        bottom: false,
        left: false,
        right: false,
    };

    /// Edges dragged by a resize handle.
    pub fn from_direction(direction: ResizeDirection) -> Self {
        let mut edges = Self::NONE;
        match direction {
            ResizeDirection::North => edges.top = true,
            ResizeDirection::South => edges.bottom = true,
            ResizeDirection::East => edges.right = true,
            ResizeDirection::West => edges.left = true,
            ResizeDirection::NorthEast => {
                edges.top = true;
                edges.right = true;
            }
            ResizeDirection::NorthWest => {
                edges.top = true;
                edges.left = true;
            }
            ResizeDirection::SouthEast => {
                edges.bottom = true;
                edges.right = true;
            }
            ResizeDirection::SouthWest => {
                edges.bottom = true;
                edges.left = true;
            }
        }
        edges
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::NONE
    }
}

/// Selection bounds captured before a resize step; the fixed reference for
/// ratio-preserving scaling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnchorBounds {
    pub start_x: f64,
    pub start_y: f64,
    pub end_x: f64,
    pub end_y: f64,
}

impl AnchorBounds {
    pub fn new(start_x: f64, start_y: f64, end_x: f64, end_y: f64) -> Self {
        Self {
            start_x,
            start_y,
            end_x,
            end_y,
        }
    }

    /// Anchor covering a (normalized) rectangle.
    pub fn from_rect(rect: Rect) -> Self {
        let rect = rect.abs();
        Self::new(rect.x0, rect.y0, rect.x1, rect.y1)
    }

    /// Copy whose extent on each axis is at least `min_extent`.
    pub fn clamped(&self, min_extent: f64) -> Self {
        let mut out = *self;
        if out.end_x - out.start_x < min_extent {
            out.end_x = out.start_x + min_extent;
        }
        if out.end_y - out.start_y < min_extent {
            out.end_y = out.start_y + min_extent;
        }
        out
    }

    pub fn to_rect(&self) -> Rect {
        Rect::new(self.start_x, self.start_y, self.end_x, self.end_y)
    }
}

/// Translate a shape by `(dx, dy)`. Components carry their children along.
pub fn move_shape(shape: &Shape, dx: f64, dy: f64) -> Shape {
    match shape {
        Shape::Element(element) => Shape::Element(move_element(element, dx, dy)),
        Shape::Component(component) => {
            let mut out = component.clone();
            let children = component
                .children()
                .iter()
                .map(|child| move_element(child, dx, dy))
                .collect();
            out.set_children(children);
            Shape::Component(out)
        }
    }
}

fn move_element(element: &Element, dx: f64, dy: f64) -> Element {
    let mut out = element.clone();
    out.set_frame(element.frame().translated(dx, dy));
    out
}

/// Scale a shape relative to `anchor` as if the dragged `edges` moved by
/// `(dx, dy)`.
///
/// Each coordinate keeps its ratio within the anchor bounds, so component
/// children keep their relative placement. Dragging an edge past the
/// opposite one inverts the shape: the corners cross but are not swapped.
/// Anchor extents below [`MIN_ANCHOR_EXTENT`] are clamped before dividing.
pub fn resize_shape(shape: &Shape, anchor: &AnchorBounds, dx: f64, dy: f64, edges: Edges) -> Shape {
    if edges.is_empty() {
        return shape.clone();
    }
    let clamped = anchor.clamped(MIN_ANCHOR_EXTENT);
    if clamped != *anchor {
        log::warn!("resize anchor below minimum extent, clamped: {:?}", anchor);
    }
    let anchor = &clamped;

    match shape {
        Shape::Element(element) => Shape::Element(resize_element(element, anchor, dx, dy, edges)),
        Shape::Component(component) => {
            let mut out = component.clone();
            let children = component
                .children()
                .iter()
                .map(|child| resize_element(child, anchor, dx, dy, edges))
                .collect();
            out.set_children(children);
            Shape::Component(out)
        }
    }
}

fn resize_element(element: &Element, anchor: &AnchorBounds, dx: f64, dy: f64, edges: Edges) -> Element {
    let mut out = element.clone();
    out.set_frame(resize_frame(element.frame(), anchor, dx, dy, edges));
    out
}

/// Apply the ratio formula to both corners of a frame.
pub fn resize_frame(frame: Frame, anchor: &AnchorBounds, dx: f64, dy: f64, edges: Edges) -> Frame {
    let map_x = axis_mapper(anchor.start_x, anchor.end_x, dx, edges.left, edges.right);
    let map_y = axis_mapper(anchor.start_y, anchor.end_y, dy, edges.top, edges.bottom);
    frame.mapped(map_x, map_y)
}

/// Build the per-axis coordinate mapping.
fn axis_mapper(start: f64, end: f64, delta: f64, drag_start: bool, drag_end: bool) -> impl Fn(f64) -> f64 {
    let extent = end - start;
    move |coord: f64| {
        if drag_end {
            let ratio = (coord - start) / extent;
            start + ratio * (end + delta - start)
        } else if drag_start {
            let ratio = (end - coord) / extent;
            end - ratio * (end - (start + delta))
        } else {
            coord
        }
    }
}

/// Translate every shape whose id is in `ids`.
pub fn move_all(shapes: &[Shape], ids: &[ShapeId], dx: f64, dy: f64) -> Vec<Shape> {
    shapes
        .iter()
        .map(|s| {
            if ids.contains(&s.id()) {
                move_shape(s, dx, dy)
            } else {
                s.clone()
            }
        })
        .collect()
}

/// Resize every shape whose id is in `ids` against the same anchor.
pub fn resize_all(shapes: &[Shape], ids: &[ShapeId], anchor: &AnchorBounds, dx: f64, dy: f64, edges: Edges) -> Vec<Shape> {
    shapes
        .iter()
        .map(|s| {
            if ids.contains(&s.id()) {
                resize_shape(s, anchor, dx, dy, edges)
            } else {
                s.clone()
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{Component, ElementKind, ShapeTrait};

    const EPS: f64 = 1e-9;

    fn rect(x1: f64, y1: f64, x2: f64, y2: f64) -> Element {
        Element::new(ElementKind::Rectangle, Frame::new(x1, y1, x2, y2))
    }

    fn assert_frame(frame: Frame, expected: (f64, f64, f64, f64)) {
        let (x1, y1, x2, y2) = frame.corners();
        assert!((x1 - expected.0).abs() < EPS, "x1 {x1} != {}", expected.0);
        assert!((y1 - expected.1).abs() < EPS, "y1 {y1} != {}", expected.1);
        assert!((x2 - expected.2).abs() < EPS, "x2 {x2} != {}", expected.2);
        assert!((y2 - expected.3).abs() < EPS, "y2 {y2} != {}", expected.3);
    }

    #[test]
    fn test_move_element() {
        let shape = Shape::Element(rect(0.0, 0.0, 10.0, 20.0));
        let moved = move_shape(&shape, 5.0, -5.0);
        assert_frame(moved.frame(), (5.0, -5.0, 15.0, 15.0));
        assert!((moved.frame().width() - 10.0).abs() < EPS);
    }

    #[test]
    fn test_move_component_carries_children() {
        let component = Component::new(vec![rect(0.0, 0.0, 10.0, 10.0), rect(20.0, 20.0, 30.0, 30.0)], 0);
        let moved = move_shape(&Shape::Component(component), 100.0, 50.0);
        let moved = moved.as_component().unwrap();
        assert_frame(moved.frame(), (100.0, 50.0, 130.0, 80.0));
        assert_frame(moved.children()[0].frame(), (100.0, 50.0, 110.0, 60.0));
        assert_frame(moved.children()[1].frame(), (120.0, 70.0, 130.0, 80.0));
    }

    #[test]
    fn test_move_identity() {
        let shape = Shape::Element(rect(3.5, -2.25, 17.0, 40.125));
        let back = move_shape(&move_shape(&shape, 12.3, -45.6), -12.3, 45.6);
        let (a, b) = (shape.frame().corners(), back.frame().corners());
        assert!((a.0 - b.0).abs() < 1e-9 && (a.1 - b.1).abs() < 1e-9);
        assert!((a.2 - b.2).abs() < 1e-9 && (a.3 - b.3).abs() < 1e-9);
    }

    #[test]
    fn test_resize_right_edge() {
        let shape = Shape::Element(rect(0.0, 0.0, 100.0, 50.0));
        let anchor = AnchorBounds::new(0.0, 0.0, 100.0, 50.0);
        let edges = Edges::from_direction(ResizeDirection::East);
        let resized = resize_shape(&shape, &anchor, 50.0, 999.0, edges);
        assert_frame(resized.frame(), (0.0, 0.0, 150.0, 50.0));
        assert!((resized.frame().width() - 150.0).abs() < EPS);
    }

    #[test]
    fn test_resize_top_left_corner() {
        let shape = Shape::Element(rect(0.0, 0.0, 100.0, 100.0));
        let anchor = AnchorBounds::new(0.0, 0.0, 100.0, 100.0);
        let edges = Edges::from_direction(ResizeDirection::NorthWest);
        let resized = resize_shape(&shape, &anchor, -20.0, 10.0, edges);
        assert_frame(resized.frame(), (-20.0, 10.0, 100.0, 100.0));
    }

    #[test]
    fn test_resize_handles_unordered_corners() {
        let shape = Shape::Element(rect(100.0, 100.0, 0.0, 0.0));
        let anchor = AnchorBounds::new(0.0, 0.0, 100.0, 100.0);
        let edges = Edges::from_direction(ResizeDirection::SouthEast);
        let resized = resize_shape(&shape, &anchor, 100.0, 100.0, edges);
        assert_frame(resized.frame(), (200.0, 200.0, 0.0, 0.0));
    }

    #[test]
    fn test_resize_keeps_style() {
        let mut element = rect(0.0, 0.0, 10.0, 10.0);
        element.style.opacity = 0.5;
        element.style.rotation = 1.0;
        let shape = Shape::Element(element);
        let anchor = AnchorBounds::new(0.0, 0.0, 10.0, 10.0);
        let resized = resize_shape(&shape, &anchor, 5.0, 5.0, Edges::from_direction(ResizeDirection::SouthEast));
        assert_eq!(resized.style(), shape.style());
    }

    #[test]
    fn test_resize_component_proportional() {
        let component = Component::new(
            vec![rect(0.0, 0.0, 50.0, 50.0), rect(50.0, 50.0, 100.0, 100.0)],
            0,
        );
        let old = component.bounds();
        let anchor = AnchorBounds::from_rect(old);
        let edges = Edges::from_direction(ResizeDirection::SouthEast);
        let resized = resize_shape(&Shape::Component(component.clone()), &anchor, 100.0, 50.0, edges);
        let resized = resized.as_component().unwrap();
        let new = resized.bounds();
        assert_eq!(new, Rect::new(0.0, 0.0, 200.0, 150.0));

        for (before, after) in component.children().iter().zip(resized.children()) {
            let (bx1, by1, bx2, by2) = before.frame().corners();
            let (ax1, ay1, ax2, ay2) = after.frame().corners();
            let rx = |c: f64, r: Rect| (c - r.x0) / r.width();
            let ry = |c: f64, r: Rect| (c - r.y0) / r.height();
            assert!((rx(bx1, old) - rx(ax1, new)).abs() < EPS);
            assert!((rx(bx2, old) - rx(ax2, new)).abs() < EPS);
            assert!((ry(by1, old) - ry(ay1, new)).abs() < EPS);
            assert!((ry(by2, old) - ry(ay2, new)).abs() < EPS);
        }
    }

    #[test]
    fn test_resize_past_opposite_edge_inverts() {
        let shape = Shape::Element(rect(0.0, 0.0, 100.0, 100.0));
        let anchor = AnchorBounds::new(0.0, 0.0, 100.0, 100.0);
        let resized = resize_shape(&shape, &anchor, -150.0, 0.0, Edges::from_direction(ResizeDirection::East));
        assert_frame(resized.frame(), (0.0, 0.0, -50.0, 100.0));
        assert!((resized.frame().width() - 50.0).abs() < EPS);
    }

    #[test]
    fn test_degenerate_anchor_is_clamped() {
        let shape = Shape::Element(rect(10.0, 0.0, 10.0, 10.0));
        let anchor = AnchorBounds::new(10.0, 0.0, 10.0, 10.0);
        let resized = resize_shape(&shape, &anchor, 20.0, 0.0, Edges::from_direction(ResizeDirection::East));
        let (x1, _, x2, _) = resized.frame().corners();
        assert!(x1.is_finite() && x2.is_finite());
    }

    #[test]
    fn test_move_all_only_touches_ids() {
        let a = Shape::Element(rect(0.0, 0.0, 10.0, 10.0));
        let b = Shape::Element(rect(20.0, 0.0, 30.0, 10.0));
        let ids = [a.id()];
        let out = move_all(&[a, b.clone()], &ids, 5.0, 0.0);
        assert_frame(out[0].frame(), (5.0, 0.0, 15.0, 10.0));
        assert_eq!(out[1], b);
    }
}
