//! Component shape: a one-level composite of elements.

use super::{Element, Frame, ShapeId, ShapeStyle, ShapeTrait};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A composite of elements that moves, resizes and layers as one unit.
///
/// The frame is always the union of the children's frames. Children occupy
/// the z slots directly above the component's own z-index, in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    pub(crate) id: ShapeId,
    frame: Frame,
    #[serde(default)]
    pub z_index: i64,
    #[serde(default)]
    pub level: u32,
    /// Inert for components; kept so every record has the same shape.
    #[serde(default)]
    style: ShapeStyle,
    children: Vec<Element>,
}

impl Component {
    /// Create a top-level component at `z_index`.
    ///
    /// Children are stacked in the given order at `z_index + 1 ..` and moved
    /// one level down.
    pub fn new(children: Vec<Element>, z_index: i64) -> Self {
        Self::with_id(Uuid::new_v4(), children, z_index)
    }

    /// Create a component with a specific ID.
    pub fn with_id(id: ShapeId, mut children: Vec<Element>, z_index: i64) -> Self {
        for (i, child) in children.iter_mut().enumerate() {
            child.z_index = z_index + 1 + i as i64;
            child.level = 1;
        }
        let mut component = Self {
            id,
            frame: Frame::new(0.0, 0.0, 0.0, 0.0),
            z_index,
            level: 0,
            style: ShapeStyle::default(),
            children,
        };
        component.refresh_frame();
        component
    }

    /// Get the children of this component.
    pub fn children(&self) -> &[Element] {
        &self.children
    }

    /// Dissolve this component and return its children.
    pub fn into_children(self) -> Vec<Element> {
        self.children
    }

    pub fn frame(&self) -> Frame {
        self.frame
    }

    /// Replace the children and recompute the frame.
    pub(crate) fn set_children(&mut self, children: Vec<Element>) {
        self.children = children;
        self.refresh_frame();
    }

    /// Shift the component and its children in z.
    pub fn shift_z(&mut self, delta: i64) {
        self.z_index += delta;
        for child in &mut self.children {
            child.z_index += delta;
        }
    }

    /// Put the component at `z_index` and pack its children directly above it,
    /// keeping their relative paint order.
    pub fn restack(&mut self, z_index: i64) {
        self.z_index = z_index;
        self.level = 0;
        self.children.sort_by_key(|c| c.z_index);
        for (i, child) in self.children.iter_mut().enumerate() {
            child.z_index = z_index + 1 + i as i64;
            child.level = 1;
        }
    }

    /// Recompute the frame as the union of the children.
    pub fn refresh_frame(&mut self) {
        let union = self
            .children
            .iter()
            .map(|c| c.bounds())
            .reduce(|acc, b| acc.union(b))
            .unwrap_or(Rect::ZERO);
        self.frame = Frame::from_rect(union);
    }
}

impl ShapeTrait for Component {
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
        self.children.iter().any(|c| c.hit_test(point, tolerance))
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
    use crate::shapes::ElementKind;

    fn children() -> Vec<Element> {
        vec![
            Element::new(ElementKind::Rectangle, Frame::new(0.0, 0.0, 100.0, 50.0)),
            Element::new(ElementKind::Ellipse, Frame::new(200.0, 200.0, 250.0, 300.0)),
        ]
    }

    #[test]
    fn test_component_bounds_is_union() {
        let component = Component::new(children(), 0);
        let bounds = component.bounds();
        assert_eq!(bounds, Rect::new(0.0, 0.0, 250.0, 300.0));
        assert!((component.frame().width() - 250.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_children_stacked_above_parent() {
        let component = Component::new(children(), 3);
        let z: Vec<i64> = component.children().iter().map(|c| c.z_index).collect();
        assert_eq!(z, vec![4, 5]);
        assert!(component.children().iter().all(|c| c.level == 1));
    }

    #[test]
    fn test_component_hit_test() {
        let component = Component::new(children(), 0);
        assert!(component.hit_test(Point::new(50.0, 25.0), 0.0));
        assert!(component.hit_test(Point::new(225.0, 250.0), 0.0));
        // Inside the union but between children.
        assert!(!component.hit_test(Point::new(150.0, 100.0), 0.0));
    }

    #[test]
    fn test_restack_packs_children() {
        let mut component = Component::new(children(), 0);
        component.restack(7);
        assert_eq!(component.z_index, 7);
        let z: Vec<i64> = component.children().iter().map(|c| c.z_index).collect();
        assert_eq!(z, vec![8, 9]);
    }

    #[test]
    fn test_into_children() {
        let component = Component::new(children(), 0);
        assert_eq!(component.into_children().len(), 2);
    }
}
