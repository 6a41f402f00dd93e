//! Selection of top-level shapes.

use crate::shapes::{Shape, ShapeId, union_bounds};
use kurbo::Rect;
use serde::{Deserialize, Serialize};

/// Ordered set of selected shape IDs.
///
/// Order is insertion order; callers that need paint order sort by z.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    ids: Vec<ShapeId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ids(&self) -> &[ShapeId] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, id: ShapeId) -> bool {
        self.ids.contains(&id)
    }

    /// Replace the selection with a single shape.
    pub fn select(&mut self, id: ShapeId) {
        self.ids.clear();
        self.ids.push(id);
    }

    /// Replace the selection.
    pub fn set(&mut self, ids: impl IntoIterator<Item = ShapeId>) {
        self.ids.clear();
        self.extend(ids);
    }

    /// Add shapes that are not already selected.
    pub fn extend(&mut self, ids: impl IntoIterator<Item = ShapeId>) {
        for id in ids {
            if !self.ids.contains(&id) {
                self.ids.push(id);
            }
        }
    }

    /// Add or remove a shape. Returns true if it is now selected.
    pub fn toggle(&mut self, id: ShapeId) -> bool {
        if let Some(pos) = self.ids.iter().position(|&s| s == id) {
            self.ids.remove(pos);
            false
        } else {
            self.ids.push(id);
            true
        }
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Drop IDs that no longer name a shape in `shapes`.
    pub fn retain_existing(&mut self, shapes: &[Shape]) -> bool {
        let before = self.ids.len();
        self.ids.retain(|id| shapes.iter().any(|s| s.id() == *id));
        before != self.ids.len()
    }

    /// Selected shapes, in selection order.
    pub fn shapes<'a>(&self, shapes: &'a [Shape]) -> Vec<&'a Shape> {
        self.ids
            .iter()
            .filter_map(|id| shapes.iter().find(|s| s.id() == *id))
            .collect()
    }

    /// Union of the selected shapes' bounds.
    pub fn bounds(&self, shapes: &[Shape]) -> Option<Rect> {
        union_bounds(self.shapes(shapes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{Element, ElementKind, Frame};

    fn rect(x1: f64, y1: f64, x2: f64, y2: f64) -> Shape {
        Shape::Element(Element::new(ElementKind::Rectangle, Frame::new(x1, y1, x2, y2)))
    }

    #[test]
    fn test_toggle() {
        let shapes = [rect(0.0, 0.0, 1.0, 1.0)];
        let id = shapes[0].id();
        let mut selection = Selection::new();
        assert!(selection.toggle(id));
        assert!(selection.contains(id));
        assert!(!selection.toggle(id));
        assert!(selection.is_empty());
    }

    #[test]
    fn test_set_dedups() {
        let shapes = [rect(0.0, 0.0, 1.0, 1.0), rect(2.0, 2.0, 3.0, 3.0)];
        let mut selection = Selection::new();
        selection.set([shapes[0].id(), shapes[1].id(), shapes[0].id()]);
        assert_eq!(selection.ids(), &[shapes[0].id(), shapes[1].id()]);
    }

    #[test]
    fn test_bounds_union() {
        let shapes = vec![
            rect(0.0, 0.0, 10.0, 10.0),
            rect(40.0, 40.0, 50.0, 60.0),
            rect(100.0, 100.0, 200.0, 200.0),
        ];
        let mut selection = Selection::new();
        assert!(selection.bounds(&shapes).is_none());
        selection.set([shapes[0].id(), shapes[1].id()]);
        assert_eq!(selection.bounds(&shapes), Some(Rect::new(0.0, 0.0, 50.0, 60.0)));
    }

    #[test]
    fn test_retain_existing() {
        let shapes = vec![rect(0.0, 0.0, 10.0, 10.0)];
        let mut selection = Selection::new();
        selection.set([shapes[0].id(), uuid::Uuid::new_v4()]);
        assert!(selection.retain_existing(&shapes));
        assert_eq!(selection.len(), 1);
    }
}
