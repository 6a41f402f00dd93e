//! Board document: the shape collection plus metadata.

use crate::layers::{check_z_order, normalize_z_order};
use crate::shapes::{Shape, ShapeId, union_bounds};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A board containing all shapes.
///
/// Shapes are kept sorted by z-index (back to front).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Unique document identifier.
    pub id: String,
    /// Document name.
    pub name: String,
    /// Top-level shapes, back to front.
    #[serde(default)]
    shapes: Vec<Shape>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: "Untitled".to_string(),
            shapes: Vec::new(),
        }
    }

    /// Create a document from shapes, packing their z-indices.
    pub fn with_shapes(shapes: Vec<Shape>) -> Self {
        Self {
            shapes: normalize_z_order(shapes),
            ..Self::new()
        }
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    /// Replace the shape collection.
    pub fn set_shapes(&mut self, mut shapes: Vec<Shape>) {
        shapes.sort_by_key(Shape::z_index);
        self.shapes = shapes;
    }

    /// Pack z-indices into the layout the layer operations expect.
    /// Returns true if anything was renumbered.
    pub fn normalize(&mut self) -> bool {
        if check_z_order(&self.shapes).is_ok() {
            return false;
        }
        self.shapes = normalize_z_order(std::mem::take(&mut self.shapes));
        log::info!("renumbered z-order of board {}", self.id);
        true
    }

    /// Get a top-level shape by ID.
    pub fn shape(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.iter().find(|s| s.id() == id)
    }

    /// Mutable access for geometry edits. Callers must not change z-indices.
    pub(crate) fn shape_mut(&mut self, id: ShapeId) -> Option<&mut Shape> {
        self.shapes.iter_mut().find(|s| s.id() == id)
    }

    /// The z-index a new top-level shape should take.
    pub fn next_z_index(&self) -> i64 {
        self.shapes.iter().map(Shape::block_size).sum()
    }

    /// Add a shape on top of everything else.
    pub fn insert(&mut self, mut shape: Shape) -> ShapeId {
        shape.place_at_z(self.next_z_index());
        let id = shape.id();
        self.shapes.push(shape);
        id
    }

    /// Remove shapes and close the z gaps they leave.
    pub fn remove(&mut self, ids: &[ShapeId]) -> Vec<Shape> {
        let (removed, kept): (Vec<Shape>, Vec<Shape>) =
            std::mem::take(&mut self.shapes).into_iter().partition(|s| ids.contains(&s.id()));
        self.shapes = normalize_z_order(kept);
        removed
    }

    /// Remove all shapes.
    pub fn clear(&mut self) {
        self.shapes.clear();
    }

    /// Get the bounding box of all shapes.
    pub fn bounds(&self) -> Option<Rect> {
        union_bounds(&self.shapes)
    }

    /// Find shapes at a point, front to back.
    pub fn shapes_at_point(&self, point: Point, tolerance: f64) -> Vec<ShapeId> {
        self.shapes
            .iter()
            .rev()
            .filter(|s| s.hit_test(point, tolerance))
            .map(Shape::id)
            .collect()
    }

    /// Topmost shape at a point.
    pub fn topmost_at(&self, point: Point, tolerance: f64) -> Option<ShapeId> {
        self.shapes
            .iter()
            .rev()
            .find(|s| s.hit_test(point, tolerance))
            .map(Shape::id)
    }

    /// Find shapes that intersect or are contained within a rectangle,
    /// back to front.
    pub fn shapes_in_rect(&self, rect: Rect) -> Vec<ShapeId> {
        self.shapes
            .iter()
            .filter(|s| s.intersects_rect(rect))
            .map(Shape::id)
            .collect()
    }

    /// Check if the document is empty.
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Get the number of top-level shapes.
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    /// Copy of the current state for history and sync.
    pub fn snapshot(&self) -> DocumentSnapshot {
        DocumentSnapshot {
            id: self.id.clone(),
            name: self.name.clone(),
            shapes: self.shapes.clone(),
        }
    }

    /// Serialize the document to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize a document from JSON. Shapes are sorted by z-index but
    /// not renumbered; see [`Document::normalize`].
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut doc: Self = serde_json::from_str(json)?;
        doc.shapes.sort_by_key(Shape::z_index);
        Ok(doc)
    }
}

/// Full document state handed to the store, the sync layer and history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentSnapshot {
    pub id: String,
    pub name: String,
    pub shapes: Vec<Shape>,
}

impl From<DocumentSnapshot> for Document {
    fn from(snapshot: DocumentSnapshot) -> Self {
        let mut doc = Self {
            id: snapshot.id,
            name: snapshot.name,
            shapes: Vec::new(),
        };
        doc.set_shapes(snapshot.shapes);
        doc
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
    fn test_document_creation() {
        let doc = Document::new();
        assert!(doc.is_empty());
        assert_eq!(doc.name, "Untitled");
        assert_eq!(doc.next_z_index(), 0);
    }

    #[test]
    fn test_insert_stacks_on_top() {
        let mut doc = Document::new();
        let a = doc.insert(rect(0.0, 0.0, 10.0, 10.0));
        let b = doc.insert(rect(5.0, 5.0, 15.0, 15.0));
        assert_eq!(doc.shape(a).unwrap().z_index(), 0);
        assert_eq!(doc.shape(b).unwrap().z_index(), 1);
        check_z_order(doc.shapes()).unwrap();
    }

    #[test]
    fn test_remove_closes_gaps() {
        let mut doc = Document::new();
        let a = doc.insert(rect(0.0, 0.0, 10.0, 10.0));
        let b = doc.insert(rect(20.0, 0.0, 30.0, 10.0));
        let c = doc.insert(rect(40.0, 0.0, 50.0, 10.0));
        let removed = doc.remove(&[b]);
        assert_eq!(removed.len(), 1);
        assert_eq!(doc.len(), 2);
        assert_eq!(doc.shape(a).unwrap().z_index(), 0);
        assert_eq!(doc.shape(c).unwrap().z_index(), 1);
    }

    #[test]
    fn test_shapes_at_point_front_to_back() {
        let mut doc = Document::new();
        let back = doc.insert(rect(0.0, 0.0, 100.0, 100.0));
        let front = doc.insert(rect(50.0, 50.0, 150.0, 150.0));
        assert_eq!(doc.shapes_at_point(Point::new(75.0, 75.0), 0.0), vec![front, back]);
        assert_eq!(doc.topmost_at(Point::new(10.0, 10.0), 0.0), Some(back));
        assert_eq!(doc.topmost_at(Point::new(500.0, 500.0), 0.0), None);
    }

    #[test]
    fn test_shapes_in_rect() {
        let mut doc = Document::new();
        let inside = doc.insert(rect(10.0, 10.0, 20.0, 20.0));
        let crossing = doc.insert(rect(90.0, 90.0, 120.0, 120.0));
        let _outside = doc.insert(rect(200.0, 200.0, 210.0, 210.0));
        assert_eq!(
            doc.shapes_in_rect(Rect::new(0.0, 0.0, 100.0, 100.0)),
            vec![inside, crossing]
        );
    }

    #[test]
    fn test_json_roundtrip() {
        let mut doc = Document::new();
        doc.insert(rect(0.0, 0.0, 10.0, 10.0));
        let json = doc.to_json().unwrap();
        let back = Document::from_json(&json).unwrap();
        assert_eq!(back, doc);
    }

    #[test]
    fn test_normalize_packs_loaded_gaps() {
        let mut doc = Document::new();
        doc.insert(rect(0.0, 0.0, 10.0, 10.0));
        doc.insert(rect(20.0, 0.0, 30.0, 10.0));
        let mut json: serde_json::Value = serde_json::from_str(&doc.to_json().unwrap()).unwrap();
        json["shapes"][1]["z_index"] = serde_json::json!(7);

        let mut loaded = Document::from_json(&json.to_string()).unwrap();
        assert!(check_z_order(loaded.shapes()).is_err());
        assert!(loaded.normalize());
        assert!(!loaded.normalize());
        assert_eq!(loaded, doc);
    }

    #[test]
    fn test_snapshot_into_document() {
        let mut doc = Document::new();
        doc.insert(rect(0.0, 0.0, 10.0, 10.0));
        let restored = Document::from(doc.snapshot());
        assert_eq!(restored, doc);
    }
}
