//! Layer ordering: grouping, ungrouping and z-order changes.
//!
//! Z-indices form one flat paint sequence `0..N` over every record on the
//! board. A top-level shape owns a block of `block_size()` consecutive slots:
//! its own slot followed by one slot per component child. Every operation
//! here returns a new collection sorted by z-index that satisfies this
//! layout, or an error and no change.

use crate::shapes::{Component, Element, Shape, ShapeId, ShapeTrait};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reasons a layer operation is refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayerError {
    #[error("cannot group a selection that contains a component")]
    NestedComponent,
    #[error("shape {0} is not a component")]
    NotAComponent(ShapeId),
    #[error("nothing selected")]
    EmptySelection,
    #[error("grouping needs at least 2 shapes, got {0}")]
    NotEnoughShapes(usize),
    #[error("unknown shape {0}")]
    UnknownShape(ShapeId),
    #[error("layer index {index} out of range ({len} layers)")]
    LayerIndexOutOfRange { index: usize, len: usize },
}

/// Where `promote` sends a shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Promotion {
    /// Topmost layer.
    ToFront,
    /// Bottom layer.
    ToBack,
    /// One layer up.
    Forward,
    /// One layer down.
    Backward,
}

/// Result of a successful `group`.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupOutcome {
    pub shapes: Vec<Shape>,
    pub component_id: ShapeId,
}

/// First broken z-order rule found by [`check_z_order`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ZOrderViolation {
    #[error("shape {id} has z-index {found}, expected {expected}")]
    ZIndex { id: ShapeId, expected: i64, found: i64 },
    #[error("child {child} of component {component} has z-index {found}, expected {expected}")]
    ChildOutsideBlock {
        component: ShapeId,
        child: ShapeId,
        expected: i64,
        found: i64,
    },
    #[error("shape {id} has level {found}, expected {expected}")]
    Level { id: ShapeId, expected: u32, found: u32 },
}

/// Top-level shapes in paint order (back to front).
pub fn layer_order(shapes: &[Shape]) -> Vec<&Shape> {
    let mut layers: Vec<&Shape> = shapes.iter().collect();
    layers.sort_by_key(|s| s.z_index());
    layers
}

fn sorted(mut shapes: Vec<Shape>) -> Vec<Shape> {
    shapes.sort_by_key(Shape::z_index);
    shapes
}

/// Renumber an arbitrary collection into the packed layout.
///
/// Relative paint order is kept; ties keep their collection order.
pub fn normalize_z_order(shapes: Vec<Shape>) -> Vec<Shape> {
    let mut shapes = sorted(shapes);
    let mut next = 0;
    for shape in &mut shapes {
        match shape {
            Shape::Element(e) => {
                e.z_index = next;
                e.level = 0;
            }
            Shape::Component(c) => c.restack(next),
        }
        next += shape.block_size();
    }
    shapes
}

/// Verify the packed layout.
pub fn check_z_order(shapes: &[Shape]) -> Result<(), ZOrderViolation> {
    let mut expected = 0;
    for shape in layer_order(shapes) {
        if shape.z_index() != expected {
            return Err(ZOrderViolation::ZIndex {
                id: shape.id(),
                expected,
                found: shape.z_index(),
            });
        }
        if shape.level() != 0 {
            return Err(ZOrderViolation::Level {
                id: shape.id(),
                expected: 0,
                found: shape.level(),
            });
        }
        if let Shape::Component(c) = shape {
            for (i, child) in c.children().iter().enumerate() {
                let child_expected = expected + 1 + i as i64;
                if child.z_index != child_expected {
                    return Err(ZOrderViolation::ChildOutsideBlock {
                        component: c.id(),
                        child: child.id(),
                        expected: child_expected,
                        found: child.z_index,
                    });
                }
                if child.level != 1 {
                    return Err(ZOrderViolation::Level {
                        id: child.id(),
                        expected: 1,
                        found: child.level,
                    });
                }
            }
        }
        expected += shape.block_size();
    }
    Ok(())
}

/// Wrap the selected top-level shapes in a new component.
///
/// Unselected shapes are packed from zero in their existing order and the
/// component takes the next free slot. Children are stacked in the order of
/// `selected_ids`.
pub fn group(shapes: &[Shape], selected_ids: &[ShapeId]) -> Result<GroupOutcome, LayerError> {
    if selected_ids.is_empty() {
        return Err(LayerError::EmptySelection);
    }
    if selected_ids.len() < 2 {
        return Err(LayerError::NotEnoughShapes(selected_ids.len()));
    }

    let mut children: Vec<Element> = Vec::with_capacity(selected_ids.len());
    for &id in selected_ids {
        match shapes.iter().find(|s| s.id() == id) {
            None => return Err(LayerError::UnknownShape(id)),
            Some(Shape::Component(_)) => return Err(LayerError::NestedComponent),
            Some(Shape::Element(e)) => children.push(e.clone()),
        }
    }

    let kept: Vec<Shape> = shapes
        .iter()
        .filter(|s| !selected_ids.contains(&s.id()))
        .cloned()
        .collect();
    let mut kept = normalize_z_order(kept);
    let next = kept.iter().map(Shape::block_size).sum::<i64>();

    let component = Component::new(children, next);
    let component_id = component.id();
    log::debug!(
        "grouped {} shapes into {} at z {}",
        selected_ids.len(),
        component_id,
        next
    );
    kept.push(Shape::Component(component));
    Ok(GroupOutcome {
        shapes: kept,
        component_id,
    })
}

/// Dissolve a component, putting its children back on the top level in place.
pub fn ungroup(shapes: &[Shape], component_id: ShapeId) -> Result<Vec<Shape>, LayerError> {
    let component = match shapes.iter().find(|s| s.id() == component_id) {
        None => return Err(LayerError::UnknownShape(component_id)),
        Some(Shape::Element(_)) => return Err(LayerError::NotAComponent(component_id)),
        Some(Shape::Component(c)) => c.clone(),
    };

    let mut result: Vec<Shape> = shapes
        .iter()
        .filter(|s| s.id() != component_id)
        .cloned()
        .collect();
    let children = component.into_children();
    log::debug!("ungrouped {} into {} shapes", component_id, children.len());
    result.extend(children.into_iter().map(|mut child| {
        child.level = 0;
        Shape::Element(child)
    }));
    Ok(normalize_z_order(result))
}

/// Move the layer at `dragged_index` to the position held by the layer at
/// `target_index`. Indices count top-level shapes in paint order.
///
/// Shapes between the two positions shift by the moving block's size to
/// close its old slot and open the new one.
pub fn reorder(shapes: &[Shape], dragged_index: usize, target_index: usize) -> Result<Vec<Shape>, LayerError> {
    let layers = layer_order(shapes);
    let len = layers.len();
    for index in [dragged_index, target_index] {
        if index >= len {
            return Err(LayerError::LayerIndexOutOfRange { index, len });
        }
    }

    let start = layers[dragged_index];
    let end = layers[target_index];
    let (start_id, start_z, start_block) = (start.id(), start.z_index(), start.block_size());
    let (end_z, end_block) = (end.z_index(), end.block_size());

    if start_z == end_z {
        return Ok(sorted(shapes.to_vec()));
    }

    let forward = start_z < end_z;
    let dest = if forward {
        end_z + end_block - start_block
    } else {
        end_z
    };

    let mut result = shapes.to_vec();
    for shape in &mut result {
        let z = shape.z_index();
        if shape.id() == start_id {
            shape.shift_z(dest - start_z);
        } else if forward && z > start_z && z <= end_z {
            shape.shift_z(-start_block);
        } else if !forward && z >= end_z && z < start_z {
            shape.shift_z(start_block);
        }
    }
    log::debug!("reordered {} from z {} to z {}", start_id, start_z, dest);
    Ok(sorted(result))
}

/// Move a shape to the front, the back, or one step either way.
pub fn promote(shapes: &[Shape], id: ShapeId, promotion: Promotion) -> Result<Vec<Shape>, LayerError> {
    let layers = layer_order(shapes);
    let index = layers
        .iter()
        .position(|s| s.id() == id)
        .ok_or(LayerError::UnknownShape(id))?;
    let last = layers.len() - 1;
    let target = match promotion {
        Promotion::ToFront => last,
        Promotion::ToBack => 0,
        Promotion::Forward => (index + 1).min(last),
        Promotion::Backward => index.saturating_sub(1),
    };
    reorder(shapes, index, target)
}

/// The top-level shape a one-step promotion would swap with, if any.
///
/// `None` for `ToFront`/`ToBack`, for an unknown ID, or when the shape is
/// already at the boundary.
pub fn step_neighbor(shapes: &[Shape], id: ShapeId, promotion: Promotion) -> Option<ShapeId> {
    let layers = layer_order(shapes);
    let index = layers.iter().position(|s| s.id() == id)?;
    let neighbor = match promotion {
        Promotion::Forward => index.checked_add(1)?,
        Promotion::Backward => index.checked_sub(1)?,
        Promotion::ToFront | Promotion::ToBack => return None,
    };
    layers.get(neighbor).map(|s| s.id())
}
