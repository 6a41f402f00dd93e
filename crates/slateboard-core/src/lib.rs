//! Slateboard Core Library
//!
//! Shape geometry, snapping, layering and selection for the Slateboard
//! whiteboard. Rendering and transport live outside this crate.

pub mod document;
pub mod editor;
pub mod handles;
pub mod history;
pub mod input;
pub mod layers;
pub mod selection;
pub mod shapes;
pub mod snap;
pub mod storage;
pub mod sync;
pub mod tools;
pub mod transform;

pub use document::{Document, DocumentSnapshot};
pub use editor::{Editor, EditorConfig, EditorEffect, InteractionState};
pub use handles::{CursorGlyph, HandleHit, HitResult, ResizeDirection, classify};
pub use history::History;
pub use input::{KeyCommand, Modifiers, PointerEvent};
pub use layers::{GroupOutcome, LayerError, Promotion, ZOrderViolation, check_z_order, group, promote, reorder, ungroup};
pub use selection::Selection;
pub use shapes::{Component, Element, ElementKind, Frame, Shape, ShapeId, ShapeStyle, ShapeTrait};
pub use snap::{SnapConfig, SnapMode, SnapResult, SnapTarget, SnapTargetKind, StickySnap, snap_point, snap_rectangle, snap_to_grid, GRID_SIZE};
pub use storage::{MemoryStorage, Storage, StorageError};
pub use sync::{SyncOutbox, SyncSink, SyncThrottle, merge_remote};
pub use tools::ToolKind;
pub use transform::{AnchorBounds, Edges, move_shape, resize_shape};
