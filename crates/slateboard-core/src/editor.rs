//! Interaction controller: the selection state machine.
//!
//! The editor owns the document, the selection, the active tool and the
//! gesture in progress. Every input handler is a transition from
//! (state, event) to a new state plus a list of [`EditorEffect`]s for the
//! host to act on (persist, broadcast, repaint, change the cursor).

use crate::document::{Document, DocumentSnapshot};
use crate::handles::{self, CursorGlyph, HandleHit, ResizeDirection};
use crate::history::History;
use crate::input::{KeyCommand, PointerEvent};
use crate::layers::{self, LayerError, Promotion};
use crate::selection::Selection;
use crate::shapes::{Element, ElementKind, Frame, Shape, ShapeId, ShapeStyle, ShapeTrait};
use crate::snap::{self, SnapConfig, StickySnap};
use crate::sync::merge_remote;
use crate::tools::ToolKind;
use crate::transform::{self, AnchorBounds, Edges};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// Size given to shapes created with a click instead of a drag.
pub const DEFAULT_SHAPE_SIZE: f64 = 100.0;

/// Slack, in world units, when testing whether the pointer is over a shape.
pub const DEFAULT_HIT_TOLERANCE: f64 = 2.0;

/// Editor settings, loadable from JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Snapping settings; `snap.zoom_ratio` is the current viewport zoom.
    pub snap: SnapConfig,
    pub hit_tolerance: f64,
    pub default_shape_size: f64,
    /// Keep the creation tool active after drawing a shape.
    pub tool_lock: bool,
    /// Style applied to newly drawn shapes.
    pub style: ShapeStyle,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            snap: SnapConfig::default(),
            hit_tolerance: DEFAULT_HIT_TOLERANCE,
            default_shape_size: DEFAULT_SHAPE_SIZE,
            tool_lock: false,
            style: ShapeStyle::default(),
        }
    }
}

impl EditorConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// The gesture in progress.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum InteractionState {
    #[default]
    Idle,
    /// Rubber-band selection.
    Highlighting {
        origin: Point,
        current: Point,
        /// Add to the existing selection instead of replacing it.
        additive: bool,
    },
    Moving {
        last: Point,
        sticky: StickySnap,
    },
    Resizing {
        direction: ResizeDirection,
        /// Selection bounds at pointer-down.
        anchor: AnchorBounds,
        start: Point,
    },
    Drawing {
        id: ShapeId,
        origin: Point,
    },
}

impl InteractionState {
    pub fn is_idle(&self) -> bool {
        matches!(self, InteractionState::Idle)
    }

    pub fn name(&self) -> &'static str {
        match self {
            InteractionState::Idle => "idle",
            InteractionState::Highlighting { .. } => "highlighting",
            InteractionState::Moving { .. } => "moving",
            InteractionState::Resizing { .. } => "resizing",
            InteractionState::Drawing { .. } => "drawing",
        }
    }
}

/// Effects returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorEffect {
    /// A gesture or command changed the board. Emitted once per change;
    /// carries the new shape collection for the store, history and sync.
    Committed(Vec<Shape>),
    /// Undo/redo replaced the board with an earlier state.
    Restored(Vec<Shape>),
    SelectionChanged(Vec<ShapeId>),
    SetCursor(CursorGlyph),
    /// A command was refused; the board is unchanged.
    Rejected(LayerError),
    RenderNeeded,
}

/// Board editor.
#[derive(Debug, Clone)]
pub struct Editor {
    document: Document,
    selection: Selection,
    tool: ToolKind,
    config: EditorConfig,
    state: InteractionState,
    history: History,
    /// Shapes at pointer-down. Recorded on commit, restored on cancel.
    gesture_start: Option<Vec<Shape>>,
    /// Selection at pointer-down, restored on cancel.
    selection_start: Option<Selection>,
    cursor: CursorGlyph,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(Document::new(), EditorConfig::default())
    }
}

impl Editor {
    /// Create an editor over `document`, packing its z-indices first.
    pub fn new(mut document: Document, config: EditorConfig) -> Self {
        document.normalize();
        Self {
            document,
            selection: Selection::new(),
            tool: ToolKind::default(),
            config,
            state: InteractionState::Idle,
            history: History::new(),
            gesture_start: None,
            selection_start: None,
            cursor: CursorGlyph::Default,
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn shapes(&self) -> &[Shape] {
        self.document.shapes()
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Union bounds of the selected shapes, for drawing handles.
    pub fn selection_bounds(&self) -> Option<Rect> {
        self.selection.bounds(self.document.shapes())
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn tool(&self) -> ToolKind {
        self.tool
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Current cursor glyph.
    pub fn cursor(&self) -> CursorGlyph {
        self.cursor
    }

    pub fn zoom(&self) -> f64 {
        self.config.snap.zoom_ratio
    }

    pub fn set_zoom(&mut self, zoom_ratio: f64) {
        if zoom_ratio > 0.0 {
            self.config.snap.zoom_ratio = zoom_ratio;
        }
    }

    /// Rubber-band rectangle while highlighting.
    pub fn highlight_rect(&self) -> Option<Rect> {
        match self.state {
            InteractionState::Highlighting { origin, current, .. } => Some(Rect::from_points(origin, current)),
            _ => None,
        }
    }

    /// Switch tools, abandoning any gesture in progress.
    pub fn set_tool(&mut self, tool: ToolKind) -> Vec<EditorEffect> {
        let mut effects = self.cancel_gesture();
        self.tool = tool;
        let glyph = if tool.is_creation() {
            CursorGlyph::Crosshair
        } else {
            CursorGlyph::Default
        };
        self.set_cursor(glyph, &mut effects);
        effects
    }

    /// Replace the board, dropping selection and history.
    pub fn load_document(&mut self, document: Document) {
        self.cancel_gesture();
        self.document = document;
        self.document.normalize();
        self.selection.clear();
        self.history.clear();
    }

    /// Cursor the rendering consumer should show while hovering `point`.
    pub fn cursor_at(&self, point: Point) -> CursorGlyph {
        if self.tool.is_creation() {
            return CursorGlyph::Crosshair;
        }
        if let Some(bounds) = self.selection_bounds() {
            let hit = handles::classify(point, bounds, self.zoom());
            if hit.direction != HandleHit::None {
                return hit.cursor;
            }
        }
        if self.document.topmost_at(point, self.config.hit_tolerance).is_some() {
            CursorGlyph::Move
        } else {
            CursorGlyph::Default
        }
    }

    fn set_cursor(&mut self, glyph: CursorGlyph, effects: &mut Vec<EditorEffect>) {
        if self.cursor != glyph {
            self.cursor = glyph;
            effects.push(EditorEffect::SetCursor(glyph));
        }
    }

    fn selection_changed(&self) -> EditorEffect {
        EditorEffect::SelectionChanged(self.selection.ids().to_vec())
    }

    /// Selected IDs in paint order (back to front).
    fn selected_in_paint_order(&self) -> Vec<ShapeId> {
        let mut shapes = self.selection.shapes(self.document.shapes());
        shapes.sort_by_key(|s| s.z_index());
        shapes.iter().map(|s| s.id()).collect()
    }

    fn begin_gesture(&mut self) {
        self.gesture_start = Some(self.document.shapes().to_vec());
        self.selection_start = Some(self.selection.clone());
    }

    // --- Pointer handling ---

    /// Handle a pointer-down event.
    pub fn pointer_down(&mut self, event: PointerEvent) -> Vec<EditorEffect> {
        let mut effects = Vec::new();
        if !self.state.is_idle() {
            log::warn!("pointer down while {}; finishing that gesture first", self.state.name());
            effects.extend(self.pointer_up(event));
        }
        let point = event.point;
        let multi = event.modifiers.multi_select();

        if let Some(kind) = self.tool.element_kind() {
            self.begin_drawing(kind, point, &mut effects);
            return effects;
        }

        // Anywhere inside the selection bounds keeps the whole selection.
        if let Some(bounds) = self.selection_bounds() {
            let hit = handles::classify(point, bounds, self.zoom());
            match hit.direction {
                HandleHit::Resize(direction) => {
                    self.begin_gesture();
                    self.state = InteractionState::Resizing {
                        direction,
                        anchor: AnchorBounds::from_rect(bounds),
                        start: point,
                    };
                    self.set_cursor(hit.cursor, &mut effects);
                    log::debug!("resizing {} shapes from {:?}", self.selection.len(), direction);
                    return effects;
                }
                HandleHit::Move => {
                    self.begin_moving(point, &mut effects);
                    return effects;
                }
                HandleHit::None => {}
            }
        }

        match self.document.topmost_at(point, self.config.hit_tolerance) {
            Some(id) if self.selection.contains(id) => self.begin_moving(point, &mut effects),
            Some(id) if multi => {
                self.selection.toggle(id);
                effects.push(self.selection_changed());
                effects.push(EditorEffect::RenderNeeded);
            }
            Some(id) => {
                self.begin_gesture();
                self.selection.select(id);
                effects.push(self.selection_changed());
                self.state = InteractionState::Moving {
                    last: point,
                    sticky: StickySnap::new(),
                };
                self.set_cursor(CursorGlyph::Move, &mut effects);
            }
            None => {
                self.selection_start = Some(self.selection.clone());
                if !multi && !self.selection.is_empty() {
                    self.selection.clear();
                    effects.push(self.selection_changed());
                }
                self.state = InteractionState::Highlighting {
                    origin: point,
                    current: point,
                    additive: multi,
                };
                self.set_cursor(CursorGlyph::Default, &mut effects);
                effects.push(EditorEffect::RenderNeeded);
            }
        }
        effects
    }

    fn begin_moving(&mut self, point: Point, effects: &mut Vec<EditorEffect>) {
        self.begin_gesture();
        self.state = InteractionState::Moving {
            last: point,
            sticky: StickySnap::new(),
        };
        self.set_cursor(CursorGlyph::Move, effects);
    }

    fn begin_drawing(&mut self, kind: ElementKind, point: Point, effects: &mut Vec<EditorEffect>) {
        self.begin_gesture();
        let origin = snap::snap_point(point.x, point.y, self.document.shapes(), &[], &self.config.snap).point();
        let mut element = Element::new(kind, Frame::new(origin.x, origin.y, origin.x, origin.y));
        element.style = self.config.style.clone();
        log::debug!("drawing {} at ({}, {})", element.kind.name(), origin.x, origin.y);
        let id = self.document.insert(Shape::Element(element));
        self.selection.select(id);
        self.state = InteractionState::Drawing { id, origin };
        effects.push(self.selection_changed());
        effects.push(EditorEffect::RenderNeeded);
        self.set_cursor(CursorGlyph::Crosshair, effects);
    }

    /// Handle a pointer-move event.
    pub fn pointer_move(&mut self, event: PointerEvent) -> Vec<EditorEffect> {
        let point = event.point;
        let mut effects = Vec::new();

        match self.state.clone() {
            InteractionState::Idle => {
                let glyph = self.cursor_at(point);
                self.set_cursor(glyph, &mut effects);
            }
            InteractionState::Highlighting { origin, additive, .. } => {
                self.state = InteractionState::Highlighting {
                    origin,
                    current: point,
                    additive,
                };
                effects.push(EditorEffect::RenderNeeded);
            }
            InteractionState::Moving { last, mut sticky } => {
                let ids = self.selection.ids().to_vec();
                if let Some(bounds) = self.selection_bounds() {
                    let (dx, dy) = sticky.adjust(
                        point.x - last.x,
                        point.y - last.y,
                        bounds,
                        self.document.shapes(),
                        &ids,
                        &self.config.snap,
                    );
                    if dx != 0.0 || dy != 0.0 {
                        let moved = transform::move_all(self.document.shapes(), &ids, dx, dy);
                        self.document.set_shapes(moved);
                        effects.push(EditorEffect::RenderNeeded);
                    }
                }
                self.state = InteractionState::Moving { last: point, sticky };
            }
            InteractionState::Resizing {
                direction,
                anchor,
                start,
            } => {
                self.resize_to(direction, anchor, start, point);
                effects.push(EditorEffect::RenderNeeded);
            }
            InteractionState::Drawing { id, origin } => {
                self.draw_to(id, origin, point);
                effects.push(EditorEffect::RenderNeeded);
            }
        }
        effects
    }

    /// Recompute the selected shapes from their pointer-down geometry.
    fn resize_to(&mut self, direction: ResizeDirection, anchor: AnchorBounds, start: Point, point: Point) {
        let Some(original) = self.gesture_start.as_ref() else {
            return;
        };
        let ids = self.selection.ids().to_vec();

        // Snap the dragged handle, not the raw pointer.
        let handle = direction.anchor_point(anchor.to_rect());
        let target = Point::new(handle.x + point.x - start.x, handle.y + point.y - start.y);
        let snapped = snap::snap_point(target.x, target.y, self.document.shapes(), &ids, &self.config.snap);
        let dx = snapped.x - handle.x;
        let dy = snapped.y - handle.y;

        let edges = Edges::from_direction(direction);
        let resized: Vec<Shape> = original
            .iter()
            .filter(|s| ids.contains(&s.id()))
            .map(|s| transform::resize_shape(s, &anchor, dx, dy, edges))
            .collect();
        let shapes = self
            .document
            .shapes()
            .iter()
            .map(|s| {
                resized
                    .iter()
                    .find(|r| r.id() == s.id())
                    .cloned()
                    .unwrap_or_else(|| s.clone())
            })
            .collect();
        self.document.set_shapes(shapes);
    }

    fn draw_to(&mut self, id: ShapeId, origin: Point, point: Point) {
        let snapped = snap::snap_point(point.x, point.y, self.document.shapes(), &[id], &self.config.snap);
        if let Some(Shape::Element(element)) = self.document.shape_mut(id) {
            element.set_frame(Frame::new(origin.x, origin.y, snapped.x, snapped.y));
        }
    }

    /// Give click-created shapes a usable size.
    fn finish_drawing(&mut self, id: ShapeId, origin: Point) {
        let size = self.config.default_shape_size;
        if let Some(Shape::Element(element)) = self.document.shape_mut(id) {
            let frame = element.frame();
            let x2 = if frame.width() < f64::EPSILON {
                origin.x + size
            } else {
                frame.x2()
            };
            let y2 = if frame.height() < f64::EPSILON {
                origin.y + size
            } else {
                frame.y2()
            };
            element.set_frame(Frame::new(frame.x1(), frame.y1(), x2, y2));
        }
    }

    /// Handle a pointer-up event.
    pub fn pointer_up(&mut self, event: PointerEvent) -> Vec<EditorEffect> {
        let point = event.point;
        let mut effects = Vec::new();
        let state = std::mem::take(&mut self.state);

        match state {
            InteractionState::Idle => {}
            InteractionState::Highlighting { origin, additive, .. } => {
                let rect = Rect::from_points(origin, point);
                // A plain click on empty canvas selects nothing.
                let hits = if rect.width() > 0.0 || rect.height() > 0.0 {
                    self.document.shapes_in_rect(rect)
                } else {
                    Vec::new()
                };
                let before = self.selection.clone();
                if additive {
                    self.selection.extend(hits);
                } else {
                    self.selection.set(hits);
                }
                if self.selection != before {
                    effects.push(self.selection_changed());
                }
                effects.push(EditorEffect::RenderNeeded);
            }
            InteractionState::Moving { .. } | InteractionState::Resizing { .. } => {
                self.commit_gesture(&mut effects);
            }
            InteractionState::Drawing { id, origin } => {
                self.draw_to(id, origin, point);
                self.finish_drawing(id, origin);
                self.commit_gesture(&mut effects);
                if !self.config.tool_lock {
                    self.tool = ToolKind::Select;
                }
            }
        }

        self.gesture_start = None;
        self.selection_start = None;
        let glyph = self.cursor_at(point);
        self.set_cursor(glyph, &mut effects);
        effects
    }

    fn commit_gesture(&mut self, effects: &mut Vec<EditorEffect>) {
        let Some(before) = self.gesture_start.take() else {
            return;
        };
        if before.as_slice() != self.document.shapes() {
            self.history.record(before);
            effects.push(EditorEffect::Committed(self.document.shapes().to_vec()));
            log::debug!("committed gesture on {} shapes", self.selection.len());
        }
        effects.push(EditorEffect::RenderNeeded);
    }

    /// Abort the gesture in progress, restoring the pointer-down state.
    /// Also used on focus loss.
    pub fn cancel_gesture(&mut self) -> Vec<EditorEffect> {
        let mut effects = Vec::new();
        let state = std::mem::take(&mut self.state);
        let before = self.gesture_start.take();
        let selection_before = self.selection_start.take();

        match &state {
            InteractionState::Idle => return effects,
            InteractionState::Highlighting { .. } => {}
            InteractionState::Moving { .. } | InteractionState::Resizing { .. } => {
                if let Some(before) = before {
                    self.restore_selected(&before);
                }
            }
            InteractionState::Drawing { id, .. } => {
                self.document.remove(&[*id]);
            }
        }
        log::debug!("cancelled {}", state.name());

        if let Some(selection) = selection_before {
            if selection != self.selection {
                self.selection = selection;
                effects.push(self.selection_changed());
            }
        }
        effects.push(EditorEffect::RenderNeeded);
        self.set_cursor(CursorGlyph::Default, &mut effects);
        effects
    }

    /// Put the selected shapes back to their `before` geometry, leaving
    /// everything else (e.g. remote edits) alone.
    fn restore_selected(&mut self, before: &[Shape]) {
        let ids = self.selection.ids();
        let shapes = self
            .document
            .shapes()
            .iter()
            .map(|s| {
                if ids.contains(&s.id()) {
                    before
                        .iter()
                        .find(|b| b.id() == s.id())
                        .cloned()
                        .unwrap_or_else(|| s.clone())
                } else {
                    s.clone()
                }
            })
            .collect();
        self.document.set_shapes(shapes);
    }

    // --- Keyboard commands ---

    /// Handle a discrete command. Only `Cancel` is accepted mid-gesture.
    pub fn key(&mut self, command: KeyCommand) -> Vec<EditorEffect> {
        if command == KeyCommand::Cancel {
            return self.cancel_gesture();
        }
        if !self.state.is_idle() {
            log::debug!("ignoring {:?} while {}", command, self.state.name());
            return Vec::new();
        }
        match command {
            KeyCommand::Delete => self.delete_selected(),
            KeyCommand::Group => self.group_selected(),
            KeyCommand::Ungroup => self.ungroup_selected(),
            KeyCommand::BringToFront => self.promote_selected(Promotion::ToFront),
            KeyCommand::SendToBack => self.promote_selected(Promotion::ToBack),
            KeyCommand::BringForward => self.promote_selected(Promotion::Forward),
            KeyCommand::SendBackward => self.promote_selected(Promotion::Backward),
            KeyCommand::Undo => self.undo(),
            KeyCommand::Redo => self.redo(),
            KeyCommand::SelectAll => self.select_all(),
            KeyCommand::Cancel => Vec::new(),
        }
    }

    /// Install a layer operation's result as one committed change.
    fn apply_layer_result(&mut self, result: Result<Vec<Shape>, LayerError>, effects: &mut Vec<EditorEffect>) -> bool {
        match result {
            Ok(shapes) => {
                if shapes.as_slice() != self.document.shapes() {
                    self.history.record(self.document.shapes().to_vec());
                    self.document.set_shapes(shapes);
                    effects.push(EditorEffect::Committed(self.document.shapes().to_vec()));
                }
                effects.push(EditorEffect::RenderNeeded);
                true
            }
            Err(err) => {
                log::warn!("layer command rejected: {err}");
                effects.push(EditorEffect::Rejected(err));
                false
            }
        }
    }

    fn delete_selected(&mut self) -> Vec<EditorEffect> {
        if self.selection.is_empty() {
            return Vec::new();
        }
        let before = self.document.shapes().to_vec();
        let removed = self.document.remove(self.selection.ids());
        log::debug!("deleted {} shapes", removed.len());
        self.history.record(before);
        self.selection.clear();
        vec![
            EditorEffect::Committed(self.document.shapes().to_vec()),
            self.selection_changed(),
            EditorEffect::RenderNeeded,
        ]
    }

    fn group_selected(&mut self) -> Vec<EditorEffect> {
        let mut effects = Vec::new();
        let ids = self.selected_in_paint_order();
        match layers::group(self.document.shapes(), &ids) {
            Ok(outcome) => {
                self.apply_layer_result(Ok(outcome.shapes), &mut effects);
                self.selection.select(outcome.component_id);
                effects.push(self.selection_changed());
            }
            Err(err) => {
                self.apply_layer_result(Err(err), &mut effects);
            }
        }
        effects
    }

    fn ungroup_selected(&mut self) -> Vec<EditorEffect> {
        let mut effects = Vec::new();
        let components: Vec<ShapeId> = self
            .selection
            .shapes(self.document.shapes())
            .iter()
            .filter(|s| s.is_component())
            .map(|s| s.id())
            .collect();

        let result = match (self.selection.ids().first(), components.is_empty()) {
            (None, _) => Err(LayerError::EmptySelection),
            (Some(&first), true) => Err(LayerError::NotAComponent(first)),
            (Some(_), false) => components
                .iter()
                .try_fold(self.document.shapes().to_vec(), |shapes, &id| layers::ungroup(&shapes, id)),
        };

        // Released children join the selection in place of their component.
        let children: Vec<ShapeId> = components
            .iter()
            .filter_map(|&id| self.document.shape(id))
            .filter_map(Shape::as_component)
            .flat_map(|c| c.children().iter().map(|e| e.id()))
            .collect();

        if self.apply_layer_result(result, &mut effects) {
            let kept: Vec<ShapeId> = self
                .selection
                .ids()
                .iter()
                .copied()
                .filter(|id| !components.contains(id))
                .collect();
            self.selection.set(kept.into_iter().chain(children));
            effects.push(self.selection_changed());
        }
        effects
    }

    fn promote_selected(&mut self, promotion: Promotion) -> Vec<EditorEffect> {
        let mut effects = Vec::new();
        let mut ids = self.selected_in_paint_order();
        // Process so the selection keeps its relative order.
        if matches!(promotion, Promotion::ToBack | Promotion::Forward) {
            ids.reverse();
        }
        let selected = ids.clone();
        let result = if ids.is_empty() {
            Err(LayerError::EmptySelection)
        } else {
            ids.iter().try_fold(self.document.shapes().to_vec(), |shapes, &id| {
                // A single step never jumps over another selected shape.
                let blocked = layers::step_neighbor(&shapes, id, promotion)
                    .is_some_and(|neighbor| selected.contains(&neighbor));
                if blocked {
                    return Ok(shapes);
                }
                layers::promote(&shapes, id, promotion)
            })
        };
        self.apply_layer_result(result, &mut effects);
        effects
    }

    fn restore(&mut self, shapes: Vec<Shape>) -> Vec<EditorEffect> {
        self.document.set_shapes(shapes);
        let mut effects = vec![EditorEffect::Restored(self.document.shapes().to_vec())];
        if self.selection.retain_existing(self.document.shapes()) {
            effects.push(self.selection_changed());
        }
        effects.push(EditorEffect::RenderNeeded);
        effects
    }

    /// Undo the last committed change.
    pub fn undo(&mut self) -> Vec<EditorEffect> {
        match self.history.undo(self.document.shapes().to_vec()) {
            Some(shapes) => self.restore(shapes),
            None => Vec::new(),
        }
    }

    /// Redo the last undone change.
    pub fn redo(&mut self) -> Vec<EditorEffect> {
        match self.history.redo(self.document.shapes().to_vec()) {
            Some(shapes) => self.restore(shapes),
            None => Vec::new(),
        }
    }

    fn select_all(&mut self) -> Vec<EditorEffect> {
        let before = self.selection.clone();
        self.selection
            .set(self.document.shapes().iter().map(Shape::id));
        if self.selection == before {
            return Vec::new();
        }
        vec![self.selection_changed(), EditorEffect::RenderNeeded]
    }

    // --- Sync ---

    /// Integrate an incoming remote snapshot (last writer wins, locally
    /// selected shapes excluded).
    pub fn apply_remote(&mut self, snapshot: DocumentSnapshot) -> Vec<EditorEffect> {
        let merged = merge_remote(self.document.shapes(), snapshot.shapes, self.selection.ids());
        self.document.set_shapes(merged);
        self.document.name = snapshot.name;

        let mut effects = Vec::new();
        if self.selection.retain_existing(self.document.shapes()) {
            effects.push(self.selection_changed());
        }
        effects.push(EditorEffect::RenderNeeded);
        effects
    }

    /// Snapshot of the current board for the store or sync layer.
    pub fn snapshot(&self) -> DocumentSnapshot {
        self.document.snapshot()
    }
}
