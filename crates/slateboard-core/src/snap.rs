//! Snap functionality for aligning points and rectangles to the grid and to
//! other shapes.
//!
//! Candidates carry a priority rank (lower wins) so grid lines can be made
//! to outrank shape anchors or the other way round. Each axis is resolved
//! independently.

use crate::shapes::{Shape, ShapeId};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// Grid size for snapping (matches the visual grid).
pub const GRID_SIZE: f64 = 20.0;

/// Default snap distance in world units at zoom 1.
pub const DEFAULT_SNAP_THRESHOLD: f64 = 8.0;

/// Snap mode for aligning shapes to grid or other elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapMode {
    /// No snapping.
    None,
    /// Snap to grid lines.
    Grid,
    /// Snap to other shape edges/corners.
    Shapes,
    /// Snap to both grid and shapes.
    #[default]
    All,
}

impl SnapMode {
    /// Cycle to the next snap mode.
    pub fn next(self) -> Self {
        match self {
            SnapMode::None => SnapMode::Grid,
            SnapMode::Grid => SnapMode::Shapes,
            SnapMode::Shapes => SnapMode::All,
            SnapMode::All => SnapMode::None,
        }
    }

    /// Check if grid snapping is enabled.
    pub fn snaps_to_grid(self) -> bool {
        matches!(self, SnapMode::Grid | SnapMode::All)
    }

    /// Check if shape snapping is enabled.
    pub fn snaps_to_shapes(self) -> bool {
        matches!(self, SnapMode::Shapes | SnapMode::All)
    }

    /// Check if any snapping is enabled.
    pub fn is_enabled(self) -> bool {
        self != SnapMode::None
    }
}

/// Snapping configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapConfig {
    pub mode: SnapMode,
    /// Grid spacing in world units.
    pub grid_size: f64,
    /// Snap distance at zoom 1; scaled by `zoom_ratio`.
    pub snap_threshold: f64,
    /// Current viewport zoom.
    pub zoom_ratio: f64,
    /// Priority rank of grid candidates (lower wins).
    pub grid_priority: u8,
    /// Priority rank of shape candidates (lower wins).
    pub shape_priority: u8,
}

impl Default for SnapConfig {
    fn default() -> Self {
        Self {
            mode: SnapMode::default(),
            grid_size: GRID_SIZE,
            snap_threshold: DEFAULT_SNAP_THRESHOLD,
            zoom_ratio: 1.0,
            grid_priority: 2,
            shape_priority: 1,
        }
    }
}

impl SnapConfig {
    /// Effective snap distance in world units.
    pub fn threshold(&self) -> f64 {
        self.snap_threshold * self.zoom_ratio
    }
}

/// Coordinate axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
}

/// Type of snap target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapTargetKind {
    /// A grid line.
    Grid,
    /// Corner of a shape.
    Corner,
    /// Midpoint of an edge.
    Midpoint,
    /// Center of a shape.
    Center,
}

/// A point that can be snapped to on a shape.
#[derive(Debug, Clone, Copy)]
pub struct SnapTarget {
    /// The snap point location.
    pub point: Point,
    /// Type of snap target for visual feedback.
    pub kind: SnapTargetKind,
}

/// Collect snap targets from a shape's bounds.
pub fn get_snap_targets_from_bounds(bounds: Rect) -> Vec<SnapTarget> {
    let bounds = bounds.abs();
    let c = bounds.center();
    let target = |x: f64, y: f64, kind| SnapTarget {
        point: Point::new(x, y),
        kind,
    };
    vec![
        target(bounds.x0, bounds.y0, SnapTargetKind::Corner),
        target(bounds.x1, bounds.y0, SnapTargetKind::Corner),
        target(bounds.x1, bounds.y1, SnapTargetKind::Corner),
        target(bounds.x0, bounds.y1, SnapTargetKind::Corner),
        target(c.x, bounds.y0, SnapTargetKind::Midpoint),
        target(bounds.x1, c.y, SnapTargetKind::Midpoint),
        target(c.x, bounds.y1, SnapTargetKind::Midpoint),
        target(bounds.x0, c.y, SnapTargetKind::Midpoint),
        target(c.x, c.y, SnapTargetKind::Center),
    ]
}

/// A coordinate value eligible to attract a dragged coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SnapCandidate {
    pub axis: Axis,
    /// Coordinate on `axis` to snap to.
    pub value: f64,
    /// Lower wins.
    pub priority: u8,
    pub kind: SnapTargetKind,
    /// Shape the candidate came from (None for grid lines).
    pub source: Option<ShapeId>,
    /// Euclidean distance from the query point to the candidate point.
    pub distance: f64,
}

/// Result of a snap operation.
#[derive(Debug, Clone, Default)]
pub struct SnapResult {
    pub x: f64,
    pub y: f64,
    pub snapped_x: bool,
    pub snapped_y: bool,
    /// In-range candidates on x, for alignment guides.
    pub candidates_x: Vec<SnapCandidate>,
    /// In-range candidates on y, for alignment guides.
    pub candidates_y: Vec<SnapCandidate>,
}

impl SnapResult {
    /// Create a result with no snapping.
    pub fn none(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            ..Default::default()
        }
    }

    /// Check if any snapping occurred.
    pub fn is_snapped(&self) -> bool {
        self.snapped_x || self.snapped_y
    }

    pub fn snapped_axes(&self) -> usize {
        self.snapped_x as usize + self.snapped_y as usize
    }

    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Snap a point to the nearest grid intersection, ignoring thresholds.
pub fn snap_to_grid(point: Point, grid_size: f64) -> Point {
    Point::new(
        (point.x / grid_size).round() * grid_size,
        (point.y / grid_size).round() * grid_size,
    )
}

/// Gather every in-range candidate for the query point.
fn collect_candidates(
    x: f64,
    y: f64,
    shapes: &[Shape],
    exclude: &[ShapeId],
    config: &SnapConfig,
) -> (Vec<SnapCandidate>, Vec<SnapCandidate>) {
    let threshold = config.threshold();
    let mut xs = Vec::new();
    let mut ys = Vec::new();

    if config.mode.snaps_to_grid() && config.grid_size > 0.0 {
        let grid = snap_to_grid(Point::new(x, y), config.grid_size);
        if (grid.x - x).abs() <= threshold {
            xs.push(SnapCandidate {
                axis: Axis::X,
                value: grid.x,
                priority: config.grid_priority,
                kind: SnapTargetKind::Grid,
                source: None,
                distance: (grid.x - x).abs(),
            });
        }
        if (grid.y - y).abs() <= threshold {
            ys.push(SnapCandidate {
                axis: Axis::Y,
                value: grid.y,
                priority: config.grid_priority,
                kind: SnapTargetKind::Grid,
                source: None,
                distance: (grid.y - y).abs(),
            });
        }
    }

    if config.mode.snaps_to_shapes() {
        let query = Point::new(x, y);
        for shape in shapes.iter().filter(|s| !exclude.contains(&s.id())) {
            for target in get_snap_targets_from_bounds(shape.bounds()) {
                let distance = query.distance(target.point);
                if (target.point.x - x).abs() <= threshold {
                    xs.push(SnapCandidate {
                        axis: Axis::X,
                        value: target.point.x,
                        priority: config.shape_priority,
                        kind: target.kind,
                        source: Some(shape.id()),
                        distance,
                    });
                }
                if (target.point.y - y).abs() <= threshold {
                    ys.push(SnapCandidate {
                        axis: Axis::Y,
                        value: target.point.y,
                        priority: config.shape_priority,
                        kind: target.kind,
                        source: Some(shape.id()),
                        distance,
                    });
                }
            }
        }
    }

    (xs, ys)
}

/// Lowest priority first, then nearest.
fn best_candidate(candidates: &[SnapCandidate]) -> Option<&SnapCandidate> {
    candidates.iter().min_by(|a, b| {
        a.priority
            .cmp(&b.priority)
            .then(a.distance.total_cmp(&b.distance))
    })
}

/// Snap a point against the grid and the shapes not listed in `exclude`.
pub fn snap_point(x: f64, y: f64, shapes: &[Shape], exclude: &[ShapeId], config: &SnapConfig) -> SnapResult {
    if !config.mode.is_enabled() {
        return SnapResult::none(x, y);
    }
    let (candidates_x, candidates_y) = collect_candidates(x, y, shapes, exclude, config);
    let best_x = best_candidate(&candidates_x).map(|c| c.value);
    let best_y = best_candidate(&candidates_y).map(|c| c.value);

    SnapResult {
        x: best_x.unwrap_or(x),
        y: best_y.unwrap_or(y),
        snapped_x: best_x.is_some(),
        snapped_y: best_y.is_some(),
        candidates_x,
        candidates_y,
    }
}

/// Result of snapping a whole rectangle.
#[derive(Debug, Clone, Default)]
pub struct RectSnapResult {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    /// Offset applied uniformly to all four coordinates.
    pub offset_x: f64,
    pub offset_y: f64,
    pub snapped_x: bool,
    pub snapped_y: bool,
    pub candidates_x: Vec<SnapCandidate>,
    pub candidates_y: Vec<SnapCandidate>,
}

/// Snap a rectangle without skewing it.
///
/// Tries the top-left corner, the bottom-right corner and the center in that
/// order, keeps the attempt that snapped the most axes (first wins on ties)
/// and applies its offset to all four coordinates.
pub fn snap_rectangle(
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
    shapes: &[Shape],
    exclude: &[ShapeId],
    config: &SnapConfig,
) -> RectSnapResult {
    let bounds = Rect::new(x1, y1, x2, y2).abs();
    let probes = [
        Point::new(bounds.x0, bounds.y0),
        Point::new(bounds.x1, bounds.y1),
        bounds.center(),
    ];

    let mut best: Option<(Point, SnapResult)> = None;
    for probe in probes {
        let result = snap_point(probe.x, probe.y, shapes, exclude, config);
        let better = match &best {
            Some((_, current)) => result.snapped_axes() > current.snapped_axes(),
            None => true,
        };
        if better {
            best = Some((probe, result));
        }
    }

    let Some((probe, result)) = best else {
        return RectSnapResult {
            x1,
            y1,
            x2,
            y2,
            ..Default::default()
        };
    };
    let offset_x = result.x - probe.x;
    let offset_y = result.y - probe.y;
    RectSnapResult {
        x1: x1 + offset_x,
        y1: y1 + offset_y,
        x2: x2 + offset_x,
        y2: y2 + offset_y,
        offset_x,
        offset_y,
        snapped_x: result.snapped_x,
        snapped_y: result.snapped_y,
        candidates_x: result.candidates_x,
        candidates_y: result.candidates_y,
    }
}

/// Per-axis sticky snapping for drags.
///
/// Once an axis snaps, further pointer motion on that axis is held back and
/// accumulated; the held amount is released in one step once it exceeds
/// the threshold.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StickySnap {
    engaged_x: bool,
    engaged_y: bool,
    held_x: f64,
    held_y: f64,
}

impl StickySnap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_engaged(&self, axis: Axis) -> bool {
        match axis {
            Axis::X => self.engaged_x,
            Axis::Y => self.engaged_y,
        }
    }

    /// Turn a raw per-frame drag delta into the delta to apply.
    ///
    /// `bounds` is the current selection bounds before this frame's motion.
    pub fn adjust(
        &mut self,
        dx: f64,
        dy: f64,
        bounds: Rect,
        shapes: &[Shape],
        exclude: &[ShapeId],
        config: &SnapConfig,
    ) -> (f64, f64) {
        if !config.mode.is_enabled() {
            return (dx, dy);
        }
        let threshold = config.threshold();
        let moved = bounds + kurbo::Vec2::new(dx, dy);
        let snap = snap_rectangle(moved.x0, moved.y0, moved.x1, moved.y1, shapes, exclude, config);

        let out_x = Self::axis(&mut self.engaged_x, &mut self.held_x, dx, snap.snapped_x, snap.offset_x, threshold);
        let out_y = Self::axis(&mut self.engaged_y, &mut self.held_y, dy, snap.snapped_y, snap.offset_y, threshold);
        (out_x, out_y)
    }

    fn axis(engaged: &mut bool, held: &mut f64, delta: f64, snapped: bool, offset: f64, threshold: f64) -> f64 {
        if *engaged {
            *held += delta;
            if held.abs() > threshold {
                let release = *held;
                *held = 0.0;
                *engaged = false;
                return release;
            }
            return 0.0;
        }
        if snapped {
            *engaged = true;
            *held = 0.0;
            return delta + offset;
        }
        delta
    }
}
