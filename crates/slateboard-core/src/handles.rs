//! Zoom-aware resize handle hit testing.
//!
//! Given a cursor position and the selection bounds, decide whether the
//! cursor is over one of the eight resize handles, inside the selection
//! (move), or nowhere.

use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// Handle target size in screen pixels.
pub const HANDLE_TARGET_PX: f64 = 16.0;
/// Edge bands are this much thicker than corner radii.
pub const EDGE_THICKNESS_MULTIPLIER: f64 = 1.25;
/// Lower clamp for the handle radius, in world units.
pub const MIN_HANDLE_RADIUS: f64 = 8.0;
/// Upper clamp for the handle radius, in world units.
pub const MAX_HANDLE_RADIUS: f64 = 32.0;
/// Handle zones never exceed this fraction of the smaller selection side.
pub const MAX_HANDLE_FRACTION: f64 = 0.3;
/// Edge spans extend past the corners by up to this fraction of the
/// perpendicular side.
pub const EDGE_SPAN_EXPANSION: f64 = 0.4;

/// One of the eight resize directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResizeDirection {
    North,
    South,
    East,
    West,
    NorthEast,
    NorthWest,
    SouthEast,
    SouthWest,
}

impl ResizeDirection {
    /// Corner directions in hit-test order.
    pub const CORNERS: [ResizeDirection; 4] = [
        ResizeDirection::NorthWest,
        ResizeDirection::NorthEast,
        ResizeDirection::SouthWest,
        ResizeDirection::SouthEast,
    ];

    /// Edge directions in hit-test order.
    pub const EDGES: [ResizeDirection; 4] = [
        ResizeDirection::North,
        ResizeDirection::South,
        ResizeDirection::West,
        ResizeDirection::East,
    ];

    pub fn is_corner(self) -> bool {
        Self::CORNERS.contains(&self)
    }

    /// Cursor shown while hovering or dragging this handle.
    pub fn cursor(self) -> CursorGlyph {
        match self {
            ResizeDirection::NorthWest | ResizeDirection::SouthEast => CursorGlyph::ResizeNwse,
            ResizeDirection::NorthEast | ResizeDirection::SouthWest => CursorGlyph::ResizeNesw,
            ResizeDirection::North | ResizeDirection::South => CursorGlyph::ResizeNs,
            ResizeDirection::East | ResizeDirection::West => CursorGlyph::ResizeEw,
        }
    }

    /// Position of this handle on `bounds`.
    pub fn anchor_point(self, bounds: Rect) -> Point {
        let c = bounds.center();
        match self {
            ResizeDirection::NorthWest => Point::new(bounds.x0, bounds.y0),
            ResizeDirection::NorthEast => Point::new(bounds.x1, bounds.y0),
            ResizeDirection::SouthWest => Point::new(bounds.x0, bounds.y1),
            ResizeDirection::SouthEast => Point::new(bounds.x1, bounds.y1),
            ResizeDirection::North => Point::new(c.x, bounds.y0),
            ResizeDirection::South => Point::new(c.x, bounds.y1),
            ResizeDirection::West => Point::new(bounds.x0, c.y),
            ResizeDirection::East => Point::new(bounds.x1, c.y),
        }
    }
}

/// Pointer cursor the rendering consumer should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CursorGlyph {
    #[default]
    Default,
    Move,
    Crosshair,
    ResizeNwse,
    ResizeNesw,
    ResizeNs,
    ResizeEw,
}

impl CursorGlyph {
    /// CSS cursor name.
    pub fn css_name(self) -> &'static str {
        match self {
            CursorGlyph::Default => "default",
            CursorGlyph::Move => "move",
            CursorGlyph::Crosshair => "crosshair",
            CursorGlyph::ResizeNwse => "nwse-resize",
            CursorGlyph::ResizeNesw => "nesw-resize",
            CursorGlyph::ResizeNs => "ns-resize",
            CursorGlyph::ResizeEw => "ew-resize",
        }
    }
}

/// What the cursor is over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandleHit {
    Resize(ResizeDirection),
    Move,
    None,
}

/// Result of [`classify`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HitResult {
    pub direction: HandleHit,
    pub is_resize: bool,
    pub cursor: CursorGlyph,
}

impl HitResult {
    fn from_hit(direction: HandleHit) -> Self {
        let (is_resize, cursor) = match direction {
            HandleHit::Resize(dir) => (true, dir.cursor()),
            HandleHit::Move => (false, CursorGlyph::Move),
            HandleHit::None => (false, CursorGlyph::Default),
        };
        Self {
            direction,
            is_resize,
            cursor,
        }
    }

    /// The resize direction, if a handle was hit.
    pub fn resize_direction(&self) -> Option<ResizeDirection> {
        match self.direction {
            HandleHit::Resize(dir) => Some(dir),
            _ => None,
        }
    }
}

/// Handle zone sizes in world units for a given selection and zoom.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandleMetrics {
    pub corner_radius: f64,
    pub edge_thickness: f64,
}

/// Zoom-dependent divisor applied to the on-screen target size.
fn zoom_scale(zoom_ratio: f64) -> f64 {
    if zoom_ratio >= 1.0 {
        1.0 / zoom_ratio.sqrt()
    } else {
        1.0 + (1.0 - zoom_ratio) * 0.5
    }
}

/// Compute handle zone sizes for `bounds` at `zoom_ratio`.
pub fn handle_metrics(bounds: Rect, zoom_ratio: f64) -> HandleMetrics {
    let bounds = bounds.abs();
    let zoom_ratio = if zoom_ratio > 0.0 { zoom_ratio } else { 1.0 };
    let cap = bounds.width().min(bounds.height()) * MAX_HANDLE_FRACTION;
    let radius = (HANDLE_TARGET_PX / zoom_scale(zoom_ratio)).clamp(MIN_HANDLE_RADIUS, MAX_HANDLE_RADIUS);
    let thickness = (radius * EDGE_THICKNESS_MULTIPLIER).clamp(MIN_HANDLE_RADIUS, MAX_HANDLE_RADIUS);
    HandleMetrics {
        corner_radius: radius.min(cap),
        edge_thickness: thickness.min(cap),
    }
}

/// Classify `point` against `selection_bounds`.
///
/// Corners win over edges, edges win over the interior.
pub fn classify(point: Point, selection_bounds: Rect, zoom_ratio: f64) -> HitResult {
    let bounds = selection_bounds.abs();
    let metrics = handle_metrics(bounds, zoom_ratio);

    for dir in ResizeDirection::CORNERS {
        if point.distance(dir.anchor_point(bounds)) <= metrics.corner_radius {
            return HitResult::from_hit(HandleHit::Resize(dir));
        }
    }

    let h_slack = (bounds.height() * EDGE_SPAN_EXPANSION).min(metrics.edge_thickness);
    let v_slack = (bounds.width() * EDGE_SPAN_EXPANSION).min(metrics.edge_thickness);
    let within_x = point.x >= bounds.x0 - h_slack && point.x <= bounds.x1 + h_slack;
    let within_y = point.y >= bounds.y0 - v_slack && point.y <= bounds.y1 + v_slack;

    for dir in ResizeDirection::EDGES {
        let hit = match dir {
            ResizeDirection::North => within_x && (point.y - bounds.y0).abs() <= metrics.edge_thickness,
            ResizeDirection::South => within_x && (point.y - bounds.y1).abs() <= metrics.edge_thickness,
            ResizeDirection::West => within_y && (point.x - bounds.x0).abs() <= metrics.edge_thickness,
            ResizeDirection::East => within_y && (point.x - bounds.x1).abs() <= metrics.edge_thickness,
            _ => false,
        };
        if hit {
            return HitResult::from_hit(HandleHit::Resize(dir));
        }
    }

    let inside = point.x > bounds.x0 && point.x < bounds.x1 && point.y > bounds.y0 && point.y < bounds.y1;
    if inside {
        HitResult::from_hit(HandleHit::Move)
    } else {
        HitResult::from_hit(HandleHit::None)
    }
}
