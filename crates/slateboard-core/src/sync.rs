//! Real-time sync boundary.
//!
//! Incoming remote snapshots replace the local shape list wholesale
//! (last writer wins), except for shapes the local user has selected.
//! Outgoing snapshots are fire-and-forget and rate limited.

use crate::document::DocumentSnapshot;
use crate::layers::normalize_z_order;
use crate::shapes::{Element, Shape, ShapeId, ShapeTrait};

#[cfg(not(target_arch = "wasm32"))]
use std::time::{Duration, Instant};

#[cfg(target_arch = "wasm32")]
use web_time::{Duration, Instant};

/// Default cap on outgoing snapshots per second.
pub const MAX_SYNC_RATE_HZ: f64 = 10.0;

/// Every ID a top-level shape carries, children included.
fn all_ids(shape: &Shape) -> Vec<ShapeId> {
    let mut ids = vec![shape.id()];
    if let Shape::Component(c) = shape {
        ids.extend(c.children().iter().map(|e| e.id()));
    }
    ids
}

/// Drop the parts of a remote record that a kept local shape already
/// carries. A remote component keeps its other children; with one child
/// left it dissolves into that child, with none it disappears.
fn strip_kept(remote: Shape, kept_ids: &[ShapeId]) -> Option<Shape> {
    if kept_ids.contains(&remote.id()) {
        return None;
    }
    let component = match remote {
        Shape::Element(_) => return Some(remote),
        Shape::Component(c) => c,
    };
    if !component.children().iter().any(|e| kept_ids.contains(&e.id())) {
        return Some(Shape::Component(component));
    }

    let z_index = component.z_index;
    let mut children: Vec<Element> = component
        .children()
        .iter()
        .filter(|e| !kept_ids.contains(&e.id()))
        .cloned()
        .collect();
    match children.len() {
        0 => None,
        1 => children.pop().map(|mut child| {
            child.z_index = z_index;
            child.level = 0;
            Shape::Element(child)
        }),
        _ => {
            let mut component = component;
            component.set_children(children);
            Some(Shape::Component(component))
        }
    }
}

/// Merge an incoming remote shape list into the local one.
///
/// The remote list wins, except that locally selected shapes keep their
/// local version (a selected component keeps its children). Selected
/// shapes the remote no longer has are kept as well. Remote records that
/// share an ID with a kept local shape are trimmed so no shape appears
/// twice, and unselected shapes are never lost.
pub fn merge_remote(local: &[Shape], remote: Vec<Shape>, selected: &[ShapeId]) -> Vec<Shape> {
    let kept: Vec<Shape> = local
        .iter()
        .filter(|s| selected.contains(&s.id()))
        .cloned()
        .collect();
    let kept_ids: Vec<ShapeId> = kept.iter().flat_map(all_ids).collect();

    let remote_len = remote.len();
    let mut merged: Vec<Shape> = remote
        .into_iter()
        .filter_map(|r| strip_kept(r, &kept_ids))
        .collect();
    log::debug!(
        "merging {} remote shapes, keeping {} local selected shapes",
        remote_len,
        kept.len()
    );
    merged.extend(kept);
    normalize_z_order(merged)
}

/// Outbound boundary to the sync collaborator.
pub trait SyncSink {
    /// Hand a snapshot off for broadcast. Must not block on acknowledgment.
    fn push(&mut self, snapshot: &DocumentSnapshot);
}

impl SyncSink for Vec<DocumentSnapshot> {
    fn push(&mut self, snapshot: &DocumentSnapshot) {
        Vec::push(self, snapshot.clone());
    }
}

/// Rate limiter for outgoing snapshots. Only the latest held snapshot is
/// kept; intermediate ones are dropped.
#[derive(Debug, Clone)]
pub struct SyncThrottle {
    interval: Duration,
    last_sent: Option<Instant>,
    pending: Option<DocumentSnapshot>,
}

impl Default for SyncThrottle {
    fn default() -> Self {
        Self::new(MAX_SYNC_RATE_HZ)
    }
}

impl SyncThrottle {
    /// Create a throttle allowing at most `max_rate_hz` sends per second.
    /// A non-positive rate disables throttling.
    pub fn new(max_rate_hz: f64) -> Self {
        let interval = if max_rate_hz > 0.0 {
            Duration::try_from_secs_f64(1.0 / max_rate_hz).unwrap_or(Duration::MAX)
        } else {
            Duration::ZERO
        };
        Self {
            interval,
            last_sent: None,
            pending: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    fn ready(&self, now: Instant) -> bool {
        match self.last_sent {
            Some(last) => now.saturating_duration_since(last) >= self.interval,
            None => true,
        }
    }

    /// Offer a snapshot. Returns it if it may be sent now, otherwise holds
    /// it (replacing any older held snapshot).
    pub fn offer(&mut self, snapshot: DocumentSnapshot, now: Instant) -> Option<DocumentSnapshot> {
        if self.ready(now) {
            self.last_sent = Some(now);
            self.pending = None;
            Some(snapshot)
        } else {
            self.pending = Some(snapshot);
            None
        }
    }

    /// Release the held snapshot once the interval has elapsed.
    pub fn flush(&mut self, now: Instant) -> Option<DocumentSnapshot> {
        if self.pending.is_some() && self.ready(now) {
            self.last_sent = Some(now);
            self.pending.take()
        } else {
            None
        }
    }
}

/// A sink behind a throttle.
#[derive(Debug, Default)]
pub struct SyncOutbox<S: SyncSink> {
    sink: S,
    throttle: SyncThrottle,
}

impl<S: SyncSink> SyncOutbox<S> {
    pub fn new(sink: S, throttle: SyncThrottle) -> Self {
        Self { sink, throttle }
    }

    /// Publish a local edit. Returns true if it went out immediately.
    pub fn publish(&mut self, snapshot: DocumentSnapshot, now: Instant) -> bool {
        match self.throttle.offer(snapshot, now) {
            Some(snapshot) => {
                self.sink.push(&snapshot);
                true
            }
            None => {
                log::debug!("sync throttled, holding snapshot");
                false
            }
        }
    }

    /// Send any held snapshot whose interval has elapsed.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.throttle.flush(now) {
            Some(snapshot) => {
                self.sink.push(&snapshot);
                true
            }
            None => false,
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }
}
