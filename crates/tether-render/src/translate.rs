//! Viewport space to overlay-local space.

use tether_core::geom::{Point, Rect};

/// Moves a viewport-space rectangle into the coordinate space of an overlay whose top-left
/// corner sits at `overlay_origin` (also in viewport space).
pub fn to_local(rect: Rect, overlay_origin: Point) -> Rect {
    rect.translate(-overlay_origin.to_vector())
}
