use crate::edge_geom::{entry_point, exit_point};
use tether_core::geom::{Point, Rect, vector};

/// Caption position for an edge: halfway between the source exit and the target entry, pushed
/// `offset_x` to the right so the text does not sit on the line.
pub fn label_point(from: &Rect, to: &Rect, offset_x: f64) -> Point {
    exit_point(from).lerp(entry_point(to), 0.5) + vector(offset_x, 0.0)
}
