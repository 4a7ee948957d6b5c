//! Straight-segment edge geometry between two anchors.
//!
//! An edge leaves its source at the middle of the bottom border and enters its target at the
//! middle of the top border. Both rectangles must be in the same (overlay-local) space.

use serde::{Deserialize, Serialize};
use tether_core::geom::{Point, Rect, point};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl Segment {
    /// Raw segment from `from`'s bottom-center to `to`'s top-center, without inset.
    pub fn between(from: &Rect, to: &Rect) -> Self {
        let start = exit_point(from);
        let end = entry_point(to);
        Self {
            x1: start.x,
            y1: start.y,
            x2: end.x,
            y2: end.y,
        }
    }

    /// Pulls both ends off the box borders along the vertical axis: down from the source, up
    /// from the target.
    pub fn inset(self, px: f64) -> Self {
        Self {
            y1: self.y1 + px,
            y2: self.y2 - px,
            ..self
        }
    }

    pub fn start(&self) -> Point {
        point(self.x1, self.y1)
    }

    pub fn end(&self) -> Point {
        point(self.x2, self.y2)
    }

    pub fn length(&self) -> f64 {
        (self.end() - self.start()).length()
    }
}

pub fn exit_point(r: &Rect) -> Point {
    point(r.min_x() + r.width() / 2.0, r.min_y() + r.height())
}

pub fn entry_point(r: &Rect) -> Point {
    point(r.min_x() + r.width() / 2.0, r.min_y())
}

/// Segment for an edge whose endpoints may not be mounted. Either side missing means no
/// segment at all; there is no partial line.
pub fn edge_segment(from: Option<Rect>, to: Option<Rect>) -> Option<Segment> {
    Some(Segment::between(&from?, &to?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tether_core::geom::rect;

    #[test]
    fn vertical_edge_between_stacked_boxes() {
        let s = Segment::between(
            &rect(100.0, 100.0, 200.0, 40.0),
            &rect(100.0, 300.0, 200.0, 40.0),
        );
        assert_eq!(
            s,
            Segment {
                x1: 200.0,
                y1: 140.0,
                x2: 200.0,
                y2: 300.0
            }
        );
        assert_eq!(s.length(), 160.0);
    }

    #[test]
    fn inset_moves_only_vertical_ends() {
        let s = Segment {
            x1: 10.0,
            y1: 20.0,
            x2: 30.0,
            y2: 60.0,
        }
        .inset(2.0);
        assert_eq!(
            s,
            Segment {
                x1: 10.0,
                y1: 22.0,
                x2: 30.0,
                y2: 58.0
            }
        );
    }

    #[test]
    fn endpoints_depend_only_on_their_own_box() {
        let a = rect(-40.0, 7.0, 31.0, 13.0);
        for b in [
            rect(0.0, 0.0, 1.0, 1.0),
            rect(900.0, -300.0, 44.0, 2.0),
            rect(-1e4, 1e4, 0.0, 0.0),
        ] {
            let s = Segment::between(&a, &b);
            assert_eq!(s.x1, a.min_x() + a.width() / 2.0);
            assert_eq!(s.y1, a.min_y() + a.height());
            assert_eq!(s.x2, b.min_x() + b.width() / 2.0);
            assert_eq!(s.y2, b.min_y());
        }
    }

    #[test]
    fn missing_anchor_yields_no_segment() {
        let r = rect(0.0, 0.0, 10.0, 10.0);
        assert!(edge_segment(Some(r), None).is_none());
        assert!(edge_segment(None, Some(r)).is_none());
        assert!(edge_segment(None, None).is_none());
        assert!(edge_segment(Some(r), Some(r)).is_some());
    }
}
