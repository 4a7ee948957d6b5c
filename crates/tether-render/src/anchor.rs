//! Anchor lookup: node id to the current on-screen rectangle of the element bound to it.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tether_core::geom::{Rect, rect};

/// Answers "where is the element bound to this id right now?".
///
/// Implementations must read live layout state on every call. A `None` means the element is not
/// currently mounted; callers skip whatever depends on it and try again on the next pass.
pub trait AnchorResolver {
    fn resolve(&self, id: &str) -> Option<Rect>;
}

impl<T: AnchorResolver + ?Sized> AnchorResolver for &T {
    fn resolve(&self, id: &str) -> Option<Rect> {
        (**self).resolve(id)
    }
}

/// Output of one layout pass: viewport-space rectangles keyed by id, in mount order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnchorMap {
    rects: IndexMap<String, Rect>,
}

impl AnchorMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `id` to `rect`, returning the previous rectangle if the id was already mounted.
    pub fn mount(&mut self, id: impl Into<String>, rect: Rect) -> Option<Rect> {
        self.rects.insert(id.into(), rect)
    }

    pub fn unmount(&mut self, id: &str) -> Option<Rect> {
        self.rects.shift_remove(id)
    }

    pub fn len(&self) -> usize {
        self.rects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Rect)> + '_ {
        self.rects.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl AnchorResolver for AnchorMap {
    fn resolve(&self, id: &str) -> Option<Rect> {
        self.rects.get(id).copied()
    }
}

impl<S: Into<String>> FromIterator<(S, Rect)> for AnchorMap {
    fn from_iter<I: IntoIterator<Item = (S, Rect)>>(iter: I) -> Self {
        Self {
            rects: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// JSON shape of a rectangle (`{"x", "y", "width", "height"}`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl LayoutRect {
    pub fn is_well_formed(&self) -> bool {
        [self.x, self.y, self.width, self.height]
            .iter()
            .all(|v| v.is_finite())
            && self.width >= 0.0
            && self.height >= 0.0
    }
}

impl From<LayoutRect> for Rect {
    fn from(r: LayoutRect) -> Self {
        rect(r.x, r.y, r.width, r.height)
    }
}

impl From<Rect> for LayoutRect {
    fn from(r: Rect) -> Self {
        Self {
            x: r.origin.x,
            y: r.origin.y,
            width: r.size.width,
            height: r.size.height,
        }
    }
}
