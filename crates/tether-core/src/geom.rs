#![forbid(unsafe_code)]

//! Geometry shared by the diagram model and the overlay engine.
//!
//! Anchor rectangles, segment endpoints and label points are all plain `f64` values in one
//! untyped space; `tether-render` only reaches `euclid` through these aliases.

pub type Unit = euclid::UnknownUnit;

pub type Point = euclid::Point2D<f64, Unit>;
pub type Vector = euclid::Vector2D<f64, Unit>;
pub type Size = euclid::Size2D<f64, Unit>;
pub type Rect = euclid::Rect<f64, Unit>;

pub fn point(x: f64, y: f64) -> Point {
    euclid::point2(x, y)
}

pub fn vector(x: f64, y: f64) -> Vector {
    euclid::vec2(x, y)
}

pub fn size(width: f64, height: f64) -> Size {
    euclid::size2(width, height)
}

/// Builds a rectangle from its top-left corner and size (`x`, `y`, `width`, `height`).
pub fn rect(x: f64, y: f64, width: f64, height: f64) -> Rect {
    euclid::rect(x, y, width, height)
}
