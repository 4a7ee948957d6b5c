#![forbid(unsafe_code)]

//! Diagram model for `tether` (headless).
//!
//! A diagram is a fixed set of named nodes and directed, colored edges declared once at
//! construction. Nodes carry no geometry: their on-screen rectangles belong to an external
//! layout and are measured live by `tether-render`.
//!
//! Design goals:
//! - reject malformed definitions up front (duplicate ids, dangling edge endpoints)
//! - never assume the edges form a tree; any set of named anchors can be connected
//! - deterministic iteration order (declaration order) for reproducible output

pub mod decision_tree;
pub mod diagram;
pub mod error;
pub mod geom;
pub mod model;

pub use diagram::{Diagram, DiagramBuilder};
pub use error::{Error, Result};
pub use model::{Edge, EdgeColor, Node, NodeId, NodeRole, ResultCategory};

#[cfg(test)]
mod tests;
