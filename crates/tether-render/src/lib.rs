#![forbid(unsafe_code)]

//! Connector overlay engine.
//!
//! Boxes are placed by an external layout; this crate only measures them and connects them.
//! Each pass reads one [`layout::LayoutSnapshot`], resolves the anchors of every edge, converts
//! them into overlay-local coordinates and composes an [`overlay::OverlayFrame`] that
//! [`svg::render_overlay_svg`] turns into a single absolutely positioned SVG surface.
//!
//! [`watcher::LayoutWatcher`] drives those passes on mount, after a one-shot settle delay and on
//! every viewport resize published by a [`host::EventHost`].

pub mod anchor;
pub mod edge_geom;
pub mod host;
pub mod label;
pub mod layout;
pub mod marker;
pub mod options;
pub mod overlay;
pub mod relationship;
pub mod replay;
pub mod svg;
pub mod translate;
pub mod watcher;

pub use anchor::{AnchorMap, AnchorResolver};
pub use host::{EventHost, Viewport};
pub use layout::{LayoutSnapshot, LayoutSurface, SharedLayout};
pub use options::{EngineOptions, GeometryOptions, OverlayOptions, WatcherOptions};
pub use overlay::OverlayFrame;
pub use watcher::{LayoutWatcher, Trigger};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid layout snapshot: {message}")]
    InvalidSnapshot { message: String },
    #[error("layout JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
