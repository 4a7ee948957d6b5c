//! The layout collaborator: whatever places the boxes and can report where they ended up.

use crate::anchor::{AnchorMap, AnchorResolver, LayoutRect};
use crate::{Error, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::Rc;
use tether_core::geom::{Point, Rect, Size, point};

/// Everything one recomputation pass reads, captured at a single instant.
///
/// All coordinates are in viewport space. The container is the region the overlay must cover;
/// `overlay_origin` is where the overlay surface's own top-left corner currently sits (normally
/// the container origin, since the overlay is pinned to it).
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutSnapshot {
    pub container: Rect,
    pub overlay_origin: Point,
    pub anchors: AnchorMap,
}

impl LayoutSnapshot {
    /// A snapshot with the overlay pinned to the container's top-left corner.
    pub fn new(container: Rect, anchors: AnchorMap) -> Self {
        Self {
            overlay_origin: container.origin,
            container,
            anchors,
        }
    }

    pub fn container_size(&self) -> Size {
        self.container.size
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let def: LayoutSnapshotDef = serde_json::from_str(text)?;
        Self::try_from(def)
    }
}

impl Default for LayoutSnapshot {
    fn default() -> Self {
        Self::new(Rect::zero(), AnchorMap::new())
    }
}

impl AnchorResolver for LayoutSnapshot {
    fn resolve(&self, id: &str) -> Option<Rect> {
        self.anchors.resolve(id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutPoint {
    pub x: f64,
    pub y: f64,
}

/// JSON shape of a [`LayoutSnapshot`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutSnapshotDef {
    pub container: LayoutRect,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overlay_origin: Option<LayoutPoint>,
    #[serde(default)]
    pub anchors: IndexMap<String, LayoutRect>,
}

impl TryFrom<LayoutSnapshotDef> for LayoutSnapshot {
    type Error = Error;

    fn try_from(def: LayoutSnapshotDef) -> Result<Self> {
        if !def.container.is_well_formed() {
            return Err(Error::InvalidSnapshot {
                message: "container must have finite coordinates and a non-negative size"
                    .to_string(),
            });
        }
        let mut anchors = AnchorMap::new();
        for (id, r) in def.anchors {
            if !r.is_well_formed() {
                return Err(Error::InvalidSnapshot {
                    message: format!("anchor {id}: rectangle is not finite or has negative size"),
                });
            }
            anchors.mount(id, r.into());
        }
        let container: Rect = def.container.into();
        let overlay_origin = match def.overlay_origin {
            Some(p) if p.x.is_finite() && p.y.is_finite() => point(p.x, p.y),
            Some(_) => {
                return Err(Error::InvalidSnapshot {
                    message: "overlay origin must be finite".to_string(),
                });
            }
            None => container.origin,
        };
        Ok(Self {
            container,
            overlay_origin,
            anchors,
        })
    }
}

impl From<&LayoutSnapshot> for LayoutSnapshotDef {
    fn from(s: &LayoutSnapshot) -> Self {
        Self {
            container: s.container.into(),
            overlay_origin: Some(LayoutPoint {
                x: s.overlay_origin.x,
                y: s.overlay_origin.y,
            }),
            anchors: s
                .anchors
                .iter()
                .map(|(id, r)| (id.to_string(), r.into()))
                .collect(),
        }
    }
}

/// Live access to the current layout.
pub trait LayoutSurface {
    /// Captures the current layout. Called once per recomputation pass so that every edge and
    /// label of that pass sees the same positions.
    fn snapshot(&self) -> LayoutSnapshot;
}

impl LayoutSurface for LayoutSnapshot {
    fn snapshot(&self) -> LayoutSnapshot {
        self.clone()
    }
}

/// A single-threaded handle to a layout that the owner reflows between triggers.
///
/// Clones share the same state: the layout side keeps one handle and mutates it, the watcher
/// keeps another and reads it.
#[derive(Debug, Clone, Default)]
pub struct SharedLayout {
    inner: Rc<RefCell<LayoutSnapshot>>,
}

impl SharedLayout {
    pub fn new(snapshot: LayoutSnapshot) -> Self {
        Self {
            inner: Rc::new(RefCell::new(snapshot)),
        }
    }

    /// Replaces the whole layout (e.g. after a reflow).
    pub fn set(&self, snapshot: LayoutSnapshot) {
        *self.inner.borrow_mut() = snapshot;
    }

    pub fn update(&self, f: impl FnOnce(&mut LayoutSnapshot)) {
        f(&mut self.inner.borrow_mut());
    }

    pub fn mount(&self, id: impl Into<String>, rect: Rect) {
        self.inner.borrow_mut().anchors.mount(id, rect);
    }

    pub fn unmount(&self, id: &str) {
        self.inner.borrow_mut().anchors.unmount(id);
    }
}

impl LayoutSurface for SharedLayout {
    fn snapshot(&self) -> LayoutSnapshot {
        self.inner.borrow().clone()
    }
}

impl AnchorResolver for SharedLayout {
    fn resolve(&self, id: &str) -> Option<Rect> {
        self.inner.borrow().anchors.resolve(id)
    }
}
