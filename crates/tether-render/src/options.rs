use serde::{Deserialize, Serialize};
use std::time::Duration;
use tether_core::geom::{Size, size};

/// Fixed offsets applied to computed edge and label geometry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GeometryOptions {
    /// Vertical gap kept between a drawn line end and the box border, at both ends.
    pub inset: f64,
    /// Horizontal shift of a label away from its edge midpoint.
    pub label_offset_x: f64,
}

impl Default for GeometryOptions {
    fn default() -> Self {
        Self {
            inset: 2.0,
            label_offset_x: 8.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WatcherOptions {
    /// One-shot recomputation of edges and labels after mount. `None` disables it (use when the
    /// layout is already final at mount time).
    pub edge_settle_ms: Option<u64>,
    /// One-shot re-measurement of the container after mount.
    pub container_settle_ms: Option<u64>,
    /// Overlay size used until the container is first measured with a non-empty size. Later
    /// passes that find an empty container keep the last measured size.
    pub initial_width: f64,
    pub initial_height: f64,
}

impl Default for WatcherOptions {
    fn default() -> Self {
        Self {
            edge_settle_ms: Some(100),
            container_settle_ms: Some(150),
            initial_width: 1100.0,
            initial_height: 700.0,
        }
    }
}

impl WatcherOptions {
    /// Layout is synchronous: measure once at mount, then only on resize.
    pub fn synchronous() -> Self {
        Self {
            edge_settle_ms: None,
            container_settle_ms: None,
            ..Self::default()
        }
    }

    pub fn edge_settle_delay(&self) -> Option<Duration> {
        self.edge_settle_ms.map(Duration::from_millis)
    }

    pub fn container_settle_delay(&self) -> Option<Duration> {
        self.container_settle_ms.map(Duration::from_millis)
    }

    pub fn initial_container(&self) -> Size {
        size(self.initial_width, self.initial_height)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OverlayOptions {
    /// Optional root `id`; also prefixes marker ids so several overlays can share a document.
    pub svg_id: Option<String>,
    pub marker_prefix: String,
    pub stroke_width: f64,
    pub label_color: String,
    pub label_font_size: f64,
    pub label_font_weight: u16,
    pub font_family: String,
    /// When true, outline every resolved anchor (debugging aid).
    pub include_anchor_boxes: bool,
}

impl Default for OverlayOptions {
    fn default() -> Self {
        Self {
            svg_id: None,
            marker_prefix: "ah".to_string(),
            stroke_width: 2.0,
            label_color: "#64748b".to_string(),
            label_font_size: 12.0,
            label_font_weight: 700,
            font_family: "-apple-system, BlinkMacSystemFont, sans-serif".to_string(),
            include_anchor_boxes: false,
        }
    }
}

/// All engine options, as accepted from a JSON options file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineOptions {
    pub geometry: GeometryOptions,
    pub watcher: WatcherOptions,
    pub overlay: OverlayOptions,
}

impl EngineOptions {
    pub fn from_json_str(text: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}
