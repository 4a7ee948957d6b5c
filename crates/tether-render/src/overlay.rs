//! Frame composition: everything the overlay draws after one pass, in drawing order.

use crate::anchor::LayoutRect;
use crate::edge_geom::Segment;
use crate::layout::LayoutSurface;
use crate::marker::{marker_ids, marker_prefix};
use crate::options::{EngineOptions, GeometryOptions};
use crate::relationship::{Geometry, RelationshipKind, RelationshipTable};
use serde::Serialize;
use tether_core::geom::Size;
use tether_core::{Diagram, EdgeColor};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawnEdge {
    /// Index into the diagram's edges.
    pub edge: usize,
    pub from: String,
    pub to: String,
    pub color: EdgeColor,
    pub stroke: &'static str,
    pub marker_id: String,
    /// Border-to-border segment.
    pub segment: Segment,
    /// The drawn line: `segment` with the vertical inset applied.
    pub line: Segment,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawnLabel {
    pub edge: usize,
    pub text: String,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DrawnBox {
    pub id: String,
    #[serde(flatten)]
    pub rect: LayoutRect,
}

/// One complete overlay frame in overlay-local coordinates.
///
/// A frame is rebuilt from scratch on every pass; it never carries anything over from the
/// previous frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlayFrame {
    pub width: f64,
    pub height: f64,
    pub edges: Vec<DrawnEdge>,
    pub labels: Vec<DrawnLabel>,
    pub boxes: Vec<DrawnBox>,
    /// Edges not drawn in this frame because an endpoint is not mounted.
    pub unresolved_edges: Vec<usize>,
}

impl OverlayFrame {
    pub fn empty(container: Size) -> Self {
        Self {
            width: container.width,
            height: container.height,
            edges: Vec::new(),
            labels: Vec::new(),
            boxes: Vec::new(),
            unresolved_edges: Vec::new(),
        }
    }

    pub fn compose(
        diagram: &Diagram,
        table: &RelationshipTable,
        markers: &[String],
        container: Size,
        geometry: &GeometryOptions,
    ) -> Self {
        let mut frame = Self::empty(container);
        for r in table.iter() {
            let edge = &diagram.edges()[r.edge];
            match (r.kind, r.state.geometry()) {
                (RelationshipKind::Edge, Some(Geometry::Segment(segment))) => {
                    frame.edges.push(DrawnEdge {
                        edge: r.edge,
                        from: edge.from.clone(),
                        to: edge.to.clone(),
                        color: edge.color,
                        stroke: edge.color.stroke(),
                        marker_id: markers[r.edge].clone(),
                        segment,
                        line: segment.inset(geometry.inset),
                    });
                }
                (RelationshipKind::Edge, _) => frame.unresolved_edges.push(r.edge),
                (RelationshipKind::Label, Some(Geometry::Label(p))) => {
                    if let Some(text) = &edge.label {
                        frame.labels.push(DrawnLabel {
                            edge: r.edge,
                            text: text.clone(),
                            x: p.x,
                            y: p.y,
                        });
                    }
                }
                (RelationshipKind::Label, _) => {}
            }
        }
        frame.boxes = table
            .boxes()
            .iter()
            .map(|(id, r)| DrawnBox {
                id: id.clone(),
                rect: (*r).into(),
            })
            .collect();
        frame
    }

    /// Measures `layout` once and composes a frame, without any watching. The container is
    /// taken from the same snapshot.
    pub fn measure(
        diagram: &Diagram,
        layout: &impl LayoutSurface,
        options: &EngineOptions,
    ) -> Self {
        let snapshot = layout.snapshot();
        let mut table = RelationshipTable::for_diagram(diagram);
        table.recompute(diagram, &snapshot, &options.geometry);
        let markers = diagram_markers(diagram, options);
        Self::compose(
            diagram,
            &table,
            &markers,
            snapshot.container_size(),
            &options.geometry,
        )
    }
}

/// Marker ids for every edge of `diagram`, scoped by the overlay's root id.
pub fn diagram_markers(diagram: &Diagram, options: &EngineOptions) -> Vec<String> {
    let prefix = marker_prefix(
        options.overlay.svg_id.as_deref(),
        &options.overlay.marker_prefix,
    );
    marker_ids(&prefix, diagram.edges())
}
