//! Watched relationships: one per edge, plus one per labelled edge for its caption.
//!
//! Each relationship walks `Uninitialized -> Pending -> Resolved | Unresolved` and re-enters
//! `Pending` on every recomputation. A pass resolves every relationship against one
//! [`LayoutSnapshot`], so a frame never mixes positions measured at different instants.

use crate::anchor::AnchorResolver;
use crate::edge_geom::{Segment, edge_segment};
use crate::label::label_point;
use crate::layout::LayoutSnapshot;
use crate::options::GeometryOptions;
use crate::translate::to_local;
use serde::Serialize;
use tether_core::Diagram;
use tether_core::geom::{Point, Rect};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RelationshipKind {
    Edge,
    Label,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Geometry {
    /// Raw segment, before the drawing inset.
    Segment(Segment),
    /// Label anchor point, offset already applied.
    Label(Point),
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum WatchState {
    #[default]
    Uninitialized,
    Pending,
    Resolved(Geometry),
    Unresolved,
}

impl WatchState {
    pub fn geometry(&self) -> Option<Geometry> {
        match self {
            Self::Resolved(g) => Some(*g),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Relationship {
    /// Index into the diagram's edges.
    pub edge: usize,
    pub kind: RelationshipKind,
    pub state: WatchState,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RelationshipTable {
    relationships: Vec<Relationship>,
    /// Overlay-local rectangles of every mounted diagram node, from the latest pass.
    boxes: Vec<(String, Rect)>,
}

impl RelationshipTable {
    /// Edges first, in declaration order, then the labels of labelled edges.
    pub fn for_diagram(diagram: &Diagram) -> Self {
        let edges = diagram.edges();
        let mut relationships = Vec::with_capacity(edges.len() + diagram.labeled_edge_count());
        relationships.extend((0..edges.len()).map(|edge| Relationship {
            edge,
            kind: RelationshipKind::Edge,
            state: WatchState::Uninitialized,
        }));
        relationships.extend(
            edges
                .iter()
                .enumerate()
                .filter(|(_, e)| e.label.is_some())
                .map(|(edge, _)| Relationship {
                    edge,
                    kind: RelationshipKind::Label,
                    state: WatchState::Uninitialized,
                }),
        );
        Self {
            relationships,
            boxes: Vec::new(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Relationship> {
        self.relationships.iter()
    }

    pub fn boxes(&self) -> &[(String, Rect)] {
        &self.boxes
    }

    pub fn mark_pending(&mut self) {
        for r in &mut self.relationships {
            r.state = WatchState::Pending;
        }
    }

    /// Settles every `Pending` relationship against `snapshot`.
    pub fn resolve_pending(
        &mut self,
        diagram: &Diagram,
        snapshot: &LayoutSnapshot,
        geometry: &GeometryOptions,
    ) {
        let origin = snapshot.overlay_origin;
        let local = |id: &str| snapshot.resolve(id).map(|r| to_local(r, origin));

        for r in &mut self.relationships {
            if r.state != WatchState::Pending {
                continue;
            }
            let edge = &diagram.edges()[r.edge];
            let (from, to) = (local(&edge.from), local(&edge.to));
            let resolved = match r.kind {
                RelationshipKind::Edge => edge_segment(from, to).map(Geometry::Segment),
                RelationshipKind::Label => from
                    .zip(to)
                    .map(|(a, b)| Geometry::Label(label_point(&a, &b, geometry.label_offset_x))),
            };
            r.state = match resolved {
                Some(g) => WatchState::Resolved(g),
                None => {
                    let missing = if from.is_none() { &edge.from } else { &edge.to };
                    tracing::debug!(
                        from = %edge.from,
                        to = %edge.to,
                        kind = ?r.kind,
                        missing = %missing,
                        "anchor not mounted; skipping"
                    );
                    WatchState::Unresolved
                }
            };
        }

        self.boxes = diagram
            .nodes()
            .iter()
            .filter_map(|n| local(&n.id).map(|r| (n.id.clone(), r)))
            .collect();
    }

    /// Full pass: every relationship goes back to `Pending`, then resolves.
    pub fn recompute(
        &mut self,
        diagram: &Diagram,
        snapshot: &LayoutSnapshot,
        geometry: &GeometryOptions,
    ) {
        self.mark_pending();
        self.resolve_pending(diagram, snapshot, geometry);
    }

    pub fn resolved_count(&self) -> usize {
        self.relationships
            .iter()
            .filter(|r| matches!(r.state, WatchState::Resolved(_)))
            .count()
    }

    pub fn unresolved_count(&self) -> usize {
        self.relationships
            .iter()
            .filter(|r| r.state == WatchState::Unresolved)
            .count()
    }
}
