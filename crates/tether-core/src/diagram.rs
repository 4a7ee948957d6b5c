use crate::model::{Edge, Node, NodeRole};
use crate::{Error, Result};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// A validated, immutable set of nodes and edges.
///
/// Every edge endpoint names a declared node and node ids are unique. Nodes and edges keep
/// their declaration order, which is also the drawing order of the overlay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "DiagramDef", into = "DiagramDef")]
pub struct Diagram {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    index: FxHashMap<String, usize>,
}

/// Wire shape of a diagram definition (unvalidated).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiagramDef {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
}

impl TryFrom<DiagramDef> for Diagram {
    type Error = Error;

    fn try_from(def: DiagramDef) -> Result<Self> {
        Diagram::new(def.nodes, def.edges)
    }
}

impl From<Diagram> for DiagramDef {
    fn from(diagram: Diagram) -> Self {
        Self {
            nodes: diagram.nodes,
            edges: diagram.edges,
        }
    }
}

impl Diagram {
    pub fn new(nodes: Vec<Node>, edges: Vec<Edge>) -> Result<Self> {
        let mut index = FxHashMap::default();
        index.reserve(nodes.len());
        for (i, node) in nodes.iter().enumerate() {
            if node.id.is_empty() {
                return Err(Error::EmptyNodeId { index: i });
            }
            match (node.role, node.result_category) {
                (NodeRole::Result, None) => {
                    return Err(Error::ResultCategoryMismatch {
                        id: node.id.clone(),
                        message: "result nodes require a result category",
                    });
                }
                (NodeRole::Start | NodeRole::DegreeSelector | NodeRole::Question, Some(_)) => {
                    return Err(Error::ResultCategoryMismatch {
                        id: node.id.clone(),
                        message: "only result nodes may carry a result category",
                    });
                }
                _ => {}
            }
            if index.insert(node.id.clone(), i).is_some() {
                return Err(Error::DuplicateNodeId {
                    id: node.id.clone(),
                });
            }
        }

        for (i, edge) in edges.iter().enumerate() {
            for endpoint in [&edge.from, &edge.to] {
                if !index.contains_key(endpoint.as_str()) {
                    return Err(Error::DanglingEdgeReference {
                        index: i,
                        from: edge.from.clone(),
                        to: edge.to.clone(),
                        missing: endpoint.clone(),
                    });
                }
            }
        }

        Ok(Self {
            nodes,
            edges,
            index,
        })
    }

    pub fn builder() -> DiagramBuilder {
        DiagramBuilder::default()
    }

    /// Parses and validates a JSON definition (`{"nodes": [...], "edges": [...]}`).
    pub fn from_json_str(text: &str) -> Result<Self> {
        let def: DiagramDef = serde_json::from_str(text)?;
        Self::try_from(def)
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.index.get(id).map(|&i| &self.nodes[i])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Edges leaving `id`, in declaration order.
    pub fn outgoing<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a Edge> + 'a {
        self.edges.iter().filter(move |e| e.from == id)
    }

    pub fn labeled_edge_count(&self) -> usize {
        self.edges.iter().filter(|e| e.label.is_some()).count()
    }
}

#[derive(Debug, Clone, Default)]
pub struct DiagramBuilder {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
}

impl DiagramBuilder {
    pub fn node(mut self, node: Node) -> Self {
        self.nodes.push(node);
        self
    }

    pub fn edge(mut self, edge: Edge) -> Self {
        self.edges.push(edge);
        self
    }

    pub fn build(self) -> Result<Diagram> {
        Diagram::new(self.nodes, self.edges)
    }
}
