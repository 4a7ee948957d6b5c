use serde::{Deserialize, Serialize};

pub type NodeId = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeRole {
    Start,
    DegreeSelector,
    Question,
    Result,
}

/// Outcome shown by a `Result` node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResultCategory {
    #[serde(rename = "SN2")]
    Sn2,
    #[serde(rename = "SN1")]
    Sn1,
    E2,
    E1,
}

impl ResultCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sn2 => "SN2",
            Self::Sn1 => "SN1",
            Self::E2 => "E2",
            Self::E1 => "E1",
        }
    }
}

impl std::fmt::Display for ResultCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Semantic edge color. The stroke mapping is fixed: flow edges are gray, "yes" branches green,
/// "no" branches red.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EdgeColor {
    #[default]
    Neutral,
    Affirmative,
    Negative,
}

impl EdgeColor {
    pub const NEUTRAL_STROKE: &'static str = "#94a3b8";
    pub const AFFIRMATIVE_STROKE: &'static str = "#16a34a";
    pub const NEGATIVE_STROKE: &'static str = "#dc2626";

    /// CSS color used for both the line and its arrowhead.
    pub fn stroke(self) -> &'static str {
        match self {
            Self::Neutral => Self::NEUTRAL_STROKE,
            Self::Affirmative => Self::AFFIRMATIVE_STROKE,
            Self::Negative => Self::NEGATIVE_STROKE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: NodeId,
    pub role: NodeRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_category: Option<ResultCategory>,
    /// Display text. Content only; the connector engine never reads it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl Node {
    pub fn new(id: impl Into<NodeId>, role: NodeRole) -> Self {
        Self {
            id: id.into(),
            role,
            result_category: None,
            text: None,
        }
    }

    pub fn result(id: impl Into<NodeId>, category: ResultCategory) -> Self {
        Self {
            id: id.into(),
            role: NodeRole::Result,
            result_category: Some(category),
            text: None,
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    pub from: NodeId,
    pub to: NodeId,
    #[serde(default)]
    pub color: EdgeColor,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Edge {
    pub fn new(from: impl Into<NodeId>, to: impl Into<NodeId>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            color: EdgeColor::Neutral,
            label: None,
        }
    }

    pub fn with_color(mut self, color: EdgeColor) -> Self {
        self.color = color;
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}
