//! The built-in substitution/elimination decision tree.
//!
//! Starting from the substrate carbon degree, yes/no questions about the base, the nucleophile
//! and heat lead to one of SN2, SN1, E2 or E1.

use crate::diagram::Diagram;
use crate::model::{Edge, EdgeColor, Node, NodeRole, ResultCategory};

const YES: EdgeColor = EdgeColor::Affirmative;
const NO: EdgeColor = EdgeColor::Negative;

pub fn nodes() -> Vec<Node> {
    use ResultCategory::{E1, E2, Sn1, Sn2};

    vec![
        Node::new("start", NodeRole::Start).with_text("Substrate Carbon Degree?"),
        Node::new("deg0", NodeRole::DegreeSelector).with_text("0°"),
        Node::new("deg1", NodeRole::DegreeSelector).with_text("1°"),
        Node::new("deg2", NodeRole::DegreeSelector).with_text("2°"),
        Node::new("deg3", NodeRole::DegreeSelector).with_text("3°"),
        Node::result("sn2_0", Sn2).with_text("SN2"),
        Node::new("q1_bulky", NodeRole::Question).with_text("Bulky base?"),
        Node::new("q2_charge", NodeRole::Question).with_text("Nu⁻ has charge?"),
        Node::new("q3_strong", NodeRole::Question).with_text("Strong base?"),
        Node::result("e2_1", E2).with_text("E2"),
        Node::result("sn2_1", Sn2).with_text("SN2"),
        Node::new("q2a_strong", NodeRole::Question).with_text("Strong base?"),
        Node::new("q2b_heat", NodeRole::Question).with_text("Heat?"),
        Node::result("e2_3", E2).with_text("E2"),
        Node::new("q3b_heat", NodeRole::Question).with_text("Heat?"),
        Node::result("e2_2", E2).with_text("E2"),
        Node::result("sn2_2", Sn2).with_text("SN2"),
        Node::result("e1_2", E1).with_text("E1"),
        Node::result("sn1_2", Sn1).with_text("SN1"),
        Node::result("e1_3", E1).with_text("E1"),
        Node::result("sn1_3", Sn1).with_text("SN1"),
    ]
}

pub fn edges() -> Vec<Edge> {
    vec![
        Edge::new("start", "deg0").with_label("0°"),
        Edge::new("start", "deg1").with_label("1°"),
        Edge::new("start", "deg2").with_label("2°"),
        Edge::new("start", "deg3").with_label("3°"),
        // 0°
        Edge::new("deg0", "sn2_0"),
        // 1°
        Edge::new("deg1", "q1_bulky"),
        Edge::new("q1_bulky", "e2_1").with_color(YES),
        Edge::new("q1_bulky", "sn2_1").with_color(NO),
        // 2°
        Edge::new("deg2", "q2_charge"),
        Edge::new("q2_charge", "q2a_strong").with_color(YES),
        Edge::new("q2_charge", "q2b_heat").with_color(NO),
        Edge::new("q2a_strong", "e2_2").with_color(YES),
        Edge::new("q2a_strong", "sn2_2").with_color(NO),
        Edge::new("q2b_heat", "e1_2").with_color(YES),
        Edge::new("q2b_heat", "sn1_2").with_color(NO),
        // 3°
        Edge::new("deg3", "q3_strong"),
        Edge::new("q3_strong", "e2_3").with_color(YES),
        Edge::new("q3_strong", "q3b_heat").with_color(NO),
        Edge::new("q3b_heat", "e1_3").with_color(YES),
        Edge::new("q3b_heat", "sn1_3").with_color(NO),
    ]
}

pub fn substitution_elimination() -> Diagram {
    Diagram::new(nodes(), edges()).expect("built-in decision tree must be valid")
}
