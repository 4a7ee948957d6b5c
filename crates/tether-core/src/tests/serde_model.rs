use crate::*;
use serde_json::json;

#[test]
fn diagram_definition_parses_from_json() {
    let text = json!({
        "nodes": [
            { "id": "start", "role": "start", "text": "Begin" },
            { "id": "q", "role": "question" },
            { "id": "done", "role": "result", "resultCategory": "SN2" }
        ],
        "edges": [
            { "from": "start", "to": "q", "label": "go" },
            { "from": "q", "to": "done", "color": "affirmative" }
        ]
    })
    .to_string();

    let d = Diagram::from_json_str(&text).unwrap();
    assert_eq!(d.node("done").unwrap().result_category, Some(ResultCategory::Sn2));
    assert_eq!(d.edges()[0].color, EdgeColor::Neutral);
    assert_eq!(d.edges()[0].label.as_deref(), Some("go"));
    assert_eq!(d.edges()[1].color, EdgeColor::Affirmative);
}

#[test]
fn json_definition_is_validated() {
    let text = json!({
        "nodes": [{ "id": "a", "role": "start" }],
        "edges": [{ "from": "a", "to": "b" }]
    })
    .to_string();
    let err = Diagram::from_json_str(&text).unwrap_err();
    assert!(matches!(err, Error::DanglingEdgeReference { .. }));

    // The serde path runs the same validation.
    let err = serde_json::from_str::<Diagram>(&text).unwrap_err();
    assert!(err.to_string().contains("undeclared node: b"));
}

#[test]
fn malformed_json_is_a_json_error() {
    let err = Diagram::from_json_str("{\"nodes\": 3}").unwrap_err();
    assert!(matches!(err, Error::Json(_)));
}

#[test]
fn serialized_diagram_omits_absent_fields() {
    let d = Diagram::builder()
        .node(Node::new("a", NodeRole::Start))
        .node(Node::result("b", ResultCategory::E1))
        .edge(Edge::new("a", "b"))
        .build()
        .unwrap();
    let value = serde_json::to_value(&d).unwrap();
    assert_eq!(
        value,
        json!({
            "nodes": [
                { "id": "a", "role": "start" },
                { "id": "b", "role": "result", "resultCategory": "E1" }
            ],
            "edges": [{ "from": "a", "to": "b", "color": "neutral" }]
        })
    );
}

#[test]
fn edge_colors_map_to_fixed_strokes() {
    assert_eq!(EdgeColor::Neutral.stroke(), "#94a3b8");
    assert_eq!(EdgeColor::Affirmative.stroke(), "#16a34a");
    assert_eq!(EdgeColor::Negative.stroke(), "#dc2626");
}
