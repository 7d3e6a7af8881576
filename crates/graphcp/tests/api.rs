//! Public API integration tests
//!
//! These exercise the crate the way a caller would: build an intent, compile
//! it and inspect the DOT text.

use graphcp::prelude::*;
use graphcp::{build, compile, emit};

fn cycle_intent() -> DiagramIntent {
    DiagramIntent::new(DialectKind::Graph)
        .entity(EntitySpec::new("A"))
        .entity(EntitySpec::new("B"))
        .entity(EntitySpec::new("C"))
        .relation(RelationSpec::new("A", "B"))
        .relation(RelationSpec::new("B", "C"))
        .relation(RelationSpec::new("C", "A"))
        .with_global_style(
            StyleSpec::new()
                .with_node_color("red")
                .with_edge_color("blue"),
        )
}

#[test]
fn test_colored_cycle() {
    let dot = compile(&cycle_intent()).unwrap();

    assert!(dot.starts_with("digraph G {\n"));
    assert!(dot.ends_with("}\n"));
    assert_eq!(dot.matches("color=red").count(), 3, "{}", dot);
    assert_eq!(dot.matches("color=blue").count(), 3, "{}", dot);
    assert!(dot.contains("A -> B [color=blue];"));
    assert!(dot.contains("B -> C [color=blue];"));
    assert!(dot.contains("C -> A [color=blue];"));

    let parsed = check_dot(&dot).unwrap();
    assert!(parsed.directed);
    assert_eq!(parsed.node_ids(), vec!["A", "B", "C"]);
    assert_eq!(parsed.edge_count(), 3);
}

#[test]
fn test_common_color_names_accepted() {
    for color in ["green", "grey", "darkblue", "darkred", "lightgreen", "darkmagenta"] {
        let json = format!(
            r#"{{"entities": [{{"name": "a"}}], "globalStyle": {{"nodeColor": "{}"}}}}"#,
            color
        );
        let intent: DiagramIntent = serde_json::from_str(&json).unwrap();
        let dot = compile(&intent).unwrap_or_else(|e| panic!("{} rejected: {}", color, e));
        assert!(dot.contains(&format!("color={}", color)), "{}", dot);
    }
}

#[test]
fn test_compile_is_deterministic() {
    let intent = cycle_intent()
        .group(GroupSpec::new(["A", "B"]).with_label("pair"))
        .with_title("Cycle");
    let first = compile(&intent).unwrap();
    for _ in 0..5 {
        assert_eq!(compile(&intent).unwrap(), first);
    }
}

#[test]
fn test_build_then_emit_matches_compile() {
    let intent = cycle_intent();
    let model = build(&intent).unwrap();
    assert_eq!(model.node_count(), 3);
    assert_eq!(model.edge_count(), 3);
    assert_eq!(emit(&model).unwrap(), compile(&intent).unwrap());
}

#[test]
fn test_builder_with_explicit_dialect() {
    let intent = DiagramIntent::new(DialectKind::Graph)
        .entity(EntitySpec::new("x"))
        .entity(EntitySpec::new("y"))
        .relation(RelationSpec::new("x", "y"));
    let dialect = dialect_for(DialectKind::Graph);
    let model = GraphModelBuilder::new()
        .build_with(dialect.as_ref(), &intent)
        .unwrap();
    let dot = DotEmitter::new().emit(&model).unwrap();
    assert!(dot.contains("x -> y;"));
}

#[test]
fn test_undirected_graph_uses_double_dash() {
    let intent = DiagramIntent::new(DialectKind::Graph)
        .directed(false)
        .entity(EntitySpec::new("left"))
        .entity(EntitySpec::new("right"))
        .relation(RelationSpec::new("left", "right"));
    let dot = compile(&intent).unwrap();
    assert!(dot.starts_with("graph G {"));
    assert!(dot.contains("left -- right;"));
    assert!(!dot.contains("->"));
    assert!(!check_dot(&dot).unwrap().directed);
}

#[test]
fn test_uml_inheritance_points_at_parent() {
    let intent = DiagramIntent::new(DialectKind::UmlClass)
        .entity(EntitySpec::new("A"))
        .entity(EntitySpec::new("B"))
        .relation(RelationSpec::new("A", "B").with_kind(RelationKind::Inheritance));
    let dot = compile(&intent).unwrap();
    assert!(dot.contains("A -> B [arrowhead=empty];"), "{}", dot);
}

#[test]
fn test_er_foreign_key_defaults_to_many_to_one() {
    let intent = DiagramIntent::new(DialectKind::EntityRelation)
        .entity(EntitySpec::new("users").with_column(ColumnSpec::new("id").primary_key()))
        .entity(
            EntitySpec::new("orders")
                .with_column(ColumnSpec::new("id").primary_key())
                .with_column(ColumnSpec::new("user_id").foreign_key()),
        )
        .relation(RelationSpec::new("orders", "users"));
    let dot = compile(&intent).unwrap();

    let edge = dot
        .lines()
        .find(|line| line.contains("orders -> users"))
        .unwrap_or_else(|| panic!("no foreign key edge in:\n{}", dot));
    assert!(edge.contains("arrowtail=crow"), "{}", edge);
    assert!(edge.contains("arrowhead=teetee"), "{}", edge);
    assert!(edge.contains("dir=both"), "{}", edge);
}

#[test]
fn test_entity_names_become_unique_identifiers() {
    let intent = DiagramIntent::new(DialectKind::Graph)
        .entity(EntitySpec::new("web server"))
        .entity(EntitySpec::new("web-server"))
        .entity(EntitySpec::new("42"))
        .relation(RelationSpec::new("web server", "web-server"));
    let dot = compile(&intent).unwrap();
    let ids = check_dot(&dot).unwrap().node_ids();

    assert_eq!(ids.len(), 3);
    let mut deduped = ids.clone();
    deduped.sort();
    deduped.dedup();
    assert_eq!(deduped.len(), 3, "identifiers collide: {:?}", ids);
    assert!(dot.contains("label=\"web server\""));
}

#[test]
fn test_labels_are_escaped() {
    let intent = DiagramIntent::new(DialectKind::Graph)
        .entity(EntitySpec::new("q").with_label("say \"hi\"\\now"))
        .entity(EntitySpec::new("r").with_label("two\nlines"));
    let dot = compile(&intent).unwrap();
    assert!(dot.contains(r#"label="say \"hi\"\\now""#), "{}", dot);
    assert!(dot.contains(r#"label="two\nlines""#), "{}", dot);
    assert!(check_dot(&dot).is_ok());
}

#[test]
fn test_title_and_direction() {
    let intent = DiagramIntent::new(DialectKind::Graph)
        .with_title("Request flow")
        .with_direction(Direction::LeftRight)
        .entity(EntitySpec::new("a"));
    let dot = compile(&intent).unwrap();
    let parsed = check_dot(&dot).unwrap();
    assert_eq!(parsed.graph_attr("rankdir"), Some("LR"));
    assert_eq!(parsed.graph_attr("label"), Some("Request flow"));
    assert_eq!(parsed.graph_attr("labelloc"), Some("t"));
}

#[test]
fn test_empty_intent_is_a_valid_document() {
    let dot = compile(&DiagramIntent::new(DialectKind::Graph)).unwrap();
    let parsed = check_dot(&dot).unwrap();
    assert!(parsed.node_ids().is_empty());
    assert_eq!(parsed.edge_count(), 0);
}

#[test]
fn test_intent_from_json() {
    let json = r#"{
        "dialect": "graph",
        "entities": [
            {"name": "api", "style": {"shape": "box"}},
            {"name": "db", "label": "Database", "style": {"shape": "cylinder"}}
        ],
        "relations": [{"from": "api", "to": "db", "label": "queries"}],
        "groups": [{"label": "Backend", "members": ["api", "db"]}],
        "globalStyle": {"fontName": "Courier"}
    }"#;
    let intent: DiagramIntent = serde_json::from_str(json).unwrap();
    assert!(intent.directed);

    let dot = compile(&intent).unwrap();
    assert!(dot.contains("subgraph cluster_Backend {"));
    assert!(dot.contains("shape=cylinder"));
    let edge = dot.lines().find(|line| line.contains("api -> db")).unwrap();
    assert!(edge.contains("label=queries"), "{}", edge);
    assert!(edge.contains("fontname=Courier"), "{}", edge);
}

#[test]
fn test_central_entity_is_pinned_to_first_rank() {
    let intent = DiagramIntent::new(DialectKind::Graph)
        .entity(EntitySpec::new("hub").central())
        .entity(EntitySpec::new("spoke"))
        .relation(RelationSpec::new("hub", "spoke"));
    let dot = compile(&intent).unwrap();
    assert!(dot.contains("{ rank=min; hub; }"), "{}", dot);
}
