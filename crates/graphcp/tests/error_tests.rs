//! Error reporting through the public API

use std::path::PathBuf;

use graphcp::core::DiagramError;
use graphcp::prelude::*;

fn compile_err(intent: &DiagramIntent) -> DiagramError {
    match graphcp::compile(intent) {
        Ok(dot) => panic!("expected an error, got:\n{}", dot),
        Err(e) => e,
    }
}

#[test]
fn test_invalid_label() {
    let intent = DiagramIntent::new(DialectKind::Graph).entity(EntitySpec::new("?!"));
    let error = compile_err(&intent);
    assert!(matches!(error, DiagramError::InvalidLabel { ref label } if label == "?!"));
    assert!(error.to_string().contains("Invalid label '?!'"));
}

#[test]
fn test_invalid_style_value() {
    let intent = DiagramIntent::new(DialectKind::Graph)
        .entity(EntitySpec::new("a").with_style(StyleSpec::new().with_fill_color("#12")));
    let message = compile_err(&intent).to_string();
    assert!(message.contains("Invalid style value '#12' for fillColor"), "{}", message);
}

#[test]
fn test_unknown_shape_rejected_even_when_overridden() {
    let intent = DiagramIntent::new(DialectKind::Graph)
        .with_global_style(StyleSpec::new().with_shape("blob"))
        .entity(EntitySpec::new("a").with_style(StyleSpec::new().with_shape("box")));
    assert!(matches!(
        compile_err(&intent),
        DiagramError::InvalidStyleValue { ref value, .. } if value == "blob"
    ));
}

#[test]
fn test_duplicate_entity() {
    let intent = DiagramIntent::new(DialectKind::Graph)
        .entity(EntitySpec::new("a"))
        .entity(EntitySpec::new("a"));
    assert_eq!(
        compile_err(&intent).to_string(),
        "Entity 'a' is declared more than once"
    );
}

#[test]
fn test_dangling_relation() {
    let intent = DiagramIntent::new(DialectKind::Graph)
        .entity(EntitySpec::new("a"))
        .relation(RelationSpec::new("a", "b"));
    assert_eq!(
        compile_err(&intent).to_string(),
        "relation 'a' -> 'b' references unknown entity 'b'"
    );
}

#[test]
fn test_multiple_roots_lists_every_root() {
    let intent = DiagramIntent::new(DialectKind::Tree)
        .entity(EntitySpec::new("a"))
        .entity(EntitySpec::new("b"));
    assert_eq!(
        compile_err(&intent).to_string(),
        "Tree has multiple roots: a, b"
    );
}

#[test]
fn test_cycle_names_an_entity() {
    let intent = DiagramIntent::new(DialectKind::Tree)
        .entity(EntitySpec::new("a"))
        .entity(EntitySpec::new("b"))
        .relation(RelationSpec::new("a", "b"))
        .relation(RelationSpec::new("b", "a"));
    let error = compile_err(&intent);
    assert!(matches!(error, DiagramError::CycleDetected { .. }));
    assert!(error.to_string().starts_with("Cycle detected through entity"));
}

#[test]
fn test_multiple_parents() {
    let intent = DiagramIntent::new(DialectKind::Tree)
        .entity(EntitySpec::new("a"))
        .entity(EntitySpec::new("b"))
        .entity(EntitySpec::new("c"))
        .relation(RelationSpec::new("a", "c"))
        .relation(RelationSpec::new("b", "c"));
    assert_eq!(
        compile_err(&intent).to_string(),
        "Entity 'c' has more than one parent ('a' and 'b')"
    );
}

#[test]
fn test_unsupported_entity_kind() {
    let intent = DiagramIntent::new(DialectKind::Tree)
        .entity(EntitySpec::new("users").with_kind(EntityKind::Table));
    assert_eq!(
        compile_err(&intent).to_string(),
        "entity 'users' kind 'table' is not supported by tree diagrams"
    );
}

#[test]
fn test_columns_outside_er() {
    let intent = DiagramIntent::new(DialectKind::Graph)
        .entity(EntitySpec::new("users").with_column(ColumnSpec::new("id")));
    assert!(matches!(
        compile_err(&intent),
        DiagramError::UnsupportedKind { ref kind, .. } if kind == "columns"
    ));
}

#[test]
fn test_cardinality_outside_foreign_key() {
    let intent = DiagramIntent::new(DialectKind::Graph)
        .entity(EntitySpec::new("a"))
        .entity(EntitySpec::new("b"))
        .relation(RelationSpec::new("a", "b").with_cardinality(Cardinality::default()));
    assert!(matches!(
        compile_err(&intent),
        DiagramError::UnsupportedKind { ref kind, .. } if kind == "cardinality"
    ));
}

#[test]
fn test_self_loop_message() {
    let intent = DiagramIntent::new(DialectKind::UmlClass)
        .entity(EntitySpec::new("Base"))
        .relation(RelationSpec::new("Base", "Base").with_kind(RelationKind::Composition));
    assert_eq!(
        compile_err(&intent).to_string(),
        "Self-loop on 'Base' is not permitted for composition relations in uml-class diagrams"
    );
}

#[test]
fn test_dot_syntax_position() {
    let error = check_dot("digraph {\n  a -- b\n}").unwrap_err();
    assert_eq!(
        error.to_string(),
        "DOT syntax error: '--' used in a digraph at line 2, column 5"
    );
}

#[test]
fn test_render_errors_carry_document_path() {
    let unavailable = DiagramError::RenderUnavailable {
        document: PathBuf::from("/tmp/out/diagram.dot"),
        reason: "dot not found".to_string(),
    };
    assert_eq!(
        unavailable.to_string(),
        "Renderer unavailable (dot not found); document kept at /tmp/out/diagram.dot"
    );
    assert!(unavailable.is_render_failure());

    let syntax = DiagramError::RenderSyntax {
        document: PathBuf::from("out.dot"),
        diagnostics: "syntax error in line 3".to_string(),
    };
    assert!(syntax.to_string().contains("syntax error in line 3"));
    assert!(syntax.is_render_failure());

    assert!(!DiagramError::output_config("bad").is_render_failure());
}

#[test]
fn test_io_error_conversion() {
    let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
    let error: DiagramError = io.into();
    assert!(matches!(error, DiagramError::Io { .. }));
    assert!(error.to_string().contains("denied"));
}

#[test]
fn test_output_config_errors() {
    let size = ImageSize::pixels(0, 100);
    let error = size.validate().unwrap_err();
    assert!(matches!(error, DiagramError::InvalidOutputConfig { .. }));
    assert!(error.to_string().starts_with("Invalid output configuration"));

    assert!("gif".parse::<ImageFormat>().is_err());
}
