//! Property tests: every valid intent compiles to well-formed, stable DOT

use graphcp::prelude::*;
use proptest::prelude::*;
use proptest::sample::Index;

// ===================
// Strategies
// ===================

/// Free text as users type it: quotes, backslashes, markup and newlines
fn text_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-zA-Z0-9 _.\\-]{0,12}",
        "[a-zA-Z0-9 \"\\\\<>&{}#/\\n]{0,12}",
        ".{0,12}",
    ]
}

/// Unique entity names; the numeric prefix keeps them distinct
fn names(count: usize) -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-zA-Z0-9 _.\\-]{0,6}", count).prop_map(|suffixes| {
        suffixes
            .into_iter()
            .enumerate()
            .map(|(i, suffix)| format!("e{}:{}", i, suffix))
            .collect()
    })
}

fn color_strategy() -> impl Strategy<Value = Option<String>> {
    prop::option::of(prop::sample::select(vec![
        "red".to_string(),
        "steelblue".to_string(),
        "#336699".to_string(),
        "#aabbccdd".to_string(),
    ]))
}

fn graph_intent_strategy() -> impl Strategy<Value = DiagramIntent> {
    (1usize..8).prop_flat_map(|n| {
        (
            names(n),
            prop::collection::vec(prop::option::of(text_strategy()), n),
            prop::collection::vec((0..n, 0..n, prop::option::of(text_strategy())), 0..12),
            0..=n,
            prop::option::of(text_strategy()),
            any::<bool>(),
            color_strategy(),
        )
            .prop_map(
                |(names, labels, relations, grouped, group_label, directed, color)| {
                    let mut intent = DiagramIntent::new(DialectKind::Graph).directed(directed);
                    for (name, label) in names.iter().zip(labels) {
                        let mut entity = EntitySpec::new(name.as_str());
                        if let Some(label) = label {
                            entity = entity.with_label(label);
                        }
                        intent = intent.entity(entity);
                    }
                    for (from, to, label) in relations {
                        let mut relation = RelationSpec::new(names[from].as_str(), names[to].as_str());
                        if let Some(label) = label {
                            relation = relation.with_label(label);
                        }
                        intent = intent.relation(relation);
                    }
                    if grouped > 0 {
                        let mut group = GroupSpec::new(names[..grouped].iter().cloned());
                        if let Some(label) = group_label {
                            group = group.with_label(label);
                        }
                        if let Some(color) = color {
                            group = group.with_style(StyleSpec::new().with_fill_color(color));
                        }
                        intent = intent.group(group);
                    }
                    intent
                },
            )
    })
}

fn tree_intent_strategy() -> impl Strategy<Value = DiagramIntent> {
    (1usize..10).prop_flat_map(|n| {
        (
            names(n),
            prop::collection::vec(any::<Index>(), n - 1),
            prop::option::of(text_strategy()),
        )
            .prop_map(|(names, parents, title)| {
                let mut intent = DiagramIntent::new(DialectKind::Tree);
                if let Some(title) = title {
                    intent = intent.with_title(title);
                }
                for name in &names {
                    intent = intent.entity(EntitySpec::new(name.as_str()));
                }
                for (offset, parent) in parents.iter().enumerate() {
                    let child = offset + 1;
                    let parent = parent.index(child);
                    intent = intent.relation(RelationSpec::new(
                        names[parent].as_str(),
                        names[child].as_str(),
                    ));
                }
                intent
            })
    })
}

fn er_intent_strategy() -> impl Strategy<Value = DiagramIntent> {
    let multiplicity = prop::sample::select(vec![
        Multiplicity::One,
        Multiplicity::ZeroOrOne,
        Multiplicity::Many,
        Multiplicity::OneOrMany,
        Multiplicity::ZeroOrMany,
    ]);
    (1usize..6).prop_flat_map(move |n| {
        (
            names(n),
            prop::collection::vec(
                prop::collection::vec((text_strategy(), any::<bool>(), any::<bool>()), 0..4),
                n,
            ),
            prop::collection::vec(
                (
                    0..n,
                    0..n,
                    prop::option::of((multiplicity.clone(), multiplicity.clone())),
                ),
                0..6,
            ),
        )
            .prop_map(|(names, columns, relations)| {
                let mut intent = DiagramIntent::new(DialectKind::EntityRelation);
                for (name, columns) in names.iter().zip(columns) {
                    let entity = columns.into_iter().fold(
                        EntitySpec::new(name.as_str()),
                        |entity, (column, pk, fk)| {
                            let mut column = ColumnSpec::new(column);
                            if pk {
                                column = column.primary_key();
                            }
                            if fk {
                                column = column.foreign_key();
                            }
                            entity.with_column(column)
                        },
                    );
                    intent = intent.entity(entity);
                }
                for (from, to, cardinality) in relations {
                    let mut relation = RelationSpec::new(names[from].as_str(), names[to].as_str());
                    if let Some((a, b)) = cardinality {
                        relation = relation.with_cardinality(Cardinality::new(a, b));
                    }
                    intent = intent.relation(relation);
                }
                intent
            })
    })
}

fn uml_intent_strategy() -> impl Strategy<Value = DiagramIntent> {
    let kind = prop::sample::select(vec![
        RelationKind::Association,
        RelationKind::Dependency,
        RelationKind::Inheritance,
        RelationKind::Realization,
        RelationKind::Composition,
        RelationKind::Aggregation,
    ]);
    (1usize..6).prop_flat_map(move |n| {
        (
            names(n),
            prop::collection::vec(
                (
                    any::<bool>(),
                    prop::collection::vec(text_strategy(), 0..3),
                    prop::collection::vec(text_strategy(), 0..3),
                ),
                n,
            ),
            prop::collection::vec((0..n, 0..n, kind.clone()), 0..6),
        )
            .prop_map(|(names, members, relations)| {
                let mut intent = DiagramIntent::new(DialectKind::UmlClass);
                for (name, (interface, attributes, methods)) in names.iter().zip(members) {
                    let mut entity = EntitySpec::new(name.as_str());
                    if interface {
                        entity = entity.with_kind(EntityKind::Interface);
                    }
                    entity.attributes = attributes;
                    entity.methods = methods;
                    intent = intent.entity(entity);
                }
                for (from, to, kind) in relations {
                    // Structural relations cannot point at their own class
                    let kind = if from == to {
                        RelationKind::Association
                    } else {
                        kind
                    };
                    intent = intent.relation(
                        RelationSpec::new(names[from].as_str(), names[to].as_str()).with_kind(kind),
                    );
                }
                intent
            })
    })
}

// ===================
// Checks
// ===================

fn check_well_formed(intent: &DiagramIntent) -> std::result::Result<(), TestCaseError> {
    let dot = graphcp::compile(intent)
        .map_err(|e| TestCaseError::fail(format!("valid intent rejected: {}", e)))?;

    let parsed = check_dot(&dot)
        .map_err(|e| TestCaseError::fail(format!("{}\n--- document ---\n{}", e, dot)))?;

    prop_assert_eq!(parsed.node_ids().len(), intent.entities.len(), "{}", dot);
    prop_assert_eq!(parsed.edge_count(), intent.relations.len(), "{}", dot);
    prop_assert_eq!(parsed.cluster_count(), intent.groups.len(), "{}", dot);
    Ok(())
}

fn check_deterministic(intent: &DiagramIntent) -> std::result::Result<(), TestCaseError> {
    let first = graphcp::compile(intent);
    let second = graphcp::compile(intent);
    prop_assert_eq!(first.is_ok(), second.is_ok());
    if let (Ok(first), Ok(second)) = (first, second) {
        prop_assert_eq!(first, second);
    }
    Ok(())
}

proptest! {
    #[test]
    fn prop_graph_output_is_well_formed(intent in graph_intent_strategy()) {
        check_well_formed(&intent)?;
        let dot = graphcp::compile(&intent).unwrap();
        let parsed = check_dot(&dot).unwrap();
        prop_assert_eq!(parsed.directed, intent.directed);
    }

    #[test]
    fn prop_tree_output_is_well_formed(intent in tree_intent_strategy()) {
        check_well_formed(&intent)?;
    }

    #[test]
    fn prop_er_output_is_well_formed(intent in er_intent_strategy()) {
        check_well_formed(&intent)?;
    }

    #[test]
    fn prop_uml_output_is_well_formed(intent in uml_intent_strategy()) {
        check_well_formed(&intent)?;
    }

    #[test]
    fn prop_compilation_is_deterministic(intent in graph_intent_strategy()) {
        check_deterministic(&intent)?;
    }

    #[test]
    fn prop_json_round_trip_preserves_output(intent in er_intent_strategy()) {
        let json = serde_json::to_string(&intent).unwrap();
        let restored: DiagramIntent = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(
            graphcp::compile(&intent).unwrap(),
            graphcp::compile(&restored).unwrap()
        );
    }

    #[test]
    fn prop_check_dot_never_panics(source in ".{0,64}") {
        let _ = check_dot(&source);
    }
}
