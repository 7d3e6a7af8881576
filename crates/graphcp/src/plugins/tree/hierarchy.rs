//! Parent/child validation for tree diagrams
//!
//! Relations run from parent to child. A valid tree has one parent per
//! entity at most, no cycles, and exactly one root.

use std::collections::{HashMap, HashSet};

use tracing::{debug, warn};

use crate::core::{DiagramError, DiagramIntent, Result};

/// Check that the relations of `intent` form a single-rooted tree
pub fn validate_hierarchy(intent: &DiagramIntent) -> Result<()> {
    let mut parents: HashMap<&str, &str> = HashMap::new();

    for relation in &intent.relations {
        if relation.from == relation.to {
            warn!(entity = %relation.from, "Tree relation points at itself");
            return Err(DiagramError::CycleDetected {
                entity: relation.from.clone(),
            });
        }
        match parents.get(relation.to.as_str()) {
            Some(existing) if *existing != relation.from => {
                return Err(DiagramError::MultipleParents {
                    entity: relation.to.clone(),
                    first: existing.to_string(),
                    second: relation.from.clone(),
                });
            }
            Some(_) => {}
            None => {
                parents.insert(&relation.to, &relation.from);
            }
        }
    }

    // With at most one parent each, walking up from any entity either
    // reaches a root or revisits an entity on a cycle.
    for entity in &intent.entities {
        let mut seen = HashSet::new();
        let mut current = entity.name.as_str();
        seen.insert(current);
        while let Some(&parent) = parents.get(current) {
            if !seen.insert(parent) {
                warn!(entity = %parent, "Cycle in tree relations");
                return Err(DiagramError::CycleDetected {
                    entity: parent.to_string(),
                });
            }
            current = parent;
        }
    }

    let roots: Vec<String> = intent
        .entities
        .iter()
        .filter(|e| !parents.contains_key(e.name.as_str()))
        .map(|e| e.name.clone())
        .collect();

    if roots.len() > 1 {
        warn!(root_count = roots.len(), "Tree has more than one root");
        return Err(DiagramError::MultipleRoots { roots });
    }

    debug!(
        entity_count = intent.entities.len(),
        root = roots.first().map(String::as_str).unwrap_or(""),
        "Validated tree hierarchy"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{DialectKind, EntitySpec, RelationSpec};

    fn tree(entities: &[&str], edges: &[(&str, &str)]) -> DiagramIntent {
        let mut intent = DiagramIntent::new(DialectKind::Tree);
        for name in entities {
            intent = intent.entity(EntitySpec::new(*name));
        }
        for (from, to) in edges {
            intent = intent.relation(RelationSpec::new(*from, *to));
        }
        intent
    }

    #[test]
    fn test_valid_org_chart() {
        let intent = tree(
            &["CEO", "CTO", "CFO", "Engineer"],
            &[("CEO", "CTO"), ("CEO", "CFO"), ("CTO", "Engineer")],
        );
        assert!(validate_hierarchy(&intent).is_ok());

        // A chain hanging off a single root is still one tree.
        let intent = tree(&["a", "b", "c", "d"], &[("c", "d"), ("b", "c"), ("a", "b")]);
        assert!(validate_hierarchy(&intent).is_ok());
    }

    #[test]
    fn test_two_parentless_entities() {
        let intent = tree(&["CEO", "Board", "CTO"], &[("CEO", "CTO")]);
        match validate_hierarchy(&intent) {
            Err(DiagramError::MultipleRoots { roots }) => {
                assert_eq!(roots, vec!["CEO".to_string(), "Board".to_string()]);
            }
            other => panic!("expected MultipleRoots, got {:?}", other),
        }
    }

    #[test]
    fn test_cycle_detected() {
        let intent = tree(
            &["root", "a", "b"],
            &[("root", "a"), ("a", "b"), ("b", "a")],
        );
        assert!(matches!(
            validate_hierarchy(&intent),
            Err(DiagramError::MultipleParents { .. })
        ));

        let intent = tree(&["a", "b", "c"], &[("a", "b"), ("b", "c"), ("c", "a")]);
        assert!(matches!(
            validate_hierarchy(&intent),
            Err(DiagramError::CycleDetected { .. })
        ));
    }

    #[test]
    fn test_self_loop_is_a_cycle() {
        let intent = tree(&["a"], &[("a", "a")]);
        assert!(matches!(
            validate_hierarchy(&intent),
            Err(DiagramError::CycleDetected { ref entity }) if entity == "a"
        ));
    }

    #[test]
    fn test_second_parent_rejected() {
        let intent = tree(&["a", "b", "c"], &[("a", "c"), ("b", "c")]);
        match validate_hierarchy(&intent) {
            Err(DiagramError::MultipleParents {
                entity,
                first,
                second,
            }) => {
                assert_eq!(entity, "c");
                assert_eq!(first, "a");
                assert_eq!(second, "b");
            }
            other => panic!("expected MultipleParents, got {:?}", other),
        }
    }

    #[test]
    fn test_repeated_edge_is_not_a_second_parent() {
        let intent = tree(&["a", "b"], &[("a", "b"), ("a", "b")]);
        assert!(validate_hierarchy(&intent).is_ok());
    }

    #[test]
    fn test_empty_tree_is_valid() {
        assert!(validate_hierarchy(&tree(&[], &[])).is_ok());
    }
}
