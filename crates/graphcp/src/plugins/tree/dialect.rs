use tracing::debug;

use crate::core::{
    wrapped_label, Attributes, CentralHint, DiagramIntent, Dialect, DialectKind, Direction,
    EntityKind, EntitySpec, NodeShape, RelationKind, RelationSpec, ResolvedStyle, Result,
};

use super::hierarchy::validate_hierarchy;

/// Trees and org-charts: rounded boxes, parent above child
#[derive(Debug, Clone, Copy, Default)]
pub struct TreeDialect;

impl TreeDialect {
    pub fn new() -> Self {
        Self
    }
}

impl Dialect for TreeDialect {
    fn kind(&self) -> DialectKind {
        DialectKind::Tree
    }

    fn name(&self) -> &'static str {
        "tree"
    }

    fn default_entity_kind(&self) -> EntityKind {
        EntityKind::Role
    }

    fn default_relation_kind(&self) -> RelationKind {
        RelationKind::Edge
    }

    fn entity_kinds(&self) -> &'static [EntityKind] {
        &[EntityKind::Role, EntityKind::Node]
    }

    fn relation_kinds(&self) -> &'static [RelationKind] {
        &[RelationKind::Edge]
    }

    fn node_defaults(&self) -> ResolvedStyle {
        ResolvedStyle::base()
            .with_shape(NodeShape::Rounded)
            .with_fill_color("lightyellow")
    }

    fn central_hint(&self) -> CentralHint {
        CentralHint::Emphasis
    }

    fn validate(&self, intent: &DiagramIntent) -> Result<()> {
        validate_hierarchy(intent)
    }

    fn shape_entity(
        &self,
        entity: &EntitySpec,
        _kind: EntityKind,
        style: &ResolvedStyle,
    ) -> Result<Attributes> {
        Ok(self
            .node_attributes(style)
            .with("label", wrapped_label(entity.display_label())))
    }

    fn shape_relation(
        &self,
        relation: &RelationSpec,
        _kind: RelationKind,
        style: &ResolvedStyle,
    ) -> Result<Attributes> {
        let mut attrs = self.edge_attributes(style);
        if let Some(label) = &relation.label {
            attrs.set("label", wrapped_label(label));
        }
        Ok(attrs)
    }

    fn layout_hints(&self, intent: &DiagramIntent) -> Attributes {
        if let Some(direction) = intent.direction.filter(|d| *d != Direction::TopBottom) {
            debug!(%direction, "Ignoring requested direction; trees are laid out top-to-bottom");
        }
        Attributes::new()
            .with("rankdir", Direction::TopBottom.rankdir())
            .with("nodesep", "0.4")
    }
}
