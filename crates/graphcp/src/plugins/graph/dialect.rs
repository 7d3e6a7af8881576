use crate::core::{
    wrapped_label, Attributes, DiagramIntent, Dialect, DialectKind, EntityKind, EntitySpec,
    NodeShape, RelationKind, RelationSpec, ResolvedStyle, Result,
};

/// Plain nodes and edges; the only dialect that may be undirected
#[derive(Debug, Clone, Copy, Default)]
pub struct GraphDialect;

impl GraphDialect {
    pub fn new() -> Self {
        Self
    }
}

impl Dialect for GraphDialect {
    fn kind(&self) -> DialectKind {
        DialectKind::Graph
    }

    fn name(&self) -> &'static str {
        "graph"
    }

    fn default_entity_kind(&self) -> EntityKind {
        EntityKind::Node
    }

    fn default_relation_kind(&self) -> RelationKind {
        RelationKind::Edge
    }

    fn entity_kinds(&self) -> &'static [EntityKind] {
        &[EntityKind::Node]
    }

    fn relation_kinds(&self) -> &'static [RelationKind] {
        &[RelationKind::Edge]
    }

    fn node_defaults(&self) -> ResolvedStyle {
        ResolvedStyle::base().with_shape(NodeShape::Ellipse)
    }

    fn is_directed(&self, intent: &DiagramIntent) -> bool {
        intent.directed
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
}
