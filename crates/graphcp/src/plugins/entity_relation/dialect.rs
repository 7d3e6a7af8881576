use tracing::trace;

use crate::core::{
    plain_edge_attributes, wrapped_label, Attributes, Cardinality, Dialect, DialectKind,
    EntityKind, EntitySpec, NodeShape, RelationKind, RelationSpec, ResolvedStyle, Result,
    StyleField, StylePolicy, StyleTarget,
};

use super::table::table_label;

/// Database schemas: tables with columns, foreign keys with cardinality
#[derive(Debug, Clone, Copy, Default)]
pub struct EntityRelationDialect;

impl EntityRelationDialect {
    pub fn new() -> Self {
        Self
    }
}

impl Dialect for EntityRelationDialect {
    fn kind(&self) -> DialectKind {
        DialectKind::EntityRelation
    }

    fn name(&self) -> &'static str {
        "entity-relation"
    }

    fn default_entity_kind(&self) -> EntityKind {
        EntityKind::Table
    }

    fn default_relation_kind(&self) -> RelationKind {
        RelationKind::ForeignKey
    }

    fn entity_kinds(&self) -> &'static [EntityKind] {
        &[EntityKind::Table]
    }

    fn relation_kinds(&self) -> &'static [RelationKind] {
        &[RelationKind::ForeignKey]
    }

    fn style_policy(&self) -> StylePolicy {
        StylePolicy::open()
            .lock(
                StyleTarget::Node,
                StyleField::Shape,
                "tables are always drawn as HTML tables",
            )
            .lock(
                StyleTarget::Edge,
                StyleField::ArrowHead,
                "foreign-key ends show cardinality markers",
            )
    }

    fn node_defaults(&self) -> ResolvedStyle {
        ResolvedStyle::base()
            .with_shape(NodeShape::Plain)
            .with_fill_color("lightblue")
    }

    fn node_attributes(&self, style: &ResolvedStyle) -> Attributes {
        Attributes::new()
            .with("shape", NodeShape::Plain.dot_name())
            .with("fontname", style.font_name.as_str())
            .with("fontcolor", style.font_color.as_str())
    }

    fn edge_attributes(&self, style: &ResolvedStyle) -> Attributes {
        let mut attrs = plain_edge_attributes(style);
        attrs.remove("arrowhead");
        attrs
    }

    fn shape_entity(
        &self,
        entity: &EntitySpec,
        _kind: EntityKind,
        style: &ResolvedStyle,
    ) -> Result<Attributes> {
        Ok(self
            .node_attributes(style)
            .with("label", table_label(entity, style)))
    }

    fn shape_relation(
        &self,
        relation: &RelationSpec,
        _kind: RelationKind,
        style: &ResolvedStyle,
    ) -> Result<Attributes> {
        let cardinality = relation.cardinality.unwrap_or_default();
        trace!(relation = %relation.describe(), %cardinality, "Shaping foreign key");

        let mut attrs = self.edge_attributes(style);
        attrs.extend(cardinality_markers(cardinality));
        if let Some(label) = &relation.label {
            attrs.set("label", wrapped_label(label));
        }
        Ok(attrs)
    }
}

/// Crow's-foot arrows and multiplicity text for both ends of a foreign key
///
/// The tail sits at `from`, the head at `to`.
pub fn cardinality_markers(cardinality: Cardinality) -> Attributes {
    Attributes::new()
        .with("dir", "both")
        .with("arrowtail", cardinality.from.arrow_shape())
        .with("arrowhead", cardinality.to.arrow_shape())
        .with("taillabel", cardinality.from.marker())
        .with("headlabel", cardinality.to.marker())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{AttrValue, DiagramError, Multiplicity, StyleResolver, StyleSpec};

    #[test]
    fn test_missing_cardinality_is_many_to_one() {
        let dialect = EntityRelationDialect::new();
        let attrs = dialect
            .shape_relation(
                &RelationSpec::new("orders", "users"),
                RelationKind::ForeignKey,
                &dialect.edge_defaults(),
            )
            .unwrap();
        assert_eq!(attrs.text("dir"), Some("both"));
        assert_eq!(attrs.text("arrowtail"), Some("crow"));
        assert_eq!(attrs.text("arrowhead"), Some("teetee"));
        assert_eq!(attrs.text("taillabel"), Some("N"));
        assert_eq!(attrs.text("headlabel"), Some("1"));
    }

    #[test]
    fn test_explicit_cardinality() {
        let markers = cardinality_markers(Cardinality::new(
            Multiplicity::One,
            Multiplicity::ZeroOrOne,
        ));
        assert_eq!(markers.text("arrowtail"), Some("teetee"));
        assert_eq!(markers.text("arrowhead"), Some("teeodot"));
        assert_eq!(markers.text("headlabel"), Some("0..1"));
    }

    #[test]
    fn test_table_node_uses_html_label() {
        let dialect = EntityRelationDialect::new();
        let attrs = dialect
            .shape_entity(
                &EntitySpec::new("users"),
                EntityKind::Table,
                &dialect.node_defaults(),
            )
            .unwrap();
        assert_eq!(attrs.text("shape"), Some("plain"));
        assert!(matches!(attrs.get("label"), Some(AttrValue::Html(_))));
    }

    #[test]
    fn test_shape_and_arrow_overrides_rejected() {
        let dialect = EntityRelationDialect::new();
        let resolver = StyleResolver::new(dialect.style_policy());

        let shape = StyleSpec::new().with_shape("ellipse");
        assert!(matches!(
            resolver.resolve_layers(&dialect.node_defaults(), &[&shape], StyleTarget::Node),
            Err(DiagramError::InvalidStyleValue { .. })
        ));

        let arrow = StyleSpec::new().with_arrow_head("vee");
        assert!(matches!(
            resolver.resolve_layers(&dialect.edge_defaults(), &[&arrow], StyleTarget::Edge),
            Err(DiagramError::InvalidStyleValue { .. })
        ));

        let colors = StyleSpec::new().with_fill_color("#ffeecc").with_line_color("navy");
        assert!(resolver
            .resolve_layers(&dialect.node_defaults(), &[&colors], StyleTarget::Node)
            .is_ok());
    }
}
