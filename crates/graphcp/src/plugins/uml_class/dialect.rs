use crate::core::{
    plain_edge_attributes, wrapped_label, ArrowShape, Attributes, CellAlign, Dialect,
    DialectKind, EntityKind, EntitySpec, HtmlCell, HtmlTable, LineStyle, NodeShape,
    RelationKind, RelationSpec, ResolvedStyle, Result, StyleField, StylePolicy, StyleTarget,
    TextSpan,
};
use crate::plugins::entity_relation::styled_table;

/// UML class diagrams
#[derive(Debug, Clone, Copy, Default)]
pub struct UmlClassDialect;

impl UmlClassDialect {
    pub fn new() -> Self {
        Self
    }
}

/// Arrow notation of a UML relation kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelationNotation {
    pub arrow_head: ArrowShape,
    /// Arrow drawn at the `from` end, which is then the whole of the relation
    pub arrow_tail: Option<ArrowShape>,
    pub dashed: bool,
}

/// Notation for each UML relation kind
pub fn relation_notation(kind: RelationKind) -> RelationNotation {
    let (arrow_head, arrow_tail, dashed) = match kind {
        RelationKind::Inheritance => (ArrowShape::Empty, None, false),
        RelationKind::Realization => (ArrowShape::Empty, None, true),
        RelationKind::Dependency => (ArrowShape::Vee, None, true),
        RelationKind::Composition => (ArrowShape::None, Some(ArrowShape::Diamond), false),
        RelationKind::Aggregation => (ArrowShape::None, Some(ArrowShape::Odiamond), false),
        _ => (ArrowShape::None, None, false),
    };
    RelationNotation {
        arrow_head,
        arrow_tail,
        dashed,
    }
}

fn compartment(lines: &[String]) -> HtmlCell {
    lines
        .iter()
        .fold(HtmlCell::new().with_align(CellAlign::Left), |mut cell, line| {
            cell.push_line(vec![TextSpan::plain(line.as_str())]);
            cell
        })
}

fn class_table(entity: &EntitySpec, kind: EntityKind, style: &ResolvedStyle) -> HtmlTable {
    let mut title = HtmlCell::new();
    if kind == EntityKind::Interface {
        title.push_line(vec![TextSpan::plain("«interface»")]);
        title.push_line(vec![TextSpan::plain(entity.display_label()).bold().italic()]);
    } else {
        title.push_line(vec![TextSpan::plain(entity.display_label()).bold()]);
    }

    let mut table = styled_table(style)
        .row(title)
        .row(compartment(&entity.attributes))
        .row(compartment(&entity.methods));
    if style.filled {
        table.bgcolor = Some(style.fill_color.to_string());
    }
    table
}

impl Dialect for UmlClassDialect {
    fn kind(&self) -> DialectKind {
        DialectKind::UmlClass
    }

    fn name(&self) -> &'static str {
        "uml-class"
    }

    fn default_entity_kind(&self) -> EntityKind {
        EntityKind::Class
    }

    fn default_relation_kind(&self) -> RelationKind {
        RelationKind::Association
    }

    fn entity_kinds(&self) -> &'static [EntityKind] {
        &[EntityKind::Class, EntityKind::Interface]
    }

    fn relation_kinds(&self) -> &'static [RelationKind] {
        &[
            RelationKind::Association,
            RelationKind::Inheritance,
            RelationKind::Realization,
            RelationKind::Dependency,
            RelationKind::Composition,
            RelationKind::Aggregation,
        ]
    }

    fn allows_self_loop(&self, kind: RelationKind) -> bool {
        matches!(kind, RelationKind::Association | RelationKind::Dependency)
    }

    fn style_policy(&self) -> StylePolicy {
        StylePolicy::open()
            .lock(
                StyleTarget::Node,
                StyleField::Shape,
                "classes are always drawn as compartment tables",
            )
            .lock(
                StyleTarget::Edge,
                StyleField::ArrowHead,
                "UML arrowheads follow the relation kind",
            )
    }

    fn node_defaults(&self) -> ResolvedStyle {
        ResolvedStyle::base()
            .with_shape(NodeShape::Plain)
            .with_fill_color("lightyellow")
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
        kind: EntityKind,
        style: &ResolvedStyle,
    ) -> Result<Attributes> {
        Ok(self
            .node_attributes(style)
            .with("label", class_table(entity, kind, style)))
    }

    fn shape_relation(
        &self,
        relation: &RelationSpec,
        kind: RelationKind,
        style: &ResolvedStyle,
    ) -> Result<Attributes> {
        let notation = relation_notation(kind);

        let mut style = style.clone();
        if notation.dashed && style.line_style == LineStyle::Solid {
            style.line_style = LineStyle::Dashed;
        }

        let mut attrs = self.edge_attributes(&style);
        attrs.set("arrowhead", notation.arrow_head.dot_name());
        if let Some(tail) = notation.arrow_tail {
            attrs.set("dir", "back");
            attrs.set("arrowtail", tail.dot_name());
        }
        if let Some(label) = &relation.label {
            attrs.set("label", wrapped_label(label));
        }
        Ok(attrs)
    }
}
