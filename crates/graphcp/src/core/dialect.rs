//! Dialect capability trait
//!
//! Each diagram family implements [`Dialect`] to decide which entity and
//! relation kinds it accepts, how entities and relations look in DOT, which
//! style overrides it refuses, and which structural rules an intent must
//! satisfy. The builder drives every dialect through this trait.

use super::error::Result;
use super::model::Attributes;
use super::style::{LineStyle, ResolvedStyle, StylePolicy};
use super::text::wrap_label;
use super::types::{
    DiagramIntent, DialectKind, Direction, EntityKind, EntitySpec, RelationKind, RelationSpec,
};

/// Display width at which plain labels are wrapped
pub const LABEL_WRAP_WIDTH: usize = 24;

/// How a dialect honors the `central` flag on an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CentralHint {
    /// Force central entities onto the first rank
    FirstRank,
    /// Draw central entities with a bold outline
    Emphasis,
}

/// Dialect-specific compilation rules
pub trait Dialect: Send + Sync {
    /// The dialect this implementation handles
    fn kind(&self) -> DialectKind;

    /// Human-readable name
    fn name(&self) -> &'static str;

    /// Entity kind used when an entity does not name one
    fn default_entity_kind(&self) -> EntityKind;

    /// Relation kind used when a relation does not name one
    fn default_relation_kind(&self) -> RelationKind;

    /// Entity kinds this dialect accepts
    fn entity_kinds(&self) -> &'static [EntityKind];

    /// Relation kinds this dialect accepts
    fn relation_kinds(&self) -> &'static [RelationKind];

    fn accepts_entity_kind(&self, kind: EntityKind) -> bool {
        self.entity_kinds().contains(&kind)
    }

    fn accepts_relation_kind(&self, kind: RelationKind) -> bool {
        self.relation_kinds().contains(&kind)
    }

    /// Whether a relation of `kind` may start and end at the same entity
    fn allows_self_loop(&self, _kind: RelationKind) -> bool {
        true
    }

    /// Style overrides this dialect refuses
    fn style_policy(&self) -> StylePolicy {
        StylePolicy::open()
    }

    /// Lowest-precedence style for nodes
    fn node_defaults(&self) -> ResolvedStyle {
        ResolvedStyle::base()
    }

    /// Lowest-precedence style for edges
    fn edge_defaults(&self) -> ResolvedStyle {
        ResolvedStyle::base()
    }

    /// Lowest-precedence style for cluster boxes
    fn cluster_defaults(&self) -> ResolvedStyle {
        ResolvedStyle::base().with_line_color("gray40")
    }

    /// Whether the emitted graph is a `digraph`
    fn is_directed(&self, _intent: &DiagramIntent) -> bool {
        true
    }

    fn central_hint(&self) -> CentralHint {
        CentralHint::FirstRank
    }

    /// Structural checks beyond reference and kind validation
    fn validate(&self, _intent: &DiagramIntent) -> Result<()> {
        Ok(())
    }

    /// Style-derived node attributes, without a label
    fn node_attributes(&self, style: &ResolvedStyle) -> Attributes {
        plain_node_attributes(style)
    }

    /// Style-derived edge attributes, without a label
    fn edge_attributes(&self, style: &ResolvedStyle) -> Attributes {
        plain_edge_attributes(style)
    }

    /// Full attribute list of the node an entity becomes
    fn shape_entity(
        &self,
        entity: &EntitySpec,
        kind: EntityKind,
        style: &ResolvedStyle,
    ) -> Result<Attributes>;

    /// Full attribute list of the edge a relation becomes
    fn shape_relation(
        &self,
        relation: &RelationSpec,
        kind: RelationKind,
        style: &ResolvedStyle,
    ) -> Result<Attributes>;

    /// Graph-level layout attributes
    fn layout_hints(&self, intent: &DiagramIntent) -> Attributes {
        let direction = requested_direction(intent);
        Attributes::new().with("rankdir", direction.rankdir())
    }
}

/// The `style` attribute value for a node drawn with `style`
pub fn node_style_value(style: &ResolvedStyle) -> String {
    if style.line_style == LineStyle::Invisible {
        return LineStyle::Invisible.dot_name().to_string();
    }
    let mut parts: Vec<&str> = Vec::new();
    if style.filled {
        parts.push("filled");
    }
    if style.shape.is_rounded() {
        parts.push("rounded");
    }
    if style.line_style != LineStyle::Solid || parts.is_empty() {
        parts.push(style.line_style.dot_name());
    }
    parts.join(",")
}

/// Node attributes for dialects drawing plain Graphviz shapes
///
/// Every key is always present so per-node attributes can be reduced
/// against the defaults without losing information.
pub fn plain_node_attributes(style: &ResolvedStyle) -> Attributes {
    let mut attrs = Attributes::new()
        .with("shape", style.shape.dot_name())
        .with("style", node_style_value(style))
        .with("color", style.line_color.as_str())
        .with("fillcolor", style.fill_color.as_str())
        .with("fontname", style.font_name.as_str())
        .with("fontcolor", style.font_color.as_str());
    if style.line_style == LineStyle::Bold {
        attrs.set("penwidth", "2");
    } else {
        attrs.set("penwidth", "1");
    }
    attrs
}

/// Edge attributes for dialects whose arrowheads follow the style
pub fn plain_edge_attributes(style: &ResolvedStyle) -> Attributes {
    Attributes::new()
        .with("style", style.line_style.dot_name())
        .with("color", style.line_color.as_str())
        .with("fontname", style.font_name.as_str())
        .with("fontcolor", style.font_color.as_str())
        .with("arrowhead", style.arrow_head.dot_name())
}

/// Wrap a plain label at [`LABEL_WRAP_WIDTH`] and join it with newlines
pub fn wrapped_label(label: &str) -> String {
    wrap_label(label, LABEL_WRAP_WIDTH).join("\n")
}

/// The requested direction, or top-to-bottom
pub fn requested_direction(intent: &DiagramIntent) -> Direction {
    intent.direction.unwrap_or_default()
}
