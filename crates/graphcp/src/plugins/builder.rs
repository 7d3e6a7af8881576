//! Graph model builder
//!
//! Validates a [`DiagramIntent`] against its dialect and assembles the
//! [`GraphModel`] the emitter serializes:
//! validation → identifiers → clusters → nodes → edges → rank constraints.
//! Validation is complete before anything is assembled, so an invalid
//! intent never produces a partial model.

use std::collections::{HashMap, HashSet};

use tracing::{debug, info, span, trace, warn, Level};

use crate::core::{
    node_style_value, wrapped_label, Attributes, CentralHint, DiagramError, DiagramIntent,
    Dialect, DialectKind, EntityKind, GraphModel, IdentifierAllocator, LineStyle, ModelEdge,
    ModelNode, Rank, RankConstraint, RelationKind, Result, StyleResolver, StyleSpec,
    StyleTarget,
};

use super::dialect_for;
use super::groups::ClusterPlan;

/// Name of the emitted graph
pub const GRAPH_NAME: &str = "G";

/// Builds graph models from intents
///
/// The builder holds no state; every call produces a fresh model.
#[derive(Debug, Clone, Copy, Default)]
pub struct GraphModelBuilder;

impl GraphModelBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Build with the dialect named by the intent
    pub fn build(&self, intent: &DiagramIntent) -> Result<GraphModel> {
        let dialect = dialect_for(intent.dialect);
        self.build_with(dialect.as_ref(), intent)
    }

    /// Build with an explicit dialect implementation
    pub fn build_with(&self, dialect: &dyn Dialect, intent: &DiagramIntent) -> Result<GraphModel> {
        let build_span = span!(
            Level::INFO,
            "build_model",
            dialect = dialect.name(),
            entity_count = intent.entities.len(),
            relation_count = intent.relations.len(),
            group_count = intent.groups.len()
        );
        let _enter = build_span.enter();

        info!("Building graph model");

        // Step 1: validate everything up front
        let validate_span = span!(Level::DEBUG, "validate_intent");
        let _validate_enter = validate_span.enter();
        let entity_kinds = check_entities(dialect, intent)?;
        let relation_kinds = check_relations(dialect, intent)?;
        let plan = ClusterPlan::plan(intent)?;
        dialect.validate(intent)?;
        check_self_loops(dialect, intent, &relation_kinds)?;
        intent.global_style.validate()?;
        debug!("Intent validated");
        drop(_validate_enter);

        let resolver = StyleResolver::new(dialect.style_policy());
        let mut allocator = IdentifierAllocator::new();

        let mut model = GraphModel::new(GRAPH_NAME, dialect.is_directed(intent));
        model.graph_attrs = graph_attributes(dialect, intent);
        model.node_defaults = dialect.node_attributes(&dialect.node_defaults());
        model.edge_defaults = dialect.edge_attributes(&dialect.edge_defaults());

        // Step 2: entity identifiers come first so cluster names never displace them
        let mut ids = Vec::with_capacity(intent.entities.len());
        let mut index_of: HashMap<&str, usize> = HashMap::new();
        for (index, entity) in intent.entities.iter().enumerate() {
            let id = allocator.allocate(&entity.name)?;
            trace!(entity = %entity.name, %id, "Allocated identifier");
            index_of.insert(entity.name.as_str(), index);
            ids.push(id);
        }

        // Step 3: clusters
        let cluster_span = span!(Level::DEBUG, "build_clusters");
        let _cluster_enter = cluster_span.enter();
        let clusters = add_clusters(&mut model, &mut allocator, &resolver, dialect, intent, &plan)?;
        debug!(cluster_count = model.cluster_count(), "Clusters built");
        drop(_cluster_enter);

        // Group fills paint the cluster box; the other fields cascade to members
        let member_styles: Vec<StyleSpec> = intent
            .groups
            .iter()
            .map(|group| StyleSpec {
                fill_color: None,
                ..group.style.clone()
            })
            .collect();

        // Step 4: nodes
        let node_span = span!(Level::DEBUG, "build_nodes");
        let _node_enter = node_span.enter();
        let node_default = dialect.node_defaults();
        let mut central = Vec::new();
        for ((entity, kind), id) in intent.entities.iter().zip(&entity_kinds).zip(&ids) {
            let layers: Vec<&StyleSpec> = plan
                .chain(&entity.name)
                .iter()
                .map(|&group| &member_styles[group])
                .collect();
            let mut style = resolver.resolve(
                &node_default,
                &intent.global_style,
                &layers,
                &entity.style,
                StyleTarget::Node,
            )?;

            if entity.central {
                match dialect.central_hint() {
                    CentralHint::FirstRank => central.push(id.clone()),
                    CentralHint::Emphasis => style.line_style = LineStyle::Bold,
                }
            }

            let attrs = dialect
                .shape_entity(entity, *kind, &style)?
                .without_defaults(&model.node_defaults);
            trace!(%id, %kind, "Shaped entity");
            model.add_node(ModelNode {
                id: id.clone(),
                name: entity.name.clone(),
                attrs,
                cluster: plan.innermost(&entity.name).map(|group| clusters[group]),
            })?;
        }
        debug!(node_count = model.node_count(), "Nodes built");
        drop(_node_enter);

        // Step 5: edges
        let edge_span = span!(Level::DEBUG, "build_edges");
        let _edge_enter = edge_span.enter();
        let edge_default = dialect.edge_defaults();
        for (relation, kind) in intent.relations.iter().zip(&relation_kinds) {
            let layers: Vec<&StyleSpec> = plan
                .common_chain(&relation.from, &relation.to)
                .iter()
                .map(|&group| &member_styles[group])
                .collect();
            let style = resolver.resolve(
                &edge_default,
                &intent.global_style,
                &layers,
                &relation.style,
                StyleTarget::Edge,
            )?;
            let attrs = dialect
                .shape_relation(relation, *kind, &style)?
                .without_defaults(&model.edge_defaults);

            let endpoint = |name: &str| {
                index_of
                    .get(name)
                    .map(|&index| ids[index].clone())
                    .ok_or_else(|| DiagramError::dangling(relation.describe(), name))
            };
            let edge = ModelEdge {
                from: endpoint(&relation.from)?,
                to: endpoint(&relation.to)?,
                attrs,
            };
            trace!(from = %edge.from, to = %edge.to, %kind, "Shaped relation");
            model.add_edge(edge)?;
        }
        debug!(edge_count = model.edge_count(), "Edges built");
        drop(_edge_enter);

        // Step 6: rank constraints
        if !central.is_empty() {
            debug!(central_count = central.len(), "Pinning central entities to first rank");
        }
        model.add_rank(RankConstraint {
            rank: Rank::Min,
            nodes: central,
        });

        info!(
            node_count = model.node_count(),
            edge_count = model.edge_count(),
            cluster_count = model.cluster_count(),
            "Graph model built"
        );
        Ok(model)
    }
}

/// Build a model with the dialect named by the intent
pub fn build_model(intent: &DiagramIntent) -> Result<GraphModel> {
    GraphModelBuilder::new().build(intent)
}

fn check_entities(dialect: &dyn Dialect, intent: &DiagramIntent) -> Result<Vec<EntityKind>> {
    let mut seen = HashSet::new();
    let mut kinds = Vec::with_capacity(intent.entities.len());

    for entity in &intent.entities {
        if !seen.insert(entity.name.as_str()) {
            warn!(entity = %entity.name, "Duplicate entity");
            return Err(DiagramError::DuplicateEntity {
                name: entity.name.clone(),
            });
        }

        let element = format!("entity '{}'", entity.name);
        let kind = entity.kind.unwrap_or_else(|| dialect.default_entity_kind());
        if !dialect.accepts_entity_kind(kind) {
            return Err(DiagramError::unsupported_kind(
                element,
                kind.to_string(),
                dialect.name(),
            ));
        }
        if !entity.columns.is_empty() && dialect.kind() != DialectKind::EntityRelation {
            return Err(DiagramError::unsupported_kind(
                element,
                "columns",
                dialect.name(),
            ));
        }
        let has_members = !entity.attributes.is_empty() || !entity.methods.is_empty();
        if has_members && dialect.kind() != DialectKind::UmlClass {
            return Err(DiagramError::unsupported_kind(
                element,
                "attributes/methods",
                dialect.name(),
            ));
        }
        kinds.push(kind);
    }

    Ok(kinds)
}

fn check_relations(dialect: &dyn Dialect, intent: &DiagramIntent) -> Result<Vec<RelationKind>> {
    let known: HashSet<&str> = intent.entities.iter().map(|e| e.name.as_str()).collect();
    let mut kinds = Vec::with_capacity(intent.relations.len());

    for relation in &intent.relations {
        for end in [&relation.from, &relation.to] {
            if !known.contains(end.as_str()) {
                warn!(relation = %relation.describe(), entity = %end, "Dangling reference");
                return Err(DiagramError::dangling(relation.describe(), end.clone()));
            }
        }

        let kind = relation
            .kind
            .unwrap_or_else(|| dialect.default_relation_kind());
        if !dialect.accepts_relation_kind(kind) {
            return Err(DiagramError::unsupported_kind(
                relation.describe(),
                kind.to_string(),
                dialect.name(),
            ));
        }
        if relation.cardinality.is_some() && kind != RelationKind::ForeignKey {
            return Err(DiagramError::unsupported_kind(
                relation.describe(),
                "cardinality",
                dialect.name(),
            ));
        }
        kinds.push(kind);
    }

    Ok(kinds)
}

fn check_self_loops(
    dialect: &dyn Dialect,
    intent: &DiagramIntent,
    kinds: &[RelationKind],
) -> Result<()> {
    for (relation, kind) in intent.relations.iter().zip(kinds) {
        if relation.from == relation.to && !dialect.allows_self_loop(*kind) {
            return Err(DiagramError::SelfLoopNotPermitted {
                entity: relation.from.clone(),
                kind: kind.to_string(),
                dialect: dialect.name().to_string(),
            });
        }
    }
    Ok(())
}

fn graph_attributes(dialect: &dyn Dialect, intent: &DiagramIntent) -> Attributes {
    let mut attrs = dialect.layout_hints(intent);
    if let Some(title) = intent.title.as_deref().filter(|t| !t.trim().is_empty()) {
        attrs.set("label", title);
        attrs.set("labelloc", "t");
    }
    attrs
}

// Clusters are added depth-first so each parent exists before its
// children; siblings keep declaration order. Returns the model cluster
// index of every group.
fn add_clusters(
    model: &mut GraphModel,
    allocator: &mut IdentifierAllocator,
    resolver: &StyleResolver,
    dialect: &dyn Dialect,
    intent: &DiagramIntent,
    plan: &ClusterPlan,
) -> Result<Vec<usize>> {
    let default = dialect.cluster_defaults();
    let mut indices = vec![0; intent.groups.len()];
    let mut pending: Vec<(usize, Option<usize>)> =
        plan.roots().iter().rev().map(|&group| (group, None)).collect();

    while let Some((group_index, parent)) = pending.pop() {
        let group = &intent.groups[group_index];
        let style = resolver.resolve_layers(&default, &[&group.style], StyleTarget::Cluster)?;

        let name = group
            .label
            .clone()
            .unwrap_or_else(|| (group_index + 1).to_string());
        let id = allocator.allocate(&format!("cluster_{}", name))?;

        let mut attrs = Attributes::new();
        if let Some(label) = &group.label {
            attrs.set("label", wrapped_label(label));
        }
        attrs.set("style", node_style_value(&style));
        attrs.set("color", style.line_color.as_str());
        if style.filled {
            attrs.set("fillcolor", style.fill_color.as_str());
        }
        attrs.set("fontname", style.font_name.as_str());
        attrs.set("fontcolor", style.font_color.as_str());

        trace!(group = %group.display_name(group_index), %id, "Added cluster");
        let index = model.add_cluster(id, attrs, parent);
        indices[group_index] = index;

        for &child in plan.children(group_index).iter().rev() {
            pending.push((child, Some(index)));
        }
    }

    Ok(indices)
}
