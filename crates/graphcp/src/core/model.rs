//! Intermediate graph model
//!
//! The builder turns a [`DiagramIntent`](super::DiagramIntent) into a
//! [`GraphModel`]: nodes and edges already carrying their DOT identifiers
//! and attributes, a cluster tree, and rank constraints. The emitter
//! serializes it without making any further decisions.

use std::collections::HashMap;
use std::fmt;

use super::error::{DiagramError, Result};

/// Horizontal alignment of text inside an HTML table cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CellAlign {
    #[default]
    Center,
    Left,
}

/// A run of text inside an HTML label
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TextSpan {
    pub text: String,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
}

impl TextSpan {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    pub fn underline(mut self) -> Self {
        self.underline = true;
        self
    }
}

/// One cell of an HTML table; each line is a sequence of spans
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HtmlCell {
    pub lines: Vec<Vec<TextSpan>>,
    pub align: CellAlign,
    pub bgcolor: Option<String>,
}

impl HtmlCell {
    pub fn new() -> Self {
        Self::default()
    }

    /// A cell holding a single line
    pub fn line(spans: Vec<TextSpan>) -> Self {
        Self {
            lines: vec![spans],
            ..Self::default()
        }
    }

    pub fn push_line(&mut self, spans: Vec<TextSpan>) {
        self.lines.push(spans);
    }

    pub fn with_align(mut self, align: CellAlign) -> Self {
        self.align = align;
        self
    }

    pub fn with_bgcolor(mut self, color: impl Into<String>) -> Self {
        self.bgcolor = Some(color.into());
        self
    }
}

/// An HTML-like table label, one cell per row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HtmlTable {
    pub rows: Vec<HtmlCell>,
    pub border: u32,
    pub cell_border: u32,
    pub cell_padding: u32,
    pub color: Option<String>,
    pub bgcolor: Option<String>,
    /// Table `STYLE`, e.g. `rounded` or `dashed`
    pub style: Option<String>,
}

impl HtmlTable {
    pub fn new() -> Self {
        Self {
            rows: Vec::new(),
            border: 0,
            cell_border: 1,
            cell_padding: 4,
            color: None,
            bgcolor: None,
            style: None,
        }
    }

    pub fn row(mut self, cell: HtmlCell) -> Self {
        self.rows.push(cell);
        self
    }
}

impl Default for HtmlTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Value of a DOT attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrValue {
    /// Plain string, quoted by the emitter unless it is a bare identifier
    Text(String),
    /// HTML-like label, emitted between `<` and `>`
    Html(HtmlTable),
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        AttrValue::Text(value.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        AttrValue::Text(value)
    }
}

impl From<HtmlTable> for AttrValue {
    fn from(value: HtmlTable) -> Self {
        AttrValue::Html(value)
    }
}

/// Attribute list that keeps insertion order
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Attributes {
    entries: Vec<(String, AttrValue)>,
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key`, replacing an earlier value in place
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<AttrValue>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Builder form of [`Attributes::set`]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.set(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&AttrValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// The value of `key` if it is plain text
    pub fn text(&self, key: &str) -> Option<&str> {
        match self.get(key) {
            Some(AttrValue::Text(text)) => Some(text),
            _ => None,
        }
    }

    /// Set every entry of `other`, replacing existing keys
    pub fn extend(&mut self, other: Attributes) {
        for (key, value) in other.entries {
            self.set(key, value);
        }
    }

    /// Entries whose value differs from `defaults` (or that `defaults` lacks)
    pub fn without_defaults(&self, defaults: &Attributes) -> Attributes {
        Attributes {
            entries: self
                .entries
                .iter()
                .filter(|(k, v)| defaults.get(k) != Some(v))
                .cloned()
                .collect(),
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<AttrValue> {
        let index = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(index).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttrValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A node of the model; one per entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelNode {
    pub id: String,
    /// Entity name the node was built from
    pub name: String,
    pub attrs: Attributes,
    /// Index of the innermost containing cluster
    pub cluster: Option<usize>,
}

/// An edge of the model; one per relation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelEdge {
    pub from: String,
    pub to: String,
    pub attrs: Attributes,
}

/// A cluster subgraph; one per group
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cluster {
    pub id: String,
    pub attrs: Attributes,
    pub parent: Option<usize>,
    /// Nodes placed directly in this cluster, in intent order
    pub nodes: Vec<usize>,
    /// Directly nested clusters, in declaration order
    pub children: Vec<usize>,
}

/// Rank placement of a set of nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rank {
    Min,
    Same,
    Max,
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rank::Min => write!(f, "min"),
            Rank::Same => write!(f, "same"),
            Rank::Max => write!(f, "max"),
        }
    }
}

/// A `{ rank=...; a; b }` statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankConstraint {
    pub rank: Rank,
    pub nodes: Vec<String>,
}

/// The dialect-independent graph handed to the emitter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphModel {
    pub directed: bool,
    pub name: String,
    pub graph_attrs: Attributes,
    pub node_defaults: Attributes,
    pub edge_defaults: Attributes,
    nodes: Vec<ModelNode>,
    edges: Vec<ModelEdge>,
    clusters: Vec<Cluster>,
    root_clusters: Vec<usize>,
    ranks: Vec<RankConstraint>,
    node_index: HashMap<String, usize>,
}

impl GraphModel {
    pub fn new(name: impl Into<String>, directed: bool) -> Self {
        Self {
            directed,
            name: name.into(),
            graph_attrs: Attributes::new(),
            node_defaults: Attributes::new(),
            edge_defaults: Attributes::new(),
            nodes: Vec::new(),
            edges: Vec::new(),
            clusters: Vec::new(),
            root_clusters: Vec::new(),
            ranks: Vec::new(),
            node_index: HashMap::new(),
        }
    }

    /// Add a node and return its index
    pub fn add_node(&mut self, node: ModelNode) -> Result<usize> {
        if self.node_index.contains_key(&node.id) {
            return Err(DiagramError::DuplicateEntity { name: node.name });
        }
        let index = self.nodes.len();
        if let Some(cluster) = node.cluster {
            if let Some(c) = self.clusters.get_mut(cluster) {
                c.nodes.push(index);
            }
        }
        self.node_index.insert(node.id.clone(), index);
        self.nodes.push(node);
        Ok(index)
    }

    /// Add an edge between two existing nodes
    pub fn add_edge(&mut self, edge: ModelEdge) -> Result<()> {
        for end in [&edge.from, &edge.to] {
            if !self.node_index.contains_key(end) {
                return Err(DiagramError::dangling("edge", end.clone()));
            }
        }
        self.edges.push(edge);
        Ok(())
    }

    /// Add a cluster under `parent` (or at the root) and return its index
    pub fn add_cluster(
        &mut self,
        id: impl Into<String>,
        attrs: Attributes,
        parent: Option<usize>,
    ) -> usize {
        let index = self.clusters.len();
        self.clusters.push(Cluster {
            id: id.into(),
            attrs,
            parent,
            nodes: Vec::new(),
            children: Vec::new(),
        });
        match parent.and_then(|p| self.clusters.get_mut(p)) {
            Some(parent) => parent.children.push(index),
            None => self.root_clusters.push(index),
        }
        index
    }

    pub fn add_rank(&mut self, constraint: RankConstraint) {
        if !constraint.nodes.is_empty() {
            self.ranks.push(constraint);
        }
    }

    pub fn get_node(&self, id: &str) -> Option<&ModelNode> {
        self.node_index.get(id).map(|&i| &self.nodes[i])
    }

    pub fn nodes(&self) -> &[ModelNode] {
        &self.nodes
    }

    /// Nodes outside every cluster, in insertion order
    pub fn root_nodes(&self) -> impl Iterator<Item = &ModelNode> {
        self.nodes.iter().filter(|n| n.cluster.is_none())
    }

    pub fn edges(&self) -> &[ModelEdge] {
        &self.edges
    }

    pub fn clusters(&self) -> &[Cluster] {
        &self.clusters
    }

    pub fn cluster(&self, index: usize) -> Option<&Cluster> {
        self.clusters.get(index)
    }

    /// Top-level clusters in declaration order
    pub fn root_clusters(&self) -> &[usize] {
        &self.root_clusters
    }

    pub fn ranks(&self) -> &[RankConstraint] {
        &self.ranks
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn cluster_count(&self) -> usize {
        self.clusters.len()
    }

    /// The edge operator for this graph kind
    pub fn edge_op(&self) -> &'static str {
        if self.directed {
            "->"
        } else {
            "--"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str, cluster: Option<usize>) -> ModelNode {
        ModelNode {
            id: id.to_string(),
            name: id.to_string(),
            attrs: Attributes::new(),
            cluster,
        }
    }

    #[test]
    fn test_attributes_keep_order_and_replace_in_place() {
        let mut attrs = Attributes::new()
            .with("shape", "box")
            .with("color", "red")
            .with("label", "A");
        attrs.set("color", "blue");

        let keys: Vec<&str> = attrs.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["shape", "color", "label"]);
        assert_eq!(attrs.text("color"), Some("blue"));
        assert_eq!(attrs.remove("shape"), Some(AttrValue::from("box")));
        assert_eq!(attrs.len(), 2);
    }

    #[test]
    fn test_without_defaults_keeps_only_differences() {
        let defaults = Attributes::new().with("shape", "ellipse").with("color", "black");
        let attrs = Attributes::new()
            .with("shape", "ellipse")
            .with("color", "red")
            .with("label", "A");
        let reduced = attrs.without_defaults(&defaults);
        let keys: Vec<&str> = reduced.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["color", "label"]);
    }

    #[test]
    fn test_duplicate_node_rejected() {
        let mut model = GraphModel::new("G", true);
        model.add_node(node("a", None)).unwrap();
        assert!(matches!(
            model.add_node(node("a", None)),
            Err(DiagramError::DuplicateEntity { .. })
        ));
    }

    #[test]
    fn test_edge_requires_known_nodes() {
        let mut model = GraphModel::new("G", true);
        model.add_node(node("a", None)).unwrap();
        let edge = ModelEdge {
            from: "a".to_string(),
            to: "missing".to_string(),
            attrs: Attributes::new(),
        };
        assert!(matches!(
            model.add_edge(edge),
            Err(DiagramError::DanglingReference { .. })
        ));
        assert_eq!(model.edge_count(), 0);
    }

    #[test]
    fn test_cluster_tree_bookkeeping() {
        let mut model = GraphModel::new("G", false);
        let outer = model.add_cluster("cluster_outer", Attributes::new(), None);
        let inner = model.add_cluster("cluster_inner", Attributes::new(), Some(outer));
        model.add_node(node("a", Some(inner))).unwrap();
        model.add_node(node("b", None)).unwrap();

        assert_eq!(model.root_clusters(), &[outer]);
        assert_eq!(model.cluster(outer).unwrap().children, vec![inner]);
        assert_eq!(model.cluster(inner).unwrap().nodes, vec![0]);
        assert_eq!(model.root_nodes().count(), 1);
        assert_eq!(model.edge_op(), "--");
    }

    #[test]
    fn test_empty_rank_constraint_is_dropped() {
        let mut model = GraphModel::new("G", true);
        model.add_rank(RankConstraint {
            rank: Rank::Min,
            nodes: Vec::new(),
        });
        assert!(model.ranks().is_empty());
    }
}
