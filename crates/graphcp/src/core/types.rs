//! Core type definitions for diagram intents
//!
//! This module contains the structured input accepted by the compiler:
//! the dialect, entity and relation kinds, ER cardinalities, and the
//! [`DiagramIntent`] with its entity, relation and group specs.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::style::StyleSpec;

/// The four supported diagram families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DialectKind {
    /// General graph of plain nodes and edges
    #[default]
    #[serde(alias = "GRAPH")]
    Graph,
    /// Entity-relation schema of tables and foreign keys
    #[serde(alias = "ENTITY_RELATION", alias = "er", alias = "entity-relation")]
    EntityRelation,
    /// UML class diagram
    #[serde(alias = "UML_CLASS", alias = "uml", alias = "uml-class")]
    UmlClass,
    /// Tree or org-chart with a single root
    #[serde(alias = "TREE")]
    Tree,
}

impl DialectKind {
    /// All dialects in declaration order
    pub fn all() -> [DialectKind; 4] {
        [
            DialectKind::Graph,
            DialectKind::EntityRelation,
            DialectKind::UmlClass,
            DialectKind::Tree,
        ]
    }

    /// One-line description of the dialect
    pub fn description(&self) -> &'static str {
        match self {
            DialectKind::Graph => "General graphs with plain nodes and edges",
            DialectKind::EntityRelation => "Database schemas with tables and foreign keys",
            DialectKind::UmlClass => "UML class diagrams with compartments and relationships",
            DialectKind::Tree => "Trees and org-charts with a single root",
        }
    }
}

impl fmt::Display for DialectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DialectKind::Graph => write!(f, "graph"),
            DialectKind::EntityRelation => write!(f, "entity_relation"),
            DialectKind::UmlClass => write!(f, "uml_class"),
            DialectKind::Tree => write!(f, "tree"),
        }
    }
}

impl FromStr for DialectKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "graph" => Ok(DialectKind::Graph),
            "entity_relation" | "er" => Ok(DialectKind::EntityRelation),
            "uml_class" | "uml" => Ok(DialectKind::UmlClass),
            "tree" => Ok(DialectKind::Tree),
            _ => Err(format!("Unknown dialect: {}", s)),
        }
    }
}

/// Rank direction for hierarchical layouts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Top to bottom (TB or TD)
    #[default]
    #[serde(rename = "TB", alias = "TD", alias = "tb", alias = "td")]
    TopBottom,
    /// Left to right (LR)
    #[serde(rename = "LR", alias = "lr")]
    LeftRight,
    /// Bottom to top (BT)
    #[serde(rename = "BT", alias = "bt")]
    BottomTop,
    /// Right to left (RL)
    #[serde(rename = "RL", alias = "rl")]
    RightLeft,
}

impl Direction {
    /// The Graphviz `rankdir` value
    pub fn rankdir(&self) -> &'static str {
        match self {
            Direction::TopBottom => "TB",
            Direction::LeftRight => "LR",
            Direction::BottomTop => "BT",
            Direction::RightLeft => "RL",
        }
    }

    /// Returns true if ranks advance vertically (TB or BT)
    pub fn is_vertical(&self) -> bool {
        matches!(self, Direction::TopBottom | Direction::BottomTop)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.rankdir())
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "TB" | "TD" => Ok(Direction::TopBottom),
            "LR" => Ok(Direction::LeftRight),
            "BT" => Ok(Direction::BottomTop),
            "RL" => Ok(Direction::RightLeft),
            _ => Err(format!("Unknown direction: {}", s)),
        }
    }
}

/// What an entity represents; the valid set depends on the dialect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// Plain graph node
    Node,
    /// Database table (ER)
    Table,
    /// UML class
    Class,
    /// UML interface
    Interface,
    /// Position in an org-chart (tree)
    Role,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Node => write!(f, "node"),
            EntityKind::Table => write!(f, "table"),
            EntityKind::Class => write!(f, "class"),
            EntityKind::Interface => write!(f, "interface"),
            EntityKind::Role => write!(f, "role"),
        }
    }
}

/// What a relation represents; the valid set depends on the dialect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationKind {
    /// Plain edge
    Edge,
    /// Foreign key between tables (ER)
    #[serde(alias = "foreign-key", alias = "fk")]
    ForeignKey,
    /// Subclass to superclass
    Inheritance,
    /// Class to implemented interface
    Realization,
    /// Plain association
    Association,
    /// Usage dependency
    Dependency,
    /// Whole owns part (filled diamond at the whole)
    Composition,
    /// Whole references part (hollow diamond at the whole)
    Aggregation,
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelationKind::Edge => write!(f, "edge"),
            RelationKind::ForeignKey => write!(f, "foreign-key"),
            RelationKind::Inheritance => write!(f, "inheritance"),
            RelationKind::Realization => write!(f, "realization"),
            RelationKind::Association => write!(f, "association"),
            RelationKind::Dependency => write!(f, "dependency"),
            RelationKind::Composition => write!(f, "composition"),
            RelationKind::Aggregation => write!(f, "aggregation"),
        }
    }
}

/// One end of an ER relationship
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Multiplicity {
    /// Exactly one
    One,
    /// Zero or one (optional)
    ZeroOrOne,
    /// Many, with no lower bound stated
    Many,
    /// One or more
    OneOrMany,
    /// Zero or more
    ZeroOrMany,
}

impl Multiplicity {
    /// Graphviz arrow shape drawing the crow's-foot marker
    pub fn arrow_shape(&self) -> &'static str {
        match self {
            Multiplicity::One => "teetee",
            Multiplicity::ZeroOrOne => "teeodot",
            Multiplicity::Many => "crow",
            Multiplicity::OneOrMany => "crowtee",
            Multiplicity::ZeroOrMany => "crowodot",
        }
    }

    /// Short textual marker placed next to the edge end
    pub fn marker(&self) -> &'static str {
        match self {
            Multiplicity::One => "1",
            Multiplicity::ZeroOrOne => "0..1",
            Multiplicity::Many => "N",
            Multiplicity::OneOrMany => "1..N",
            Multiplicity::ZeroOrMany => "0..N",
        }
    }
}

impl fmt::Display for Multiplicity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Multiplicity::One => write!(f, "one"),
            Multiplicity::ZeroOrOne => write!(f, "optional"),
            Multiplicity::Many => write!(f, "many"),
            Multiplicity::OneOrMany => write!(f, "one-or-many"),
            Multiplicity::ZeroOrMany => write!(f, "zero-or-many"),
        }
    }
}

impl FromStr for Multiplicity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "one" | "1" | "1..1" => Ok(Multiplicity::One),
            "optional" | "zero-or-one" | "0..1" => Ok(Multiplicity::ZeroOrOne),
            "many" | "n" | "*" => Ok(Multiplicity::Many),
            "one-or-many" | "one-or-more" | "1..n" | "1..*" => Ok(Multiplicity::OneOrMany),
            "zero-or-many" | "zero-or-more" | "0..n" | "0..*" => Ok(Multiplicity::ZeroOrMany),
            _ => Err(format!("Unknown multiplicity: {}", s)),
        }
    }
}

/// Multiplicities at both ends of a foreign-key relation
///
/// Written as `"<from>-to-<to>"`, e.g. `"many-to-one"` or
/// `"zero-or-many-to-optional"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Cardinality {
    pub from: Multiplicity,
    pub to: Multiplicity,
}

impl Cardinality {
    pub fn new(from: Multiplicity, to: Multiplicity) -> Self {
        Self { from, to }
    }
}

impl Default for Cardinality {
    fn default() -> Self {
        Self::new(Multiplicity::Many, Multiplicity::One)
    }
}

impl fmt::Display for Cardinality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-to-{}", self.from, self.to)
    }
}

impl FromStr for Cardinality {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase().replace('_', "-");
        let (from, to) = lowered
            .split_once("-to-")
            .or_else(|| lowered.split_once(':'))
            .ok_or_else(|| format!("Cardinality must look like 'many-to-one': {}", s))?;
        Ok(Self::new(from.parse()?, to.parse()?))
    }
}

impl TryFrom<String> for Cardinality {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Cardinality> for String {
    fn from(value: Cardinality) -> Self {
        value.to_string()
    }
}

/// A column of an ER table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ColumnRepr", rename_all = "camelCase")]
pub struct ColumnSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub data_type: Option<String>,
    pub primary_key: bool,
    pub foreign_key: bool,
}

impl ColumnSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: None,
            primary_key: false,
            foreign_key: false,
        }
    }

    pub fn with_type(mut self, data_type: impl Into<String>) -> Self {
        self.data_type = Some(data_type.into());
        self
    }

    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    pub fn foreign_key(mut self) -> Self {
        self.foreign_key = true;
        self
    }
}

// Columns may be given as a bare name or as a full object.
#[derive(Deserialize)]
#[serde(untagged)]
enum ColumnRepr {
    Name(String),
    #[serde(rename_all = "camelCase")]
    Full {
        name: String,
        #[serde(default, rename = "type")]
        data_type: Option<String>,
        #[serde(default)]
        primary_key: bool,
        #[serde(default)]
        foreign_key: bool,
    },
}

impl From<ColumnRepr> for ColumnSpec {
    fn from(repr: ColumnRepr) -> Self {
        match repr {
            ColumnRepr::Name(name) => ColumnSpec::new(name),
            ColumnRepr::Full {
                name,
                data_type,
                primary_key,
                foreign_key,
            } => ColumnSpec {
                name,
                data_type,
                primary_key,
                foreign_key,
            },
        }
    }
}

/// A single entity of the diagram; becomes exactly one emitted node
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntitySpec {
    /// Reference key used by relations and groups
    pub name: String,
    /// Display text; defaults to `name`
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub kind: Option<EntityKind>,
    #[serde(default)]
    pub columns: Vec<ColumnSpec>,
    #[serde(default)]
    pub attributes: Vec<String>,
    #[serde(default)]
    pub methods: Vec<String>,
    /// Ask for the entity to be placed prominently
    #[serde(default)]
    pub central: bool,
    #[serde(default)]
    pub style: StyleSpec,
}

impl EntitySpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_kind(mut self, kind: EntityKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn with_column(mut self, column: ColumnSpec) -> Self {
        self.columns.push(column);
        self
    }

    pub fn with_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.attributes.push(attribute.into());
        self
    }

    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.methods.push(method.into());
        self
    }

    pub fn central(mut self) -> Self {
        self.central = true;
        self
    }

    pub fn with_style(mut self, style: StyleSpec) -> Self {
        self.style = style;
        self
    }

    /// Text shown for the entity
    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.name)
    }
}

/// A relation between two entities; becomes exactly one emitted edge
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationSpec {
    pub from: String,
    pub to: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub kind: Option<RelationKind>,
    #[serde(default)]
    pub cardinality: Option<Cardinality>,
    #[serde(default)]
    pub style: StyleSpec,
}

impl RelationSpec {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            ..Self::default()
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_kind(mut self, kind: RelationKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn with_cardinality(mut self, cardinality: Cardinality) -> Self {
        self.cardinality = Some(cardinality);
        self
    }

    pub fn with_style(mut self, style: StyleSpec) -> Self {
        self.style = style;
        self
    }

    /// Human-readable description used in error messages
    pub fn describe(&self) -> String {
        format!("relation '{}' -> '{}'", self.from, self.to)
    }
}

/// A visually bounded group of entities; becomes a cluster
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupSpec {
    #[serde(default)]
    pub label: Option<String>,
    pub members: Vec<String>,
    #[serde(default)]
    pub style: StyleSpec,
}

impl GroupSpec {
    pub fn new<I, S>(members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            label: None,
            members: members.into_iter().map(Into::into).collect(),
            style: StyleSpec::default(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_style(mut self, style: StyleSpec) -> Self {
        self.style = style;
        self
    }

    /// Name used in error messages; falls back to the declaration position
    pub fn display_name(&self, index: usize) -> String {
        match &self.label {
            Some(label) => label.clone(),
            None => format!("group #{}", index + 1),
        }
    }
}

fn default_directed() -> bool {
    true
}

/// The structured request describing one diagram
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagramIntent {
    #[serde(default)]
    pub dialect: DialectKind,
    #[serde(default = "default_directed")]
    pub directed: bool,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub direction: Option<Direction>,
    #[serde(default)]
    pub entities: Vec<EntitySpec>,
    #[serde(default)]
    pub relations: Vec<RelationSpec>,
    #[serde(default)]
    pub groups: Vec<GroupSpec>,
    #[serde(default)]
    pub global_style: StyleSpec,
}

impl DiagramIntent {
    pub fn new(dialect: DialectKind) -> Self {
        Self {
            dialect,
            directed: true,
            title: None,
            direction: None,
            entities: Vec::new(),
            relations: Vec::new(),
            groups: Vec::new(),
            global_style: StyleSpec::default(),
        }
    }

    pub fn directed(mut self, directed: bool) -> Self {
        self.directed = directed;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = Some(direction);
        self
    }

    pub fn entity(mut self, entity: EntitySpec) -> Self {
        self.entities.push(entity);
        self
    }

    pub fn relation(mut self, relation: RelationSpec) -> Self {
        self.relations.push(relation);
        self
    }

    pub fn group(mut self, group: GroupSpec) -> Self {
        self.groups.push(group);
        self
    }

    pub fn with_global_style(mut self, style: StyleSpec) -> Self {
        self.global_style = style;
        self
    }

    /// Find an entity by its reference name
    pub fn get_entity(&self, name: &str) -> Option<&EntitySpec> {
        self.entities.iter().find(|e| e.name == name)
    }
}

impl Default for DiagramIntent {
    fn default() -> Self {
        Self::new(DialectKind::default())
    }
}
