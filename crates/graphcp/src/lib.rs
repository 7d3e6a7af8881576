//! graphcp - Compile structured diagram intents into Graphviz DOT
//!
//! A library that turns a typed description of a diagram (entities,
//! relations, groups and styles) into a Graphviz DOT document, and a service
//! that persists the document and renders it to an image.
//!
//! Four dialects are supported: general graphs, entity-relationship
//! schemas, UML class diagrams and hierarchical trees.
//!
//! # Quick Start
//!
//! ```rust
//! use graphcp::prelude::*;
//!
//! let intent = DiagramIntent::new(DialectKind::Graph)
//!     .entity(EntitySpec::new("A"))
//!     .entity(EntitySpec::new("B"))
//!     .relation(RelationSpec::new("A", "B"));
//!
//! let dot = graphcp::compile(&intent).unwrap();
//! assert!(dot.starts_with("digraph G {"));
//! assert!(dot.contains("A -> B;"));
//! ```
//!
//! # Advanced Usage
//!
//! The pipeline stages are available individually:
//!
//! ```rust
//! use graphcp::prelude::*;
//!
//! let intent = DiagramIntent::new(DialectKind::Tree)
//!     .entity(EntitySpec::new("CEO"))
//!     .entity(EntitySpec::new("CTO"))
//!     .relation(RelationSpec::new("CEO", "CTO"));
//!
//! // Validate and lay out into the intermediate model
//! let model = graphcp::build(&intent).unwrap();
//! assert_eq!(model.node_count(), 2);
//!
//! // Serialize and check the result against the DOT grammar
//! let dot = graphcp::emit(&model).unwrap();
//! let parsed = check_dot(&dot).unwrap();
//! assert_eq!(parsed.edge_count(), 1);
//! ```

pub mod core;
pub mod dot;
pub mod plugins;
pub mod service;

pub use core::*;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::core::{
        Cardinality, ColumnSpec, DiagramError, DiagramIntent, DialectKind, Direction, EntityKind,
        EntitySpec, GraphModel, GroupSpec, Multiplicity, RelationKind, RelationSpec, Result,
        StyleSpec,
    };
    pub use crate::dot::{check_dot, DotEmitter, Emitter};
    pub use crate::plugins::{dialect_for, GraphModelBuilder};
    pub use crate::service::{
        DiagramService, GeneratedDiagram, ImageFormat, ImageSize, OutputConfig, ServiceConfig,
    };
}

/// Compile a diagram intent to DOT text
///
/// Validation is eager: an invalid intent is rejected with a specific
/// [`DiagramError`] and no partial document is produced. The same intent
/// always yields byte-identical output.
///
/// # Example
/// ```rust
/// use graphcp::prelude::*;
///
/// let intent = DiagramIntent::new(DialectKind::Graph)
///     .directed(false)
///     .entity(EntitySpec::new("x"))
///     .entity(EntitySpec::new("y"))
///     .relation(RelationSpec::new("x", "y"));
///
/// let dot = graphcp::compile(&intent).unwrap();
/// assert!(dot.starts_with("graph G {"));
/// assert!(dot.contains("x -- y;"));
/// ```
pub fn compile(intent: &DiagramIntent) -> Result<String> {
    let model = build(intent)?;
    emit(&model)
}

/// Validate an intent and build its graph model
pub fn build(intent: &DiagramIntent) -> Result<GraphModel> {
    plugins::build_model(intent)
}

/// Serialize a graph model as DOT text
pub fn emit(model: &GraphModel) -> Result<String> {
    dot::emit(model)
}
