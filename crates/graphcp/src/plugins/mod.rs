//! Dialect plugins and the graph model builder
//!
//! Each diagram family lives in its own module and implements the
//! [`Dialect`](crate::core::Dialect) trait. The builder validates an intent
//! and drives the matching dialect to produce a graph model.

pub mod builder;
pub mod entity_relation;
pub mod graph;
pub mod groups;
pub mod tree;
pub mod uml_class;

pub use builder::*;
pub use entity_relation::*;
pub use graph::*;
pub use groups::*;
pub use tree::*;
pub use uml_class::*;

use crate::core::{Dialect, DialectKind};

/// The dialect implementation for `kind`
pub fn dialect_for(kind: DialectKind) -> Box<dyn Dialect> {
    match kind {
        DialectKind::Graph => Box::new(GraphDialect::new()),
        DialectKind::EntityRelation => Box::new(EntityRelationDialect::new()),
        DialectKind::UmlClass => Box::new(UmlClassDialect::new()),
        DialectKind::Tree => Box::new(TreeDialect::new()),
    }
}
