//! UML class dialect
//!
//! Classes and interfaces are three-compartment tables; relation kinds
//! select the UML arrow notation.

mod dialect;

pub use dialect::{relation_notation, RelationNotation, UmlClassDialect};
