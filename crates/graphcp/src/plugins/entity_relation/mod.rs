//! Entity-relation dialect
//!
//! Tables become HTML-table nodes and foreign keys carry crow's-foot
//! markers at both ends.

mod dialect;
mod table;

pub use dialect::{cardinality_markers, EntityRelationDialect};
pub(crate) use table::styled_table;
pub use table::table_label;
