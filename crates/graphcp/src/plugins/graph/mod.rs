//! General graph dialect

mod dialect;

pub use dialect::GraphDialect;
