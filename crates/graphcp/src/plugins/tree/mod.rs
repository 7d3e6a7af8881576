//! Tree and org-chart dialect

mod dialect;
mod hierarchy;

pub use dialect::TreeDialect;
pub use hierarchy::validate_hierarchy;
