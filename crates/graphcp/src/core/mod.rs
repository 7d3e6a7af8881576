//! Core abstractions for diagram compilation
//!
//! This module defines the intent data model, the style resolver, the
//! identifier allocator, the intermediate graph model and the [`Dialect`]
//! trait every diagram family implements.

mod dialect;
mod error;
mod ident;
pub mod logging;
mod model;
mod style;
mod text;
mod types;

pub use dialect::*;
pub use error::*;
pub use ident::*;
pub use logging::*;
pub use model::*;
pub use style::*;
pub use text::*;
pub use types::*;
