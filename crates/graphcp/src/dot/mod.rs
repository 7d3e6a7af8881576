//! Graphviz DOT output
//!
//! [`DotEmitter`] serializes a [`GraphModel`] into DOT text and
//! [`check_dot`] verifies that a DOT document is well-formed.

mod emitter;
pub mod escape;
pub mod syntax;

pub use emitter::DotEmitter;
pub use escape::{escape_html, escape_quoted, is_bare_id, quote};
pub use syntax::{check_dot, DotGraph};

use crate::core::{GraphModel, Result};

/// Turns a graph model into a document
pub trait Emitter: Send + Sync {
    type Output;

    fn emit(&self, model: &GraphModel) -> Result<Self::Output>;

    fn name(&self) -> &'static str;

    /// Document format identifier
    fn format(&self) -> &'static str;

    /// File extension for written documents, without the dot
    fn extension(&self) -> &'static str;
}

/// Emit `model` as DOT text
pub fn emit(model: &GraphModel) -> Result<String> {
    DotEmitter::new().emit(model)
}
