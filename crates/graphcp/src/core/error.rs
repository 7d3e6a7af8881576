//! Core error types for diagram compilation
//!
//! Every stage of the pipeline reports failures through [`DiagramError`].
//! The compiler fails fast with a specific variant instead of emitting a
//! best-effort document, so callers can surface the exact problem.

use std::path::PathBuf;
use thiserror::Error;

/// Result alias used throughout the library
pub type Result<T> = std::result::Result<T, DiagramError>;

/// Core error types for diagram compilation and rendering
#[derive(Error, Debug)]
pub enum DiagramError {
    #[error("Invalid label '{label}': nothing usable remains after sanitization")]
    InvalidLabel { label: String },

    #[error("Invalid style value '{value}' for {field}: {reason}")]
    InvalidStyleValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Groups '{first}' and '{second}' overlap without one containing the other")]
    OverlappingGroups { first: String, second: String },

    #[error("Group '{group}' has no members")]
    EmptyGroup { group: String },

    #[error("Cycle detected through entity '{entity}'")]
    CycleDetected { entity: String },

    #[error("Tree has multiple roots: {}", roots.join(", "))]
    MultipleRoots { roots: Vec<String> },

    #[error("Entity '{entity}' has more than one parent ('{first}' and '{second}')")]
    MultipleParents {
        entity: String,
        first: String,
        second: String,
    },

    #[error("{referrer} references unknown entity '{entity}'")]
    DanglingReference { referrer: String, entity: String },

    #[error("Entity '{name}' is declared more than once")]
    DuplicateEntity { name: String },

    #[error("Self-loop on '{entity}' is not permitted for {kind} relations in {dialect} diagrams")]
    SelfLoopNotPermitted {
        entity: String,
        kind: String,
        dialect: String,
    },

    #[error("{element} kind '{kind}' is not supported by {dialect} diagrams")]
    UnsupportedKind {
        element: String,
        kind: String,
        dialect: String,
    },

    #[error("Invalid output configuration: {message}")]
    InvalidOutputConfig { message: String },

    #[error("DOT syntax error: {message} at line {line}, column {column}")]
    DotSyntax {
        message: String,
        line: usize,
        column: usize,
    },

    #[error("Renderer unavailable ({reason}); document kept at {}", document.display())]
    RenderUnavailable { document: PathBuf, reason: String },

    #[error("Renderer rejected the document ({diagnostics}); document kept at {}", document.display())]
    RenderSyntax {
        document: PathBuf,
        diagnostics: String,
    },

    #[error("IO error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl DiagramError {
    /// Create a new invalid style value error
    pub fn invalid_style(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidStyleValue {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a new dangling reference error
    pub fn dangling(referrer: impl Into<String>, entity: impl Into<String>) -> Self {
        Self::DanglingReference {
            referrer: referrer.into(),
            entity: entity.into(),
        }
    }

    /// Create a new unsupported kind error
    pub fn unsupported_kind(
        element: impl Into<String>,
        kind: impl Into<String>,
        dialect: impl Into<String>,
    ) -> Self {
        Self::UnsupportedKind {
            element: element.into(),
            kind: kind.into(),
            dialect: dialect.into(),
        }
    }

    /// Create a new output configuration error
    pub fn output_config(message: impl Into<String>) -> Self {
        Self::InvalidOutputConfig {
            message: message.into(),
        }
    }

    /// Create a new DOT syntax error
    pub fn dot_syntax(message: impl Into<String>, line: usize, column: usize) -> Self {
        Self::DotSyntax {
            message: message.into(),
            line,
            column,
        }
    }

    /// Returns true for failures of the rendering collaborator.
    ///
    /// The text document has already been persisted when this is true.
    pub fn is_render_failure(&self) -> bool {
        matches!(
            self,
            DiagramError::RenderUnavailable { .. } | DiagramError::RenderSyntax { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_style_error() {
        let error = DiagramError::invalid_style("shape", "blob", "unknown shape");
        let error_msg = format!("{}", error);
        assert!(error_msg.contains("Invalid style value"));
        assert!(error_msg.contains("blob"));
        assert!(error_msg.contains("shape"));
    }

    #[test]
    fn test_multiple_roots_lists_roots() {
        let error = DiagramError::MultipleRoots {
            roots: vec!["CEO".to_string(), "Board".to_string()],
        };
        assert_eq!(error.to_string(), "Tree has multiple roots: CEO, Board");
    }

    #[test]
    fn test_dot_syntax_error() {
        let error = DiagramError::dot_syntax("unexpected '}'", 3, 7);
        let error_msg = format!("{}", error);
        assert!(error_msg.contains("line 3"));
        assert!(error_msg.contains("column 7"));
    }

    #[test]
    fn test_render_failure_classification() {
        let unavailable = DiagramError::RenderUnavailable {
            document: PathBuf::from("/tmp/out.dot"),
            reason: "dot not found".to_string(),
        };
        assert!(unavailable.is_render_failure());
        assert!(unavailable.to_string().contains("/tmp/out.dot"));

        let label = DiagramError::InvalidLabel {
            label: "!!!".to_string(),
        };
        assert!(!label.is_render_failure());
    }

    #[test]
    fn test_io_error_conversion() {
        use std::io;
        let io_err = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let error: DiagramError = io_err.into();
        let error_msg = format!("{}", error);
        assert!(error_msg.contains("IO error"));
        assert!(error_msg.contains("File not found"));
    }
}
