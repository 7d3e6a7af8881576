//! Diagram service: compile, persist and render
//!
//! [`DiagramService`] writes `<folder>/<basename>.dot` and then asks a
//! [`Rasterizer`] for `<folder>/<basename>.<format>`. Both files are written
//! to a temporary file in the target folder and renamed into place, so a
//! failed or interrupted request never leaves a truncated file behind or
//! clobbers an earlier good one.

mod config;
mod render;

pub use config::*;
pub use render::*;

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use tempfile::NamedTempFile;
use tracing::{debug, error, info, span, Instrument, Level};

use crate::core::{DiagramError, DiagramIntent, Result};
use crate::dot::check_dot;

/// Paths of a successfully generated diagram
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedDiagram {
    pub document_path: PathBuf,
    pub image_path: PathBuf,
    pub format: ImageFormat,
    pub dpi: u32,
}

/// Compiles intents and renders them to files
#[derive(Clone)]
pub struct DiagramService {
    config: ServiceConfig,
    rasterizer: Arc<dyn Rasterizer>,
}

impl std::fmt::Debug for DiagramService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiagramService")
            .field("config", &self.config)
            .field("rasterizer", &self.rasterizer.name())
            .finish()
    }
}

impl DiagramService {
    /// A service rendering through the configured Graphviz executable
    pub fn new(config: ServiceConfig) -> Self {
        let rasterizer = GraphvizRasterizer::new(config.dot_program.clone(), config.render_timeout);
        Self::with_rasterizer(config, Arc::new(rasterizer))
    }

    pub fn with_rasterizer(config: ServiceConfig, rasterizer: Arc<dyn Rasterizer>) -> Self {
        Self { config, rasterizer }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Compile `intent`, write its document and render the image
    ///
    /// Compilation and configuration errors are returned before anything
    /// is written. When rendering fails the document stays on disk and its
    /// path is carried by the error.
    pub async fn generate(
        &self,
        intent: &DiagramIntent,
        output: &OutputConfig,
    ) -> Result<GeneratedDiagram> {
        let span = span!(
            Level::INFO,
            "generate_diagram",
            dialect = %intent.dialect,
            basename = %output.basename,
            format = %output.format
        );
        async {
            let resolved = output.resolve(&self.config.output_dir)?;
            let document = crate::compile(intent)?;
            self.persist_and_render(&document, &resolved).await
        }
        .instrument(span)
        .await
    }

    /// Validate caller-supplied DOT text, write it and render the image
    pub async fn generate_from_source(
        &self,
        source: &str,
        output: &OutputConfig,
    ) -> Result<GeneratedDiagram> {
        let span = span!(
            Level::INFO,
            "generate_from_source",
            bytes = source.len(),
            basename = %output.basename
        );
        async {
            let resolved = output.resolve(&self.config.output_dir)?;
            check_dot(source)?;
            self.persist_and_render(source, &resolved).await
        }
        .instrument(span)
        .await
    }

    /// Compile `intent` and write only its document
    pub async fn write_document(
        &self,
        intent: &DiagramIntent,
        output: &OutputConfig,
    ) -> Result<PathBuf> {
        let span = span!(
            Level::INFO,
            "write_document",
            dialect = %intent.dialect,
            basename = %output.basename
        );
        async {
            let resolved = output.resolve(&self.config.output_dir)?;
            let document = crate::compile(intent)?;
            prepare_folder(&resolved.folder)?;
            write_atomic(&resolved.document_path, document.as_bytes())?;
            info!(path = %resolved.document_path.display(), "Document written");
            Ok(resolved.document_path)
        }
        .instrument(span)
        .await
    }

    async fn persist_and_render(
        &self,
        document: &str,
        resolved: &ResolvedOutput,
    ) -> Result<GeneratedDiagram> {
        prepare_folder(&resolved.folder)?;
        write_atomic(&resolved.document_path, document.as_bytes())?;
        info!(path = %resolved.document_path.display(), "Document written");

        // The renderer writes into a temporary sibling that only replaces
        // the final image once rendering succeeded.
        let staged = tempfile::Builder::new()
            .prefix(&format!(".{}.", resolved.basename))
            .suffix(&format!(".{}", resolved.format.extension()))
            .tempfile_in(&resolved.folder)?;
        let request = RenderRequest {
            document: resolved.document_path.clone(),
            image: staged.path().to_path_buf(),
            format: resolved.format,
            graphviz_args: resolved.graphviz_args.clone(),
        };

        debug!(rasterizer = self.rasterizer.name(), "Rendering image");
        if let Err(failure) = self.rasterizer.rasterize(&request).await {
            error!(error = %failure, "Rendering failed; keeping document");
            return Err(render_error(failure, &resolved.document_path));
        }

        staged
            .persist(&resolved.image_path)
            .map_err(|e| DiagramError::from(e.error))?;
        info!(path = %resolved.image_path.display(), "Image written");

        Ok(GeneratedDiagram {
            document_path: resolved.document_path.clone(),
            image_path: resolved.image_path.clone(),
            format: resolved.format,
            dpi: resolved.dpi,
        })
    }
}

impl Default for DiagramService {
    fn default() -> Self {
        Self::new(ServiceConfig::default())
    }
}

fn render_error(failure: RenderFailure, document: &Path) -> DiagramError {
    match failure {
        RenderFailure::Unavailable(reason) => DiagramError::RenderUnavailable {
            document: document.to_path_buf(),
            reason,
        },
        RenderFailure::Syntax(diagnostics) => DiagramError::RenderSyntax {
            document: document.to_path_buf(),
            diagnostics,
        },
    }
}

/// Create `folder` if needed and make sure files can be written into it
fn prepare_folder(folder: &Path) -> Result<()> {
    fs::create_dir_all(folder).map_err(|e| {
        DiagramError::output_config(format!(
            "cannot create target folder {}: {}",
            folder.display(),
            e
        ))
    })?;
    let metadata = fs::metadata(folder)?;
    if !metadata.is_dir() {
        return Err(DiagramError::output_config(format!(
            "target folder {} is not a directory",
            folder.display()
        )));
    }
    if metadata.permissions().readonly() {
        return Err(DiagramError::output_config(format!(
            "target folder {} is not writable",
            folder.display()
        )));
    }
    Ok(())
}

/// Write `contents` to a temporary sibling of `path`, then rename it over
fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let folder = path.parent().unwrap_or_else(|| Path::new("."));
    let mut file = NamedTempFile::new_in(folder)?;
    file.write_all(contents)?;
    file.flush()?;
    file.persist(path).map_err(|e| DiagramError::from(e.error))?;
    Ok(())
}
