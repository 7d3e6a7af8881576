//! Rasterization through Graphviz
//!
//! The [`Rasterizer`] trait is the seam between the service and the
//! external renderer, so tests can substitute a scripted implementation.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, span, warn, Instrument, Level};

use super::config::ImageFormat;

/// One rasterization job
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderRequest {
    /// The DOT document to render
    pub document: PathBuf,
    /// Where the renderer must write the image
    pub image: PathBuf,
    pub format: ImageFormat,
    /// Extra Graphviz options such as `-Gdpi=100`
    pub graphviz_args: Vec<String>,
}

/// Why a rasterization failed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderFailure {
    /// The renderer could not run or did not finish
    #[error("{0}")]
    Unavailable(String),
    /// The renderer rejected the document
    #[error("{0}")]
    Syntax(String),
}

/// Produces an image from a DOT document on disk
#[async_trait]
pub trait Rasterizer: Send + Sync {
    fn name(&self) -> &'static str;

    async fn rasterize(&self, request: &RenderRequest) -> Result<(), RenderFailure>;
}

/// Runs the Graphviz `dot` executable
#[derive(Debug, Clone)]
pub struct GraphvizRasterizer {
    program: String,
    timeout: Duration,
}

impl GraphvizRasterizer {
    pub fn new(program: impl Into<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            timeout,
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    fn command(&self, request: &RenderRequest) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg(format!("-T{}", request.format.extension()))
            .args(&request.graphviz_args)
            .arg("-o")
            .arg(&request.image)
            .arg(&request.document)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }
}

impl Default for GraphvizRasterizer {
    fn default() -> Self {
        Self::new("dot", Duration::from_secs(30))
    }
}

/// Graphviz reports grammar problems as `syntax error in line N`
fn is_syntax_diagnostic(stderr: &str) -> bool {
    stderr.to_ascii_lowercase().contains("syntax error")
}

#[async_trait]
impl Rasterizer for GraphvizRasterizer {
    fn name(&self) -> &'static str {
        "graphviz"
    }

    async fn rasterize(&self, request: &RenderRequest) -> Result<(), RenderFailure> {
        let span = span!(
            Level::INFO,
            "rasterize",
            program = %self.program,
            format = %request.format,
            document = %request.document.display()
        );

        async {
            let child = self.command(request).spawn().map_err(|e| {
                warn!(error = %e, "Failed to start renderer");
                RenderFailure::Unavailable(format!("failed to start '{}': {}", self.program, e))
            })?;

            // Dropping the future on timeout drops the child, which kills it.
            let output = match timeout(self.timeout, child.wait_with_output()).await {
                Ok(Ok(output)) => output,
                Ok(Err(e)) => {
                    warn!(error = %e, "Renderer did not complete");
                    return Err(RenderFailure::Unavailable(format!(
                        "'{}' did not complete: {}",
                        self.program, e
                    )));
                }
                Err(_) => {
                    warn!(timeout_secs = self.timeout.as_secs_f64(), "Renderer timed out");
                    return Err(RenderFailure::Unavailable(format!(
                        "'{}' timed out after {:?}",
                        self.program, self.timeout
                    )));
                }
            };

            if output.status.success() {
                debug!("Renderer finished");
                return Ok(());
            }

            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            warn!(status = %output.status, stderr = %stderr, "Renderer failed");
            if is_syntax_diagnostic(&stderr) {
                Err(RenderFailure::Syntax(stderr))
            } else if stderr.is_empty() {
                Err(RenderFailure::Unavailable(format!(
                    "'{}' exited with {}",
                    self.program, output.status
                )))
            } else {
                Err(RenderFailure::Unavailable(format!(
                    "'{}' exited with {}: {}",
                    self.program, output.status, stderr
                )))
            }
        }
        .instrument(span)
        .await
    }
}
