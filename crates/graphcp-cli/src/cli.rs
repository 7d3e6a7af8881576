//! Command-line interface for the graphcp utility
//!
//! Compiles diagram intents (JSON) into Graphviz DOT documents and renders
//! them to images.

use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info};

use graphcp::core::logging::init_logging;
use graphcp::dot::check_dot;
use graphcp::service::{DiagramService, ImageFormat, ImageSize, OutputConfig, ServiceConfig};
use graphcp::{DiagramIntent, DialectKind};

/// graphcp - Compile structured diagram intents into Graphviz DOT
#[derive(Parser)]
#[command(name = "graphcp")]
#[command(about = "Compile structured diagram intents into Graphviz documents and images")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Set log level (trace|debug|info|warn|error)
    #[arg(long, value_enum, default_value_t = LogLevel::Warn, global = true)]
    pub log_level: LogLevel,

    /// Set log format (compact|pretty|json)
    #[arg(long, value_enum, default_value_t = LogFormat::Compact, global = true)]
    pub log_format: LogFormat,
}

/// Log level options
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Log format options
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

impl LogFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Compact => "compact",
            LogFormat::Pretty => "pretty",
            LogFormat::Json => "json",
        }
    }
}

/// Image formats accepted on the command line
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq, Default)]
pub enum FormatChoice {
    #[default]
    Png,
    Svg,
    Pdf,
}

impl From<FormatChoice> for ImageFormat {
    fn from(value: FormatChoice) -> Self {
        match value {
            FormatChoice::Png => ImageFormat::Png,
            FormatChoice::Svg => ImageFormat::Svg,
            FormatChoice::Pdf => ImageFormat::Pdf,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compile a diagram intent (JSON) to DOT
    Emit {
        /// Input file containing the intent (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output file for the DOT document (use - for stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Write the DOT document and render it to an image
    Generate(GenerateArgs),

    /// Check a raw DOT document against the grammar
    Check {
        /// Input file containing DOT (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// Validate a diagram intent without writing anything
    Validate {
        /// Input file containing the intent (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// Show supported diagram dialects
    Dialects {
        /// Show in JSON format
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct GenerateArgs {
    /// Input file (use - for stdin)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Treat the input as a DOT document instead of an intent
    #[arg(long)]
    pub raw: bool,

    /// Target folder (defaults to GRAPHCP_OUTPUT_DIR or the temp directory)
    #[arg(short, long)]
    pub folder: Option<PathBuf>,

    /// Base file name for the document and the image
    #[arg(short, long, default_value = "output")]
    pub name: String,

    /// Image format
    #[arg(long, value_enum, default_value_t = FormatChoice::Png)]
    pub format: FormatChoice,

    /// Target width in pixels
    #[arg(long, default_value_t = 500, conflicts_with = "dpi")]
    pub width: u32,

    /// Target height in pixels
    #[arg(long, default_value_t = 500, conflicts_with = "dpi")]
    pub height: u32,

    /// Render at a fixed resolution instead of a target size
    #[arg(long)]
    pub dpi: Option<u32>,

    /// Graphviz executable (defaults to GRAPHCP_DOT or `dot`)
    #[arg(long)]
    pub dot: Option<String>,

    /// Render timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Only write the DOT document
    #[arg(long, conflicts_with = "raw")]
    pub document_only: bool,

    /// Report the written paths as JSON
    #[arg(long)]
    pub json: bool,
}

impl GenerateArgs {
    fn output_config(&self) -> OutputConfig {
        let size = match self.dpi {
            Some(dpi) => ImageSize::dpi(dpi),
            None => ImageSize::pixels(self.width, self.height),
        };
        let mut output = OutputConfig::new(self.name.clone())
            .with_image_size(size)
            .with_format(self.format.into());
        if let Some(folder) = &self.folder {
            output = output.with_target_folder(folder.clone());
        }
        output
    }

    fn service_config(&self) -> Result<ServiceConfig> {
        let mut config = ServiceConfig::from_env()?;
        if let Some(dot) = &self.dot {
            config = config.with_dot_program(dot.clone());
        }
        if let Some(secs) = self.timeout {
            if secs == 0 {
                return Err(anyhow!("--timeout must be greater than zero"));
            }
            config = config.with_render_timeout(Duration::from_secs(secs));
        }
        Ok(config)
    }
}

/// Main CLI application
#[derive(Default)]
pub struct GraphcpApp;

impl GraphcpApp {
    pub fn new() -> Self {
        Self
    }

    /// Run the application with the given CLI arguments
    pub async fn run(&self, cli: Cli) -> Result<()> {
        // Environment variables take precedence over the flag
        let log_level = std::env::var("GRAPHCP_LOG_LEVEL")
            .ok()
            .or_else(|| std::env::var("RUST_LOG").ok())
            .unwrap_or_else(|| {
                if cli.verbose && cli.log_level == LogLevel::Warn {
                    LogLevel::Info.as_str().to_string()
                } else {
                    cli.log_level.as_str().to_string()
                }
            });
        let log_format = std::env::var("GRAPHCP_LOG_FORMAT")
            .ok()
            .unwrap_or_else(|| cli.log_format.as_str().to_string());

        if let Err(e) = init_logging(Some(&log_level), Some(&log_format)) {
            eprintln!("Warning: Failed to initialize logging: {}", e);
        }

        if cli.verbose {
            eprintln!("graphcp v{}", env!("CARGO_PKG_VERSION"));
        }
        debug!(log_level = %log_level, log_format = %log_format, "Logging configured");

        match cli.command {
            Commands::Emit { input, output } => self.emit_command(input, output, cli.verbose),
            Commands::Generate(args) => self.generate_command(args, cli.verbose).await,
            Commands::Check { input } => self.check_command(input, cli.verbose),
            Commands::Validate { input } => self.validate_command(input, cli.verbose),
            Commands::Dialects { json } => self.dialects_command(json, cli.verbose),
        }
    }

    /// Handle the emit command
    fn emit_command(
        &self,
        input: Option<PathBuf>,
        output: Option<PathBuf>,
        verbose: bool,
    ) -> Result<()> {
        let intent = self.read_intent(input)?;
        let document = graphcp::compile(&intent).context("Failed to compile diagram intent")?;

        if verbose {
            eprintln!("Compiled {} diagram ({} bytes)", intent.dialect, document.len());
        }

        self.write_output(output, &document)
    }

    /// Handle the generate command
    async fn generate_command(&self, args: GenerateArgs, verbose: bool) -> Result<()> {
        let content = self.read_input(args.input.clone())?;
        let output = args.output_config();
        let service = DiagramService::new(args.service_config()?);
        debug!(?service, raw = args.raw, document_only = args.document_only, "Generating");

        if verbose {
            eprintln!("Read {} bytes of input", content.len());
        }

        if args.document_only {
            let intent = parse_intent(&content)?;
            let path = service.write_document(&intent, &output).await?;
            if args.json {
                let report = serde_json::json!({ "documentPath": path });
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("DOT file created: {}", path.display());
            }
            return Ok(());
        }

        let generated = if args.raw {
            service.generate_from_source(&content, &output).await?
        } else {
            let intent = parse_intent(&content)?;
            service.generate(&intent, &output).await?
        };

        info!(
            document = %generated.document_path.display(),
            image = %generated.image_path.display(),
            "Diagram generated"
        );
        if args.json {
            println!("{}", serde_json::to_string_pretty(&generated)?);
        } else {
            println!("DOT file created: {}", generated.document_path.display());
            println!(
                "{} file created: {} ({} dpi)",
                generated.format.extension().to_uppercase(),
                generated.image_path.display(),
                generated.dpi
            );
        }
        Ok(())
    }

    /// Handle the check command
    fn check_command(&self, input: Option<PathBuf>, verbose: bool) -> Result<()> {
        let content = self.read_input(input)?;

        if verbose {
            eprintln!("Read {} bytes of input", content.len());
        }

        match check_dot(&content) {
            Ok(graph) => {
                let kind = if graph.directed { "digraph" } else { "graph" };
                println!(
                    "✓ Valid DOT {} ({} nodes, {} edges, {} clusters)",
                    kind,
                    graph.node_ids().len(),
                    graph.edge_count(),
                    graph.cluster_count()
                );
                Ok(())
            }
            Err(e) => {
                println!("✗ Invalid DOT document: {}", e);
                Err(e.into())
            }
        }
    }

    /// Handle the validate command
    fn validate_command(&self, input: Option<PathBuf>, verbose: bool) -> Result<()> {
        let intent = self.read_intent(input)?;

        if verbose {
            eprintln!(
                "Validating {} diagram with {} entities and {} relations",
                intent.dialect,
                intent.entities.len(),
                intent.relations.len()
            );
        }

        match graphcp::build(&intent) {
            Ok(model) => {
                println!(
                    "✓ Valid {} diagram ({} nodes, {} edges, {} clusters)",
                    intent.dialect,
                    model.node_count(),
                    model.edge_count(),
                    model.cluster_count()
                );
                Ok(())
            }
            Err(e) => {
                println!("✗ Invalid {} diagram: {}", intent.dialect, e);
                Err(e.into())
            }
        }
    }

    /// Handle the dialects command
    fn dialects_command(&self, json: bool, verbose: bool) -> Result<()> {
        if verbose {
            eprintln!("Listing supported dialects");
        }

        let dialects = DialectKind::all();
        if json {
            let entries: Vec<serde_json::Value> = dialects
                .iter()
                .map(|d| {
                    serde_json::json!({
                        "name": d.to_string(),
                        "description": d.description(),
                    })
                })
                .collect();
            let report = serde_json::json!({
                "supported_dialects": entries,
                "total": dialects.len(),
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            println!("Supported dialects:");
            for dialect in dialects {
                println!("  {:<16} - {}", dialect.to_string(), dialect.description());
            }
            println!();
            println!("Total: {} dialects supported", dialects.len());
        }

        Ok(())
    }

    fn read_intent(&self, input: Option<PathBuf>) -> Result<DiagramIntent> {
        let content = self.read_input(input)?;
        parse_intent(&content)
    }

    /// Read input from file or stdin
    pub fn read_input(&self, input: Option<PathBuf>) -> Result<String> {
        match input {
            Some(path) if path.to_string_lossy() != "-" => fs::read_to_string(&path)
                .with_context(|| format!("Failed to read input file '{}'", path.display())),
            _ => {
                let mut content = String::new();
                io::stdin()
                    .read_to_string(&mut content)
                    .context("Failed to read stdin")?;
                Ok(content)
            }
        }
    }

    /// Write output to file or stdout
    pub fn write_output(&self, output: Option<PathBuf>, content: &str) -> Result<()> {
        match output {
            Some(path) if path.to_string_lossy() != "-" => fs::write(&path, content)
                .with_context(|| format!("Failed to write output file '{}'", path.display())),
            _ => {
                let mut stdout = io::stdout();
                stdout.write_all(content.as_bytes())?;
                if !content.is_empty() && !content.ends_with('\n') {
                    stdout.write_all(b"\n")?;
                }
                stdout.flush()?;
                Ok(())
            }
        }
    }
}

/// Parse a diagram intent from JSON
pub fn parse_intent(content: &str) -> Result<DiagramIntent> {
    serde_json::from_str(content).context("Failed to parse diagram intent JSON")
}
