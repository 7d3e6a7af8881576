//! Output and service configuration

use std::env;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::core::{DiagramError, Result};

/// Largest accepted width or height, in pixels
pub const MAX_IMAGE_DIMENSION: u32 = 10_000;

/// Largest accepted explicit DPI
pub const MAX_DPI: u32 = 2_400;

/// Environment variable overriding the default output folder
pub const OUTPUT_DIR_ENV: &str = "GRAPHCP_OUTPUT_DIR";

/// Environment variable naming the Graphviz executable
pub const DOT_PROGRAM_ENV: &str = "GRAPHCP_DOT";

/// Environment variable overriding the render timeout, in seconds
pub const RENDER_TIMEOUT_ENV: &str = "GRAPHCP_RENDER_TIMEOUT_SECS";

const DEFAULT_BASENAME: &str = "output";
const DEFAULT_RENDER_TIMEOUT: Duration = Duration::from_secs(30);

/// Image format produced by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    #[default]
    Png,
    Svg,
    Pdf,
}

impl ImageFormat {
    pub fn all() -> &'static [ImageFormat] {
        &[ImageFormat::Png, ImageFormat::Svg, ImageFormat::Pdf]
    }

    /// File extension and Graphviz `-T` value
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Svg => "svg",
            ImageFormat::Pdf => "pdf",
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ImageFormat {
    type Err = DiagramError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "png" => Ok(ImageFormat::Png),
            "svg" => Ok(ImageFormat::Svg),
            "pdf" => Ok(ImageFormat::Pdf),
            _ => Err(DiagramError::output_config(format!(
                "unknown image format '{}' (expected png, svg or pdf)",
                s
            ))),
        }
    }
}

/// Requested image size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ImageSize {
    /// Target size in pixels; DPI is derived from the smaller side
    Pixels { width: u32, height: u32 },
    /// Explicit resolution, natural layout size
    Dpi { dpi: u32 },
}

impl Default for ImageSize {
    fn default() -> Self {
        ImageSize::Pixels {
            width: 500,
            height: 500,
        }
    }
}

impl ImageSize {
    pub fn pixels(width: u32, height: u32) -> Self {
        ImageSize::Pixels { width, height }
    }

    pub fn dpi(dpi: u32) -> Self {
        ImageSize::Dpi { dpi }
    }

    pub fn validate(&self) -> Result<()> {
        match *self {
            ImageSize::Pixels { width, height } => {
                for (name, value) in [("width", width), ("height", height)] {
                    if value == 0 || value > MAX_IMAGE_DIMENSION {
                        return Err(DiagramError::output_config(format!(
                            "{} must be between 1 and {} pixels, got {}",
                            name, MAX_IMAGE_DIMENSION, value
                        )));
                    }
                }
                Ok(())
            }
            ImageSize::Dpi { dpi } => {
                if dpi == 0 || dpi > MAX_DPI {
                    return Err(DiagramError::output_config(format!(
                        "dpi must be between 1 and {}, got {}",
                        MAX_DPI, dpi
                    )));
                }
                Ok(())
            }
        }
    }

    /// Rendering resolution
    ///
    /// For a pixel size this is a fifth of the smaller side, kept within
    /// 72..=300.
    pub fn effective_dpi(&self) -> u32 {
        match *self {
            ImageSize::Pixels { width, height } => (width.min(height) / 5).clamp(72, 300),
            ImageSize::Dpi { dpi } => dpi,
        }
    }

    /// Graphviz command-line options for this size
    pub fn graphviz_args(&self) -> Vec<String> {
        let dpi = self.effective_dpi();
        let mut args = vec![format!("-Gdpi={}", dpi)];
        if let ImageSize::Pixels { width, height } = *self {
            let inches = |px: u32| format!("{:.2}", f64::from(px) / f64::from(dpi));
            args.push(format!("-Gsize={},{}!", inches(width), inches(height)));
        }
        args
    }
}

/// Where and how a diagram is written
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputConfig {
    /// Folder for both files; the service default when absent
    #[serde(default)]
    pub target_folder: Option<PathBuf>,
    #[serde(default = "default_basename")]
    pub basename: String,
    #[serde(default)]
    pub image_size: ImageSize,
    #[serde(default)]
    pub format: ImageFormat,
}

fn default_basename() -> String {
    DEFAULT_BASENAME.to_string()
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASENAME)
    }
}

impl OutputConfig {
    pub fn new(basename: impl Into<String>) -> Self {
        Self {
            target_folder: None,
            basename: basename.into(),
            image_size: ImageSize::default(),
            format: ImageFormat::default(),
        }
    }

    pub fn with_target_folder(mut self, folder: impl Into<PathBuf>) -> Self {
        self.target_folder = Some(folder.into());
        self
    }

    pub fn with_image_size(mut self, size: ImageSize) -> Self {
        self.image_size = size;
        self
    }

    pub fn with_format(mut self, format: ImageFormat) -> Self {
        self.format = format;
        self
    }

    /// Validate the configuration and fix the output paths
    pub fn resolve(&self, default_folder: &Path) -> Result<ResolvedOutput> {
        self.image_size.validate()?;

        let folder = self
            .target_folder
            .clone()
            .unwrap_or_else(|| default_folder.to_path_buf());
        if folder.as_os_str().is_empty() {
            return Err(DiagramError::output_config("target folder is empty"));
        }

        let basename = sanitize_basename(&self.basename);
        let document_path = folder.join(format!("{}.dot", basename));
        let image_path = folder.join(format!("{}.{}", basename, self.format.extension()));

        trace!(
            folder = %folder.display(),
            basename = %basename,
            format = %self.format,
            "Resolved output paths"
        );

        Ok(ResolvedOutput {
            folder,
            basename,
            document_path,
            image_path,
            format: self.format,
            dpi: self.image_size.effective_dpi(),
            graphviz_args: self.image_size.graphviz_args(),
        })
    }
}

/// A validated [`OutputConfig`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedOutput {
    pub folder: PathBuf,
    pub basename: String,
    pub document_path: PathBuf,
    pub image_path: PathBuf,
    pub format: ImageFormat,
    pub dpi: u32,
    pub graphviz_args: Vec<String>,
}

/// Make a caller-supplied name safe to use as a file stem
///
/// Path separators and characters Windows rejects become `_`; leading and
/// trailing dots and spaces are removed. An empty result becomes `output`.
pub fn sanitize_basename(name: &str) -> String {
    let replaced: String = name
        .chars()
        .map(|c| match c {
            '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let trimmed = replaced.trim_matches(|c| c == '.' || c == ' ');
    if trimmed.is_empty() {
        DEFAULT_BASENAME.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Settings shared by every request a service handles
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Folder used when a request names none
    pub output_dir: PathBuf,
    /// Graphviz executable
    pub dot_program: String,
    pub render_timeout: Duration,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            output_dir: env::temp_dir().join("graphcp_output"),
            dot_program: "dot".to_string(),
            render_timeout: DEFAULT_RENDER_TIMEOUT,
        }
    }
}

impl ServiceConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overridden by `GRAPHCP_OUTPUT_DIR`, `GRAPHCP_DOT` and
    /// `GRAPHCP_RENDER_TIMEOUT_SECS`
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(dir) = lookup(OUTPUT_DIR_ENV).filter(|v| !v.trim().is_empty()) {
            config.output_dir = PathBuf::from(dir);
        }
        if let Some(program) = lookup(DOT_PROGRAM_ENV).filter(|v| !v.trim().is_empty()) {
            config.dot_program = program;
        }
        if let Some(secs) = lookup(RENDER_TIMEOUT_ENV).filter(|v| !v.trim().is_empty()) {
            let secs: u64 = secs.trim().parse().map_err(|_| {
                DiagramError::output_config(format!(
                    "{} must be a whole number of seconds, got '{}'",
                    RENDER_TIMEOUT_ENV, secs
                ))
            })?;
            if secs == 0 {
                return Err(DiagramError::output_config(format!(
                    "{} must be greater than zero",
                    RENDER_TIMEOUT_ENV
                )));
            }
            config.render_timeout = Duration::from_secs(secs);
        }
        debug!(
            output_dir = %config.output_dir.display(),
            dot_program = %config.dot_program,
            timeout_secs = config.render_timeout.as_secs(),
            "Loaded service configuration"
        );
        Ok(config)
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn with_dot_program(mut self, program: impl Into<String>) -> Self {
        self.dot_program = program.into();
        self
    }

    pub fn with_render_timeout(mut self, timeout: Duration) -> Self {
        self.render_timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_sanitize_basename() {
        assert_eq!(sanitize_basename("report"), "report");
        assert_eq!(sanitize_basename("../etc/passwd"), "_etc_passwd");
        assert_eq!(sanitize_basename("a<b>c:d\"e|f?g*h"), "a_b_c_d_e_f_g_h");
        assert_eq!(sanitize_basename("  .hidden. "), "hidden");
        assert_eq!(sanitize_basename("C:\\temp\\x"), "C__temp_x");
        assert_eq!(sanitize_basename(""), "output");
        assert_eq!(sanitize_basename(" . . "), "output");
    }

    #[test]
    fn test_dpi_is_derived_and_clamped() {
        assert_eq!(ImageSize::pixels(500, 500).effective_dpi(), 100);
        assert_eq!(ImageSize::pixels(100, 4000).effective_dpi(), 72);
        assert_eq!(ImageSize::pixels(9000, 8000).effective_dpi(), 300);
        assert_eq!(ImageSize::dpi(150).effective_dpi(), 150);
    }

    #[test]
    fn test_graphviz_args() {
        assert_eq!(
            ImageSize::pixels(800, 500).graphviz_args(),
            vec!["-Gdpi=100".to_string(), "-Gsize=8.00,5.00!".to_string()]
        );
        assert_eq!(ImageSize::dpi(96).graphviz_args(), vec!["-Gdpi=96".to_string()]);
    }

    #[test]
    fn test_size_bounds() {
        assert!(ImageSize::pixels(1, 10_000).validate().is_ok());
        assert!(ImageSize::pixels(0, 10).validate().is_err());
        assert!(ImageSize::pixels(10, 10_001).validate().is_err());
        assert!(ImageSize::dpi(0).validate().is_err());
        assert!(ImageSize::dpi(2_401).validate().is_err());
    }

    #[test]
    fn test_resolve_paths_stay_inside_folder() {
        let output = OutputConfig::new("../../escape")
            .with_target_folder("/data/out")
            .with_format(ImageFormat::Svg);
        let resolved = output.resolve(Path::new("/unused")).unwrap();
        assert_eq!(resolved.document_path, PathBuf::from("/data/out/_.._escape.dot"));
        assert_eq!(resolved.image_path, PathBuf::from("/data/out/_.._escape.svg"));
        assert!(resolved.document_path.starts_with("/data/out"));
    }

    #[test]
    fn test_resolve_uses_default_folder() {
        let resolved = OutputConfig::default()
            .resolve(Path::new("/tmp/graphcp_output"))
            .unwrap();
        assert_eq!(
            resolved.document_path,
            PathBuf::from("/tmp/graphcp_output/output.dot")
        );
        assert_eq!(resolved.dpi, 100);
    }

    #[test]
    fn test_output_config_from_json() {
        let config: OutputConfig = serde_json::from_str(
            r#"{"targetFolder": "/tmp/x", "basename": "erd", "imageSize": {"width": 1200, "height": 800}, "format": "pdf"}"#,
        )
        .unwrap();
        assert_eq!(config.image_size, ImageSize::pixels(1200, 800));
        assert_eq!(config.format, ImageFormat::Pdf);

        let config: OutputConfig = serde_json::from_str(r#"{"imageSize": {"dpi": 200}}"#).unwrap();
        assert_eq!(config.basename, "output");
        assert_eq!(config.image_size, ImageSize::dpi(200));
    }

    #[test]
    fn test_image_format_parsing() {
        assert_eq!("SVG".parse::<ImageFormat>().unwrap(), ImageFormat::Svg);
        assert!(matches!(
            "gif".parse::<ImageFormat>(),
            Err(DiagramError::InvalidOutputConfig { .. })
        ));
    }

    #[test]
    fn test_service_config_env_overrides() {
        let vars: HashMap<&str, &str> = [
            (OUTPUT_DIR_ENV, "/srv/diagrams"),
            (DOT_PROGRAM_ENV, "/opt/graphviz/bin/dot"),
            (RENDER_TIMEOUT_ENV, "5"),
        ]
        .into_iter()
        .collect();
        let config = ServiceConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(config.output_dir, PathBuf::from("/srv/diagrams"));
        assert_eq!(config.dot_program, "/opt/graphviz/bin/dot");
        assert_eq!(config.render_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_service_config_rejects_bad_timeout() {
        for value in ["soon", "0"] {
            let result = ServiceConfig::from_lookup(|k| {
                (k == RENDER_TIMEOUT_ENV).then(|| value.to_string())
            });
            assert!(matches!(result, Err(DiagramError::InvalidOutputConfig { .. })));
        }
    }

    #[test]
    fn test_service_config_defaults() {
        let config = ServiceConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, ServiceConfig::default());
        assert!(config.output_dir.ends_with("graphcp_output"));
    }
}
