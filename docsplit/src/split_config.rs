//! Split configuration from docsplit.toml

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Main configuration for a split run
///
/// Every field has a default, so a run without a config file behaves
/// sensibly: split on "Heading1", write .html topics, compact output.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitConfig {
    /// Paragraph style that starts a new topic
    pub heading_style: String,

    /// File extension for rendered topic files (without the dot)
    pub output_extension: String,

    /// Whether rendered output is human-readable formatted
    pub pretty_print: bool,

    /// Whether negative left indentation is preserved in rendered output
    pub allow_negative_indent: bool,

    /// Whether header/footer text is emitted (suppressed by default)
    pub export_header_footer: bool,

    /// Table-of-contents template settings
    pub toc: TocConfig,
}

/// Template region/field names for the table of contents
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TocConfig {
    /// Name of the repeating region in the template
    pub region: String,

    /// Name of the substitutable field within each repetition
    pub field: String,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            heading_style: "Heading1".to_string(),
            output_extension: "html".to_string(),
            pretty_print: false,
            allow_negative_indent: false,
            export_header_footer: false,
            toc: TocConfig::default(),
        }
    }
}

impl Default for TocConfig {
    fn default() -> Self {
        Self {
            region: "TOC".to_string(),
            field: "TocEntry".to_string(),
        }
    }
}

impl SplitConfig {
    /// Load configuration from a docsplit.toml file
    ///
    /// # Parameters
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    /// * `Ok(SplitConfig)` - Successfully loaded configuration
    /// * `Err(SplitConfigError)` - Error reading or parsing the file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SplitConfigError> {
        let content = fs::read_to_string(&path).map_err(SplitConfigError::IoError)?;

        let config: SplitConfig = toml::from_str(&content).map_err(SplitConfigError::ParseError)?;

        Ok(config)
    }
}

/// Errors that can occur when loading the split configuration
#[derive(Debug)]
pub enum SplitConfigError {
    /// IO error when reading the file
    IoError(std::io::Error),

    /// Error parsing TOML
    ParseError(toml::de::Error),
}

impl std::fmt::Display for SplitConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SplitConfigError::IoError(e) => write!(f, "IO error: {}", e),
            SplitConfigError::ParseError(e) => write!(f, "TOML parse error: {}", e),
        }
    }
}

impl std::error::Error for SplitConfigError {}
