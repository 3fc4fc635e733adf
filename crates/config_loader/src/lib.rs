//! # Config Loader
//!
//! Configuration loading and parsing module.
//!
//! Responsibilities:
//! - Parse TOML/JSON configuration files
//! - Validate configuration legality
//! - Generate `ConversionConfig`
//!
//! # Example
//!
//! ```no_run
//! use config_loader::ConfigLoader;
//! use std::path::Path;
//!
//! let config = ConfigLoader::load_from_path(Path::new("pixel.toml")).unwrap();
//! println!("Pixel: {}", config.pixel_id);
//! ```

mod document;
mod parser;
mod validator;

pub use contracts::ConversionConfig;
pub use document::{ConfigDocument, DebugValue, ModuleConf};
pub use parser::ConfigFormat;

use contracts::{ContractError, DEFAULT_GRAPH_BASE_URL};
use std::path::Path;

/// Configuration loader
///
/// Provides static methods to load configuration from files or strings.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from file path
    ///
    /// Automatically detects format from file extension (.toml / .json).
    ///
    /// # Errors
    /// - File read failure
    /// - Unsupported format
    /// - Parse failure
    /// - Validation failure
    pub fn load_from_path(path: &Path) -> Result<ConversionConfig, ContractError> {
        let format = Self::detect_format(path)?;
        let content = Self::read_file(path)?;
        Self::load_from_str(&content, format)
    }

    /// Load configuration from string
    ///
    /// # Errors
    /// - Parse failure
    /// - Validation failure
    pub fn load_from_str(
        content: &str,
        format: ConfigFormat,
    ) -> Result<ConversionConfig, ContractError> {
        let doc = parser::parse(content, format)?;
        Self::from_document(doc)
    }

    /// Validate an already parsed document and build the config
    pub fn from_document(doc: ConfigDocument) -> Result<ConversionConfig, ContractError> {
        validator::validate(&doc)?;
        Ok(Self::build(doc.module_conf))
    }

    /// Human-readable summary of a loaded configuration
    ///
    /// The access token is masked.
    pub fn describe(config: &ConversionConfig) -> String {
        let lines = [
            format!("Access token: {}", config.masked_access_token()),
            format!("Api version: {}", config.api_version),
            format!("Pixel ID: {}", config.pixel_id),
            format!("Debug: {}", debug_label(config)),
            format!("Test code: {}", config.test_code.as_deref().unwrap_or("")),
            format!("Endpoint host: {}", config.graph_base_url),
        ];
        lines.join("\n")
    }
}

impl ConfigLoader {
    /// Infer configuration format from file extension
    fn detect_format(path: &Path) -> Result<ConfigFormat, ContractError> {
        let ext = path.extension().and_then(|e| e.to_str()).ok_or_else(|| {
            ContractError::config_parse("cannot determine file format from extension")
        })?;

        ConfigFormat::from_extension(ext).ok_or_else(|| {
            ContractError::config_parse(format!("unsupported config format: .{ext}"))
        })
    }

    /// Read configuration file content
    fn read_file(path: &Path) -> Result<String, ContractError> {
        Ok(std::fs::read_to_string(path)?)
    }

    /// Assemble a validated module section
    fn build(conf: ModuleConf) -> ConversionConfig {
        let debug_mode = validator::resolve_debug_mode(&conf.debug);
        ConversionConfig::new(
            conf.access_token.unwrap_or_default(),
            conf.api_version.unwrap_or_default(),
            conf.pixel_id.unwrap_or_default(),
        )
        .with_debug(debug_mode, conf.test_code.unwrap_or_default())
        .with_graph_base_url(
            conf.graph_base_url
                .unwrap_or_else(|| DEFAULT_GRAPH_BASE_URL.to_string()),
        )
    }
}

/// `false` when off, otherwise the mode name
fn debug_label(config: &ConversionConfig) -> &'static str {
    if config.debug_mode.is_enabled() {
        config.debug_mode.as_str()
    } else {
        "false"
    }
}
