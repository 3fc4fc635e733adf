//! `validate` command implementation.

use anyhow::{Context, Result};
use contracts::{ConversionConfig, DebugMode, DEFAULT_GRAPH_BASE_URL};
use serde::Serialize;
use tracing::info;

use crate::cli::ValidateArgs;

/// Outcome of checking one config file
#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    config_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    warnings: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<ConfigSummary>,
}

impl ValidationResult {
    fn accepted(config_path: String, config: &ConversionConfig) -> Self {
        Self {
            valid: true,
            config_path,
            error: None,
            warnings: collect_warnings(config),
            summary: Some(ConfigSummary::from(config)),
        }
    }

    fn rejected(config_path: String, error: impl ToString) -> Self {
        Self {
            valid: false,
            config_path,
            error: Some(error.to_string()),
            warnings: Vec::new(),
            summary: None,
        }
    }
}

/// Non-secret view of a loaded config
#[derive(Serialize)]
struct ConfigSummary {
    api_version: String,
    pixel_id: String,
    debug: DebugMode,
    endpoint_host: String,
}

impl From<&ConversionConfig> for ConfigSummary {
    fn from(config: &ConversionConfig) -> Self {
        Self {
            api_version: config.api_version.clone(),
            pixel_id: config.pixel_id.clone(),
            debug: config.debug_mode,
            endpoint_host: config.graph_base_url.clone(),
        }
    }
}

/// Execute the `validate` command
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    info!(config = %args.config.display(), "Validating configuration");

    let result = validate_config(args);

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .context("Failed to serialize validation result")?;
        println!("{json}");
    } else {
        print_validation_result(&result);
    }

    anyhow::ensure!(result.valid, "Configuration validation failed");
    Ok(())
}

fn validate_config(args: &ValidateArgs) -> ValidationResult {
    let config_path = args.config.display().to_string();

    if !args.config.is_file() {
        let error = format!("File not found: {config_path}");
        return ValidationResult::rejected(config_path, error);
    }

    match config_loader::ConfigLoader::load_from_path(&args.config) {
        Ok(config) => ValidationResult::accepted(config_path, &config),
        Err(e) => ValidationResult::rejected(config_path, e),
    }
}

/// Settings that load fine but are worth a second look
fn collect_warnings(config: &ConversionConfig) -> Vec<String> {
    let mut warnings = Vec::new();

    match config.debug_mode {
        DebugMode::Payload => {
            warnings.push("debug = \"payload\" - events are printed and never sent".to_string())
        }
        DebugMode::Request => warnings
            .push("debug = \"request\" - events are sent as test events".to_string()),
        DebugMode::Off => {}
    }

    if !config.api_version.starts_with('v') {
        warnings.push(format!(
            "apiVersion '{}' does not look like a Graph API version (e.g. \"v18.0\")",
            config.api_version
        ));
    }

    if config.graph_base_url != DEFAULT_GRAPH_BASE_URL {
        warnings.push(format!(
            "graphBaseUrl overrides the default host: {}",
            config.graph_base_url
        ));
    }

    warnings
}

fn print_validation_result(result: &ValidationResult) {
    let Some(summary) = result.summary.as_ref().filter(|_| result.valid) else {
        println!("✗ {} is not a usable pixel config", result.config_path);
        if let Some(error) = &result.error {
            println!("\n  {error}");
        }
        return;
    };

    println!("✓ {} is a usable pixel config", result.config_path);
    println!("\n  Api version: {}", summary.api_version);
    println!("  Pixel ID: {}", summary.pixel_id);
    println!("  Debug: {}", summary.debug);
    println!("  Endpoint host: {}", summary.endpoint_host);

    if !result.warnings.is_empty() {
        println!("\n⚠ {} warning(s):", result.warnings.len());
        for warning in &result.warnings {
            println!("  - {warning}");
        }
    }
}
