//! `info` command implementation.

use anyhow::{Context, Result};
use contracts::{ConversionConfig, EventName};
use serde::Serialize;
use tracing::info;

use crate::cli::InfoArgs;

/// Configuration info for JSON output
#[derive(Serialize)]
struct ConfigInfo {
    access_token: String,
    api_version: String,
    pixel_id: String,
    debug: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    test_code: Option<String>,
    endpoint_host: String,
    events: Vec<&'static str>,
}

/// Execute the `info` command
pub fn run_info(args: &InfoArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading configuration info");

    if !args.config.exists() {
        anyhow::bail!("Configuration file not found: {}", args.config.display());
    }

    let config = config_loader::ConfigLoader::load_from_path(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    if args.json {
        let info = build_config_info(&config);
        let json =
            serde_json::to_string_pretty(&info).context("Failed to serialize config info")?;
        println!("{}", json);
    } else {
        print_config_info(&config);
    }

    Ok(())
}

fn build_config_info(config: &ConversionConfig) -> ConfigInfo {
    ConfigInfo {
        access_token: config.masked_access_token(),
        api_version: config.api_version.clone(),
        pixel_id: config.pixel_id.clone(),
        debug: config.debug_mode.to_string(),
        test_code: config.test_code.clone(),
        endpoint_host: config.graph_base_url.clone(),
        events: EventName::ALL.iter().map(|e| e.as_str()).collect(),
    }
}

fn print_config_info(config: &ConversionConfig) {
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║                 Pixel Relay Configuration                    ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");

    for line in config_loader::ConfigLoader::describe(config).lines() {
        println!("   {line}");
    }

    println!("\n📤 Events ({})", EventName::ALL.len());
    for (i, name) in EventName::ALL.iter().enumerate() {
        let prefix = if i == EventName::ALL.len() - 1 {
            "└─"
        } else {
            "├─"
        };
        println!("   {} {}", prefix, name);
    }

    println!();
}
