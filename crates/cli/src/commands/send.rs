//! `send` command implementation.

use anyhow::{Context, Result};
use contracts::{ConversionConfig, Inspector};
use dispatcher::{
    DispatchOutcome, EventDispatcher, GraphApiTransport, LogInspector, StdoutInspector,
};
use tracing::info;

use crate::cli::{InspectorKind, SendArgs};

/// Execute the `send` command
pub async fn run_send(args: &SendArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading configuration");

    if !args.config.exists() {
        anyhow::bail!("Configuration file not found: {}", args.config.display());
    }

    let config = config_loader::ConfigLoader::load_from_path(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    info!(
        pixel_id = %config.pixel_id,
        api_version = %config.api_version,
        debug = %config.debug_mode,
        inspector = ?args.inspector,
        "Configuration loaded"
    );

    match args.inspector {
        InspectorKind::Stdout => send_with(config, StdoutInspector::default(), args).await,
        InspectorKind::Log => send_with(config, LogInspector::new("log"), args).await,
    }
}

async fn send_with<I: Inspector>(
    config: ConversionConfig,
    inspector: I,
    args: &SendArgs,
) -> Result<()> {
    let transport = GraphApiTransport::new().context("Failed to create transport")?;
    let dispatcher = EventDispatcher::new(config, transport, inspector);

    let ctx = args.context.to_context();
    let (visitor, event) = args.event.clone().into_event();
    let event_name = event.name();
    let source_url = visitor.as_ref().and_then(|v| v.source_url.as_deref());
    let email = visitor.as_ref().and_then(|v| v.email.as_deref());

    let outcome = dispatcher
        .try_send_event(&ctx, source_url, email, event)
        .await
        .with_context(|| format!("Failed to send {event_name} event"))?;

    print_outcome(&event_name.to_string(), &outcome);
    Ok(())
}

fn print_outcome(event_name: &str, outcome: &DispatchOutcome) {
    match outcome {
        DispatchOutcome::Inspected { .. } => {
            println!("• {event_name} payload rendered (debug = payload, not sent)");
        }
        DispatchOutcome::Transmitted { status, .. } if (200..300).contains(status) => {
            println!("✓ {event_name} sent (HTTP {status})");
        }
        DispatchOutcome::Transmitted { status, response } => {
            println!("✗ {event_name} rejected (HTTP {status})");
            println!("\n  Response: {}", response.render());
        }
    }
}
