//! CLI argument definitions using clap.

use clap::{Args, Parser, Subcommand, ValueEnum};
use contracts::{ContentItem, RequestContext, FBC_COOKIE, FBP_COOKIE};
use dispatcher::{ConversionEvent, DEFAULT_CURRENCY};
use std::path::PathBuf;

/// Pixel Relay - server-side Conversions API events
#[derive(Parser, Debug)]
#[command(
    name = "pixel-relay",
    author,
    version,
    about = "Send Conversions API events from the command line",
    long_about = "Builds Conversions API event payloads and posts them to the Graph API.\n\n\
                  Debug modes in the config file either print the payload instead of \n\
                  sending it (\"payload\") or send it and print the response (\"request\")."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "PIXEL_RELAY_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "pretty",
        global = true,
        env = "PIXEL_RELAY_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    /// Serve Prometheus metrics on this port
    #[arg(long, global = true, env = "PIXEL_RELAY_METRICS_PORT")]
    pub metrics_port: Option<u16>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Send one event
    Send(SendArgs),

    /// Validate configuration file without sending
    Validate(ValidateArgs),

    /// Display configuration information
    Info(InfoArgs),
}

/// Arguments for the `send` command
#[derive(Parser, Debug, Clone)]
pub struct SendArgs {
    /// Path to configuration file (TOML or JSON)
    #[arg(
        short,
        long,
        default_value = "pixel.toml",
        env = "PIXEL_RELAY_CONFIG"
    )]
    pub config: PathBuf,

    /// Where debug output goes
    #[arg(long, value_enum, default_value = "stdout")]
    pub inspector: InspectorKind,

    #[command(flatten)]
    pub context: ContextArgs,

    #[command(subcommand)]
    pub event: EventCommand,
}

/// Visitor request the event is attributed to
#[derive(Args, Debug, Clone)]
pub struct ContextArgs {
    /// Host of the visited page
    #[arg(long, default_value = "localhost")]
    pub host: String,

    /// Request URI of the visited page
    #[arg(long, default_value = "/")]
    pub path: String,

    /// Page was served over HTTPS
    #[arg(long)]
    pub tls: bool,

    /// Visitor IP address
    #[arg(long, default_value = "127.0.0.1")]
    pub ip: String,

    /// Visitor user agent
    #[arg(long, default_value = concat!("pixel-relay/", env!("CARGO_PKG_VERSION")))]
    pub user_agent: String,

    /// `_fbp` cookie value
    #[arg(long)]
    pub fbp: Option<String>,

    /// `_fbc` cookie value
    #[arg(long)]
    pub fbc: Option<String>,
}

impl ContextArgs {
    pub fn to_context(&self) -> RequestContext {
        let mut ctx = RequestContext::new(&self.host, &self.path, &self.ip, &self.user_agent)
            .with_tls(self.tls);
        if let Some(fbp) = &self.fbp {
            ctx = ctx.with_cookie(FBP_COOKIE, fbp);
        }
        if let Some(fbc) = &self.fbc {
            ctx = ctx.with_cookie(FBC_COOKIE, fbc);
        }
        ctx
    }
}

/// Fields shared by every event except PageView
#[derive(Args, Debug, Clone)]
pub struct VisitorArgs {
    /// Page URL (defaults to the URL built from --host/--path)
    #[arg(long)]
    pub source_url: Option<String>,

    /// Visitor email, hashed before sending
    #[arg(long)]
    pub email: Option<String>,
}

/// Event to send
#[derive(Subcommand, Debug, Clone)]
pub enum EventCommand {
    /// PageView
    PageView,

    /// Purchase
    Purchase {
        #[command(flatten)]
        visitor: VisitorArgs,
        /// Purchased content ID (repeatable)
        #[arg(long = "content-id", required = true)]
        content_ids: Vec<String>,
        /// Order total
        #[arg(long)]
        value: f64,
        /// ISO 4217 currency code
        #[arg(long, default_value = DEFAULT_CURRENCY)]
        currency: String,
    },

    /// CompleteRegistration
    CompleteRegistration {
        #[command(flatten)]
        visitor: VisitorArgs,
        /// Registration status (e.g., "registered")
        #[arg(long)]
        status: String,
    },

    /// InitiateCheckout
    InitiateCheckout {
        #[command(flatten)]
        visitor: VisitorArgs,
        /// Cart total when checkout starts
        #[arg(long)]
        value: f64,
        /// ISO 4217 currency code
        #[arg(long, default_value = DEFAULT_CURRENCY)]
        currency: String,
    },

    /// ViewContent
    ViewContent {
        #[command(flatten)]
        visitor: VisitorArgs,
        /// Name of the page or product
        #[arg(long)]
        content_name: String,
        /// Viewed content ID (repeatable)
        #[arg(long = "content-id")]
        content_ids: Vec<String>,
        /// Value associated with the view
        #[arg(long)]
        value: f64,
        /// ISO 4217 currency code
        #[arg(long, default_value = DEFAULT_CURRENCY)]
        currency: String,
    },

    /// AddToCart
    AddToCart {
        #[command(flatten)]
        visitor: VisitorArgs,
        /// Cart line as `id:quantity` (repeatable)
        #[arg(long = "item", value_parser = parse_content_item, required = true)]
        contents: Vec<ContentItem>,
        /// Total cost of the added items
        #[arg(long)]
        value: f64,
        /// ISO 4217 currency code
        #[arg(long, default_value = DEFAULT_CURRENCY)]
        currency: String,
    },
}

impl EventCommand {
    /// Split into visitor fields and the event
    pub fn into_event(self) -> (Option<VisitorArgs>, ConversionEvent) {
        match self {
            Self::PageView => (None, ConversionEvent::PageView),
            Self::Purchase {
                visitor,
                content_ids,
                value,
                currency,
            } => (
                Some(visitor),
                ConversionEvent::Purchase {
                    content_ids,
                    order_value: value,
                    currency,
                },
            ),
            Self::CompleteRegistration { visitor, status } => (
                Some(visitor),
                ConversionEvent::CompleteRegistration { status },
            ),
            Self::InitiateCheckout {
                visitor,
                value,
                currency,
            } => (
                Some(visitor),
                ConversionEvent::InitiateCheckout { value, currency },
            ),
            Self::ViewContent {
                visitor,
                content_name,
                content_ids,
                value,
                currency,
            } => (
                Some(visitor),
                ConversionEvent::ViewContent {
                    content_name,
                    content_ids,
                    value,
                    currency,
                },
            ),
            Self::AddToCart {
                visitor,
                contents,
                value,
                currency,
            } => (
                Some(visitor),
                ConversionEvent::AddToCart {
                    contents,
                    value,
                    currency,
                },
            ),
        }
    }
}

/// Parse `id:quantity`
fn parse_content_item(s: &str) -> Result<ContentItem, String> {
    let (id, quantity) = s
        .rsplit_once(':')
        .ok_or_else(|| format!("expected id:quantity, got '{s}'"))?;
    if id.is_empty() {
        return Err(format!("empty content id in '{s}'"));
    }
    let quantity = quantity
        .parse::<u32>()
        .map_err(|e| format!("invalid quantity in '{s}': {e}"))?;
    Ok(ContentItem::new(id, quantity))
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file to validate
    #[arg(short, long, default_value = "pixel.toml", env = "PIXEL_RELAY_CONFIG")]
    pub config: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `info` command
#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "pixel.toml", env = "PIXEL_RELAY_CONFIG")]
    pub config: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Destination for rendered payloads and responses
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum InspectorKind {
    /// Print blocks to stdout
    #[default]
    Stdout,
    /// Emit blocks as tracing events
    Log,
}

/// Log output format
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
}

impl From<LogFormat> for observability::LogFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Json => Self::Json,
            LogFormat::Pretty => Self::Pretty,
            LogFormat::Compact => Self::Compact,
        }
    }
}
