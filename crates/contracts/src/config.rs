//! ConversionConfig - Config Loader output
//!
//! Immutable credentials and debug routing for one pixel.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Default Graph API host
pub const DEFAULT_GRAPH_BASE_URL: &str = "https://graph.facebook.com";

/// Debug routing mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DebugMode {
    /// Send to the live endpoint, render nothing
    #[default]
    Off,
    /// Render the payload, never send it
    Payload,
    /// Send, then render the decoded response
    Request,
}

impl DebugMode {
    /// Parse the `debug` value of a config file.
    ///
    /// Only `"payload"` and `"request"` enable debugging; anything else is `Off`.
    pub fn from_config_value(value: &str) -> Option<Self> {
        match value {
            "payload" => Some(Self::Payload),
            "request" => Some(Self::Request),
            _ => None,
        }
    }

    /// Whether payloads carry a `test_event_code`
    pub fn is_enabled(self) -> bool {
        self != Self::Off
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Payload => "payload",
            Self::Request => "request",
        }
    }
}

impl fmt::Display for DebugMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validated relay configuration
///
/// Invariants (enforced by `config_loader`):
/// - `access_token`, `api_version`, `pixel_id` are non-empty
/// - `test_code` is `Some` iff `debug_mode` is enabled
#[derive(Clone, PartialEq, Eq)]
pub struct ConversionConfig {
    /// Bearer credential for the events endpoint
    pub access_token: String,

    /// Graph API version (e.g., "v18.0")
    pub api_version: String,

    /// Destination pixel
    pub pixel_id: String,

    /// Debug routing
    pub debug_mode: DebugMode,

    /// Test event code sent while debugging
    pub test_code: Option<String>,

    /// Graph API host, without trailing slash
    pub graph_base_url: String,
}

impl ConversionConfig {
    /// Create a production config (debug off, default host)
    pub fn new(
        access_token: impl Into<String>,
        api_version: impl Into<String>,
        pixel_id: impl Into<String>,
    ) -> Self {
        Self {
            access_token: access_token.into(),
            api_version: api_version.into(),
            pixel_id: pixel_id.into(),
            debug_mode: DebugMode::Off,
            test_code: None,
            graph_base_url: DEFAULT_GRAPH_BASE_URL.to_string(),
        }
    }

    /// Enable a debug mode with its test event code
    pub fn with_debug(mut self, mode: DebugMode, test_code: impl Into<String>) -> Self {
        self.debug_mode = mode;
        self.test_code = mode.is_enabled().then(|| test_code.into());
        self
    }

    /// Override the Graph API host
    pub fn with_graph_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.graph_base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Events endpoint including the access token query parameter
    pub fn endpoint_url(&self) -> String {
        format!(
            "{}/{}/{}/events?access_token={}",
            self.graph_base_url, self.api_version, self.pixel_id, self.access_token
        )
    }

    /// Access token with all but the last four characters hidden
    pub fn masked_access_token(&self) -> String {
        let chars: Vec<char> = self.access_token.chars().collect();
        if chars.len() <= 4 {
            return "*".repeat(chars.len());
        }
        let visible: String = chars[chars.len() - 4..].iter().collect();
        format!("{}{}", "*".repeat(chars.len() - 4), visible)
    }
}

// The access token never goes to logs through `{:?}`.
impl fmt::Debug for ConversionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionConfig")
            .field("access_token", &self.masked_access_token())
            .field("api_version", &self.api_version)
            .field("pixel_id", &self.pixel_id)
            .field("debug_mode", &self.debug_mode)
            .field("test_code", &self.test_code)
            .field("graph_base_url", &self.graph_base_url)
            .finish()
    }
}
