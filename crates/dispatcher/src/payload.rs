//! Payload builder
//!
//! Combines an event's business fields with the request context.

use contracts::{
    ActionSource, ConversionConfig, CustomData, EventName, Payload, RequestContext, ServerEvent,
    UserData, FBC_COOKIE, FBP_COOKIE,
};
use sha2::{Digest, Sha256};

/// Source of `event_time`
pub trait Clock: Send + Sync {
    /// Current Unix time in seconds
    fn unix_seconds(&self) -> i64;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn unix_seconds(&self) -> i64 {
        chrono::Utc::now().timestamp()
    }
}

/// Clock frozen at one instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub i64);

impl Clock for FixedClock {
    fn unix_seconds(&self) -> i64 {
        self.0
    }
}

/// Lowercase hex SHA-256 of the email exactly as given
pub fn hash_email(email: &str) -> String {
    hex::encode(Sha256::digest(email.as_bytes()))
}

/// Builds one-event payloads for a config
pub struct PayloadBuilder<'a> {
    config: &'a ConversionConfig,
    clock: &'a dyn Clock,
}

impl<'a> PayloadBuilder<'a> {
    pub fn new(config: &'a ConversionConfig, clock: &'a dyn Clock) -> Self {
        Self { config, clock }
    }

    /// Build the request body for one event.
    ///
    /// Empty `source_url` / `user_email` count as absent.
    pub fn build(
        &self,
        ctx: &RequestContext,
        event_name: EventName,
        source_url: Option<&str>,
        user_email: Option<&str>,
        custom_data: CustomData,
    ) -> Payload {
        let event_source_url = source_url
            .filter(|url| !url.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| ctx.current_url());

        let event = ServerEvent {
            event_name,
            event_time: self.clock.unix_seconds(),
            event_source_url,
            action_source: ActionSource::Website,
            user_data: Self::user_data(ctx, user_email),
            custom_data: (!custom_data.is_empty()).then_some(custom_data),
        };

        Payload {
            data: vec![event],
            test_event_code: self.test_event_code(),
        }
    }

    fn user_data(ctx: &RequestContext, user_email: Option<&str>) -> UserData {
        UserData {
            client_user_agent: ctx.user_agent.clone(),
            client_ip_address: ctx.client_ip.clone(),
            fbp: ctx.cookie(FBP_COOKIE).map(str::to_string),
            fbc: ctx.cookie(FBC_COOKIE).map(str::to_string),
            em: user_email.filter(|e| !e.is_empty()).map(hash_email),
        }
    }

    fn test_event_code(&self) -> Option<String> {
        if self.config.debug_mode.is_enabled() {
            self.config.test_code.clone()
        } else {
            None
        }
    }
}
