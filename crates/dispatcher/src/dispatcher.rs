//! EventDispatcher - build, then inspect or transmit

use std::time::Instant;

use contracts::{
    ContentItem, ContractError, ConversionConfig, DebugMode, EventTransport, Inspector, Payload,
    RequestContext,
};
use observability::DispatchRoute;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::error::DispatcherError;
use crate::events::ConversionEvent;
use crate::metrics::{DispatchMetrics, MetricsSnapshot};
use crate::payload::{Clock, PayloadBuilder, SystemClock};
use crate::sinks::{GraphApiTransport, StdoutInspector};

/// Decoded response body
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    /// Body parsed as JSON
    Json(Value),
    /// Body that is not JSON, kept verbatim
    Text(String),
}

impl ResponseBody {
    pub fn decode(body: &str) -> Self {
        serde_json::from_str(body)
            .map(Self::Json)
            .unwrap_or_else(|_| Self::Text(body.to_string()))
    }

    /// Text shown by the inspector
    pub fn render(&self) -> String {
        match self {
            Self::Json(value) => {
                serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
            }
            Self::Text(text) => text.clone(),
        }
    }
}

/// What happened to a payload
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    /// `payload` debug mode: rendered, not sent
    Inspected { rendered: String },
    /// Sent; carries the HTTP status and decoded body
    Transmitted { status: u16, response: ResponseBody },
}

/// Relays conversion events for one pixel
pub struct EventDispatcher<T, I> {
    config: ConversionConfig,
    transport: T,
    inspector: I,
    clock: Box<dyn Clock>,
    metrics: DispatchMetrics,
}

impl EventDispatcher<GraphApiTransport, StdoutInspector> {
    /// Dispatcher that posts to the Graph API and prints debug output
    pub fn from_config(config: ConversionConfig) -> Result<Self, DispatcherError> {
        Ok(Self::new(
            config,
            GraphApiTransport::new()?,
            StdoutInspector::default(),
        ))
    }
}

impl<T: EventTransport, I: Inspector> EventDispatcher<T, I> {
    pub fn new(config: ConversionConfig, transport: T, inspector: I) -> Self {
        Self {
            config,
            transport,
            inspector,
            clock: Box::new(SystemClock),
            metrics: DispatchMetrics::new(),
        }
    }

    /// Replace the clock used for `event_time`
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn config(&self) -> &ConversionConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn inspector(&self) -> &I {
        &self.inspector
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    pub async fn send_page_view_event(&self, ctx: &RequestContext) {
        self.send_event(ctx, None, None, ConversionEvent::PageView).await;
    }

    pub async fn send_purchase_event(
        &self,
        ctx: &RequestContext,
        source_url: Option<&str>,
        user_email: Option<&str>,
        content_ids: Vec<String>,
        order_value: f64,
        currency: &str,
    ) {
        let event = ConversionEvent::Purchase {
            content_ids,
            order_value,
            currency: currency.to_string(),
        };
        self.send_event(ctx, source_url, user_email, event).await;
    }

    pub async fn send_complete_registration_event(
        &self,
        ctx: &RequestContext,
        source_url: Option<&str>,
        user_email: Option<&str>,
        status: &str,
    ) {
        let event = ConversionEvent::CompleteRegistration {
            status: status.to_string(),
        };
        self.send_event(ctx, source_url, user_email, event).await;
    }

    pub async fn send_initiate_checkout_event(
        &self,
        ctx: &RequestContext,
        source_url: Option<&str>,
        user_email: Option<&str>,
        value: f64,
        currency: &str,
    ) {
        let event = ConversionEvent::InitiateCheckout {
            value,
            currency: currency.to_string(),
        };
        self.send_event(ctx, source_url, user_email, event).await;
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn send_view_content_event(
        &self,
        ctx: &RequestContext,
        source_url: Option<&str>,
        user_email: Option<&str>,
        content_name: &str,
        content_ids: Vec<String>,
        value: f64,
        currency: &str,
    ) {
        let event = ConversionEvent::ViewContent {
            content_name: content_name.to_string(),
            content_ids,
            value,
            currency: currency.to_string(),
        };
        self.send_event(ctx, source_url, user_email, event).await;
    }

    pub async fn send_add_to_cart_event(
        &self,
        ctx: &RequestContext,
        source_url: Option<&str>,
        user_email: Option<&str>,
        contents: Vec<ContentItem>,
        value: f64,
        currency: &str,
    ) {
        let event = ConversionEvent::AddToCart {
            contents,
            value,
            currency: currency.to_string(),
        };
        self.send_event(ctx, source_url, user_email, event).await;
    }

    /// Fire-and-forget: failures are logged, never returned
    pub async fn send_event(
        &self,
        ctx: &RequestContext,
        source_url: Option<&str>,
        user_email: Option<&str>,
        event: ConversionEvent,
    ) {
        let event_name = event.name();
        if let Err(e) = self.try_send_event(ctx, source_url, user_email, event).await {
            warn!(event_name = %event_name, error = %e, "Event dispatch failed");
        }
    }

    /// Build and dispatch, reporting the outcome
    pub async fn try_send_event(
        &self,
        ctx: &RequestContext,
        source_url: Option<&str>,
        user_email: Option<&str>,
        event: ConversionEvent,
    ) -> Result<DispatchOutcome, ContractError> {
        let payload = self.build_payload(ctx, source_url, user_email, &event);
        self.dispatch(&payload).await
    }

    /// Build the request body without sending it
    pub fn build_payload(
        &self,
        ctx: &RequestContext,
        source_url: Option<&str>,
        user_email: Option<&str>,
        event: &ConversionEvent,
    ) -> Payload {
        let payload = PayloadBuilder::new(&self.config, self.clock.as_ref()).build(
            ctx,
            event.name(),
            source_url,
            user_email,
            event.custom_data(),
        );
        self.metrics.inc_built_count();
        observability::record_event_built(event.name());
        payload
    }

    /// Route a payload by debug mode
    ///
    /// - `payload`: render, never transmit
    /// - `off` / `request`: transmit; `request` also renders the response
    #[instrument(
        name = "dispatcher_dispatch",
        skip(self, payload),
        fields(
            event_name = ?payload.event_name(),
            pixel_id = %self.config.pixel_id,
            debug = %self.config.debug_mode
        )
    )]
    pub async fn dispatch(&self, payload: &Payload) -> Result<DispatchOutcome, ContractError> {
        let route = DispatchRoute::for_mode(self.config.debug_mode);
        let result = match route {
            DispatchRoute::Inspected => self.inspect_payload(payload),
            DispatchRoute::Transmitted => self.transmit(payload).await,
        };

        if let Some(event_name) = payload.event_name() {
            observability::record_event_dispatched(event_name, route, result.is_ok());
        }
        if result.is_err() {
            self.metrics.inc_failure_count();
        }
        result
    }

    fn inspect_payload(&self, payload: &Payload) -> Result<DispatchOutcome, ContractError> {
        let rendered = serde_json::to_string_pretty(payload)?;
        self.inspector.inspect("payload", &rendered);
        self.metrics.inc_inspected_count();
        Ok(DispatchOutcome::Inspected { rendered })
    }

    async fn transmit(&self, payload: &Payload) -> Result<DispatchOutcome, ContractError> {
        let body = serde_json::to_vec(payload)?;
        let started = Instant::now();
        let response = match self
            .transport
            .post_json(&self.config.endpoint_url(), body)
            .await
        {
            Ok(response) => response,
            Err(e) => {
                // request mode always shows a response block, even when none arrived
                if self.config.debug_mode == DebugMode::Request {
                    self.inspector.inspect("response", &e.to_string());
                }
                return Err(e);
            }
        };

        observability::record_transport_latency_ms(started.elapsed().as_secs_f64() * 1000.0);
        observability::record_response_status(response.status);
        self.metrics.inc_transmitted_count();

        if response.is_success() {
            debug!(
                transport = %self.transport.name(),
                status = response.status,
                "Payload accepted"
            );
        } else {
            self.metrics.inc_rejected_count();
            warn!(
                transport = %self.transport.name(),
                status = response.status,
                "Events endpoint rejected payload"
            );
        }

        let decoded = ResponseBody::decode(&response.body);
        if self.config.debug_mode == DebugMode::Request {
            self.inspector.inspect("response", &decoded.render());
        }

        Ok(DispatchOutcome::Transmitted {
            status: response.status,
            response: decoded,
        })
    }
}
