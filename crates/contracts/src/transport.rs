//! EventTransport trait - Dispatcher output interface
//!
//! Defines the abstract interface for delivering an encoded payload.

use crate::ContractError;

/// Raw HTTP response as read by a transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body as text
    pub body: String,
}

impl TransportResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// 2xx status
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Payload delivery trait
///
/// All transport implementations must implement this trait.
#[trait_variant::make(EventTransport: Send)]
pub trait LocalEventTransport {
    /// Transport name (used for logging/metrics)
    fn name(&self) -> &str;

    /// POST a JSON body to `endpoint` and read the full response
    ///
    /// # Errors
    /// Returns transport error when the request cannot be completed
    async fn post_json(
        &self,
        endpoint: &str,
        body: Vec<u8>,
    ) -> Result<TransportResponse, ContractError>;
}
