//! GraphApiTransport - single HTTPS POST to the events endpoint

use contracts::{ContractError, EventTransport, TransportResponse};
use reqwest::header::CONTENT_TYPE;
use tracing::{debug, instrument};

use crate::error::DispatcherError;

/// Transport backed by `reqwest`
///
/// No retries and no timeout beyond the client defaults.
#[derive(Debug, Clone)]
pub struct GraphApiTransport {
    name: String,
    client: reqwest::Client,
}

impl GraphApiTransport {
    /// Create a transport with its own client
    pub fn new() -> Result<Self, DispatcherError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("pixel-relay/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| DispatcherError::transport_creation("graph_api", e.to_string()))?;
        Ok(Self::with_client(client))
    }

    /// Reuse an existing client
    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            name: "graph_api".to_string(),
            client,
        }
    }

    // The endpoint carries the access token, so errors are stripped of their URL.
    fn request_error(&self, e: reqwest::Error) -> ContractError {
        ContractError::transport(&self.name, e.without_url().to_string())
    }
}

impl EventTransport for GraphApiTransport {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(
        name = "graph_api_post",
        skip(self, endpoint, body),
        fields(transport = %self.name, bytes = body.len())
    )]
    async fn post_json(
        &self,
        endpoint: &str,
        body: Vec<u8>,
    ) -> Result<TransportResponse, ContractError> {
        let response = self
            .client
            .post(endpoint)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| self.request_error(e))?;

        let status = response.status().as_u16();
        let text = response.text().await.map_err(|e| self.request_error(e))?;

        debug!(transport = %self.name, status, bytes = text.len(), "Response received");

        Ok(TransportResponse::new(status, text))
    }
}
