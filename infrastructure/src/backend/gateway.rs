//! HTTP chat gateway implementation

use super::error::BackendError;
use super::protocol::{AGGREGATE_ENDPOINT, AggregatePayload, ChatRequest, SingleModelPayload};
use super::transport::{HttpTransport, HttpTransportConfig};
use async_trait::async_trait;
use switchboard_application::ports::chat_gateway::{ChatGateway, GatewayError};
use switchboard_domain::{AggregateResult, Backend, ModelReply};
use tracing::debug;

/// [`ChatGateway`] backed by the backends' HTTP API
#[derive(Debug, Clone)]
pub struct HttpChatGateway {
    transport: HttpTransport,
}

impl HttpChatGateway {
    pub fn new(transport: HttpTransport) -> Self {
        Self { transport }
    }

    /// Build the transport and the gateway in one go
    pub fn from_config(config: HttpTransportConfig) -> Result<Self, BackendError> {
        Ok(Self::new(HttpTransport::new(config)?))
    }

    /// Get a reference to the underlying transport
    pub fn transport(&self) -> &HttpTransport {
        &self.transport
    }
}

#[async_trait]
impl ChatGateway for HttpChatGateway {
    async fn ask_model(&self, backend: Backend, input: &str) -> Result<ModelReply, GatewayError> {
        let response = self
            .transport
            .post_json(backend.endpoint(), &ChatRequest { input })
            .await?;
        let payload: SingleModelPayload = response.json()?;
        debug!("{} replied (success: {})", backend, payload.success);
        Ok(payload.into_reply(backend))
    }

    async fn ask_all(&self, input: &str) -> Result<AggregateResult, GatewayError> {
        let response = self
            .transport
            .post_json(AGGREGATE_ENDPOINT, &ChatRequest { input })
            .await?;
        let payload: AggregatePayload = response.json()?;
        Ok(payload.into_result())
    }
}
