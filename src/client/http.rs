//! HTTP client for the order backend.

use crate::client::api::OrderApi;
use crate::client::protocol::{FeedbackRequest, OrderReply, OrderRequest, OrderResponse, error_message};
use crate::config::ApiConfig;
use crate::error::{Result, VoiceOrderError};
use reqwest::{Response, StatusCode};
use tracing::{debug, info, warn};

/// Order client speaking JSON over HTTP.
#[derive(Debug, Clone)]
pub struct HttpOrderClient {
    http: reqwest::Client,
    order_url: String,
    feedback_url: String,
    user_id: Option<String>,
}

impl HttpOrderClient {
    /// Build a client from API configuration.
    ///
    /// # Errors
    /// Returns `RequestError` if the HTTP client cannot be constructed.
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }

        let http = builder.build().map_err(|e| VoiceOrderError::RequestError {
            message: format!("Failed to build HTTP client: {e}"),
        })?;

        Ok(Self::with_client(config, http))
    }

    /// Use a caller-built HTTP client (proxy or TLS settings of its own).
    /// `config.timeout_ms` is not applied.
    pub fn with_client(config: &ApiConfig, http: reqwest::Client) -> Self {
        Self {
            http,
            order_url: config.order_url(),
            feedback_url: config.feedback_url(),
            user_id: config.user_id.clone(),
        }
    }

    pub fn order_url(&self) -> &str {
        &self.order_url
    }

    pub fn feedback_url(&self) -> &str {
        &self.feedback_url
    }
}

/// Classify a transport-level failure.
///
/// Errors raised before the request left (bad URL, unbuildable request) are
/// `RequestError`; everything else means no response arrived.
fn classify_send_error(error: reqwest::Error) -> VoiceOrderError {
    if error.is_builder() {
        VoiceOrderError::RequestError {
            message: error.to_string(),
        }
    } else {
        debug!("request got no response: {error}");
        VoiceOrderError::NetworkUnreachable
    }
}

/// Status line text used when the server gave no error message.
fn status_text(status: StatusCode) -> String {
    status
        .canonical_reason()
        .map(str::to_string)
        .unwrap_or_else(|| status.as_str().to_string())
}

/// Turn a non-success response into `ServerError`.
async fn server_error(response: Response) -> VoiceOrderError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let message = error_message(&body).unwrap_or_else(|| status_text(status));
    warn!(status = status.as_u16(), "server rejected request: {message}");
    VoiceOrderError::ServerError { message }
}

#[async_trait::async_trait]
impl OrderApi for HttpOrderClient {
    async fn submit_order(&self, text: &str) -> Result<OrderResponse> {
        if text.trim().is_empty() {
            return Err(VoiceOrderError::EmptyInput);
        }

        let request = OrderRequest {
            input: text,
            user_id: self.user_id.as_deref(),
        };

        debug!(url = %self.order_url, "sending order");
        let response = self
            .http
            .post(&self.order_url)
            .json(&request)
            .send()
            .await
            .map_err(classify_send_error)?;

        if !response.status().is_success() {
            return Err(server_error(response).await);
        }

        let body = response
            .text()
            .await
            .map_err(|_| VoiceOrderError::NetworkUnreachable)?;

        let reply = OrderReply::parse(&body)?;
        info!(
            intent = reply.intent.as_deref().unwrap_or("-"),
            sentiment = reply.sentiment.as_deref().unwrap_or("-"),
            "order accepted"
        );
        Ok(reply)
    }

    async fn submit_feedback(&self, text: &str) -> Result<()> {
        if text.trim().is_empty() {
            return Err(VoiceOrderError::EmptyInput);
        }

        debug!(url = %self.feedback_url, "sending feedback");
        let response = self
            .http
            .post(&self.feedback_url)
            .json(&FeedbackRequest { feedback: text })
            .send()
            .await
            .map_err(classify_send_error)?;

        if !response.status().is_success() {
            return Err(server_error(response).await);
        }

        Ok(())
    }
}
