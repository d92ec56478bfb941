//! JSON bodies exchanged with the order backend.

use crate::error::{Result, VoiceOrderError};
use serde::{Deserialize, Serialize};

/// Body of `POST /api/voice-order`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderRequest<'a> {
    pub input: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<&'a str>,
}

/// Body of `POST /api/feedback`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedbackRequest<'a> {
    pub feedback: &'a str,
}

/// Success body of the order endpoint.
///
/// Only `response` is required; the backend adds its classification of the
/// request alongside it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OrderReply {
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub intent: Option<String>,
    #[serde(default)]
    pub sentiment: Option<String>,
    #[serde(default)]
    pub score: Option<f64>,
}

/// Reply text plus optional backend metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderResponse {
    pub text: String,
    pub intent: Option<String>,
    pub sentiment: Option<String>,
    pub score: Option<f64>,
}

impl OrderResponse {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            intent: None,
            sentiment: None,
            score: None,
        }
    }
}

impl OrderReply {
    /// Parse a success body. Anything without a non-empty string `response`
    /// is `MalformedResponse`.
    pub fn parse(body: &str) -> Result<OrderResponse> {
        let reply: OrderReply =
            serde_json::from_str(body).map_err(|_| VoiceOrderError::MalformedResponse)?;

        match reply.response {
            Some(text) if !text.is_empty() => Ok(OrderResponse {
                text,
                intent: reply.intent,
                sentiment: reply.sentiment,
                score: reply.score,
            }),
            _ => Err(VoiceOrderError::MalformedResponse),
        }
    }
}

/// Extract the server-supplied message from an error body, if any.
pub fn error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("error")
        .and_then(|v| v.as_str())
        .filter(|message| !message.is_empty())
        .map(str::to_string)
}
