use crate::client::protocol::OrderResponse;
use crate::error::{Result, VoiceOrderError};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

/// Trait for the order backend.
///
/// This trait allows swapping implementations (HTTP vs mock). Each call is
/// attempted exactly once; retrying is left to the user.
#[async_trait::async_trait]
pub trait OrderApi: Send + Sync {
    /// Submit an order request and return the backend's reply.
    async fn submit_order(&self, text: &str) -> Result<OrderResponse>;

    /// Submit feedback. Any success status is an acknowledgement.
    async fn submit_feedback(&self, text: &str) -> Result<()>;
}

#[async_trait::async_trait]
impl<T: OrderApi + ?Sized> OrderApi for Arc<T> {
    async fn submit_order(&self, text: &str) -> Result<OrderResponse> {
        (**self).submit_order(text).await
    }

    async fn submit_feedback(&self, text: &str) -> Result<()> {
        (**self).submit_feedback(text).await
    }
}

/// Mock order backend for testing
///
/// Returns queued results in order. With the queue empty, orders are
/// answered with `"Received: <text>"` and feedback succeeds. A hold makes
/// every order wait until released, keeping it in flight.
#[derive(Debug, Default)]
pub struct MockOrderApi {
    order_results: Mutex<VecDeque<Result<OrderResponse>>>,
    feedback_results: Mutex<VecDeque<Result<()>>>,
    orders: Mutex<Vec<String>>,
    feedback: Mutex<Vec<String>>,
    hold: Option<Arc<Notify>>,
}

impl MockOrderApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful order reply.
    pub fn with_reply(self, text: &str) -> Self {
        self.order_results
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(Ok(OrderResponse::new(text)));
        self
    }

    /// Queue an order failure.
    pub fn with_order_error(self, error: VoiceOrderError) -> Self {
        self.order_results
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(Err(error));
        self
    }

    /// Queue a feedback failure.
    pub fn with_feedback_error(self, error: VoiceOrderError) -> Self {
        self.feedback_results
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(Err(error));
        self
    }

    /// Hold every order until `release` is notified.
    pub fn with_hold(mut self, release: Arc<Notify>) -> Self {
        self.hold = Some(release);
        self
    }

    /// Texts of all orders received so far.
    pub fn orders(&self) -> Vec<String> {
        self.orders.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Texts of all feedback received so far.
    pub fn feedback(&self) -> Vec<String> {
        self.feedback.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn order_calls(&self) -> usize {
        self.orders.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn feedback_calls(&self) -> usize {
        self.feedback.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

#[async_trait::async_trait]
impl OrderApi for MockOrderApi {
    async fn submit_order(&self, text: &str) -> Result<OrderResponse> {
        self.orders
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(text.to_string());

        if let Some(release) = &self.hold {
            release.notified().await;
        }

        let queued = self
            .order_results
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front();
        queued.unwrap_or_else(|| Ok(OrderResponse::new(&format!("Received: {text}"))))
    }

    async fn submit_feedback(&self, text: &str) -> Result<()> {
        self.feedback
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(text.to_string());

        let queued = self
            .feedback_results
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front();
        queued.unwrap_or(Ok(()))
    }
}
