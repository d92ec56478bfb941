//! Order backend client: order and feedback submission.

pub mod api;
pub mod http;
pub mod protocol;

pub use api::{MockOrderApi, OrderApi};
pub use http::HttpOrderClient;
pub use protocol::OrderResponse;
