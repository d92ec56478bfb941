//! Order session controller.
//!
//! ```text
//! Idle -> Capturing -> Idle            (transcript fills the input)
//! Idle -> Submitting -> Responded -> Idle
//!                    -> Failed    -> Idle
//! ```
//!
//! Feedback runs beside this machine and never touches the order fields.

pub mod controller;
pub mod state;

pub use controller::OrderSession;
pub use state::{CaptureOutcome, FeedbackOutcome, SessionEvent, SessionState, SubmitOutcome};
