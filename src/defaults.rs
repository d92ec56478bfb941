//! Default configuration constants and user-facing messages.
//!
//! Shared by the config types, the order client and the session controller so
//! the displayed text stays identical wherever a failure is surfaced.

/// Default base URL of the order backend.
pub const API_BASE_URL: &str = "http://localhost:5000";

/// Path of the voice order endpoint, relative to the base URL.
pub const ORDER_PATH: &str = "/api/voice-order";

/// Path of the feedback endpoint, relative to the base URL.
pub const FEEDBACK_PATH: &str = "/api/feedback";

/// Pitch applied to every utterance (1.0 = platform default).
pub const PITCH: f32 = 1.0;

/// Speaking rate applied to every utterance (1.0 = platform default).
pub const RATE: f32 = 1.0;

/// Language requested from the recognizer.
pub const LANGUAGE: &str = "en-US";

/// Upper bound on a single capture session in milliseconds.
///
/// A recognizer that produces nothing within this window ends the session
/// silently instead of leaving the caller waiting.
pub const CAPTURE_TIMEOUT_MS: u64 = 10_000;

/// Where the session gate sends callers without a signed-in identity.
pub const AUTH_ENTRY_POINT: &str = "/login";

pub const NO_RESPONSE_MESSAGE: &str =
    "No response from the server. Please check your network connection.";

pub const MALFORMED_RESPONSE_MESSAGE: &str = "Unexpected response format from the server.";

pub const CAPTURE_FAILED_MESSAGE: &str = "Error in voice recognition. Please try again.";

pub const CAPABILITY_UNAVAILABLE_MESSAGE: &str =
    "Speech recognition is not supported on this platform.";

pub const CAPTURE_BUSY_MESSAGE: &str = "Voice input is already listening.";

pub const EMPTY_INPUT_MESSAGE: &str =
    "Please provide a voice input or type a request before submitting.";

pub const SUBMISSION_PENDING_MESSAGE: &str =
    "Your previous order is still being submitted. Please wait.";

pub const REPLY_DISCARDED_MESSAGE: &str = "The pending order reply was discarded.";

pub const EMPTY_FEEDBACK_MESSAGE: &str = "Please provide your feedback.";

pub const FEEDBACK_THANKS_MESSAGE: &str = "Thank you for your feedback!";

pub const FEEDBACK_ERROR_MESSAGE: &str = "Error submitting feedback. Please try again.";
