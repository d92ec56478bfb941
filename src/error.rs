//! Error types for voice-order.

use crate::defaults;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VoiceOrderError {
    // Speech capture errors
    #[error("Speech recognition is not available on this platform")]
    CapabilityUnavailable,

    #[error("Speech recognition failed: {reason}")]
    CaptureFailed { reason: String },

    #[error("A capture session is already in progress")]
    CaptureBusy,

    // Order submission errors
    #[error("Input is empty")]
    EmptyInput,

    #[error("Server error: {message}")]
    ServerError { message: String },

    #[error("No response from the server")]
    NetworkUnreachable,

    #[error("Request could not be sent: {message}")]
    RequestError { message: String },

    #[error("Response did not contain a response field")]
    MalformedResponse,

    // Authentication errors
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Anonymous sign-in failed")]
    AnonymousSignInFailed,

    #[error("Account creation failed: {message}")]
    SignUpFailed { message: String },

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("No signed-in user")]
    NotAuthenticated,

    // Configuration errors
    #[error("Failed to parse configuration: {message}")]
    ConfigParse { message: String },

    #[error("Invalid configuration value for {key}: {message}")]
    ConfigInvalidValue { key: String, message: String },

    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    // External speech tool errors
    #[error("Speech tool not found: {tool}")]
    SpeechToolNotFound { tool: String },

    #[error("Speech tool failed: {message}")]
    SpeechToolFailed { message: String },

    // General I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl VoiceOrderError {
    /// Text shown to the user for this failure.
    ///
    /// Server errors surface the server-supplied message verbatim; every
    /// other variant maps to a fixed sentence.
    pub fn user_message(&self) -> String {
        match self {
            Self::CapabilityUnavailable => defaults::CAPABILITY_UNAVAILABLE_MESSAGE.to_string(),
            Self::CaptureFailed { .. } => defaults::CAPTURE_FAILED_MESSAGE.to_string(),
            Self::CaptureBusy => defaults::CAPTURE_BUSY_MESSAGE.to_string(),
            Self::EmptyInput => defaults::EMPTY_INPUT_MESSAGE.to_string(),
            Self::ServerError { message } => message.clone(),
            Self::NetworkUnreachable => defaults::NO_RESPONSE_MESSAGE.to_string(),
            Self::RequestError { message } => message.clone(),
            Self::MalformedResponse => defaults::MALFORMED_RESPONSE_MESSAGE.to_string(),
            Self::InvalidCredentials => "Invalid email or password.".to_string(),
            Self::AnonymousSignInFailed => "Failed to sign in anonymously.".to_string(),
            Self::SignUpFailed { .. } => "Failed to create account. Please try again.".to_string(),
            Self::PasswordMismatch => "Passwords do not match".to_string(),
            Self::NotAuthenticated => "Please sign in first.".to_string(),
            other => other.to_string(),
        }
    }

    /// True for the failures an order submission can settle with.
    pub fn is_submission_failure(&self) -> bool {
        matches!(
            self,
            Self::ServerError { .. }
                | Self::NetworkUnreachable
                | Self::RequestError { .. }
                | Self::MalformedResponse
        )
    }
}

// Type alias for convenience
pub type Result<T> = std::result::Result<T, VoiceOrderError>;
