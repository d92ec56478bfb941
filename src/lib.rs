//! voice-order - voice-driven ordering client
//!
//! Captures a spoken or typed order, submits it to the order backend, shows
//! and speaks the reply, and collects feedback behind a sign-in gate.

#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::let_underscore_must_use)]

pub mod auth;
pub mod capture;
#[cfg(feature = "cli")]
pub mod cli;
pub mod client;
pub mod config;
pub mod defaults;
pub mod error;
pub mod exec;
#[cfg(feature = "cli")]
pub mod interactive;
pub mod output;
pub mod playback;
pub mod session;

// Core traits (capture -> submit -> play)
pub use capture::SpeechRecognizer;
pub use client::OrderApi;
pub use exec::{CommandExecutor, SystemCommandExecutor};
pub use playback::SpeechSynthesizer;

// Session
pub use session::{OrderSession, SessionEvent, SessionState};

// Auth
pub use auth::{Admission, Authenticator, SessionGate};

// Error handling
pub use error::{Result, VoiceOrderError};

// Config
pub use config::Config;

/// Build version string with optional git commit hash.
///
/// Returns `"0.1.0+abc1234"` when git hash is available, `"0.1.0"` otherwise.
pub fn version_string() -> String {
    let version = env!("CARGO_PKG_VERSION");
    match option_env!("GIT_HASH") {
        Some(hash) if !hash.is_empty() => format!("{}+{}", version, hash),
        _ => version.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_string_starts_with_cargo_version() {
        let ver = version_string();
        assert!(
            ver.starts_with(env!("CARGO_PKG_VERSION")),
            "version_string should start with CARGO_PKG_VERSION, got: {}",
            ver
        );
    }

    #[test]
    fn version_string_contains_plus_when_git_hash_present() {
        let ver = version_string();
        // GIT_HASH is only set when built from a git checkout.
        if option_env!("GIT_HASH").is_some_and(|h| !h.is_empty()) {
            assert!(
                ver.contains('+'),
                "With GIT_HASH set, version should contain '+', got: {}",
                ver
            );
            let hash_part = ver.split('+').nth(1).unwrap_or("");
            assert_eq!(
                hash_part.len(),
                7,
                "Git hash should be 7 chars, got: {}",
                hash_part
            );
        } else {
            assert_eq!(ver, env!("CARGO_PKG_VERSION"));
        }
    }
}
