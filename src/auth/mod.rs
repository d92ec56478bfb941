//! Authentication boundary in front of the ordering session.
//!
//! The gate decides whether an ordering session may be opened at all; the
//! entry point functions wrap sign-in and sign-up with the messages shown to
//! the user.

pub mod local;

pub use local::LocalAuthenticator;

use crate::defaults;
use crate::error::{Result, VoiceOrderError};
use tracing::{info, warn};

/// A signed-in user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub uid: String,
    pub email: Option<String>,
    pub anonymous: bool,
}

impl Identity {
    /// Short name for display.
    pub fn display_name(&self) -> &str {
        match &self.email {
            Some(email) => email,
            None if self.anonymous => "guest",
            None => &self.uid,
        }
    }
}

/// Current authentication state.
pub trait SessionGate: Send + Sync {
    fn current_user(&self) -> Option<Identity>;
}

/// Authentication provider.
#[async_trait::async_trait]
pub trait Authenticator: SessionGate {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity>;

    async fn sign_in_anonymously(&self) -> Result<Identity>;

    /// Create an account. Does not sign the new user in.
    async fn create_account(&self, email: &str, password: &str) -> Result<()>;

    async fn sign_out(&self) -> Result<()>;
}

/// Outcome of asking the gate for access to the ordering screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    Admitted(Identity),
    /// No signed-in user: go to this entry point instead.
    Redirect(&'static str),
}

/// Admit the current user, or redirect to the sign-in entry point.
pub fn admit(gate: &dyn SessionGate) -> Admission {
    match gate.current_user() {
        Some(identity) => Admission::Admitted(identity),
        None => Admission::Redirect(defaults::AUTH_ENTRY_POINT),
    }
}

/// Credentialed sign-in. Every provider failure reads as bad credentials.
pub async fn log_in(auth: &dyn Authenticator, email: &str, password: &str) -> Result<Identity> {
    match auth.sign_in(email, password).await {
        Ok(identity) => {
            info!(user = identity.display_name(), "signed in");
            Ok(identity)
        }
        Err(e) => {
            warn!("sign-in failed: {e}");
            Err(VoiceOrderError::InvalidCredentials)
        }
    }
}

/// Anonymous sign-in.
pub async fn log_in_as_guest(auth: &dyn Authenticator) -> Result<Identity> {
    match auth.sign_in_anonymously().await {
        Ok(identity) => {
            info!("signed in as guest");
            Ok(identity)
        }
        Err(e) => {
            warn!("anonymous sign-in failed: {e}");
            Err(VoiceOrderError::AnonymousSignInFailed)
        }
    }
}

/// Sign-up: the confirmation must match before the provider is asked.
pub async fn sign_up(
    auth: &dyn Authenticator,
    email: &str,
    password: &str,
    confirm: &str,
) -> Result<()> {
    if password != confirm {
        return Err(VoiceOrderError::PasswordMismatch);
    }

    auth.create_account(email, password)
        .await
        .map_err(|e| match e {
            VoiceOrderError::SignUpFailed { .. } => e,
            other => VoiceOrderError::SignUpFailed {
                message: other.to_string(),
            },
        })
}
