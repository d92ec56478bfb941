//! In-memory authenticator backed by the configured account list.

use crate::auth::{Authenticator, Identity, SessionGate};
use crate::config::AuthConfig;
use crate::error::{Result, VoiceOrderError};
use std::collections::BTreeMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug)]
pub struct LocalAuthenticator {
    accounts: Mutex<BTreeMap<String, String>>,
    allow_anonymous: bool,
    current: Mutex<Option<Identity>>,
    next_guest: AtomicU64,
}

impl LocalAuthenticator {
    pub fn from_config(config: &AuthConfig) -> Self {
        Self {
            accounts: Mutex::new(config.accounts.clone()),
            allow_anonymous: config.allow_anonymous,
            current: Mutex::new(None),
            next_guest: AtomicU64::new(1),
        }
    }

    fn set_current(&self, identity: Option<Identity>) {
        *self.current.lock().unwrap_or_else(|e| e.into_inner()) = identity;
    }
}

impl SessionGate for LocalAuthenticator {
    fn current_user(&self) -> Option<Identity> {
        self.current
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

#[async_trait::async_trait]
impl Authenticator for LocalAuthenticator {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity> {
        let matches = self
            .accounts
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(email)
            .is_some_and(|stored| stored == password);

        if !matches {
            return Err(VoiceOrderError::InvalidCredentials);
        }

        let identity = Identity {
            uid: format!("local:{email}"),
            email: Some(email.to_string()),
            anonymous: false,
        };
        self.set_current(Some(identity.clone()));
        Ok(identity)
    }

    async fn sign_in_anonymously(&self) -> Result<Identity> {
        if !self.allow_anonymous {
            return Err(VoiceOrderError::AnonymousSignInFailed);
        }

        let n = self.next_guest.fetch_add(1, Ordering::Relaxed);
        let identity = Identity {
            uid: format!("guest-{n}"),
            email: None,
            anonymous: true,
        };
        self.set_current(Some(identity.clone()));
        Ok(identity)
    }

    async fn create_account(&self, email: &str, password: &str) -> Result<()> {
        if !email.contains('@') {
            return Err(VoiceOrderError::SignUpFailed {
                message: format!("invalid email address: {email}"),
            });
        }
        if password.len() < MIN_PASSWORD_LEN {
            return Err(VoiceOrderError::SignUpFailed {
                message: format!("password must be at least {MIN_PASSWORD_LEN} characters"),
            });
        }

        let mut accounts = self.accounts.lock().unwrap_or_else(|e| e.into_inner());
        if accounts.contains_key(email) {
            return Err(VoiceOrderError::SignUpFailed {
                message: format!("account already exists: {email}"),
            });
        }
        accounts.insert(email.to_string(), password.to_string());
        Ok(())
    }

    async fn sign_out(&self) -> Result<()> {
        self.set_current(None);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty() -> LocalAuthenticator {
        LocalAuthenticator::from_config(&AuthConfig::default())
    }

    #[tokio::test]
    async fn test_guest_ids_are_unique() {
        let auth = empty();
        let first = auth.sign_in_anonymously().await.unwrap();
        let second = auth.sign_in_anonymously().await.unwrap();
        assert_ne!(first.uid, second.uid);
        assert_eq!(auth.current_user(), Some(second));
    }

    #[tokio::test]
    async fn test_sign_out_clears_current_user() {
        let auth = empty();
        auth.sign_in_anonymously().await.unwrap();
        assert!(auth.current_user().is_some());

        auth.sign_out().await.unwrap();
        assert!(auth.current_user().is_none());
    }

    #[tokio::test]
    async fn test_create_account_validation() {
        let auth = empty();
        assert!(matches!(
            auth.create_account("not-an-email", "longenough").await,
            Err(VoiceOrderError::SignUpFailed { .. })
        ));
        assert!(matches!(
            auth.create_account("a@b.c", "short").await,
            Err(VoiceOrderError::SignUpFailed { .. })
        ));
        assert!(auth.create_account("a@b.c", "longenough").await.is_ok());
    }

    #[tokio::test]
    async fn test_unknown_account_is_rejected() {
        let auth = empty();
        assert!(matches!(
            auth.sign_in("who@example.com", "whatever").await,
            Err(VoiceOrderError::InvalidCredentials)
        ));
    }
}
