//! Persisted session: the stored token and what it claims.

use std::sync::Arc;

use chrono::Utc;
use log::{debug, warn};

use super::jwt::{self, SessionClaims};
use super::AuthError;
use crate::store::{KeyValueStore, StoreError};

/// Storage key holding the bearer token.
pub const TOKEN_KEY: &str = "token";

/// Session backed by a key-value store.
///
/// Cloning is cheap; clones share the same store.
#[derive(Clone)]
pub struct Session {
    store: Arc<dyn KeyValueStore>,
    jwt_secret: Option<String>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("verifies_signature", &self.jwt_secret.is_some())
            .finish_non_exhaustive()
    }
}

impl Session {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            jwt_secret: None,
        }
    }

    /// Only trust claims from tokens signed with `secret` (HS256).
    pub fn with_jwt_secret(mut self, secret: Option<String>) -> Self {
        self.jwt_secret = secret;
        self
    }

    pub fn token(&self) -> Result<Option<String>, StoreError> {
        Ok(self.store.get(TOKEN_KEY)?.filter(|t| !t.is_empty()))
    }

    pub fn store_token(&self, token: &str) -> Result<(), StoreError> {
        self.store.set(TOKEN_KEY, token)
    }

    /// Forget the stored token.
    pub fn logout(&self) -> Result<(), StoreError> {
        self.store.remove(TOKEN_KEY)?;
        debug!("session token cleared");
        Ok(())
    }

    /// Claims of the stored token, with errors surfaced.
    pub fn try_claims(&self) -> Result<SessionClaims, AuthError> {
        let token = self
            .token()
            .map_err(|e| AuthError::TokenError(format!("cannot read token: {e}")))?
            .ok_or(AuthError::MissingToken)?;
        match &self.jwt_secret {
            Some(secret) => jwt::verify_token(&token, secret.as_bytes()),
            None => jwt::decode_payload(&token),
        }
    }

    /// Claims of the stored token. Decode failures read as "no session".
    pub fn claims(&self) -> Option<SessionClaims> {
        match self.try_claims() {
            Ok(claims) => Some(claims),
            Err(AuthError::MissingToken) => None,
            Err(e) => {
                warn!("error decoding stored token: {e}");
                None
            }
        }
    }

    /// Whether a stored token exists and has not expired.
    pub fn is_token_valid(&self) -> bool {
        self.is_token_valid_at(now_secs())
    }

    pub fn is_token_valid_at(&self, now_secs: f64) -> bool {
        self.claims().is_some_and(|c| !c.is_expired_at(now_secs))
    }

    pub fn user_id(&self) -> Option<i64> {
        self.claims().and_then(|c| c.user_id())
    }

    pub fn role(&self) -> Option<String> {
        self.claims().and_then(|c| c.rol)
    }

    pub fn is_admin(&self) -> bool {
        self.claims().is_some_and(|c| c.is_admin())
    }

    /// Hook run when the stored token is no longer valid.
    ///
    /// The backend has no refresh endpoint, so an invalid token stays invalid
    /// and the user has to log in again. Returns the current validity.
    pub fn refresh_if_needed(&self) -> bool {
        let valid = self.is_token_valid();
        if !valid && matches!(self.token(), Ok(Some(_))) {
            debug!("stored token is expired or unreadable; a new login is required");
        }
        valid
    }
}

/// Current time in fractional unix seconds.
pub fn now_secs() -> f64 {
    Utc::now().timestamp_millis() as f64 / 1000.0
}
