//! Login and registration.

use log::{info, warn};
use reqwest::Method;
use thiserror::Error;

use super::{ApiClient, ApiError, decode_json};
use crate::messages;
use crate::models::{LoginRequest, LoginResponse, RegisterRequest};

/// Login failures, one per message the user can see.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoginError {
    #[error("{}", messages::INVALID_CREDENTIALS)]
    InvalidCredentials,

    #[error("Error del servidor: {0}")]
    Server(u16),

    #[error("{}", messages::NO_RESPONSE)]
    NoResponse,

    #[error("{}", messages::REQUEST_FAILED)]
    Request,

    /// The backend issued a token that does not pass the session check.
    #[error("El token recibido no es válido")]
    InvalidToken,
}

impl LoginError {
    /// Message shown to the user: the exact credential error, or a generic one.
    pub fn user_message(&self) -> &'static str {
        match self {
            LoginError::InvalidCredentials => messages::INVALID_CREDENTIALS,
            _ => messages::LOGIN_FAILED,
        }
    }
}

impl From<ApiError> for LoginError {
    fn from(e: ApiError) -> Self {
        match e {
            ApiError::Status { status: 400, body } if is_invalid_credentials(&body) => {
                LoginError::InvalidCredentials
            }
            ApiError::Status { status, .. } => LoginError::Server(status),
            ApiError::NoResponse(_) => LoginError::NoResponse,
            _ => LoginError::Request,
        }
    }
}

/// The backend replies with the bare message, sometimes JSON-quoted.
fn is_invalid_credentials(body: &str) -> bool {
    let body = body.trim();
    body == messages::INVALID_CREDENTIALS
        || serde_json::from_str::<String>(body).is_ok_and(|s| s == messages::INVALID_CREDENTIALS)
}

/// Registration failed. The cause is kept for logging only.
#[derive(Debug, Error)]
#[error("{}", messages::REGISTER_FAILED)]
pub struct RegisterError(#[source] pub ApiError);

impl ApiClient {
    /// `POST /auth/login`; stores the returned token on success.
    pub async fn login(&self, email: &str, password: &str) -> Result<String, LoginError> {
        let request = self
            .anonymous(Method::POST, "/auth/login")
            .json(&LoginRequest { email, password });
        let resp = self.send(request).await?;
        let LoginResponse { token } = decode_json(resp).await?;

        if let Err(e) = self.session.store_token(&token) {
            warn!("could not persist session token: {e}");
            return Err(LoginError::Request);
        }
        info!("logged in as {email}");
        Ok(token)
    }

    /// `POST /auth/register`. Returns whatever body the backend sent back.
    pub async fn register(
        &self,
        request: &RegisterRequest,
    ) -> Result<serde_json::Value, RegisterError> {
        let builder = self.anonymous(Method::POST, "/auth/register").json(request);
        let resp = self.send(builder).await.map_err(RegisterError)?;
        let body = resp
            .text()
            .await
            .map_err(|e| RegisterError(ApiError::Decode(e.to_string())))?;

        if body.trim().is_empty() {
            return Ok(serde_json::Value::Null);
        }
        Ok(serde_json::from_str(&body).unwrap_or(serde_json::Value::String(body)))
    }

    /// Forget the stored token.
    pub fn logout(&self) -> Result<(), ApiError> {
        self.session.logout()?;
        Ok(())
    }
}
