//! HTTP client for the booking backend.
//!
//! One request per call, no retries. Every request except login and
//! registration carries `Authorization: Bearer <token>` when a token is
//! stored.
//!
//! # Endpoints
//!
//! - `POST /auth/login`, `POST /auth/register`: [`auth`]
//! - `GET|POST /espacio`, `PUT|DELETE /espacio/{id}`: [`spaces`]
//! - `GET /reserva/usuario/{id}`, `PUT /reserva/cancelar/{id}`,
//!   `POST /reserva`: [`reservations`]

pub mod auth;
pub mod reservations;
pub mod spaces;

pub use auth::{LoginError, RegisterError};

use std::sync::Arc;

use log::debug;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::auth::Session;
use crate::config::ClientConfig;
use crate::forms::FormError;
use crate::messages;
use crate::store::{FileStore, StoreError};

/// Errors from a single backend call.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The backend answered with a non-2xx status.
    #[error("Error del servidor: {status}")]
    Status { status: u16, body: String },

    /// The request went out but nothing usable came back.
    #[error("{}", messages::NO_RESPONSE)]
    NoResponse(#[source] reqwest::Error),

    /// The request could not be built or sent.
    #[error("{}: {}", messages::REQUEST_FAILED, .0)]
    Request(String),

    #[error("Respuesta inválida del servidor: {0}")]
    Decode(String),

    #[error("{}", messages::NO_TOKEN)]
    NotAuthenticated,

    #[error(transparent)]
    Form(#[from] FormError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ApiError {
    fn from_transport(e: reqwest::Error) -> Self {
        if e.is_builder() {
            ApiError::Request(e.to_string())
        } else if e.is_decode() {
            ApiError::Decode(e.to_string())
        } else {
            ApiError::NoResponse(e)
        }
    }

    /// HTTP status, when the backend answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Backend client bound to one base URL and one session.
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: Client,
    config: ClientConfig,
    session: Session,
}

impl ApiClient {
    pub fn new(config: ClientConfig, session: Session) -> Result<Self, ApiError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ApiError::Request(format!("http client: {e}")))?;
        Ok(Self {
            http,
            config,
            session,
        })
    }

    /// Client whose session lives in the file store named by `config`.
    pub fn from_config(config: ClientConfig) -> Result<Self, ApiError> {
        let store = Arc::new(FileStore::new(config.store_path.clone()));
        let session = Session::new(store).with_jwt_secret(config.jwt_secret.clone());
        Self::new(config, session)
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Request with the stored bearer token attached, if there is one.
    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ApiError> {
        let builder = self.anonymous(method, path);
        Ok(match self.session.token()? {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        })
    }

    /// Request without credentials.
    fn anonymous(&self, method: Method, path: &str) -> RequestBuilder {
        let url = self.config.endpoint(path);
        debug!("{method} {url}");
        self.http.request(method, url)
    }

    /// Send and turn non-2xx responses into [`ApiError::Status`].
    async fn send(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let resp = request.send().await.map_err(ApiError::from_transport)?;
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp
            .text()
            .await
            .unwrap_or_else(|_| "<no body>".to_string());
        debug!("backend answered {status}: {body}");
        Err(ApiError::Status {
            status: status.as_u16(),
            body,
        })
    }
}

async fn decode_json<T: DeserializeOwned>(resp: Response) -> Result<T, ApiError> {
    resp.json::<T>()
        .await
        .map_err(|e| ApiError::Decode(e.to_string()))
}
