//! Authentication request and response bodies.

use serde::{Deserialize, Serialize};

/// Role assigned to every self-registered account.
pub const DEFAULT_ROLE: &str = "USER";

/// `POST /auth/login` body.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    #[serde(rename = "correo")]
    pub email: &'a str,
    #[serde(rename = "contrasena")]
    pub password: &'a str,
}

/// `POST /auth/login` success body.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

/// `POST /auth/register` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegisterRequest {
    #[serde(rename = "nombre")]
    pub name: String,
    /// National id document number.
    #[serde(rename = "cedula")]
    pub document: String,
    #[serde(rename = "correo")]
    pub email: String,
    #[serde(rename = "contrasena")]
    pub password: String,
    #[serde(rename = "rol")]
    pub role: String,
}
