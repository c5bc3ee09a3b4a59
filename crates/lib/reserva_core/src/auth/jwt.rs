//! JWT payload decoding.

use base64::Engine;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::AuthError;

/// Role claim value that unlocks the admin screens.
pub const ADMIN_ROLE: &str = "ROLE_ADMIN";

const PADDING_INDIFFERENT: GeneralPurposeConfig =
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent);

/// JWTs use base64url; some issuers emit the standard alphabet instead.
const URL_SAFE: GeneralPurpose = GeneralPurpose::new(&alphabet::URL_SAFE, PADDING_INDIFFERENT);
const STANDARD: GeneralPurpose = GeneralPurpose::new(&alphabet::STANDARD, PADDING_INDIFFERENT);

/// Claims the client reads from the token payload.
///
/// Every field is optional and read on its own: a claim with an unexpected
/// shape becomes `None` instead of failing the whole payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Expiry (unix seconds).
    #[serde(default, deserialize_with = "lenient_exp")]
    pub exp: Option<f64>,
    /// User id, as embedded by the reservation endpoints.
    #[serde(default, deserialize_with = "lenient_id")]
    pub id_usuario: Option<i64>,
    /// User id, older claim name.
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: Option<i64>,
    /// Role, e.g. `ROLE_ADMIN`.
    #[serde(default, deserialize_with = "lenient_string")]
    pub rol: Option<String>,
    /// Subject (usually the email).
    #[serde(default, deserialize_with = "lenient_string")]
    pub sub: Option<String>,
}

impl SessionClaims {
    /// `true` when `exp` is missing or not strictly after `now_secs`.
    pub fn is_expired_at(&self, now_secs: f64) -> bool {
        match self.exp {
            Some(exp) => exp <= now_secs,
            None => true,
        }
    }

    /// User id, preferring `id_usuario` over `id`.
    pub fn user_id(&self) -> Option<i64> {
        self.id_usuario.or(self.id)
    }

    pub fn role(&self) -> Option<&str> {
        self.rol.as_deref()
    }

    pub fn is_admin(&self) -> bool {
        self.role() == Some(ADMIN_ROLE)
    }
}

/// Decode the payload segment of `token` without checking its signature.
pub fn decode_payload(token: &str) -> Result<SessionClaims, AuthError> {
    let payload = token
        .split('.')
        .nth(1)
        .filter(|p| !p.is_empty())
        .ok_or_else(|| AuthError::TokenError("token has no payload".into()))?;

    let bytes = URL_SAFE
        .decode(payload)
        .or_else(|_| STANDARD.decode(payload))
        .map_err(|e| AuthError::TokenError(format!("payload is not base64: {e}")))?;

    serde_json::from_slice(&bytes)
        .map_err(|e| AuthError::TokenError(format!("payload is not a JSON object: {e}")))
}

/// Verify an HS256 signature with `secret` and return the claims.
///
/// Expiry is not checked here; callers compare `exp` themselves so that an
/// expired-but-authentic token is reported the same way as an unsigned one.
pub fn verify_token(token: &str, secret: &[u8]) -> Result<SessionClaims, AuthError> {
    let key = DecodingKey::from_secret(secret);
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = false;
    validation.required_spec_claims.clear();
    decode::<SessionClaims>(token, &key, &validation)
        .map(|data| data.claims)
        .map_err(|e| AuthError::SignatureError(e.to_string()))
}

/// Ids arrive as JSON numbers or numeric strings; anything else is ignored.
fn lenient_id<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

fn lenient_exp<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}
