//! Bearer-token authentication for the read surface.
//!
//! Tokens are issued by an external identity provider; this service does
//! not verify the signature. It decodes the payload segment, rejects
//! expired tokens, and resolves the `sub` claim to a stored account.
//! Every failure mode collapses to [`BackendError::Unauthorized`] so the
//! response never reveals which check failed.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::app_state::AppState;
use crate::domain::Account;
use crate::error::BackendError;

/// The account resolved from a valid bearer token.
///
/// Use as a handler argument to require authentication on a route.
#[derive(Debug, Clone)]
pub struct AuthenticatedAccount(
    /// The resolved account row.
    pub Account,
);

/// The token claims this service reads.
#[derive(Debug, Deserialize)]
struct Claims {
    sub: String,
    exp: i64,
}

impl FromRequestParts<AppState> for AuthenticatedAccount {
    type Rejection = BackendError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| unauthorized("missing Authorization header"))?;

        let token = bearer_token(header)?;
        let claims = decode_claims(token)?;

        if Utc::now().timestamp() > claims.exp {
            return Err(unauthorized("token expired"));
        }

        let account_id: Uuid = claims
            .sub
            .parse()
            .map_err(|_| unauthorized("malformed subject claim"))?;

        let account = state
            .store
            .find_account(account_id)
            .await?
            .ok_or_else(|| unauthorized("unknown account"))?;

        if !account.is_active {
            return Err(unauthorized("account is inactive"));
        }

        Ok(Self(account))
    }
}

/// Extracts the token from a `Bearer <token>` header value.
fn bearer_token(header: &str) -> Result<&str, BackendError> {
    header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| unauthorized("malformed Authorization header"))
}

/// Decodes the payload segment of an unverified JWT.
fn decode_claims(token: &str) -> Result<Claims, BackendError> {
    let mut segments = token.split('.');
    let (Some(_), Some(payload), Some(_), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        return Err(unauthorized("token is not a three-segment JWT"));
    };

    let bytes = URL_SAFE_NO_PAD
        .decode(payload)
        .map_err(|_| unauthorized("token payload is not base64url"))?;
    serde_json::from_slice(&bytes).map_err(|_| unauthorized("token payload is not valid JSON"))
}

fn unauthorized(reason: &str) -> BackendError {
    BackendError::Unauthorized(reason.to_string())
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn token_with_payload(payload: &serde_json::Value) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let body = URL_SAFE_NO_PAD.encode(payload.to_string().as_bytes());
        format!("{header}.{body}.signature")
    }

    #[test]
    fn bearer_prefix_is_required() {
        assert!(bearer_token("Token abc").is_err());
        assert!(bearer_token("Bearer ").is_err());
        let Ok(token) = bearer_token("Bearer abc.def.ghi") else {
            panic!("expected token");
        };
        assert_eq!(token, "abc.def.ghi");
    }

    #[test]
    fn claims_decode_from_payload_segment() {
        let sub = Uuid::new_v4();
        let token = token_with_payload(&serde_json::json!({
            "sub": sub.to_string(),
            "exp": 4_102_444_800_i64,
        }));
        let Ok(claims) = decode_claims(&token) else {
            panic!("expected claims");
        };
        assert_eq!(claims.sub, sub.to_string());
        assert_eq!(claims.exp, 4_102_444_800);
    }

    #[test]
    fn two_segment_token_is_rejected() {
        assert!(decode_claims("header.payload").is_err());
    }

    #[test]
    fn non_json_payload_is_rejected() {
        let body = URL_SAFE_NO_PAD.encode(b"not json");
        assert!(decode_claims(&format!("h.{body}.s")).is_err());
    }

    #[test]
    fn missing_claims_are_rejected() {
        let token = token_with_payload(&serde_json::json!({"sub": "abc"}));
        assert!(decode_claims(&token).is_err());
    }
}
