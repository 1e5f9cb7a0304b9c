//! Signed request extractors
//!
//! When a signing secret is configured, requests must carry a valid
//! `x-signature` / `x-timestamp` pair. `SignedJson` signs the raw body and
//! then parses and validates it like `ValidatedJson`. `SignedTarget` covers
//! bodiless GET requests by signing the request target (`path?query`) exactly
//! as the client sent it. Without a secret the headers are ignored.

use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRef, FromRequest, FromRequestParts, OriginalUri, Request},
    http::{request::Parts, HeaderMap},
};
use guard_common::{AppError, SignatureVerifier, SIGNATURE_HEADER, TIMESTAMP_HEADER};
use serde::de::DeserializeOwned;
use tracing::warn;
use validator::Validate;

use crate::response::ApiError;
use crate::state::AppState;

/// JSON body checked against the request signature
#[derive(Debug, Clone)]
pub struct SignedJson<T>(pub T);

/// Marker for a request whose target passed the signature check
#[derive(Debug, Clone, Copy)]
pub struct SignedTarget;

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
}

fn check_signature(
    verifier: &SignatureVerifier,
    signature: Option<&str>,
    timestamp: Option<&str>,
    payload: &str,
) -> Result<(), AppError> {
    let (Some(signature), Some(timestamp)) = (signature, timestamp) else {
        warn!("Unsigned request rejected");
        return Err(AppError::MissingSignature);
    };

    if !verifier.verify(payload, signature, timestamp) {
        warn!(timestamp = %timestamp, "Request signature rejected");
        return Err(AppError::InvalidSignature);
    }

    Ok(())
}

#[async_trait]
impl<S, T> FromRequest<S> for SignedJson<T>
where
    S: Send + Sync,
    AppState: FromRef<S>,
    T: DeserializeOwned + Validate,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        let signature = header_value(req.headers(), SIGNATURE_HEADER);
        let timestamp = header_value(req.headers(), TIMESTAMP_HEADER);

        let body = Bytes::from_request(req, state)
            .await
            .map_err(|e| ApiError::invalid_body(e.body_text()))?;

        if let Some(verifier) = app_state.signature_verifier() {
            // Signatures cover the body as text
            let payload = std::str::from_utf8(&body).map_err(|_| AppError::InvalidSignature)?;
            check_signature(
                verifier,
                signature.as_deref(),
                timestamp.as_deref(),
                payload,
            )?;
        }

        let value: T =
            serde_json::from_slice(&body).map_err(|e| ApiError::invalid_body(e.to_string()))?;
        value.validate()?;

        Ok(SignedJson(value))
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for SignedTarget
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);

        if let Some(verifier) = app_state.signature_verifier() {
            // Nested routers strip their prefix from `parts.uri`
            let uri = parts
                .extensions
                .get::<OriginalUri>()
                .map_or(&parts.uri, |original| &original.0);
            let target = uri
                .path_and_query()
                .map_or_else(|| uri.path(), |pq| pq.as_str());

            check_signature(
                verifier,
                header_value(&parts.headers, SIGNATURE_HEADER).as_deref(),
                header_value(&parts.headers, TIMESTAMP_HEADER).as_deref(),
                target,
            )?;
        }

        Ok(SignedTarget)
    }
}
