// src/services/mod.rs
//! Remote collaborators (credential issuer, petition source) and the HTTP API
//! that exposes the wallet to a front end.

use thiserror::Error;

pub mod api_server;
pub mod credential_issuer;
pub mod petition_client;

pub use credential_issuer::{
    CredentialIssuerApi, HttpCredentialIssuer, HttpIssuerConnector, IssuerConnector, IssuerStats,
};
pub use petition_client::{fetch_petition, HttpPetitionSource, PetitionSource};

/// Failure talking to a remote service.
///
/// The display string is the human-readable reason surfaced to the user.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("invalid service URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("{operation} failed: {reason}")]
    Transport { operation: &'static str, reason: String },

    #[error("{operation} rejected ({status}): {message}")]
    Rejected {
        operation: &'static str,
        status: u16,
        message: String,
    },

    #[error("{operation} returned an unexpected response: {reason}")]
    Decode { operation: &'static str, reason: String },
}

/// Validates a service base URL.
pub(crate) fn normalize_base_url(url: &str) -> Result<reqwest::Url, ServiceError> {
    let parsed = reqwest::Url::parse(url).map_err(|e| ServiceError::InvalidUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ServiceError::InvalidUrl {
            url: url.to_string(),
            reason: format!("unsupported scheme '{}'", parsed.scheme()),
        });
    }
    Ok(parsed)
}

/// Appends `segments` to the path of `base`, percent-encoding each one.
///
/// Identifiers therefore always stay a single path segment: `age?x` is sent
/// as `age%3Fx`, never as a query string.
pub(crate) fn endpoint(base: &reqwest::Url, segments: &[&str]) -> reqwest::Url {
    let mut url = base.clone();
    // http(s) URLs always have a path
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
    url
}

/// Sends a request and decodes a successful JSON body.
///
/// Non-2xx responses become [`ServiceError::Rejected`], using the body's
/// `detail` field when the service provides one.
pub(crate) async fn send_json<T: serde::de::DeserializeOwned>(
    request: reqwest::RequestBuilder,
    operation: &'static str,
) -> Result<T, ServiceError> {
    let resp = request.send().await.map_err(|e| ServiceError::Transport {
        operation,
        reason: e.to_string(),
    })?;

    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(ServiceError::Rejected {
            operation,
            status: status.as_u16(),
            message: rejection_message(&body),
        });
    }

    resp.json().await.map_err(|e| ServiceError::Decode {
        operation,
        reason: e.to_string(),
    })
}

fn rejection_message(body: &str) -> String {
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(serde_json::Value::Object(map)) => match map.get("detail") {
            Some(serde_json::Value::String(detail)) => detail.clone(),
            Some(detail) => detail.to_string(),
            None => body.trim().to_string(),
        },
        _ => body.trim().to_string(),
    }
}
