// src/services/credential_issuer.rs
//! Credential Issuer client.
//!
//! The issuing authority validates blind signature requests for a given
//! attribute and signs them without seeing the raw attribute values. This
//! module defines the capability the wallet consumes and an HTTP
//! implementation of it.
//!
//! The HTTP service exposes:
//! - `GET  /uid`: the issuer's identity
//! - `GET  /authorizable_attribute/{id}`: the verification key for an attribute
//! - `POST /credential`: blind issuance of a credential
//! - `GET  /stats`: aggregate usage statistics

use crate::models::{
    BlindSignatureRequest, IssuerIdentity, IssuerSignedCredential, SubmissionSet, VerificationKey,
};
use crate::services::{endpoint, normalize_base_url, send_json, ServiceError};
use async_trait::async_trait;
use log::debug;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Aggregate usage statistics published by an issuer.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct IssuerStats {
    pub total: u64,
}

/// Operations the wallet needs from a credential issuer.
#[async_trait]
pub trait CredentialIssuerApi: Send + Sync {
    /// Fetches the issuer's identity token.
    async fn issuer_id(&self) -> Result<IssuerIdentity, ServiceError>;

    /// Fetches the verification key the issuer uses for `attribute_id`.
    async fn issuer_verifier(&self, attribute_id: &str) -> Result<VerificationKey, ServiceError>;

    /// Asks the issuer to blindly sign `blind_request` for `attribute_id`.
    ///
    /// Only hashed attribute values are ever sent.
    async fn issue_credential(
        &self,
        attribute_id: &str,
        blind_request: &BlindSignatureRequest,
        hashed_mandatory: &SubmissionSet,
        hashed_optional: &SubmissionSet,
    ) -> Result<IssuerSignedCredential, ServiceError>;

    /// Fetches aggregate usage statistics.
    async fn stats(&self) -> Result<IssuerStats, ServiceError>;
}

/// Resolves an issuer URL into a client.
///
/// Each issuance attempt names its own issuer, so the orchestrator asks for a
/// client per attempt instead of holding a single one.
pub trait IssuerConnector: Send + Sync {
    fn connect(&self, issuer_url: &str) -> Result<Arc<dyn CredentialIssuerApi>, ServiceError>;
}

#[derive(Deserialize)]
struct UidResponse {
    credential_issuer_id: String,
}

#[derive(Deserialize)]
struct AuthorizableAttributeResponse {
    verification_key: VerificationKey,
}

#[derive(Serialize)]
struct NamedValue<'a> {
    name: &'a str,
    value: &'a str,
}

#[derive(Serialize)]
struct IssueCredentialBody<'a> {
    authorizable_attribute_id: &'a str,
    blind_sign_request: &'a BlindSignatureRequest,
    values: Vec<NamedValue<'a>>,
    optional_values: Vec<NamedValue<'a>>,
}

fn named_values(set: &SubmissionSet) -> Vec<NamedValue<'_>> {
    set.iter()
        .map(|(name, value)| NamedValue { name, value })
        .collect()
}

/// HTTP client for a single credential issuer.
#[derive(Debug, Clone)]
pub struct HttpCredentialIssuer {
    client: reqwest::Client,
    base_url: reqwest::Url,
}

impl HttpCredentialIssuer {
    /// Creates a client for the issuer at `base_url`.
    ///
    /// # Errors
    /// Returns [`ServiceError::InvalidUrl`] if `base_url` is not an http(s) URL
    pub fn new(client: reqwest::Client, base_url: &str) -> Result<Self, ServiceError> {
        Ok(Self {
            client,
            base_url: normalize_base_url(base_url)?,
        })
    }

    fn url(&self, segments: &[&str]) -> reqwest::Url {
        endpoint(&self.base_url, segments)
    }
}

#[async_trait]
impl CredentialIssuerApi for HttpCredentialIssuer {
    async fn issuer_id(&self) -> Result<IssuerIdentity, ServiceError> {
        let resp: UidResponse = send_json(self.client.get(self.url(&["uid"])), "issuer id").await?;
        Ok(resp.credential_issuer_id)
    }

    async fn issuer_verifier(&self, attribute_id: &str) -> Result<VerificationKey, ServiceError> {
        let url = self.url(&["authorizable_attribute", attribute_id]);
        let resp: AuthorizableAttributeResponse =
            send_json(self.client.get(url), "issuer verifier").await?;
        Ok(resp.verification_key)
    }

    async fn issue_credential(
        &self,
        attribute_id: &str,
        blind_request: &BlindSignatureRequest,
        hashed_mandatory: &SubmissionSet,
        hashed_optional: &SubmissionSet,
    ) -> Result<IssuerSignedCredential, ServiceError> {
        let body = IssueCredentialBody {
            authorizable_attribute_id: attribute_id,
            blind_sign_request: blind_request,
            values: named_values(hashed_mandatory),
            optional_values: named_values(hashed_optional),
        };
        debug!(
            "requesting credential for '{}' from {} ({} mandatory, {} optional fields)",
            attribute_id,
            self.base_url,
            hashed_mandatory.len(),
            hashed_optional.len()
        );
        send_json(
            self.client.post(self.url(&["credential"])).json(&body),
            "credential issuance",
        )
        .await
    }

    async fn stats(&self) -> Result<IssuerStats, ServiceError> {
        send_json(self.client.get(self.url(&["stats"])), "issuer stats").await
    }
}

/// Builds [`HttpCredentialIssuer`] clients sharing one connection pool.
#[derive(Debug, Clone, Default)]
pub struct HttpIssuerConnector {
    client: reqwest::Client,
}

impl HttpIssuerConnector {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl IssuerConnector for HttpIssuerConnector {
    fn connect(&self, issuer_url: &str) -> Result<Arc<dyn CredentialIssuerApi>, ServiceError> {
        Ok(Arc::new(HttpCredentialIssuer::new(self.client.clone(), issuer_url)?))
    }
}
