// src/wallet/fixtures.rs
//! Deterministic collaborators for tests: a Crypto Engine and a credential
//! issuer that return canonical values and record every call.

use crate::models::{
    BlindSignatureRequest, IssuerIdentity, IssuerSignedCredential, SubmissionSet, VerificationKey,
};
use crate::services::{
    normalize_base_url, CredentialIssuerApi, IssuerConnector, IssuerStats, ServiceError,
};
use crate::zkp::{CryptoEngine, EngineError, Script};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

pub(crate) const FIXTURE_KEYPAIR: &str = r#"{"citizen":{"credential_keypair":{"private":"x","public":"X"}}}"#;
pub(crate) const FIXTURE_BLIND_REQUEST: &str = r#"{"request":{"blind":"req"}}"#;
pub(crate) const FIXTURE_ISSUER_ID: &str = "issuer-fixture";

#[derive(Debug, Clone)]
pub(crate) struct EngineCall {
    pub script: Script,
    pub data: String,
    pub keys: String,
}

/// Engine returning canonical outputs:
/// - hashing: `hash(<value>)`
/// - keygen / blind-request: [`FIXTURE_KEYPAIR`] / [`FIXTURE_BLIND_REQUEST`]
/// - aggregate: `credential:<session>:<issuer>`
/// - prove: `proof:<session>`
pub(crate) struct FixtureEngine {
    calls: Mutex<Vec<EngineCall>>,
    keygen_output: String,
    blind_request_output: String,
    failing_script: Option<&'static str>,
    failing_hash_value: Option<String>,
}

impl FixtureEngine {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            keygen_output: FIXTURE_KEYPAIR.to_string(),
            blind_request_output: FIXTURE_BLIND_REQUEST.to_string(),
            failing_script: None,
            failing_hash_value: None,
        }
    }

    pub fn with_keygen_output(mut self, output: &str) -> Self {
        self.keygen_output = output.to_string();
        self
    }

    pub fn with_blind_request_output(mut self, output: &str) -> Self {
        self.blind_request_output = output.to_string();
        self
    }

    /// Fails every run of the script named `name` (see [`Script::name`]).
    pub fn failing_on(mut self, name: &'static str) -> Self {
        self.failing_script = Some(name);
        self
    }

    /// Fails hashing of one specific raw value.
    pub fn failing_hash_of(mut self, value: &str) -> Self {
        self.failing_hash_value = Some(value.to_string());
        self
    }

    pub fn calls(&self) -> Vec<EngineCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Calls other than hashing, in execution order.
    pub fn protocol_calls(&self) -> Vec<EngineCall> {
        self.calls()
            .into_iter()
            .filter(|c| c.script != Script::Hashing)
            .collect()
    }

    fn failure(script: &Script) -> EngineError {
        EngineError::Execution {
            script: script.name(),
            status: "exit status: 1".to_string(),
            stderr: "fixture failure".to_string(),
        }
    }
}

#[async_trait]
impl CryptoEngine for FixtureEngine {
    async fn execute(&self, script: &Script, data: &str, keys: &str) -> Result<String, EngineError> {
        self.calls.lock().unwrap().push(EngineCall {
            script: script.clone(),
            data: data.to_string(),
            keys: keys.to_string(),
        });

        if self.failing_script == Some(script.name()) {
            return Err(Self::failure(script));
        }

        Ok(match script {
            Script::Hashing => {
                if self.failing_hash_value.as_deref() == Some(data) {
                    return Err(Self::failure(script));
                }
                format!("hash({data})")
            }
            Script::Keygen { .. } => self.keygen_output.clone(),
            Script::BlindRequest { .. } => self.blind_request_output.clone(),
            Script::Aggregate { session, issuer } => format!("credential:{session}:{issuer}"),
            Script::Prove { session, .. } => format!("proof:{session}"),
        })
    }
}

#[derive(Debug, Clone)]
pub(crate) struct IssueCall {
    pub attribute_id: String,
    pub blind_request: Value,
    pub hashed_mandatory: SubmissionSet,
    pub hashed_optional: SubmissionSet,
}

/// Issuer returning [`FIXTURE_ISSUER_ID`], a verifier derived from the
/// attribute, and a signed credential derived from the attribute.
pub(crate) struct FixtureIssuer {
    issue_calls: Mutex<Vec<IssueCall>>,
    handshake_calls: Mutex<Vec<&'static str>>,
    issue_rejection: Option<(u16, String)>,
    handshake_rejection: Option<(&'static str, u16, String)>,
}

impl FixtureIssuer {
    pub fn new() -> Self {
        Self {
            issue_calls: Mutex::new(Vec::new()),
            handshake_calls: Mutex::new(Vec::new()),
            issue_rejection: None,
            handshake_rejection: None,
        }
    }

    pub fn rejecting_issue(mut self, status: u16, message: &str) -> Self {
        self.issue_rejection = Some((status, message.to_string()));
        self
    }

    /// Rejects the handshake call named `step` (`"issuer_id"` or `"issuer_verifier"`).
    pub fn failing_handshake(mut self, step: &'static str, status: u16, message: &str) -> Self {
        self.handshake_rejection = Some((step, status, message.to_string()));
        self
    }

    fn handshake(&self, step: &'static str, operation: &'static str) -> Result<(), ServiceError> {
        self.handshake_calls.lock().unwrap().push(step);
        match &self.handshake_rejection {
            Some((failing, status, message)) if *failing == step => Err(ServiceError::Rejected {
                operation,
                status: *status,
                message: message.clone(),
            }),
            _ => Ok(()),
        }
    }

    pub fn verifier_for(attribute_id: &str) -> Value {
        json!({ "verification_key": { "attribute": attribute_id, "alpha": "a", "beta": "b" } })
    }

    pub fn signed_for(attribute_id: &str) -> Value {
        json!({ "credential_signature": { "attribute": attribute_id, "h": "H", "b_tilde": "B" } })
    }

    pub fn issue_calls(&self) -> Vec<IssueCall> {
        self.issue_calls.lock().unwrap().clone()
    }

    /// `"issuer_id"` / `"issuer_verifier"` in call order.
    pub fn handshake_calls(&self) -> Vec<&'static str> {
        self.handshake_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CredentialIssuerApi for FixtureIssuer {
    async fn issuer_id(&self) -> Result<IssuerIdentity, ServiceError> {
        self.handshake("issuer_id", "issuer id")?;
        Ok(FIXTURE_ISSUER_ID.to_string())
    }

    async fn issuer_verifier(&self, attribute_id: &str) -> Result<VerificationKey, ServiceError> {
        self.handshake("issuer_verifier", "issuer verifier")?;
        Ok(Self::verifier_for(attribute_id))
    }

    async fn issue_credential(
        &self,
        attribute_id: &str,
        blind_request: &BlindSignatureRequest,
        hashed_mandatory: &SubmissionSet,
        hashed_optional: &SubmissionSet,
    ) -> Result<IssuerSignedCredential, ServiceError> {
        self.issue_calls.lock().unwrap().push(IssueCall {
            attribute_id: attribute_id.to_string(),
            blind_request: blind_request.clone(),
            hashed_mandatory: hashed_mandatory.clone(),
            hashed_optional: hashed_optional.clone(),
        });
        if let Some((status, message)) = &self.issue_rejection {
            return Err(ServiceError::Rejected {
                operation: "credential issuance",
                status: *status,
                message: message.clone(),
            });
        }
        Ok(Self::signed_for(attribute_id))
    }

    async fn stats(&self) -> Result<IssuerStats, ServiceError> {
        Ok(IssuerStats { total: 7 })
    }
}

/// Hands out the same [`FixtureIssuer`] for every valid URL, remembering the
/// URLs. Invalid URLs are refused the way the HTTP connector refuses them.
pub(crate) struct FixtureConnector {
    issuer: Arc<FixtureIssuer>,
    urls: Mutex<Vec<String>>,
}

impl FixtureConnector {
    pub fn new(issuer: Arc<FixtureIssuer>) -> Self {
        Self {
            issuer,
            urls: Mutex::new(Vec::new()),
        }
    }

    pub fn urls(&self) -> Vec<String> {
        self.urls.lock().unwrap().clone()
    }
}

impl IssuerConnector for FixtureConnector {
    fn connect(&self, issuer_url: &str) -> Result<Arc<dyn CredentialIssuerApi>, ServiceError> {
        self.urls.lock().unwrap().push(issuer_url.to_string());
        normalize_base_url(issuer_url)?;
        Ok(self.issuer.clone())
    }
}
