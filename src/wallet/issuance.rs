// src/wallet/issuance.rs
//! Credential issuance protocol.
//!
//! Turns raw attribute values into a blindly signed credential and a proof of
//! possession, talking to the local Crypto Engine and to a remote issuer:
//!
//! 1. **Keygen**: hash the submitted values and generate the citizen keypair
//! 2. **Blind request**: build the blind signature request from the keypair
//! 3. **Issuer handshake**: fetch the issuer identity and its verification key
//! 4. **Issue**: send the request and the hashed values to the issuer
//! 5. **Aggregate**: combine the issuer's signature into a credential
//! 6. **Prove**: derive the presentable proof of the credential
//! 7. **Success**: store the certificate record under the attribute id
//!
//! Each step consumes the previous step's output, so steps never overlap.
//! Any error aborts the attempt: nothing is retried and nothing partial is
//! stored. Retrying means starting a new attempt with a new session.

use crate::models::{
    BlindSignatureRequest, CertificateRecord, Keypair, SessionId, SubmissionSet,
};
use crate::services::{IssuerConnector, ServiceError};
use crate::state::{Action, Store};
use crate::utils::serialization::{is_structured, parse_structured};
use crate::wallet::hashing::{hash_fields, HashingError};
use crate::zkp::{CryptoEngine, EngineError, Script};
use futures::TryFutureExt;
use log::{debug, info, warn};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Position of an attempt in the protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssuanceStage {
    Idle,
    Keygen,
    BlindRequest,
    IssuerHandshake,
    Issue,
    Aggregate,
    Prove,
    Success,
    Failure,
}

impl fmt::Display for IssuanceStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IssuanceStage::Idle => "IDLE",
            IssuanceStage::Keygen => "KEYGEN",
            IssuanceStage::BlindRequest => "BLIND_REQUEST",
            IssuanceStage::IssuerHandshake => "ISSUER_HANDSHAKE",
            IssuanceStage::Issue => "ISSUE",
            IssuanceStage::Aggregate => "AGGREGATE",
            IssuanceStage::Prove => "PROVE",
            IssuanceStage::Success => "SUCCESS",
            IssuanceStage::Failure => "FAILURE",
        };
        f.write_str(name)
    }
}

/// Why an attempt ended in failure.
///
/// The display string is the reason shown to the user.
#[derive(Debug, Error)]
pub enum IssuanceError {
    #[error("invalid keygen output")]
    InvalidKeygenOutput,

    #[error("invalid blind-request output")]
    InvalidBlindRequestOutput,

    #[error(transparent)]
    Hashing(#[from] HashingError),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Service(#[from] ServiceError),
}

/// Inputs of one issuance attempt.
#[derive(Debug, Clone)]
pub struct IssuanceRequest {
    /// Values the issuer requires for this attribute
    pub mandatory: SubmissionSet,

    /// Values the user chose to share in addition
    pub optional: SubmissionSet,

    /// Base URL of the credential issuer
    pub issuer_url: String,

    /// Attribute the credential is for (e.g. `"age"`)
    pub attribute_id: String,
}

/// Transient bookkeeping of one attempt; never outlives it.
struct Attempt {
    session: SessionId,
    stage: IssuanceStage,
}

impl Attempt {
    fn new() -> Self {
        Self {
            session: SessionId::generate(),
            stage: IssuanceStage::Idle,
        }
    }

    fn enter(&mut self, next: IssuanceStage) {
        debug!("attempt {}: {} -> {}", self.session, self.stage, next);
        self.stage = next;
    }
}

/// Runs issuance attempts and reports their outcome through the [`Store`].
///
/// Attempts share nothing but the store, so any number of them may run
/// concurrently for different attributes.
#[derive(Clone)]
pub struct CredentialOrchestrator {
    engine: Arc<dyn CryptoEngine>,
    issuers: Arc<dyn IssuerConnector>,
    store: Arc<Store>,
}

impl CredentialOrchestrator {
    /// # Arguments
    /// * `engine` - Crypto Engine running the protocol scripts
    /// * `issuers` - Resolves each attempt's issuer URL into a client
    /// * `store` - State container receiving the attempt notifications
    pub fn new(
        engine: Arc<dyn CryptoEngine>,
        issuers: Arc<dyn IssuerConnector>,
        store: Arc<Store>,
    ) -> Self {
        Self {
            engine,
            issuers,
            store,
        }
    }

    pub fn store(&self) -> &Arc<Store> {
        &self.store
    }

    /// Runs a complete issuance attempt.
    ///
    /// Dispatches [`Action::IssueCredentialRequest`] when the attempt starts,
    /// then exactly one of [`Action::IssueCredentialSuccess`] (which stores
    /// the record) or [`Action::IssueCredentialFailure`].
    ///
    /// # Returns
    /// The stored certificate record, or the error whose message was reported
    pub async fn issue(&self, request: IssuanceRequest) -> Result<CertificateRecord, IssuanceError> {
        let mut attempt = Attempt::new();
        info!(
            "issuance attempt {} for '{}' via {}",
            attempt.session, request.attribute_id, request.issuer_url
        );

        attempt.enter(IssuanceStage::Keygen);
        self.store.dispatch(Action::IssueCredentialRequest);

        match self.run(&request, &mut attempt).await {
            Ok(record) => {
                attempt.enter(IssuanceStage::Success);
                info!(
                    "attempt {} issued a credential for '{}'",
                    attempt.session, request.attribute_id
                );
                self.store.dispatch(Action::IssueCredentialSuccess {
                    attribute_id: request.attribute_id.clone(),
                    record: record.clone(),
                });
                Ok(record)
            }
            Err(e) => {
                warn!(
                    "attempt {} for '{}' failed during {}: {}",
                    attempt.session, request.attribute_id, attempt.stage, e
                );
                attempt.enter(IssuanceStage::Failure);
                self.store.dispatch(Action::IssueCredentialFailure {
                    error: e.to_string(),
                });
                Err(e)
            }
        }
    }

    async fn run(
        &self,
        request: &IssuanceRequest,
        attempt: &mut Attempt,
    ) -> Result<CertificateRecord, IssuanceError> {
        let session = attempt.session;
        let engine = self.engine.as_ref();

        // Hashing does not depend on the keypair; run all three together.
        let keygen = Script::Keygen { session };
        let (hashed_mandatory, hashed_optional, keygen_output) = futures::try_join!(
            hash_fields(engine, &request.mandatory).map_err(IssuanceError::from),
            hash_fields(engine, &request.optional).map_err(IssuanceError::from),
            engine.execute(&keygen, "", "").map_err(IssuanceError::from),
        )?;
        if !is_structured(&keygen_output) {
            return Err(IssuanceError::InvalidKeygenOutput);
        }
        let keypair = Keypair::new(keygen_output);

        attempt.enter(IssuanceStage::BlindRequest);
        let raw_request = engine
            .execute(&Script::BlindRequest { session }, "", keypair.as_str())
            .await?;
        let blind_request: BlindSignatureRequest =
            parse_structured(&raw_request).ok_or(IssuanceError::InvalidBlindRequestOutput)?;

        attempt.enter(IssuanceStage::IssuerHandshake);
        let issuer = self.issuers.connect(&request.issuer_url)?;
        let issuer_id = issuer.issuer_id().await?;
        let verification_key = issuer.issuer_verifier(&request.attribute_id).await?;

        attempt.enter(IssuanceStage::Issue);
        let signed = issuer
            .issue_credential(
                &request.attribute_id,
                &blind_request,
                &hashed_mandatory,
                &hashed_optional,
            )
            .await?;

        attempt.enter(IssuanceStage::Aggregate);
        let aggregate = Script::Aggregate {
            session,
            issuer: issuer_id.clone(),
        };
        let credential = engine
            .execute(&aggregate, &signed.to_string(), keypair.as_str())
            .await?;

        attempt.enter(IssuanceStage::Prove);
        let prove = Script::Prove {
            session,
            issuer: issuer_id.clone(),
        };
        let blind_proof_credential = engine
            .execute(&prove, &verification_key.to_string(), &credential)
            .await?;

        Ok(CertificateRecord {
            issuer_id,
            issuer_verify_keypair: verification_key,
            credential,
            blind_proof_credential,
        })
    }
}
