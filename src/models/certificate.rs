// src/models/certificate.rs
//! Credential artefacts exchanged during issuance and the final certificate record.
//!
//! Most intermediate values are opaque to the wallet: they are produced by the
//! Crypto Engine or by the issuer and only ever handed back to one of them.
//! The wallet keeps them as JSON values or raw text accordingly.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Identity token of the issuing authority, fetched once per attempt.
pub type IssuerIdentity = String;

/// Attribute-scoped public verification material published by the issuer.
pub type VerificationKey = Value;

/// Parsed output of the blind-request step, sent to the issuer as-is.
pub type BlindSignatureRequest = Value;

/// Issuer response to a blind signature request; only consumed by the aggregate step.
pub type IssuerSignedCredential = Value;

/// Citizen keypair produced by the keygen step.
///
/// The engine's output text is kept verbatim because later steps receive it
/// back as their keys input, byte for byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keypair(String);

impl Keypair {
    pub fn new(raw: String) -> Self {
        Self(raw)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A credential obtained through a complete issuance attempt.
///
/// Stored by attribute identifier. Records are only ever created by a
/// successful attempt and replaced wholesale when the same attribute is
/// issued again; they are never written partially.
///
/// # Serialization
/// Field names follow the front end's camelCase convention:
/// `issuerId`, `issuerVerifyKeypair`, `credential`, `blindProofCredential`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CertificateRecord {
    /// Identity of the authority that signed the credential
    pub issuer_id: IssuerIdentity,

    /// Verification key the issuer published for this attribute
    pub issuer_verify_keypair: VerificationKey,

    /// Aggregated credential signature (output of the aggregate step)
    pub credential: String,

    /// Presentable proof of possession (output of the prove step)
    pub blind_proof_credential: String,
}
