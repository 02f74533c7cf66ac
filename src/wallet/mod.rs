// src/wallet/mod.rs
//! Citizen-side credential handling: hashing of submitted values, the
//! issuance protocol and the certificate store it fills.

pub mod credential_storage;
pub mod hashing;
pub mod issuance;

#[cfg(test)]
pub(crate) mod fixtures;

pub use credential_storage::CertificateStore;
pub use hashing::{hash_fields, HashingError};
pub use issuance::{CredentialOrchestrator, IssuanceError, IssuanceRequest, IssuanceStage};
