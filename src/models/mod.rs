// src/models/mod.rs
//! Data structures shared by the issuance protocol, the state container and the API.

pub mod certificate;
pub mod petition;
pub mod session;
pub mod submission;

pub use certificate::{
    BlindSignatureRequest, CertificateRecord, IssuerIdentity, IssuerSignedCredential, Keypair,
    VerificationKey,
};
pub use petition::{Petition, VerificationField};
pub use session::SessionId;
pub use submission::SubmissionSet;
