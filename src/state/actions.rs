// src/state/actions.rs
//! Events that drive [`WalletState`](super::WalletState) transitions.

use crate::models::{CertificateRecord, Petition};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    FetchPetitionRequest { url: String, id: String },
    FetchPetitionSuccess { petition: Petition },
    FetchPetitionFailure { error: String },

    UpdateVerificationCode { id: String, value: String },

    /// An issuance attempt started
    IssueCredentialRequest,
    /// An issuance attempt completed; carries the full record
    IssueCredentialSuccess {
        attribute_id: String,
        record: CertificateRecord,
    },
    /// An issuance attempt aborted; `error` is shown to the user verbatim
    IssueCredentialFailure { error: String },
}

/// Records the value the user entered for a petition verification field.
pub fn update_verification_code(id: impl Into<String>, value: impl Into<String>) -> Action {
    Action::UpdateVerificationCode {
        id: id.into(),
        value: value.into(),
    }
}
