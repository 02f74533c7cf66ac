// src/state/reducer.rs
//! Pure state transitions.

use crate::models::Petition;
use crate::state::{Action, VerificationCodeMap, WalletState};

/// Applies `action` to `state` and returns the next state.
///
/// Failures never touch the certificate store: only
/// [`Action::IssueCredentialSuccess`] writes to it, replacing the record for
/// its attribute wholesale.
pub fn reduce(mut state: WalletState, action: Action) -> WalletState {
    match action {
        Action::FetchPetitionRequest { .. } => {
            state.loading = true;
            state.petition = Petition::empty();
            state.verification = VerificationCodeMap::new();
            state.error = None;
        }
        Action::FetchPetitionSuccess { petition } => {
            state.loading = false;
            state.petition = petition;
        }
        Action::FetchPetitionFailure { error } => {
            state.loading = false;
            state.error = Some(error);
        }
        Action::UpdateVerificationCode { id, value } => {
            state.verification.insert(id, value);
        }
        Action::IssueCredentialRequest => {
            state.loading = true;
            state.error = None;
        }
        Action::IssueCredentialSuccess {
            attribute_id,
            record,
        } => {
            state.loading = false;
            state.certificates.insert(attribute_id, record);
            state.error = None;
        }
        Action::IssueCredentialFailure { error } => {
            state.loading = false;
            state.error = Some(error);
        }
    }
    state
}
