// src/state/selectors.rs
//! Read accessors over [`WalletState`], meant for [`Store::select`](super::Store::select).

use crate::models::{CertificateRecord, Petition};
use crate::state::{VerificationCodeMap, WalletState};
use crate::wallet::credential_storage::CertificateStore;

pub fn petition(state: &WalletState) -> &Petition {
    &state.petition
}

pub fn loading(state: &WalletState) -> bool {
    state.loading
}

pub fn error(state: &WalletState) -> Option<&str> {
    state.error.as_deref()
}

pub fn verification(state: &WalletState) -> &VerificationCodeMap {
    &state.verification
}

pub fn certificates(state: &WalletState) -> &CertificateStore {
    &state.certificates
}

pub fn certificate<'a>(state: &'a WalletState, attribute_id: &str) -> Option<&'a CertificateRecord> {
    state.certificates.get(attribute_id)
}
