// src/state/mod.rs
//! Explicit application state for the petition and credential flows.
//!
//! State changes only through [`Action`]s applied by the pure [`reduce`]
//! function. The [`Store`] owns the current state, applies dispatched actions
//! and rebroadcasts them to anyone observing the wallet (e.g. a UI).

pub mod actions;
pub mod reducer;
pub mod selectors;
pub mod store;

use crate::models::Petition;
use crate::wallet::credential_storage::CertificateStore;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub use actions::{update_verification_code, Action};
pub use reducer::reduce;
pub use store::Store;

/// Petition verification field id -> value entered by the user.
pub type VerificationCodeMap = BTreeMap<String, String>;

/// Snapshot of everything the wallet tracks for the petition flow.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct WalletState {
    /// A petition fetch or an issuance attempt is in flight
    pub loading: bool,

    /// Reason of the last failure, cleared when a new request starts
    pub error: Option<String>,

    pub certificates: CertificateStore,

    pub verification: VerificationCodeMap,

    pub petition: Petition,
}
