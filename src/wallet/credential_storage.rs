// src/wallet/credential_storage.rs
//! Certificate storage for the wallet.
//!
//! Holds the credential records obtained through successful issuance
//! attempts, keyed by attribute identifier (e.g. `"age"`, `"gender"`). The
//! store itself is a plain value; sharing and mutation go through the
//! [`Store`](crate::state::Store), which only writes it from a successful
//! issuance outcome.

use crate::models::CertificateRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// In-memory map from attribute identifier to certificate record.
///
/// # Behavior
/// - Inserting under an existing attribute replaces the whole record
/// - Records are never merged field by field
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(transparent)]
pub struct CertificateStore {
    certificates: BTreeMap<String, CertificateRecord>,
}

impl CertificateStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `record` under `attribute_id`.
    ///
    /// # Returns
    /// The record previously held for that attribute, if any
    pub fn insert(
        &mut self,
        attribute_id: impl Into<String>,
        record: CertificateRecord,
    ) -> Option<CertificateRecord> {
        self.certificates.insert(attribute_id.into(), record)
    }

    /// Retrieves the record for an attribute.
    pub fn get(&self, attribute_id: &str) -> Option<&CertificateRecord> {
        self.certificates.get(attribute_id)
    }

    /// Checks if a record exists for an attribute without retrieving it.
    pub fn contains(&self, attribute_id: &str) -> bool {
        self.certificates.contains_key(attribute_id)
    }

    /// Removes the record for an attribute.
    ///
    /// # Returns
    /// `true` if a record was present and removed
    pub fn remove(&mut self, attribute_id: &str) -> bool {
        self.certificates.remove(attribute_id).is_some()
    }

    pub fn len(&self) -> usize {
        self.certificates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.certificates.is_empty()
    }

    /// Iterates `(attribute_id, record)` pairs in attribute order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CertificateRecord)> {
        self.certificates.iter().map(|(k, v)| (k.as_str(), v))
    }
}
