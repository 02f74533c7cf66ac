// src/models/petition.rs
//! Petition documents shown to the user before sharing attributes.

use serde::{Deserialize, Serialize};

/// A field the petition asks the user to fill in to verify eligibility
/// (e.g. a postal code or a census code).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct VerificationField {
    pub id: String,

    #[serde(default)]
    pub name: String,
}

/// Descriptive petition document fetched from a petition source.
///
/// Replaced wholesale on every fetch and reset to [`Petition::empty`] when a
/// new fetch starts.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Petition {
    pub title: String,

    /// HTML fragment
    pub description: String,

    #[serde(default)]
    pub verification_codes: Vec<VerificationField>,
}

impl Petition {
    /// The placeholder shown while no petition has been loaded.
    pub fn empty() -> Self {
        Self {
            title: String::new(),
            description: "<p>".to_string(),
            verification_codes: Vec::new(),
        }
    }
}

impl Default for Petition {
    fn default() -> Self {
        Self::empty()
    }
}
