// src/models/submission.rs
//! Attribute submission sets.
//!
//! A submission set maps a field name to the value the user is willing to
//! disclose. The same type carries the hashed counterpart produced before the
//! values leave the device.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Ordered mapping from field name to attribute value.
///
/// Iteration order is the lexical order of the field names, so two sets built
/// from the same pairs always iterate identically regardless of insertion order.
///
/// # Serialization
/// Serialises as a flat JSON object: `{"age": "42", "gender": "F"}`.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct SubmissionSet {
    fields: BTreeMap<String, String>,
}

impl SubmissionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a field, replacing the previous value under the same name.
    ///
    /// # Returns
    /// The replaced value, if any
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.fields.insert(name.into(), value.into())
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Iterates `(name, value)` pairs in field-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for SubmissionSet
where
    K: Into<String>,
    V: Into<String>,
{
    /// Later pairs win when a field name repeats.
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
