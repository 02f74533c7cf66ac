// src/models/session.rs
//! Session identifiers scoping a single issuance attempt.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Opaque token binding every Crypto Engine call of one issuance attempt.
///
/// A fresh identifier is generated per attempt and dropped with it; retrying
/// an attempt always means generating a new one.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Generates a new random (v4) session identifier.
    ///
    /// Collisions across the lifetime of the process are negligible (122 random bits).
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}
