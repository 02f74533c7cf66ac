// src/wallet/hashing.rs
//! Data hashing preprocessor.
//!
//! Attribute values never leave the device in the clear: before an issuance
//! request each value is one-way hashed through the Crypto Engine's hashing
//! script. Fields are independent of each other, so they are hashed
//! concurrently.

use crate::models::SubmissionSet;
use crate::zkp::{CryptoEngine, EngineError, Script};
use futures::future::try_join_all;
use thiserror::Error;

/// A single field could not be hashed; the whole set is discarded.
#[derive(Debug, Error)]
#[error("could not hash field '{field}': {source}")]
pub struct HashingError {
    pub field: String,
    #[source]
    pub source: EngineError,
}

/// Hashes every value of `fields`, keeping the field names.
///
/// # Returns
/// A set with exactly the same keys as `fields`, each mapped to the engine's
/// hash of the corresponding raw value
///
/// # Errors
/// The first field whose hash fails, as a [`HashingError`]. No partial set is
/// ever returned.
pub async fn hash_fields(
    engine: &dyn CryptoEngine,
    fields: &SubmissionSet,
) -> Result<SubmissionSet, HashingError> {
    let hashed = try_join_all(fields.iter().map(|(name, value)| async move {
        engine
            .execute(&Script::Hashing, value, "")
            .await
            .map(|digest| (name, digest))
            .map_err(|source| HashingError {
                field: name.to_string(),
                source,
            })
    }))
    .await?;

    Ok(hashed.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wallet::fixtures::FixtureEngine;

    fn fields() -> SubmissionSet {
        vec![("age", "42"), ("gender", "F"), ("zip", "08001")]
            .into_iter()
            .collect()
    }

    #[tokio::test]
    async fn test_keys_are_preserved() {
        let engine = FixtureEngine::new();

        let hashed = hash_fields(&engine, &fields()).await.unwrap();

        assert!(hashed.keys().eq(fields().keys()));
        assert_eq!(hashed.get("age"), Some("hash(42)"));
        assert_eq!(hashed.get("zip"), Some("hash(08001)"));
    }

    #[tokio::test]
    async fn test_hashing_is_deterministic_per_value() {
        let engine = FixtureEngine::new();

        let first = hash_fields(&engine, &fields()).await.unwrap();
        let second = hash_fields(&engine, &fields()).await.unwrap();

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_each_value_hashed_alone_without_keys() {
        let engine = FixtureEngine::new();

        hash_fields(&engine, &fields()).await.unwrap();

        let calls = engine.calls();
        assert_eq!(calls.len(), 3);
        assert!(calls
            .iter()
            .all(|c| c.script == Script::Hashing && c.keys.is_empty()));
    }

    #[tokio::test]
    async fn test_empty_set_hashes_to_empty_set() {
        let engine = FixtureEngine::new();

        let hashed = hash_fields(&engine, &SubmissionSet::new()).await.unwrap();

        assert!(hashed.is_empty());
        assert!(engine.calls().is_empty());
    }

    #[tokio::test]
    async fn test_one_failing_field_fails_the_set() {
        let engine = FixtureEngine::new().failing_hash_of("F");

        let err = hash_fields(&engine, &fields()).await.unwrap_err();

        assert_eq!(err.field, "gender");
    }
}
