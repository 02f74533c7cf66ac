// src/zkp/engine.rs
//! Crypto Engine capability.
//!
//! The engine executes a protocol script against up to two textual inputs,
//! conventionally called *data* and *keys*, and returns the script's textual
//! output. The wallet never interprets the cryptography; it only sequences the
//! scripts and validates the shape of what comes back.

use crate::models::{IssuerIdentity, SessionId};
use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

const HASHING: &str = include_str!("scripts/50-misc-hashing.lua");
const KEYGEN: &str = include_str!("scripts/01-citizen-credential-keygen.zen");
const BLIND_REQUEST: &str = include_str!("scripts/02-citizen-credential-request.zen");
const AGGREGATE: &str = include_str!("scripts/06-citizen-aggregate-credential-signature.zen");
const PROVE: &str = include_str!("scripts/07-citizen-prove-credential.zen");

/// A protocol script, parameterized by the identifiers it is bound to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Script {
    /// One-way hash of a single attribute value (data = raw value, no keys)
    Hashing,
    /// Step 1: citizen keypair generation
    Keygen { session: SessionId },
    /// Step 2: blind signature request (keys = keypair)
    BlindRequest { session: SessionId },
    /// Step 3: aggregate the issuer's signature (data = signed credential, keys = keypair)
    Aggregate {
        session: SessionId,
        issuer: IssuerIdentity,
    },
    /// Step 4: proof of credential (data = verification key, keys = credential)
    Prove {
        session: SessionId,
        issuer: IssuerIdentity,
    },
}

impl Script {
    /// Stable step name, used in logs and error messages.
    pub fn name(&self) -> &'static str {
        match self {
            Script::Hashing => "hashing",
            Script::Keygen { .. } => "keygen",
            Script::BlindRequest { .. } => "blind-request",
            Script::Aggregate { .. } => "aggregate",
            Script::Prove { .. } => "prove",
        }
    }

    /// Whether the script is written in Zencode (as opposed to plain Lua).
    pub fn is_zencode(&self) -> bool {
        !matches!(self, Script::Hashing)
    }

    /// Session the script is bound to, if any.
    pub fn session(&self) -> Option<SessionId> {
        match self {
            Script::Hashing => None,
            Script::Keygen { session }
            | Script::BlindRequest { session }
            | Script::Aggregate { session, .. }
            | Script::Prove { session, .. } => Some(*session),
        }
    }

    /// Produces the script source with its identifiers substituted.
    ///
    /// # Errors
    /// [`EngineError::Output`] if the issuer identity cannot be quoted inside
    /// a Zencode statement (it contains `'` or a control character)
    pub fn render(&self) -> Result<String, EngineError> {
        Ok(match self {
            Script::Hashing => HASHING.to_string(),
            Script::Keygen { session } => fill(KEYGEN, session, None),
            Script::BlindRequest { session } => fill(BLIND_REQUEST, session, None),
            Script::Aggregate { session, issuer } => {
                fill(AGGREGATE, session, Some(self.quotable(issuer)?))
            }
            Script::Prove { session, issuer } => fill(PROVE, session, Some(self.quotable(issuer)?)),
        })
    }

    fn quotable<'a>(&self, issuer: &'a str) -> Result<&'a str, EngineError> {
        if issuer.chars().any(|c| c == '\'' || c.is_control()) {
            return Err(EngineError::Output {
                script: self.name(),
                reason: format!("issuer identity {:?} cannot be quoted", issuer),
            });
        }
        Ok(issuer)
    }
}

impl fmt::Display for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn fill(template: &str, session: &SessionId, issuer: Option<&str>) -> String {
    let script = template.replace("{{session}}", &session.to_string());
    match issuer {
        Some(issuer) => script.replace("{{issuer}}", issuer),
        None => script,
    }
}

/// Failures of the engine itself, as opposed to well-formed but invalid output.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("crypto engine could not be started: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("crypto engine input could not be prepared: {0}")]
    Io(#[from] std::io::Error),

    #[error("{script} script failed ({status}): {stderr}")]
    Execution {
        script: &'static str,
        status: String,
        stderr: String,
    },

    #[error("{script} script produced unusable output: {reason}")]
    Output {
        script: &'static str,
        reason: String,
    },
}

/// Executor of named protocol scripts.
///
/// Implementations must be shareable across concurrent issuance attempts.
#[async_trait]
pub trait CryptoEngine: Send + Sync {
    /// Runs `script` with `data` as primary input and `keys` as secondary input.
    ///
    /// Empty strings mean "no input".
    async fn execute(&self, script: &Script, data: &str, keys: &str) -> Result<String, EngineError>;
}
