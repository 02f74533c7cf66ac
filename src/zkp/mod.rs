// src/zkp/mod.rs
//! Zero-knowledge / blind-signature engine integration.
//!
//! The mathematics of the credential scheme live inside an external engine
//! that runs named protocol scripts. This module defines the capability the
//! wallet consumes ([`CryptoEngine`]), the scripts it runs ([`Script`]) and a
//! concrete engine backed by the `zenroom` command line VM ([`ZenroomCli`]).

pub mod engine;
pub mod zenroom;

pub use engine::{CryptoEngine, EngineError, Script};
pub use zenroom::ZenroomCli;
