// src/lib.rs

//! # DDDC Wallet
//!
//! Obtains privacy-preserving, attribute-bound credentials from a remote
//! issuer without revealing raw attribute values, and keeps the resulting
//! proofs of possession for later presentation.
//!
//! ## Architecture Overview
//! 1. **Crypto Engine** (`zkp`): runs the blind-signature protocol scripts
//! 2. **Services** (`services`): credential issuer and petition clients, HTTP API
//! 3. **Wallet** (`wallet`): value hashing, issuance protocol, certificate store
//! 4. **State** (`state`): explicit state, actions and reducer observed by a front end

pub mod config;    // Layered runtime settings
pub mod models;    // Data structures
pub mod services;  // Remote collaborators and HTTP API
pub mod state;     // State container
pub mod utils;     // Helper functions
pub mod wallet;    // Issuance protocol
pub mod zkp;       // Crypto Engine integration
