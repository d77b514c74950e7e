//! Unlock-gate primitives.
//!
//! - [`password`] -- Argon2id hashing and verification of the shared unlock password.
//! - [`jwt`] -- bearer-token generation and validation for unlocked clients.

pub mod jwt;
pub mod password;
