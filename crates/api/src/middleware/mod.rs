//! Request extractors guarding the API.
//!
//! - [`auth::Unlocked`] -- requires a valid unlock token in the `Authorization` header.

pub mod auth;
