//! Domain logic for the helpdesk service.
//!
//! Everything here is free of database and HTTP concerns so the repository
//! layer, the API handlers and the tests can share one set of rules.

pub mod asset;
pub mod attendance;
pub mod clock;
pub mod department;
pub mod error;
pub mod report;
pub mod search;
pub mod signature;
pub mod thai_date;
pub mod types;
pub mod work_no;
