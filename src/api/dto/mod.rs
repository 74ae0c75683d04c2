//! Data Transfer Objects for API requests and responses.
//!
//! All DTOs use Serde for JSON serialization/deserialization and validator
//! for input validation. Every body carries an `ok` flag.

pub mod domain;
pub mod health;
pub mod port;
pub mod response;
pub mod stats;
