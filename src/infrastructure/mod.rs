//! Infrastructure layer for external integrations.
//!
//! This layer implements interfaces defined by the domain layer, providing
//! concrete implementations over the nginx configuration tree, external
//! commands and the host's counters.
//!
//! # Modules
//!
//! - [`filesystem`] - File-backed configuration store
//! - [`process`] - Web server control and certificate issuance
//! - [`system`] - Host statistics sampling

pub mod filesystem;
pub mod process;
pub mod system;
