//! Utility functions shared by the engine, the API and the CLI.
//!
//! - [`validation`] - Domain, IP and port syntax checks

pub mod validation;
