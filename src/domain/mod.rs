//! Domain layer containing provisioning entities and rules.
//!
//! Nothing in this layer touches the file system or spawns processes; it
//! defines the data model, the failure taxonomy and the storage contracts that
//! the infrastructure layer implements.
//!
//! # Architecture
//!
//! - [`entities`] - Domain records, listen ports and statistics snapshots
//! - [`errors`] - Failure kinds, operation steps and rollback context
//! - [`listen_file`] - Structured editing of the shared listen file
//! - [`server_block`] - Bootstrap and proxy server block templates
//! - [`repositories`] - Configuration store trait definitions
//!
//! # Design Principles
//!
//! - Domain layer has no dependencies on infrastructure or presentation layers
//! - Repository traits define contracts implemented by infrastructure layer
//! - Orchestration lives in services (see [`crate::application::services`])

pub mod entities;
pub mod errors;
pub mod listen_file;
pub mod repositories;
pub mod server_block;
