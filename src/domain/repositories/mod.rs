//! Repository trait definitions for the domain layer.
//!
//! These traits abstract the on-disk configuration store. The provisioning
//! engine is their only writer.
//!
//! # Architecture
//!
//! - Traits define the contract for configuration storage
//! - Implementations live in `crate::infrastructure::filesystem`
//! - Mock implementations are auto-generated via `mockall` for testing
//!
//! # Available Repositories
//!
//! - [`DomainRepository`] - One server block file per domain
//! - [`PortRepository`] - Listen directives in the shared listen file
//!
//! # Testing
//!
//! See integration tests in `tests/repository_*.rs` for usage examples.

pub mod domain_repository;
pub mod port_repository;

pub use domain_repository::DomainRepository;
pub use port_repository::PortRepository;

#[cfg(test)]
pub use domain_repository::MockDomainRepository;
#[cfg(test)]
pub use port_repository::MockPortRepository;
