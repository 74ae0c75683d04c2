//! File-system repository implementations.
//!
//! Concrete implementations of the configuration store traits over the nginx
//! configuration tree.
//!
//! # Repositories
//!
//! - [`FsDomainRepository`] - One server block file per domain
//! - [`FsPortRepository`] - Shared listen directive file

mod atomic;
pub mod fs_domain_repository;
pub mod fs_port_repository;

pub use atomic::write_atomic;
pub use fs_domain_repository::FsDomainRepository;
pub use fs_port_repository::FsPortRepository;
