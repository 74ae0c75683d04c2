//! Core domain entities describing provisioned state.
//!
//! Entities are plain data structures. Presence of a domain or a port is defined
//! by the configuration files themselves; these types only describe them.
//!
//! # Entity Types
//!
//! - [`DomainRecord`] - A domain routed to a backend through its own server block
//! - [`ListenPort`] - A validated port number backing one `listen <port>;` line
//! - [`StatsSnapshot`] - Host and configuration counters sampled at one moment

pub mod domain_record;
pub mod listen_port;
pub mod stats;

pub use domain_record::{CertificatePaths, CertificateState, DomainRecord};
pub use listen_port::ListenPort;
pub use stats::{HostSample, StatsSnapshot};
