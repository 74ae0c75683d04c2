//! External process gateway.
//!
//! Wraps the commands the provisioning engine depends on behind two traits:
//! - [`ServerControl`] - reload and service lifecycle of the web server
//! - [`CertificateIssuer`] - ACME certificate issuance
//!
//! Every invocation is bounded by a timeout and captures combined output for
//! error reporting.

mod certbot;
mod nginx;
pub mod runner;
mod service;

pub use certbot::CertbotIssuer;
pub use nginx::NginxControl;
pub use service::{CertificateIssuer, ServerControl};

#[cfg(test)]
pub use service::{MockCertificateIssuer, MockServerControl};
