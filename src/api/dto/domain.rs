//! DTOs for domain provisioning.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to provision a domain in front of a backend IP.
///
/// Only presence is checked here; the domain and IP rules are enforced by the
/// provisioning engine so the API and CLI reject the same inputs.
#[derive(Debug, Deserialize, Validate)]
pub struct AddDomainRequest {
    #[validate(length(min = 1, message = "domain is required"))]
    pub domain: String,

    #[validate(length(min = 1, message = "ip is required"))]
    pub ip: String,
}

/// Response containing provisioned domain names, sorted.
#[derive(Debug, Serialize)]
pub struct DomainListResponse {
    pub ok: bool,
    pub domains: Vec<String>,
}
