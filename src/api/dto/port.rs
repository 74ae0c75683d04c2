//! DTOs for listen port management.

use serde::{Deserialize, Serialize};
use std::fmt;
use validator::{Validate, ValidationError};

use crate::domain::entities::ListenPort;

/// Port as sent by clients: `"8443"` and `8443` are both accepted.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum PortValue {
    Number(u64),
    Text(String),
}

impl fmt::Display for PortValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

fn validate_port_present(value: &PortValue) -> Result<(), ValidationError> {
    match value {
        PortValue::Text(s) if s.is_empty() => {
            Err(ValidationError::new("required").with_message("port is required".into()))
        }
        _ => Ok(()),
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct AddPortRequest {
    #[validate(custom(function = "validate_port_present"))]
    pub port: PortValue,
}

/// Response containing managed listen ports in file order.
#[derive(Debug, Serialize)]
pub struct PortListResponse {
    pub ok: bool,
    pub ports: Vec<ListenPort>,
}
