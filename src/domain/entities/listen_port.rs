//! Validated listen port.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::domain::errors::ProvisionError;
use crate::utils::validation::parse_port;

/// A port in `1..=65535`, stored as one `listen <port>;` directive line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ListenPort(u16);

impl ListenPort {
    /// Returns `None` for port 0.
    pub fn new(port: u16) -> Option<Self> {
        (port != 0).then_some(Self(port))
    }

    pub fn get(self) -> u16 {
        self.0
    }

    /// The exact directive line managed in the shared listen file.
    pub fn directive(self) -> String {
        format!("listen {};", self.0)
    }
}

impl FromStr for ListenPort {
    type Err = ProvisionError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        parse_port(value)
            .map(Self)
            .ok_or_else(|| ProvisionError::invalid(format!("Invalid port format: {value:?}")))
    }
}

impl fmt::Display for ListenPort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
