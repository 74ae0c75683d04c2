//! Domain entity representing a provisioned reverse-proxy route.

use serde::Serialize;
use std::net::IpAddr;
use std::path::{Path, PathBuf};

/// Whether a domain's server block references real TLS material yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CertificateState {
    /// Bootstrap block with placeholder certificate.
    None,
    Issued,
}

/// Location of an issued certificate chain and its private key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CertificatePaths {
    pub certificate: PathBuf,
    pub private_key: PathBuf,
}

impl CertificatePaths {
    /// Paths the ACME client uses under its `live` directory:
    /// `<live_dir>/<domain>/fullchain.pem` and `<live_dir>/<domain>/privkey.pem`.
    pub fn live(live_dir: &Path, domain: &str) -> Self {
        let dir = live_dir.join(domain);
        Self {
            certificate: dir.join("fullchain.pem"),
            private_key: dir.join("privkey.pem"),
        }
    }
}

/// A domain routed to a backend through its own server block.
///
/// The record exists exactly when `config_path` exists on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DomainRecord {
    pub name: String,
    pub target: IpAddr,
    pub certificate: CertificateState,
    pub config_path: PathBuf,
}

impl DomainRecord {
    pub fn new(
        name: String,
        target: IpAddr,
        certificate: CertificateState,
        config_path: PathBuf,
    ) -> Self {
        Self {
            name,
            target,
            certificate,
            config_path,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_live_certificate_paths() {
        let paths = CertificatePaths::live(Path::new("/etc/letsencrypt/live"), "example.com");

        assert_eq!(
            paths.certificate,
            PathBuf::from("/etc/letsencrypt/live/example.com/fullchain.pem")
        );
        assert_eq!(
            paths.private_key,
            PathBuf::from("/etc/letsencrypt/live/example.com/privkey.pem")
        );
    }

    #[test]
    fn test_record_serializes_certificate_state() {
        let record = DomainRecord::new(
            "example.com".to_string(),
            "10.0.0.5".parse().unwrap(),
            CertificateState::Issued,
            PathBuf::from("/etc/nginx/conf.d/domains/example.com.conf"),
        );

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["certificate"], "issued");
        assert_eq!(json["target"], "10.0.0.5");
    }
}
