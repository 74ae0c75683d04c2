#![allow(dead_code)]

use edge_provisioner::application::services::{AuthService, ProvisioningService, StatsService};
use edge_provisioner::domain::entities::CertificatePaths;
use edge_provisioner::domain::server_block::ServerBlockSettings;
use edge_provisioner::infrastructure::filesystem::{FsDomainRepository, FsPortRepository};
use edge_provisioner::infrastructure::process::{CertbotIssuer, NginxControl};
use edge_provisioner::infrastructure::system::SysinfoProbe;
use edge_provisioner::state::AppState;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

pub const TEST_API_KEY: &str = "test-api-key-0123456789";

/// A throwaway nginx configuration tree.
///
/// ```text
/// <tmp>/domains/        one server block per domain
/// <tmp>/listen.conf     shared listen directives
/// <tmp>/acme/           challenge webroot
/// <tmp>/live/           issued certificates
/// <tmp>/reloads         one line per successful reload
/// ```
pub struct Sandbox {
    pub dir: TempDir,
    pub domains_dir: PathBuf,
    pub listen_file: PathBuf,
    pub webroot: PathBuf,
    pub live_dir: PathBuf,
    pub reload_log: PathBuf,
}

impl Sandbox {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let domains_dir = dir.path().join("domains");
        let webroot = dir.path().join("acme");
        let live_dir = dir.path().join("live");
        std::fs::create_dir_all(&domains_dir).unwrap();
        std::fs::create_dir_all(&webroot).unwrap();
        std::fs::create_dir_all(&live_dir).unwrap();

        Self {
            listen_file: dir.path().join("listen.conf"),
            reload_log: dir.path().join("reloads"),
            domains_dir,
            webroot,
            live_dir,
            dir,
        }
    }

    pub fn with_listen(self, text: &str) -> Self {
        std::fs::write(&self.listen_file, text).unwrap();
        self
    }

    pub fn blocks(&self) -> ServerBlockSettings {
        ServerBlockSettings {
            listen_include: self.listen_file.clone(),
            acme_webroot: self.webroot.clone(),
            bootstrap_certificate: CertificatePaths {
                certificate: self.dir.path().join("bootstrap/cert.pem"),
                private_key: self.dir.path().join("bootstrap/key.pem"),
            },
        }
    }

    /// Server whose reloads succeed and are counted in `reload_log`.
    pub fn server(&self) -> NginxControl {
        self.server_with_reload(&format!("echo reload >> '{}'", self.reload_log.display()))
    }

    /// Server whose reload runs `script`; `systemctl is-active` answers `active`.
    pub fn server_with_reload(&self, script: &str) -> NginxControl {
        NginxControl::new(
            sh(script),
            sh_with_args("echo active"),
            "nginx",
            Duration::from_secs(5),
        )
    }

    /// Certificate tool running `script`; the tool's own arguments follow as `$@`.
    pub fn issuer(&self, script: &str) -> CertbotIssuer {
        CertbotIssuer::new(
            sh_with_args(script),
            &self.webroot,
            &self.live_dir,
            Duration::from_secs(5),
        )
    }

    pub fn provisioning(&self, server: NginxControl, issuer: CertbotIssuer) -> ProvisioningService {
        ProvisioningService::new(
            Arc::new(FsDomainRepository::new(&self.domains_dir)),
            Arc::new(FsPortRepository::new(&self.listen_file)),
            Arc::new(server),
            Arc::new(issuer),
            self.blocks(),
        )
    }

    pub fn state(&self, server: NginxControl, issuer: CertbotIssuer) -> AppState {
        let provisioning = Arc::new(self.provisioning(server, issuer));
        let stats = Arc::new(StatsService::new(
            Arc::new(FsDomainRepository::new(&self.domains_dir)),
            Arc::new(FsPortRepository::new(&self.listen_file)),
            Arc::new(SysinfoProbe::new(Duration::from_millis(20))),
        ));
        let auth = Arc::new(AuthService::new(TEST_API_KEY.to_string()).unwrap());

        AppState::new(provisioning, stats, auth)
    }

    pub fn listen_text(&self) -> String {
        std::fs::read_to_string(&self.listen_file).unwrap_or_default()
    }

    pub fn domain_config(&self, name: &str) -> PathBuf {
        self.domains_dir.join(format!("{name}.conf"))
    }

    pub fn reload_count(&self) -> usize {
        std::fs::read_to_string(&self.reload_log)
            .map(|log| log.lines().count())
            .unwrap_or(0)
    }
}

/// `sh -c <script>`.
pub fn sh(script: &str) -> Vec<String> {
    vec!["sh".to_string(), "-c".to_string(), script.to_string()]
}

/// `sh -c <script> stub`, so that appended arguments become `$1`, `$2`, ...
pub fn sh_with_args(script: &str) -> Vec<String> {
    let mut argv = sh(script);
    argv.push("stub".to_string());
    argv
}
