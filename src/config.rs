//! Application configuration loaded from environment variables.
//!
//! Configuration is loaded once at startup and validated before use. Both the
//! API server and `edgectl` read the same variables; only the server needs
//! `API_KEY`.
//!
//! ## Server
//!
//! - `LISTEN` - Bind address (default: `0.0.0.0:8080`)
//! - `API_KEY` - Shared Bearer secret (required by the server)
//! - `RUST_LOG` - Log level (default: `info`)
//! - `LOG_FORMAT` - Log format: `text` or `json` (default: `text`)
//!
//! ## Provisioning
//!
//! - `NGINX_DOMAINS_DIR` - Per-domain server blocks (default: `/etc/nginx/conf.d/domains`)
//! - `NGINX_LISTEN_FILE` - Shared listen directives (default: `/etc/nginx/conf.d/listen.conf`)
//! - `ACME_WEBROOT` - Challenge webroot (default: `/var/www/html`)
//! - `BOOTSTRAP_CERT` / `BOOTSTRAP_KEY` - Placeholder TLS material
//!   (default: `/etc/nginx/ssl/dummy.crt` / `/etc/nginx/ssl/dummy.key`)
//! - `LETSENCRYPT_LIVE_DIR` - Issued certificates (default: `/etc/letsencrypt/live`)
//! - `NGINX_RELOAD_CMD` - Reload command line (default: `nginx -s reload`)
//! - `SERVICE_CTL_CMD` - Service manager (default: `systemctl`)
//! - `NGINX_SERVICE` - Unit name (default: `nginx`)
//! - `CERTBOT_CMD` - Certificate tool (default: `certbot`)
//! - `ACME_EMAIL` - ACME contact (default: `admin@<domain>`)
//! - `COMMAND_TIMEOUT_SECS` - Bound for nginx and service calls (default: 30)
//! - `CERTBOT_TIMEOUT_SECS` - Bound for one issuance (default: 300)
//! - `STATS_SAMPLE_MS` - Throughput sampling window (default: 1000)

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::domain::entities::CertificatePaths;
use crate::domain::server_block::ServerBlockSettings;
use crate::infrastructure::process::runner::split_command;

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: String,
    /// Shared Bearer secret. Loaded from `API_KEY`; only the server requires it.
    pub api_key: Option<String>,
    pub log_level: String,
    pub log_format: String,
    pub provisioner: ProvisionerConfig,
}

/// Paths, commands and time bounds of the provisioning engine.
#[derive(Debug, Clone)]
pub struct ProvisionerConfig {
    pub domains_dir: PathBuf,
    pub listen_file: PathBuf,
    pub acme_webroot: PathBuf,
    pub bootstrap_cert: PathBuf,
    pub bootstrap_key: PathBuf,
    pub letsencrypt_live_dir: PathBuf,
    pub reload_command: Vec<String>,
    pub service_ctl: Vec<String>,
    pub service_name: String,
    pub certbot_command: Vec<String>,
    /// `None` means `admin@<domain>` per request.
    pub acme_email: Option<String>,
    pub command_timeout: Duration,
    pub certbot_timeout: Duration,
    pub stats_sample: Duration,
}

impl Default for ProvisionerConfig {
    fn default() -> Self {
        Self {
            domains_dir: PathBuf::from("/etc/nginx/conf.d/domains"),
            listen_file: PathBuf::from("/etc/nginx/conf.d/listen.conf"),
            acme_webroot: PathBuf::from("/var/www/html"),
            bootstrap_cert: PathBuf::from("/etc/nginx/ssl/dummy.crt"),
            bootstrap_key: PathBuf::from("/etc/nginx/ssl/dummy.key"),
            letsencrypt_live_dir: PathBuf::from("/etc/letsencrypt/live"),
            reload_command: split_command("nginx -s reload"),
            service_ctl: split_command("systemctl"),
            service_name: "nginx".to_string(),
            certbot_command: split_command("certbot"),
            acme_email: None,
            command_timeout: Duration::from_secs(30),
            certbot_timeout: Duration::from_secs(300),
            stats_sample: Duration::from_millis(1000),
        }
    }
}

impl ProvisionerConfig {
    /// Loads provisioning settings, falling back to the production layout.
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric variable is set but not a number.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        Ok(Self {
            domains_dir: env_path("NGINX_DOMAINS_DIR", defaults.domains_dir),
            listen_file: env_path("NGINX_LISTEN_FILE", defaults.listen_file),
            acme_webroot: env_path("ACME_WEBROOT", defaults.acme_webroot),
            bootstrap_cert: env_path("BOOTSTRAP_CERT", defaults.bootstrap_cert),
            bootstrap_key: env_path("BOOTSTRAP_KEY", defaults.bootstrap_key),
            letsencrypt_live_dir: env_path("LETSENCRYPT_LIVE_DIR", defaults.letsencrypt_live_dir),
            reload_command: env_command("NGINX_RELOAD_CMD", defaults.reload_command),
            service_ctl: env_command("SERVICE_CTL_CMD", defaults.service_ctl),
            service_name: env::var("NGINX_SERVICE").unwrap_or(defaults.service_name),
            certbot_command: env_command("CERTBOT_CMD", defaults.certbot_command),
            acme_email: env::var("ACME_EMAIL").ok().filter(|v| !v.trim().is_empty()),
            command_timeout: Duration::from_secs(env_number(
                "COMMAND_TIMEOUT_SECS",
                defaults.command_timeout.as_secs(),
            )?),
            certbot_timeout: Duration::from_secs(env_number(
                "CERTBOT_TIMEOUT_SECS",
                defaults.certbot_timeout.as_secs(),
            )?),
            stats_sample: Duration::from_millis(env_number(
                "STATS_SAMPLE_MS",
                defaults.stats_sample.as_millis() as u64,
            )?),
        })
    }

    /// # Errors
    ///
    /// Returns an error if a command is empty, a timeout is zero, the sampling
    /// window is outside `1..=60000` ms or the contact email has no `@`.
    pub fn validate(&self) -> Result<()> {
        if self.reload_command.is_empty() {
            anyhow::bail!("NGINX_RELOAD_CMD must not be empty");
        }
        if self.service_ctl.is_empty() {
            anyhow::bail!("SERVICE_CTL_CMD must not be empty");
        }
        if self.certbot_command.is_empty() {
            anyhow::bail!("CERTBOT_CMD must not be empty");
        }
        if self.service_name.trim().is_empty() {
            anyhow::bail!("NGINX_SERVICE must not be empty");
        }

        if self.command_timeout.is_zero() {
            anyhow::bail!("COMMAND_TIMEOUT_SECS must be greater than 0");
        }
        if self.certbot_timeout.is_zero() {
            anyhow::bail!("CERTBOT_TIMEOUT_SECS must be greater than 0");
        }

        let sample_ms = self.stats_sample.as_millis();
        if !(1..=60_000).contains(&sample_ms) {
            anyhow::bail!("STATS_SAMPLE_MS must be between 1 and 60000, got {sample_ms}");
        }

        if let Some(ref email) = self.acme_email
            && !email.contains('@')
        {
            anyhow::bail!("ACME_EMAIL must be an email address, got '{email}'");
        }

        Ok(())
    }

    /// Paths interpolated into generated server blocks.
    pub fn server_blocks(&self) -> ServerBlockSettings {
        ServerBlockSettings {
            listen_include: self.listen_file.clone(),
            acme_webroot: self.acme_webroot.clone(),
            bootstrap_certificate: CertificatePaths {
                certificate: self.bootstrap_cert.clone(),
                private_key: self.bootstrap_key.clone(),
            },
        }
    }
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric variable cannot be parsed.
    pub fn from_env() -> Result<Self> {
        let listen_addr = env::var("LISTEN").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
        let api_key = env::var("API_KEY").ok();
        let log_level = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
        let log_format = env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

        let provisioner =
            ProvisionerConfig::from_env().context("Failed to load provisioning configuration")?;

        Ok(Self {
            listen_addr,
            api_key,
            log_level,
            log_format,
            provisioner,
        })
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `log_format` is not `text` or `json`
    /// - `listen_addr` is invalid
    /// - `api_key` is set but empty
    /// - any provisioning setting is invalid
    pub fn validate(&self) -> Result<()> {
        if self.log_format != "text" && self.log_format != "json" {
            anyhow::bail!(
                "LOG_FORMAT must be 'text' or 'json', got '{}'",
                self.log_format
            );
        }

        if !self.listen_addr.contains(':') {
            anyhow::bail!(
                "LISTEN must be in format 'host:port', got '{}'",
                self.listen_addr
            );
        }

        if let Some(ref key) = self.api_key
            && key.trim().is_empty()
        {
            anyhow::bail!("API_KEY must not be empty");
        }

        self.provisioner.validate()
    }

    /// Returns the API key, failing when the server is started without one.
    ///
    /// # Errors
    ///
    /// Returns an error if `API_KEY` is not set.
    pub fn require_api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .context("API_KEY must be set to run the API server")
    }

    /// Prints configuration summary (without sensitive data).
    pub fn print_summary(&self) {
        let p = &self.provisioner;

        tracing::info!("Configuration loaded:");
        tracing::info!("  Listen address: {}", self.listen_addr);
        match self.api_key {
            Some(ref key) => tracing::info!("  API key: sha256:{}", fingerprint(key)),
            None => tracing::info!("  API key: not set"),
        }
        tracing::info!("  Log level: {}", self.log_level);
        tracing::info!("  Log format: {}", self.log_format);
        tracing::info!("  Domains dir: {}", p.domains_dir.display());
        tracing::info!("  Listen file: {}", p.listen_file.display());
        tracing::info!("  ACME webroot: {}", p.acme_webroot.display());
        tracing::info!("  Reload command: {}", p.reload_command.join(" "));
        tracing::info!(
            "  Service control: {} <action> {}",
            p.service_ctl.join(" "),
            p.service_name
        );
        tracing::info!("  Certificate tool: {}", p.certbot_command.join(" "));
        tracing::info!(
            "  Timeouts: commands {}s, certificates {}s",
            p.command_timeout.as_secs(),
            p.certbot_timeout.as_secs()
        );
    }
}

/// Short SHA-256 fingerprint of a secret, safe to log.
pub fn fingerprint(secret: &str) -> String {
    let digest = Sha256::digest(secret.as_bytes());
    hex::encode(&digest[..6])
}

fn env_path(name: &str, default: PathBuf) -> PathBuf {
    env::var_os(name)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .unwrap_or(default)
}

fn env_command(name: &str, default: Vec<String>) -> Vec<String> {
    env::var(name)
        .map(|v| split_command(&v))
        .unwrap_or(default)
}

fn env_number(name: &str, default: u64) -> Result<u64> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .with_context(|| format!("{name} must be a non-negative integer, got '{value}'")),
        Err(_) => Ok(default),
    }
}

/// Loads and validates configuration from environment variables.
///
/// # Errors
///
/// Returns an error if a variable is malformed or validation fails.
///
/// # Note
///
/// This function expects environment variables to be already loaded
/// (e.g., via `dotenvy::dotenv()` in `main.rs`).
pub fn load_from_env() -> Result<Config> {
    let config = Config::from_env()?;
    config.validate()?;
    Ok(config)
}
