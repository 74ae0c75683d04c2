//! Service wiring and HTTP server lifecycle.

use crate::application::services::{AuthService, ProvisioningService, StatsService};
use crate::config::{Config, ProvisionerConfig};
use crate::infrastructure::filesystem::{FsDomainRepository, FsPortRepository};
use crate::infrastructure::process::{CertbotIssuer, NginxControl};
use crate::infrastructure::system::SysinfoProbe;
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use std::net::SocketAddr;
use std::sync::Arc;

/// Services backed by the real file system, nginx, certbot and host counters.
pub struct Services {
    pub provisioning: Arc<ProvisioningService>,
    pub stats: Arc<StatsService>,
}

/// Builds the provisioning and statistics services from configuration.
///
/// Shared by the API server and `edgectl`, so both drive exactly the same
/// engine.
pub fn build_services(config: &ProvisionerConfig) -> Services {
    let domains = Arc::new(FsDomainRepository::new(&config.domains_dir));
    let ports = Arc::new(FsPortRepository::new(&config.listen_file));

    let server = Arc::new(NginxControl::new(
        config.reload_command.clone(),
        config.service_ctl.clone(),
        config.service_name.clone(),
        config.command_timeout,
    ));
    let issuer = Arc::new(CertbotIssuer::new(
        config.certbot_command.clone(),
        &config.acme_webroot,
        &config.letsencrypt_live_dir,
        config.certbot_timeout,
    ));
    let probe = Arc::new(SysinfoProbe::new(config.stats_sample));

    let provisioning = ProvisioningService::new(
        domains.clone(),
        ports.clone(),
        server,
        issuer,
        config.server_blocks(),
    )
    .with_contact_email(config.acme_email.clone());

    Services {
        provisioning: Arc::new(provisioning),
        stats: Arc::new(StatsService::new(domains, ports, probe)),
    }
}

/// Runs the HTTP server with the given configuration.
///
/// Stops accepting connections on Ctrl-C and waits for in-flight requests,
/// so a running provisioning operation is not cut off halfway.
///
/// # Errors
///
/// Returns an error if:
/// - `API_KEY` is not configured
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let api_key = config.require_api_key()?.to_string();
    let auth_service =
        AuthService::new(api_key).map_err(|e| anyhow::anyhow!("{}", e.message()))?;

    let services = build_services(&config.provisioner);
    let state = AppState::new(
        services.provisioning,
        services.stats,
        Arc::new(auth_service),
    );

    let app = app_router(state);

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid LISTEN address '{}'", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
