//! Operator CLI for edge-provisioner.
//!
//! Drives the same provisioning engine as the HTTP API, directly against the
//! local nginx configuration tree. Run it as a user that may write the
//! configuration directories and reload nginx.
//!
//! # Usage
//!
//! ```bash
//! # Provision a domain (bootstrap, certificate, proxy)
//! edgectl add-domain example.com 10.0.0.5
//!
//! # Retry transient failures such as a certbot rate limit hiccup
//! edgectl add-domain example.com 10.0.0.5 --retry 3 --retry-delay-ms 10000
//!
//! # Manage listen ports
//! edgectl add-port 8443
//! edgectl delete-port 8443
//!
//! # Inspect
//! edgectl domains
//! edgectl ports
//! edgectl status
//! edgectl stats --json
//!
//! # Generate an API key for the server
//! edgectl key generate
//! ```
//!
//! # Environment Variables
//!
//! Same as the server (see `edge_provisioner::config`); `API_KEY` is not needed.

use edge_provisioner::config::ProvisionerConfig;
use edge_provisioner::domain::entities::StatsSnapshot;
use edge_provisioner::domain::errors::OperationError;
use edge_provisioner::server::{Services, build_services};
use edge_provisioner::telemetry;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use std::future::Future;
use std::process::ExitCode;
use tokio_retry::RetryIf;
use tokio_retry::strategy::FixedInterval;

/// CLI tool for provisioning nginx domains and ports.
#[derive(Parser)]
#[command(name = "edgectl")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log engine activity to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Provision a domain routed to a backend IP
    AddDomain {
        /// Domain name, e.g. example.com
        domain: String,

        /// Backend IPv4 or IPv6 address
        ip: String,

        #[command(flatten)]
        retry: RetryArgs,
    },

    /// Remove a provisioned domain
    DeleteDomain {
        domain: String,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Add a listen port
    AddPort {
        port: String,

        #[command(flatten)]
        retry: RetryArgs,
    },

    /// Remove a listen port
    DeletePort { port: String },

    /// List provisioned domains
    Domains,

    /// List listen ports
    Ports,

    /// Reload nginx configuration in place
    Reload,

    /// Restart the nginx service
    Restart,

    /// Start the nginx service
    Start,

    /// Stop the nginx service
    Stop {
        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Show the nginx service state
    Status,

    /// Show ports, domain count and host load
    Stats {
        /// Print the snapshot as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage the API key
    Key {
        #[command(subcommand)]
        action: KeyAction,
    },
}

#[derive(clap::Args)]
struct RetryArgs {
    /// Re-run the whole operation up to N times on transient failures
    #[arg(long, default_value_t = 0)]
    retry: usize,

    /// Delay between attempts
    #[arg(long, default_value_t = 5000)]
    retry_delay_ms: u64,
}

#[derive(Subcommand)]
enum KeyAction {
    /// Generate a random API key
    Generate {
        /// Print only the key
        #[arg(long)]
        raw: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    telemetry::init_cli(cli.verbose);

    match run(cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {:#}", "❌ Error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Commands) -> Result<()> {
    if let Commands::Key { action } = command {
        return handle_key_action(action);
    }

    let config = ProvisionerConfig::from_env()?;
    config
        .validate()
        .context("Invalid provisioning configuration")?;
    let services = build_services(&config);

    match command {
        Commands::AddDomain { domain, ip, retry } => add_domain(&services, &domain, &ip, &retry).await,
        Commands::DeleteDomain { domain, yes } => delete_domain(&services, &domain, yes).await,
        Commands::AddPort { port, retry } => add_port(&services, &port, &retry).await,
        Commands::DeletePort { port } => {
            let port = services
                .provisioning
                .delete_port(&port)
                .await
                .map_err(operation_failed)?;
            success(&format!("Port {port} deleted"));
            Ok(())
        }
        Commands::Domains => list_domains(&services).await,
        Commands::Ports => list_ports(&services).await,
        Commands::Reload => {
            services.provisioning.reload().await.map_err(operation_failed)?;
            success("nginx reloaded");
            Ok(())
        }
        Commands::Restart => {
            services.provisioning.restart().await.map_err(operation_failed)?;
            success("nginx restarted");
            Ok(())
        }
        Commands::Start => {
            services.provisioning.start().await.map_err(operation_failed)?;
            success("nginx started");
            Ok(())
        }
        Commands::Stop { yes } => {
            if !yes && !confirm("Stop nginx? All proxied domains will go offline")? {
                println!("{}", "Cancelled".yellow());
                return Ok(());
            }
            services.provisioning.stop().await.map_err(operation_failed)?;
            success("nginx stopped");
            Ok(())
        }
        Commands::Status => {
            let status = services.provisioning.status().await.map_err(operation_failed)?;
            let painted = if status == "active" {
                status.green().bold()
            } else {
                status.red().bold()
            };
            println!("nginx: {painted}");
            Ok(())
        }
        Commands::Stats { json } => {
            let stats = services.stats.get_stats().await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                print_stats(&stats);
            }
            Ok(())
        }
        Commands::Key { action } => handle_key_action(action),
    }
}

/// Provisions a domain, printing each phase.
///
/// The engine call blocks through bootstrap, certificate issuance and the
/// final reload.
async fn add_domain(services: &Services, domain: &str, ip: &str, retry: &RetryArgs) -> Result<()> {
    println!(
        "{} {} → {}",
        "🌐 Provisioning".bright_blue().bold(),
        domain.cyan(),
        ip.cyan()
    );

    let record = with_retry(retry, || services.provisioning.add_domain(domain, ip))
        .await
        .map_err(operation_failed)?;

    success(&format!("Domain {} added", record.name));
    println!("  Config:  {}", record.config_path.display().to_string().bright_black());
    println!("  Backend: {}", record.target.to_string().bright_white());
    Ok(())
}

async fn delete_domain(services: &Services, domain: &str, yes: bool) -> Result<()> {
    if !yes && !confirm(&format!("Delete domain {domain}?"))? {
        println!("{}", "Cancelled".yellow());
        return Ok(());
    }

    services
        .provisioning
        .delete_domain(domain)
        .await
        .map_err(operation_failed)?;

    success(&format!("Domain {domain} deleted"));
    Ok(())
}

async fn add_port(services: &Services, port: &str, retry: &RetryArgs) -> Result<()> {
    let port = with_retry(retry, || services.provisioning.add_port(port))
        .await
        .map_err(operation_failed)?;

    success(&format!("Port {port} added"));
    Ok(())
}

async fn list_domains(services: &Services) -> Result<()> {
    let domains = services.provisioning.list_domains().await?;

    println!("{}", "📋 Domains".bright_blue().bold());
    if domains.is_empty() {
        println!("{}", "  No domains provisioned".yellow());
        return Ok(());
    }
    for domain in &domains {
        println!("  {}", domain.cyan());
    }
    println!();
    println!("  Total: {}", domains.len().to_string().bright_white().bold());
    Ok(())
}

async fn list_ports(services: &Services) -> Result<()> {
    let ports = services.provisioning.list_ports().await?;

    println!("{}", "📋 Listen ports".bright_blue().bold());
    if ports.is_empty() {
        println!("{}", "  No ports listed".yellow());
        return Ok(());
    }
    for port in &ports {
        println!("  {}", port.to_string().cyan());
    }
    Ok(())
}

/// Displays a statistics snapshot.
///
/// # Output Format
///
/// ```text
/// 📊 Statistics
///
///   Ports:     80, 443
///   Domains:   3
///   Load (1m): 0.42 on 4 cores
///   Memory:    812 / 3911 MB (20.8%)
///   Network:   ↑ 0.31 Mbit/s  ↓ 1.80 Mbit/s
/// ```
fn print_stats(stats: &StatsSnapshot) {
    let ports = stats
        .ports
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    let ports = if ports.is_empty() { "-".to_string() } else { ports };

    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();
    println!("  Ports:     {}", ports.cyan());
    println!("  Domains:   {}", stats.domain_count.to_string().bright_green().bold());
    println!(
        "  Load (1m): {} on {} cores",
        format!("{:.2}", stats.load_average_1m).bright_white(),
        stats.logical_cores
    );
    println!(
        "  Memory:    {} / {} MB ({:.1}%)",
        stats.memory_used_mb, stats.memory_total_mb, stats.memory_used_percent
    );
    println!(
        "  Network:   ↑ {:.2} Mbit/s  ↓ {:.2} Mbit/s",
        stats.upload_mbps, stats.download_mbps
    );
    println!();
}

fn handle_key_action(action: KeyAction) -> Result<()> {
    match action {
        KeyAction::Generate { raw } => {
            let key = generate_token();
            if raw {
                println!("{key}");
                return Ok(());
            }

            println!("{}", "🔑 Generated API key".bright_blue().bold());
            println!();
            println!("  {}", key.bright_yellow().bold());
            println!();
            println!("{}", "Add it to the server environment:".bright_white());
            println!("  {}={}", "API_KEY".bright_cyan(), key.bright_yellow());
            println!();
            println!("{}", "Example:".bright_white());
            println!(
                "  curl -H \"Authorization: Bearer {}\" http://localhost:8080/domains",
                key.bright_yellow()
            );
            println!();
            Ok(())
        }
    }
}

/// Re-runs `operation` on transient failure kinds, as configured by `--retry`.
async fn with_retry<T, F, Fut>(retry: &RetryArgs, mut operation: F) -> Result<T, OperationError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, OperationError>>,
{
    let strategy = FixedInterval::from_millis(retry.retry_delay_ms).take(retry.retry);

    RetryIf::start(
        strategy,
        || operation(),
        |e: &OperationError| {
            let transient = e.kind().is_transient();
            if transient && retry.retry > 0 {
                eprintln!("{} {}", "⚠️  Attempt failed, retrying:".yellow(), e);
            }
            transient
        },
    )
    .await
}

fn operation_failed(e: OperationError) -> anyhow::Error {
    let kind = e.kind();
    match e.step {
        Some(step) => anyhow::anyhow!("[{kind}] {step}: {e}"),
        None => anyhow::anyhow!("[{kind}] {e}"),
    }
}

fn confirm(prompt: &str) -> Result<bool> {
    Ok(Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()?)
}

fn success(message: &str) {
    println!("{}", format!("✅ {message}").green().bold());
}

/// Generates a cryptographically random token.
///
/// # Format
///
/// - Length: 48 characters
/// - Character set: A-Z, a-z, 0-9
/// - Entropy: ~286 bits
fn generate_token() -> String {
    use rand::Rng;
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
    const TOKEN_LEN: usize = 48;

    let mut rng = rand::rng();

    (0..TOKEN_LEN)
        .map(|_| {
            let idx = rng.random_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_token_format() {
        let token = generate_token();
        assert_eq!(token.len(), 48);
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(token, generate_token());
    }

    #[test]
    fn test_cli_parses_retry_flags() {
        let cli = Cli::try_parse_from([
            "edgectl",
            "add-domain",
            "example.com",
            "10.0.0.5",
            "--retry",
            "2",
            "--retry-delay-ms",
            "10",
        ])
        .unwrap();

        let Commands::AddDomain { retry, .. } = cli.command else {
            panic!("expected add-domain");
        };
        assert_eq!(retry.retry, 2);
        assert_eq!(retry.retry_delay_ms, 10);
    }

    #[tokio::test]
    async fn test_with_retry_skips_client_errors() {
        use edge_provisioner::domain::errors::ProvisionError;
        use std::sync::atomic::{AtomicUsize, Ordering};

        let attempts = AtomicUsize::new(0);
        let args = RetryArgs {
            retry: 3,
            retry_delay_ms: 1,
        };

        let result: Result<(), _> = with_retry(&args, || async {
            attempts.fetch_add(1, Ordering::SeqCst);
            Err(OperationError::from(ProvisionError::AlreadyExists(
                "Port 443".to_string(),
            )))
        })
        .await;

        assert!(result.is_err());
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_with_retry_repeats_transient_errors() {
        use edge_provisioner::domain::errors::ProvisionError;
        use std::sync::atomic::{AtomicUsize, Ordering};

        let attempts = AtomicUsize::new(0);
        let args = RetryArgs {
            retry: 2,
            retry_delay_ms: 1,
        };

        let result: Result<(), _> = with_retry(&args, || async {
            attempts.fetch_add(1, Ordering::SeqCst);
            Err(OperationError::from(ProvisionError::ReloadFailed {
                output: "emerg".to_string(),
            }))
        })
        .await;

        assert!(result.is_err());
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }
}
