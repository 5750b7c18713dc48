//! Material sync CLI for the Atelier design-material registry.

mod api_client;
mod progress;
mod session;
mod uploader;

use anyhow::{Context, Result};
use api_client::ApiClient;
use atelier_core::{
    DEFAULT_BATCH_SIZE, Envelope, Environment, Error, HostTable, MaterialItem, NetworkScope,
};
use clap::{Args, Parser, Subcommand};
use figment::Figment;
use figment::providers::{Env, Format, Toml};
use progress::{ConsoleReporter, Reporter};
use session::{PreselectedSite, SitePrompt, TokenPrompt};
use std::path::{Path, PathBuf};
use std::sync::Arc;

const DEFAULT_MANIFEST: &str = "materials.json";

#[derive(Parser)]
#[command(name = "atelierctl")]
#[command(about = "Sync design materials to an Atelier registry site")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone)]
struct ClientConfigArgs {
    /// Client config file path
    #[arg(long, env = "ATELIER_CLIENT_CONFIG")]
    client_config: Option<String>,
}

#[derive(Args, Clone)]
struct RegistryArgs {
    /// Registry environment (daily, staging, production)
    #[arg(long, env = "ATELIER_ENV")]
    env: Option<String>,

    /// Use the corp-network registry hosts
    #[arg(long, default_value_t = false)]
    internal: bool,

    /// Registry base URL (bypasses the host table)
    #[arg(long, env = "ATELIER_HOST")]
    host: Option<String>,

    /// Access token (prompted interactively when omitted)
    #[arg(long, env = "ATELIER_TOKEN")]
    token: Option<String>,

    #[command(flatten)]
    client: ClientConfigArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload a material manifest to a registry site
    Sync {
        /// Material manifest: a JSON array of {type, npm, version}
        #[arg(long)]
        manifest: Option<PathBuf>,

        /// Target site (id or name; prompted interactively when omitted)
        #[arg(long)]
        site: Option<String>,

        /// Material items per upload request
        #[arg(long, default_value_t = DEFAULT_BATCH_SIZE)]
        batch_size: usize,

        #[command(flatten)]
        registry: RegistryArgs,
    },
    /// List the sites this token can upload to
    Sites {
        #[command(flatten)]
        registry: RegistryArgs,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let Cli { command } = Cli::parse();

    match command {
        Commands::Sync {
            manifest,
            site,
            batch_size,
            registry,
        } => handle_sync_command(manifest, site, batch_size, &registry).await,
        Commands::Sites { registry } => handle_sites_command(&registry).await,
    }
}

async fn handle_sync_command(
    manifest: Option<PathBuf>,
    site: Option<String>,
    batch_size: usize,
    registry: &RegistryArgs,
) -> Result<()> {
    let config_path = client_config_path(registry.client.client_config.as_deref())?;
    let config = load_client_config(&config_path).await?;
    let host = resolve_host(registry, &config)?;

    let reporter = Arc::new(ConsoleReporter::new());
    let session = session::negotiate_session(host, registry.token.as_deref(), &TokenPrompt)?;
    let client = ApiClient::new(&session, Arc::clone(&reporter) as Arc<dyn Reporter>);

    let site = match site.or_else(|| config.site.clone()) {
        Some(key) => {
            session::acquire_site(&client, &PreselectedSite::new(key), reporter.as_ref()).await?
        }
        None => session::acquire_site(&client, &SitePrompt, reporter.as_ref()).await?,
    };

    let manifest_path = manifest
        .or_else(|| config.manifest.clone().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_MANIFEST));
    let items = load_manifest(&manifest_path).await?;
    if items.is_empty() {
        println!(
            "Manifest {} lists no materials. Nothing to sync.",
            manifest_path.display()
        );
        return Ok(());
    }

    println!(
        "Syncing {} material(s) to site '{}'",
        items.len(),
        site.name
    );
    uploader::upload(&client, &site, &items, batch_size, reporter.as_ref()).await?;
    println!("Materials available at: {}", site.upload_endpoint);

    Ok(())
}

async fn handle_sites_command(registry: &RegistryArgs) -> Result<()> {
    let config_path = client_config_path(registry.client.client_config.as_deref())?;
    let config = load_client_config(&config_path).await?;
    let host = resolve_host(registry, &config)?;

    let reporter = Arc::new(ConsoleReporter::new());
    let session = session::negotiate_session(host, registry.token.as_deref(), &TokenPrompt)?;
    let client = ApiClient::new(&session, Arc::clone(&reporter) as Arc<dyn Reporter>);

    match client.my_sites().await? {
        Envelope::Failure { message, .. } => Err(Error::RemoteRejected(
            message.unwrap_or_else(|| "site list request failed".to_string()),
        )
        .into()),
        Envelope::Success { data } => {
            let sites = data.unwrap_or_default();
            if sites.is_empty() {
                reporter.no_sites_advisory(client.host());
                println!("No sites found.");
                return Ok(());
            }
            println!("{:<10} Name", "ID");
            println!("{}", "-".repeat(40));
            for site in sites {
                println!("{:<10} {}", site.id, site.name);
            }
            Ok(())
        }
    }
}

/// Pick the registry base URL: an explicit `--host` wins, otherwise the
/// static host table keyed by scope and environment.
fn resolve_host(registry: &RegistryArgs, config: &ClientConfig) -> Result<String> {
    if let Some(host) = &registry.host {
        return normalize_base_url(host);
    }
    let environment = registry
        .env
        .as_deref()
        .or(config.environment.as_deref())
        .map(Environment::from_arg)
        .unwrap_or(Environment::Production);
    let scope = if registry.internal || config.internal.unwrap_or(false) {
        NetworkScope::Internal
    } else {
        NetworkScope::External
    };
    Ok(HostTable::DEFAULT.resolve(scope, environment).to_string())
}

fn normalize_base_url(url: &str) -> Result<String> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        anyhow::bail!("registry URL must start with http:// or https://");
    }
    Ok(url.trim_end_matches('/').to_string())
}

/// Optional per-user defaults. Tokens are never stored here.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct ClientConfig {
    environment: Option<String>,
    internal: Option<bool>,
    site: Option<String>,
    manifest: Option<String>,
}

fn client_config_path(explicit: Option<&str>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(PathBuf::from(path));
    }

    if let Some(path) = std::env::var_os("ATELIER_CLIENT_CONFIG") {
        return Ok(PathBuf::from(path));
    }

    let base = match std::env::var_os("XDG_CONFIG_HOME") {
        Some(path) => PathBuf::from(path),
        None => {
            let home = std::env::var_os("HOME")
                .ok_or_else(|| anyhow::anyhow!("HOME not set; set ATELIER_CLIENT_CONFIG"))?;
            PathBuf::from(home).join(".config")
        }
    };

    Ok(base.join("atelier").join("client.toml"))
}

async fn load_client_config(path: &Path) -> Result<ClientConfig> {
    let mut figment = Figment::new();

    if path.exists() {
        figment = figment.merge(Toml::file(path));
    }

    figment = figment.merge(Env::prefixed("ATELIER_").split("__"));

    match figment.extract() {
        Ok(config) => Ok(config),
        Err(_) if !path.exists() => Ok(ClientConfig::default()),
        Err(err) => Err(anyhow::anyhow!(err).context("failed to load client configuration")),
    }
}

async fn load_manifest(path: &Path) -> Result<Vec<MaterialItem>> {
    let contents = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read manifest {}", path.display()))?;
    let items = serde_json::from_str(&contents)
        .with_context(|| format!("manifest {} is not a JSON array of materials", path.display()))?;
    Ok(items)
}
