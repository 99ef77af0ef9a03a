//! # Aidbox Provider CLI
//!
//! Drives the reconciliation engine from the command line.
//!
//! ## Commands
//!
//! - `create | read | update | delete | plan | apply` - one operation on one resource
//! - `serve` - JSON-lines dispatcher: one request per stdin line, one response per stdout line
//! - `types` - list the managed resource type names
//!
//! Connection settings come from `AIDBOX_*` environment variables; the global flags override
//! all of them except the client secret. JSON goes to stdout, logs to stderr.

use aidbox_provider::config::{
    ConfigError, ProviderConfig, AUTH_MODE_VAR, CLIENT_ID_VAR, TIMEOUT_VAR, URL_VAR,
};
use aidbox_provider::error::ProviderError;
use aidbox_provider::lifecycle::{AidboxProvider, ResourceKind};
use aidbox_provider::shim::{Operation, Request, Response};
use clap::{Args, Parser, Subcommand};
use reconcile_framework::tracing::setup_tracing_with_verbosity;
use reconcile_framework::ResourceIdentity;
use serde_json::Value;
use std::path::PathBuf;
use std::process::ExitCode;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tracing::{error, info, warn};

/// Reconcile Aidbox resources against declared state.
#[derive(Parser)]
#[command(name = "aidbox-provider")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Base URL of the Aidbox instance (overrides AIDBOX_URL)
    #[arg(global = true, long)]
    url: Option<String>,

    /// Client id (overrides AIDBOX_CLIENT_ID)
    #[arg(global = true, long)]
    client_id: Option<String>,

    /// `token` or `basic` (overrides AIDBOX_AUTH_MODE)
    #[arg(global = true, long)]
    auth_mode: Option<String>,

    /// Request timeout in seconds (overrides AIDBOX_TIMEOUT_SECS)
    #[arg(global = true, long)]
    timeout_secs: Option<u64>,

    /// Enable debug logging
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a resource; an id is generated when --id is omitted
    Create(TargetArgs),
    /// Print the stored state, or nothing when absent
    Read(TargetArgs),
    /// Replace a resource in place
    Update(TargetArgs),
    /// Delete a resource; succeeds when already absent
    Delete(TargetArgs),
    /// Report drift without writing
    Plan(TargetArgs),
    /// Create, update, recreate or replace as needed
    Apply(TargetArgs),
    /// Answer JSON requests line by line on stdin/stdout
    Serve,
    /// List the managed resource types
    Types,
}

#[derive(Args)]
struct TargetArgs {
    /// Resource type name, e.g. aidbox_user
    #[arg(value_name = "TYPE")]
    type_name: String,

    /// Store resource type; required for aidbox_resource
    #[arg(long)]
    resource_type: Option<String>,

    /// Resource id
    #[arg(long)]
    id: Option<String>,

    /// Identity from the previous apply, as kind/id
    #[arg(long)]
    prior: Option<ResourceIdentity>,

    /// JSON state file, `-` for stdin
    #[arg(short, long)]
    state: Option<PathBuf>,
}

impl Cli {
    fn load_config(&self) -> Result<ProviderConfig, ConfigError> {
        ProviderConfig::from_lookup(|key| {
            let flag = match key {
                URL_VAR => self.url.clone(),
                CLIENT_ID_VAR => self.client_id.clone(),
                AUTH_MODE_VAR => self.auth_mode.clone(),
                TIMEOUT_VAR => self.timeout_secs.map(|secs| secs.to_string()),
                _ => None,
            };
            flag.or_else(|| std::env::var(key).ok())
        })
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_tracing_with_verbosity(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Command failed");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), ProviderError> {
    let (operation, target) = match &cli.command {
        Commands::Types => {
            for kind in ResourceKind::ALL {
                println!("{}\t{}", kind.name(), kind.resource_type().unwrap_or("*"));
            }
            return Ok(());
        }
        Commands::Serve => {
            let provider = AidboxProvider::connect(&cli.load_config()?).await?;
            return serve(&provider).await;
        }
        Commands::Create(target) => (Operation::Create, target),
        Commands::Read(target) => (Operation::Read, target),
        Commands::Update(target) => (Operation::Update, target),
        Commands::Delete(target) => (Operation::Delete, target),
        Commands::Plan(target) => (Operation::Plan, target),
        Commands::Apply(target) => (Operation::Apply, target),
    };

    // Parse everything local before connecting.
    let request = Request {
        operation,
        type_name: target.type_name.clone(),
        resource_type: target.resource_type.clone(),
        resource_id: target.id.clone(),
        prior: target.prior.clone(),
        state: read_state(target.state.as_ref()).await?,
    };
    let provider = AidboxProvider::connect(&cli.load_config()?).await?;
    let response = provider.dispatch(request).await?;

    let rendered = serde_json::to_string_pretty(&response)
        .map_err(|e| ProviderError::request(format!("cannot render response: {e}")))?;
    println!("{rendered}");
    Ok(())
}

async fn read_state(path: Option<&PathBuf>) -> Result<Option<Value>, ProviderError> {
    let Some(path) = path else {
        return Ok(None);
    };
    let raw = if path.as_os_str() == "-" {
        let mut raw = String::new();
        tokio::io::stdin().read_to_string(&mut raw).await?;
        raw
    } else {
        tokio::fs::read_to_string(path).await?
    };
    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|e| ProviderError::request(format!("state in {} is not JSON: {e}", path.display())))
}

/// Answers requests until stdin closes. A failed request yields an `error` response, not an exit.
async fn serve(provider: &AidboxProvider) -> Result<(), ProviderError> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();
    info!("Serving requests on stdin");

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let response = match serde_json::from_str::<Request>(&line) {
            Ok(request) => match provider.dispatch(request).await {
                Ok(response) => response,
                Err(e) => {
                    warn!(error = %e, "Request failed");
                    Response::failure(&e)
                }
            },
            Err(e) => Response::failure(&ProviderError::request(e.to_string())),
        };
        let mut rendered = serde_json::to_string(&response)
            .map_err(|e| ProviderError::request(format!("cannot render response: {e}")))?;
        rendered.push('\n');
        stdout.write_all(rendered.as_bytes()).await?;
        stdout.flush().await?;
    }

    info!("Input closed, shutting down");
    Ok(())
}
