//! ora-bind - run a parameterized Oracle SQL node from the command line.

use ora_bind::bind::bind_parameters;
use ora_bind::cli::Cli;
use ora_bind::config::{Config, Credentials, NodeDefinition};
use ora_bind::db;
use ora_bind::error::{NodeError, Result};
use ora_bind::logging;
use ora_bind::node::{OracleDatabaseNode, StaticContext};
use serde::Serialize;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let cli = Cli::parse_args();

    if cli.log_file {
        logging::init_file_logging();
    } else {
        logging::init_stderr_logging();
    }

    if let Err(e) = run(cli).await {
        error!("{}: {}", e.category(), e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let node = OracleDatabaseNode;

    if cli.describe {
        return print_json(&node.description(), cli.pretty);
    }

    let node_path = cli
        .node
        .as_deref()
        .ok_or_else(|| NodeError::config("--node is required"))?;
    info!("Loading node definition from: {}", node_path.display());
    let definition = NodeDefinition::load_from_file(node_path)?;

    if cli.dry_run {
        let bound = bind_parameters(&definition.query, &definition.params);
        info!("Bound statement:\n{}", bound.describe());
        return print_json(&bound, cli.pretty);
    }

    let config_path = cli.config_path();
    info!("Loading config from: {}", config_path.display());
    let config = Config::load_from_file(&config_path)?;

    let credentials = resolve_credentials(&cli, &config)?;
    info!("Credentials: {}", credentials.display_string());

    let backend = cli.backend();
    info!("Backend: {}", backend.as_str());
    let connector = db::connector(backend);

    let ctx = StaticContext::new(definition, credentials);
    let items = node.execute(&ctx, connector.as_ref()).await?;

    print_json(&items, cli.pretty)
}

/// Resolves the final credentials with precedence:
/// 1. CLI arguments (highest)
/// 2. Named credentials from config
/// 3. Default credentials from config
/// 4. Environment variables (including `.env`)
fn resolve_credentials(cli: &Cli, config: &Config) -> Result<Credentials> {
    let mut credentials = match cli.credentials_name() {
        Some(name) => config.get_credentials(Some(name)).cloned().ok_or_else(|| {
            NodeError::config(format!("Credentials '{}' not found in config file", name))
        })?,
        None => config.get_credentials(None).cloned().unwrap_or_default(),
    };

    credentials.merge(&cli.to_credentials());

    // A missing .env file is fine
    let _ = dotenvy::dotenv();
    credentials.apply_env_defaults();

    Ok(credentials)
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let out = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .map_err(|e| NodeError::internal(format!("Failed to serialize output: {e}")))?;

    println!("{out}");
    Ok(())
}
