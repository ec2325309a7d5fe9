//! Storedesk CLI - back-office server and global search

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use storedesk_core::application::SearchValidator;
use storedesk_core::config::Config;
use storedesk_core::domain::identity::IdentityResolver;
use storedesk_core::domain::search::SearchQuery;
use storedesk_core::storage::{Database, DatabaseConfig, seed_demo};
use storedesk_server::AppState;
use storedesk_server::routes::SearchResponse;
use tracing::info;

#[derive(Parser)]
#[command(name = "storedesk")]
#[command(author, version, about = "Multi-tenant back office with permission-scoped global search", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// SQLite database file (overrides database.path)
    #[arg(long, global = true, env = "STOREDESK_DATABASE")]
    database: Option<PathBuf>,

    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text")]
    format: OutputFormat,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server
    Serve {
        /// Address to listen on (overrides server.listen)
        #[arg(long, env = "STOREDESK_LISTEN")]
        listen: Option<SocketAddr>,
    },

    /// Search as the user owning a token
    Search {
        /// Search term
        term: String,
        /// API token of the user to search as
        #[arg(long, env = "STOREDESK_TOKEN")]
        token: String,
        /// Comma-separated item types (product, invoice, ...)
        #[arg(long)]
        types: Option<String>,
        /// Maximum number of results
        #[arg(long)]
        limit: Option<String>,
    },

    /// Apply pending database migrations
    Migrate,

    /// Create the demo pharmacy tenant
    Seed,

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Get a configuration value
    Get { key: String },
    /// Set a configuration value
    Set { key: String, value: String },
    /// List all configuration values
    List,
    /// Reset configuration to defaults
    Reset,
    /// Show config file path
    Path,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let default_filter = if cli.quiet {
        "storedesk=warn,tower_http=warn"
    } else {
        "storedesk=info,tower_http=info"
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .init();

    let result = run(cli).await;
    if let Err(e) = &result {
        let hint = e
            .chain()
            .find_map(|cause| cause.downcast_ref::<storedesk_core::Error>())
            .and_then(storedesk_core::Error::suggestion);
        if let Some(hint) = hint {
            eprintln!("hint: try `{}`", hint);
        }
    }
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Serve { listen } => {
            let config = Config::load()?;
            let listen = listen.unwrap_or(config.server.listen);
            let db = open_database(&config, cli.database.as_deref()).await?;
            cmd_serve(db, &config, listen).await
        }

        Commands::Search {
            term,
            token,
            types,
            limit,
        } => {
            let config = Config::load()?;
            let db = open_database(&config, cli.database.as_deref()).await?;
            cmd_search(
                db,
                &config,
                &term,
                &token,
                types.as_deref(),
                limit.as_deref(),
                cli.format,
            )
            .await
        }

        Commands::Migrate => {
            let config = Config::load()?;
            cmd_migrate(&config, cli.database.as_deref(), cli.quiet).await
        }

        Commands::Seed => {
            let config = Config::load()?;
            let db = open_database(&config, cli.database.as_deref()).await?;
            cmd_seed(&db, cli.format, cli.quiet).await
        }

        Commands::Config { action } => cmd_config(action, cli.quiet),
    }
}

fn database_path(config: &Config, override_path: Option<&std::path::Path>) -> anyhow::Result<PathBuf> {
    match override_path {
        Some(path) => Ok(path.to_path_buf()),
        None => config.database_path(),
    }
}

async fn open_database(
    config: &Config,
    override_path: Option<&std::path::Path>,
) -> anyhow::Result<Database> {
    let path = database_path(config, override_path)?;
    Database::open(&path)
        .await
        .with_context(|| format!("Failed to open database at {}", path.display()))
}

// ============================================================================
// Command Implementations
// ============================================================================

async fn cmd_serve(db: Database, config: &Config, listen: SocketAddr) -> anyhow::Result<()> {
    info!(
        listen = %listen,
        database = %db.path().display(),
        max_results = config.search.max_results,
        "Starting Storedesk server"
    );

    let state = Arc::new(AppState::from_database(db, config));
    storedesk_server::serve(listen, state).await
}

async fn cmd_search(
    db: Database,
    config: &Config,
    term: &str,
    token: &str,
    types: Option<&str>,
    limit: Option<&str>,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let term = SearchValidator::validate_term(Some(term))?;
    let item_types = SearchValidator::parse_types(types)?;
    let limit = SearchValidator::parse_limit(limit)?;

    let state = AppState::from_database(db, config);
    let user = state
        .identities
        .resolve(token)
        .await?
        .context("No active user owns this token")?;

    let mut query = SearchQuery::for_identity(term, &user).with_item_types(item_types);
    if let Some(limit) = limit {
        query = query.with_limit(limit);
    }

    let result = state.search.execute(&query).await?;

    for failure in &result.failed_sources {
        eprintln!("warning: source '{}' skipped: {}", failure.source, failure.message);
    }

    match format {
        OutputFormat::Json => {
            let response = SearchResponse {
                failed_sources: result
                    .failed_sources
                    .iter()
                    .map(|f| f.source.clone())
                    .collect(),
                results: result.entries,
            };
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            if result.entries.is_empty() {
                println!("No results.");
            }
            for entry in &result.entries {
                match &entry.subtitle {
                    Some(subtitle) => println!(
                        "{:<9} {}  ({})  {}",
                        entry.item_type.as_str(),
                        entry.title,
                        subtitle,
                        entry.url
                    ),
                    None => println!(
                        "{:<9} {}  {}",
                        entry.item_type.as_str(),
                        entry.title,
                        entry.url
                    ),
                }
            }
            if result.is_truncated() {
                println!(
                    "Showing {} of {} matches.",
                    result.entries.len(),
                    result.total_matches
                );
            }
        }
    }

    Ok(())
}

async fn cmd_migrate(
    config: &Config,
    override_path: Option<&std::path::Path>,
    quiet: bool,
) -> anyhow::Result<()> {
    let path = database_path(config, override_path)?;
    let db = Database::new(DatabaseConfig::with_path(&path).no_migrate()).await?;

    let before = db.migration_status().await?;
    db.migrate().await?;
    let after = db.migration_status().await?;

    if !quiet {
        if before.needs_migration {
            println!(
                "Migrated {} from v{} to v{}.",
                path.display(),
                before.current_version,
                after.current_version
            );
        } else {
            println!(
                "Database {} is up to date (v{}).",
                path.display(),
                after.current_version
            );
        }
    }

    db.close().await;
    Ok(())
}

async fn cmd_seed(db: &Database, format: OutputFormat, quiet: bool) -> anyhow::Result<()> {
    let report = seed_demo(db).await?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text if !quiet => {
            if report.created {
                println!("Created demo tenant {}.", report.tenant_id);
            } else {
                println!("Demo tenant {} already exists.", report.tenant_id);
            }
            println!("API tokens:");
            for (name, token) in &report.tokens {
                println!("  {:<16} {}", name, token);
            }
        }
        OutputFormat::Text => {}
    }

    db.close().await;
    Ok(())
}

fn cmd_config(action: ConfigAction, quiet: bool) -> anyhow::Result<()> {
    match action {
        ConfigAction::Get { key } => {
            let config = Config::load()?;
            let value = config.get(&key)?;
            println!("{}", value);
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            config.set(&key, &value)?;
            config.save()?;
            if !quiet {
                println!("Set {} = {}", key, value);
            }
        }
        ConfigAction::List => {
            let config = Config::load()?;
            let items = config.list()?;
            for (key, value) in items {
                println!("{} = {}", key, value);
            }
        }
        ConfigAction::Reset => {
            Config::reset()?;
            if !quiet {
                println!("Configuration reset to defaults.");
            }
        }
        ConfigAction::Path => {
            let path = Config::config_path()?;
            println!("{}", path.display());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_search_args() {
        let cli = Cli::try_parse_from([
            "storedesk", "search", "para", "--token", "t", "--types", "product", "--format", "json",
        ])
        .unwrap();
        assert!(cli.format == OutputFormat::Json);
        match cli.command {
            Commands::Search { term, token, types, limit } => {
                assert_eq!(term, "para");
                assert_eq!(token, "t");
                assert_eq!(types.as_deref(), Some("product"));
                assert!(limit.is_none());
            }
            _ => panic!("expected search"),
        }
    }

    #[test]
    fn test_serve_listen_override() {
        let cli = Cli::try_parse_from(["storedesk", "serve", "--listen", "0.0.0.0:9000"]).unwrap();
        match cli.command {
            Commands::Serve { listen } => {
                assert_eq!(listen, Some("0.0.0.0:9000".parse().unwrap()));
            }
            _ => panic!("expected serve"),
        }
    }
}
