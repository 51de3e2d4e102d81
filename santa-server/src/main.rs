//! Secret Santa Server
//!
//! Runs gift exchange events: registration against an eligibility roster,
//! random assignment, and token-gated reveal. Operator tasks (roster import,
//! assignment generation) run as one-shot subcommands against the same
//! database.

mod api;
mod commands;
mod config;
mod server;
mod shutdown;
mod state;

use clap::{Parser, Subcommand};
use config::{ConfigLoader, LoadedConfig, get_database_url};
use santa_core::exchange::GiftExchange;
use santa_core::store::PgStore;
use server::{build_router, run_server};
use shutdown::spawn_config_reload_handler;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use state::AppState;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Secret Santa - gift exchange assignment and reveal server
#[derive(Parser, Debug)]
#[command(name = "santa-server")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, global = true, default_value = "./santa-config.toml")]
    config: PathBuf,

    /// Override the listen address (e.g., 0.0.0.0:3000)
    #[arg(short, long, global = true)]
    listen: Option<SocketAddr>,

    /// Run database migrations before the command
    #[arg(long, global = true, default_value = "false")]
    migrate: bool,

    /// Defaults to `serve`
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Command {
    /// Run the HTTP server
    Serve,

    /// Import eligible students from a JSON roster file
    ImportRoster {
        /// JSON array of `{"external_id", "display_name"}` records
        file: PathBuf,

        /// Overwrite display names of ids already on the roster
        #[arg(long)]
        update_existing: bool,
    },

    /// Generate assignments for an event whose registration is closed
    Generate {
        #[arg(short, long)]
        event_id: i64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let args = Args::parse();

    tracing::info!("Starting santa-server v{}", env!("CARGO_PKG_VERSION"));

    let config_loader = Arc::new(ConfigLoader::new(&args.config, args.listen));
    let loaded_config = config_loader.load().map_err(|e| {
        tracing::error!("Failed to load configuration: {}", e);
        e
    })?;
    tracing::info!("Configuration loaded from {:?}", args.config);

    let db_pool = connect_database(args.migrate).await?;

    let result = match args.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(db_pool.clone(), loaded_config, config_loader).await,
        Command::ImportRoster {
            file,
            update_existing,
        } => {
            let exchange = GiftExchange::new(PgStore::new(db_pool.clone()));
            commands::import_roster(&exchange, loaded_config.registry, &file, update_existing)
                .await
                .map(|summary| {
                    println!(
                        "Import completed: {} created, {} updated, {} skipped, {} invalid",
                        summary.created, summary.updated, summary.skipped, summary.invalid
                    );
                })
        }
        Command::Generate { event_id } => {
            let exchange = GiftExchange::new(PgStore::new(db_pool.clone()));
            commands::generate_assignments(&exchange, event_id)
                .await
                .map(|(name, assigned)| {
                    println!("Successfully generated {assigned} assignments for event: {name}");
                })
        }
    };

    tracing::info!("Closing database connections...");
    db_pool.close().await;

    result.map_err(|e| {
        tracing::error!("Command failed: {:#}", e);
        e
    })
}

async fn connect_database(migrate: bool) -> anyhow::Result<PgPool> {
    let database_url = get_database_url().map_err(|e| {
        tracing::error!("DATABASE_URL environment variable not set");
        e
    })?;

    tracing::info!("Connecting to database...");
    let db_pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&database_url)
        .await
        .map_err(|e| {
            tracing::error!("Failed to connect to database: {}", e);
            e
        })?;
    tracing::info!("Database connection established");

    if migrate {
        tracing::info!("Running database migrations...");
        sqlx::migrate!("../migrations")
            .run(&db_pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to run migrations: {}", e);
                e
            })?;
        tracing::info!("Migrations completed successfully");
    }

    Ok(db_pool)
}

async fn serve(
    db_pool: PgPool,
    loaded_config: LoadedConfig,
    config_loader: Arc<ConfigLoader>,
) -> anyhow::Result<()> {
    let listen_addr = loaded_config.server.listen;
    let state = AppState::new(db_pool, loaded_config.into_shared());

    // Reloads the admin secret and registry rules on SIGHUP.
    let shutdown_notify = spawn_config_reload_handler(state.clone(), config_loader);

    let router = build_router(state);

    tracing::info!("Starting HTTP server on {}", listen_addr);
    let result = run_server(router, listen_addr).await;

    shutdown_notify.notify_one();
    tracing::info!("Server shutdown complete");

    result.map_err(Into::into)
}

/// Initialize the tracing subscriber with environment-based filtering.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn,tower_http=debug"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serve_is_the_default() {
        let args = Args::try_parse_from(["santa-server", "--migrate"]).unwrap();
        assert!(args.migrate);
        assert_eq!(args.command, None);
        assert_eq!(args.config, PathBuf::from("./santa-config.toml"));
    }

    #[test]
    fn test_operator_subcommands() {
        let args =
            Args::try_parse_from(["santa-server", "generate", "--event-id", "7", "-c", "x.toml"])
                .unwrap();
        assert_eq!(args.command, Some(Command::Generate { event_id: 7 }));
        assert_eq!(args.config, PathBuf::from("x.toml"));

        let args = Args::try_parse_from([
            "santa-server",
            "import-roster",
            "roster.json",
            "--update-existing",
        ])
        .unwrap();
        assert_eq!(
            args.command,
            Some(Command::ImportRoster {
                file: PathBuf::from("roster.json"),
                update_existing: true,
            })
        );

        assert!(Args::try_parse_from(["santa-server", "generate"]).is_err());
    }
}
