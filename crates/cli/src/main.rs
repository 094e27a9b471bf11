//! dbq CLI - one-shot commands against a dbq SQLite store

mod logging;
mod output;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use dbq_core::application::queue::constants::{DEFAULT_BATCH_SIZE, DEFAULT_RECLAIM_WINDOW_MS};
use dbq_core::domain::{Message, RetrievalMode};
use dbq_core::port::time_provider::SystemTimeProvider;
use dbq_core::port::token_provider::UuidTokenProvider;
use dbq_core::QueueRegistry;
use dbq_infra_sqlite::{
    create_pool_with, run_migrations, PoolConfig, SqliteMessageRepository, SqliteQueueRepository,
};

const DEFAULT_DB_PATH: &str = "~/.dbq/queue.db";

#[derive(Parser)]
#[command(name = "dbq")]
#[command(about = "SQLite-backed message queue", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the SQLite database
    #[arg(long, global = true, env = "DBQ_DB_PATH", default_value = DEFAULT_DB_PATH)]
    db: String,

    /// Log format (pretty or json)
    #[arg(long, global = true, env = "DBQ_LOG_FORMAT", default_value = "pretty")]
    log_format: String,

    /// Print results as JSON instead of tables
    #[arg(long, global = true)]
    json: bool,

    /// Maximum SQLite connections in the pool
    #[arg(
        long,
        global = true,
        env = "DBQ_MAX_CONNECTIONS",
        default_value_t = PoolConfig::default().max_connections
    )]
    max_connections: u32,
}

#[derive(Subcommand)]
enum Commands {
    /// Enqueue a message
    Send {
        /// Queue name
        queue: String,

        /// Message content as a JSON document
        content: String,
    },

    /// Show pending messages without claiming them
    Peek {
        queue: String,

        /// Maximum number of messages
        #[arg(short = 'n', long, default_value_t = DEFAULT_BATCH_SIZE)]
        count: u32,
    },

    /// Claim pending messages for processing
    Claim {
        queue: String,

        #[arg(short = 'n', long, default_value_t = 1)]
        count: u32,
    },

    /// Claim and delete pending messages
    Eat {
        queue: String,

        #[arg(short = 'n', long, default_value_t = 1)]
        count: u32,
    },

    /// Delete a message by id
    Remove {
        queue: String,

        /// Message ID
        id: i64,
    },

    /// Return messages claimed longer ago than the window to pending
    Reclaim {
        queue: String,

        /// Claim age in seconds
        #[arg(long, env = "DBQ_RECLAIM_WINDOW_SECS", default_value_t = DEFAULT_RECLAIM_WINDOW_MS as u64 / 1000)]
        older_than: u64,
    },

    /// Show message counts
    Stats { queue: String },
}

async fn open_registry(db_path: &str, pool_config: &PoolConfig) -> Result<QueueRegistry> {
    let db_path = shellexpand::tilde(db_path).into_owned();

    if let Some(parent) = Path::new(&db_path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }

    info!(db_path = %db_path, "Opening database");

    let pool = create_pool_with(&db_path, pool_config)
        .await
        .with_context(|| format!("Failed to open database {}", db_path))?;
    run_migrations(&pool).await.context("Migration failed")?;

    Ok(QueueRegistry::new(
        Arc::new(SqliteQueueRepository::new(pool.clone())),
        Arc::new(SqliteMessageRepository::new(pool)),
        Arc::new(UuidTokenProvider),
        Arc::new(SystemTimeProvider),
    ))
}

fn print_messages(messages: &[Message], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(messages)?);
    } else if messages.is_empty() {
        println!("{}", "No messages".yellow());
    } else {
        println!("{}", output::messages_table(messages));
    }
    Ok(())
}

async fn retrieve(
    registry: &QueueRegistry,
    queue: &str,
    count: u32,
    mode: RetrievalMode,
    json: bool,
) -> Result<()> {
    let handle = registry.open(queue).await?;
    let messages = handle.get_messages(count, mode).await?;
    print_messages(&messages, json)
}

async fn run(cli: Cli) -> Result<()> {
    let pool_config = PoolConfig {
        max_connections: cli.max_connections,
        ..PoolConfig::default()
    };
    let registry = open_registry(&cli.db, &pool_config).await?;

    match cli.command {
        Commands::Send { queue, content } => {
            let value: serde_json::Value =
                serde_json::from_str(&content).context("Invalid JSON content")?;

            let handle = registry.open(&queue).await?;
            let id = handle.send(value).await?;

            if cli.json {
                println!("{}", serde_json::json!({ "id": id, "queue": queue }));
            } else {
                println!("{} {}", "✓ Message sent:".green().bold(), id);
            }
        }

        Commands::Peek { queue, count } => {
            retrieve(&registry, &queue, count, RetrievalMode::Reader, cli.json).await?;
        }

        Commands::Claim { queue, count } => {
            retrieve(&registry, &queue, count, RetrievalMode::Worker, cli.json).await?;
        }

        Commands::Eat { queue, count } => {
            retrieve(&registry, &queue, count, RetrievalMode::Eater, cli.json).await?;
        }

        Commands::Remove { queue, id } => {
            let handle = registry.open(&queue).await?;
            let removed = handle.remove(id).await?;

            if cli.json {
                println!("{}", serde_json::json!({ "id": id, "removed": removed }));
            } else if removed {
                println!("{}", format!("✓ Message {} removed", id).green().bold());
            } else {
                println!("{}", format!("○ Message {} not found in {}", id, queue).yellow());
            }
        }

        Commands::Reclaim { queue, older_than } => {
            let handle = registry.open(&queue).await?;
            let released = handle
                .reclaim_stale(Duration::from_secs(older_than))
                .await?;

            if cli.json {
                println!("{}", serde_json::json!({ "released": released }));
            } else {
                println!(
                    "{} {} message(s) returned to pending",
                    "✓".green(),
                    released
                );
            }
        }

        Commands::Stats { queue } => {
            let handle = registry.open(&queue).await?;
            let stats = handle.stats().await?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                println!("{}", output::stats_table(&queue, &stats));
            }
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(&cli.log_format)?;
    run(cli).await
}
