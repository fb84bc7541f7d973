//! To-do MCP Server - Main Entry Point
//!
//! This is the main entry point for the to-do MCP server application.
//! The actual implementation is in the `todo_mcp` library.

use anyhow::{Context, Result};
use clap::Parser;
use mcp_attr::server::serve_stdio;
use std::path::PathBuf;
use todo_mcp::{Config, TodoServerHandler};
use tracing_subscriber::EnvFilter;

/// To-do MCP Server - local to-do list with daily reminders via Model Context Protocol
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the SQLite database file (overrides the config file)
    database: Option<PathBuf>,

    /// Path to a TOML config file
    #[arg(long, default_value = "todo-mcp.toml")]
    config: PathBuf,

    /// Disable daily reminders
    #[arg(long)]
    no_reminders: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let mut config = Config::load(&args.config)
        .with_context(|| format!("loading {}", args.config.display()))?;
    if let Some(database) = args.database {
        config.database_path = database;
    }
    if args.no_reminders {
        config.reminders_enabled = false;
    }

    // stdout carries the MCP protocol, so logs go to stderr.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_filter)),
        )
        .init();

    tracing::info!(
        database = %config.database_path.display(),
        reminders = config.reminders_enabled,
        "todo-mcp starting"
    );

    let handler = TodoServerHandler::new(&config.database_path, config.reminders_enabled)
        .await
        .with_context(|| format!("opening {}", config.database_path.display()))?;
    serve_stdio(handler).await?;

    tracing::info!("todo-mcp shut down");
    Ok(())
}
