//! Dashweb console entry point

mod console;

use anyhow::Context;
use clap::{Parser, Subcommand};
use console::TableRow;
use dashweb_config::error::ConfigErrorSeverity;
use dashweb_config::{Config, ViewConfig, ViewKind};
use dashweb_core::{ControllerOptions, ListController, ListItem, SourceRef};
use dashweb_store::{seed, MemoryCollection};
use serde::de::DeserializeOwned;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Runtime;

#[derive(Parser, Debug)]
#[command(name = "dashweb")]
#[command(version = "0.1.0")]
#[command(about = "Searchable, paged admin lists in the terminal", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    /// Browse the user-management list
    Users,
    /// Browse the transaction ledger
    Transactions,
    /// Print the default configuration file
    Config,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let kind = match args.command {
        Command::Users => ViewKind::Users,
        Command::Transactions => ViewKind::Transactions,
        Command::Config => {
            print!("{}", Config::generate_default());
            return Ok(());
        }
    };

    // The log level comes from the config, so a missing file is reported once logging is up
    let (config, missing) = match Config::load(&args.config) {
        Ok(config) => (config, None),
        Err(e) if e.severity() == ConfigErrorSeverity::Warning => (Config::default(), Some(e)),
        Err(e) => {
            // Logging is not set up yet
            eprintln!("{}", e.to_details());
            return Err(e).with_context(|| format!("loading {}", args.config.display()));
        }
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.logging.level))
        .init();

    if let Some(e) = missing {
        log::warn!("{}; using defaults", e.to_details());
    }
    log::info!(
        "{} view: {} per page, debounce {}ms",
        kind,
        config.pagination.items_per_page,
        config.view(kind).debounce_ms
    );

    let rt = Runtime::new()?;
    rt.block_on(async {
        match kind {
            ViewKind::Users => browse(&config, kind, seed::users()).await,
            ViewKind::Transactions => browse(&config, kind, seed::transactions()).await,
        }
    })
}

async fn browse<T>(config: &Config, kind: ViewKind, seed: Vec<T>) -> anyhow::Result<()>
where
    T: ListItem + TableRow + DeserializeOwned,
{
    let view = config.view(kind);
    let source = open_source(view, config.pagination.items_per_page, seed).await?;
    let controller = ListController::new(source, ControllerOptions::from(view));

    console::run(controller, &config.pagination).await
}

async fn open_source<T>(view: &ViewConfig, items_per_page: usize, seed: Vec<T>) -> anyhow::Result<SourceRef<T>>
where
    T: ListItem + DeserializeOwned,
{
    let collection = match &view.fixture {
        Some(path) => MemoryCollection::from_json_file(path, items_per_page, view.latency())
            .await
            .with_context(|| format!("loading fixture {}", path.display()))?,
        None => MemoryCollection::with_latency(seed, items_per_page, view.latency()),
    };

    Ok(Arc::new(collection))
}
