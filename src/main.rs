use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::mpsc;

use searchbox::app::App;
use searchbox::logging;
use searchbox::models::Document;
use searchbox::search::{InMemorySearchManager, SearchInputController, SubmitEvent, SystemClock};
use searchbox::storage::{
    Config, ConfigStorage, DocumentStorage, TomlConfigStorage, TomlDocumentStorage,
    ensure_directories,
};

#[derive(Parser)]
#[command(name = "searchbox")]
#[command(about = "Throttled search box over a TOML document set", long_about = None)]
struct Cli {
    /// Config file (default: $XDG_CONFIG_HOME/searchbox/searchbox.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Documents file, overrides `general.documents_file`
    #[arg(short, long, global = true)]
    documents: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Submit one query and print the hits
    Query {
        text: String,

        /// Number of hits to show (default: 10)
        #[arg(short, long, default_value = "10")]
        limit: usize,
    },

    /// Print the accessor options the configured search box derives
    Options,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Query { ref text, limit }) => {
            env_logger::init();
            cmd_query(&cli, text, limit)
        }
        Some(Commands::Options) => {
            env_logger::init();
            cmd_options(&cli)
        }
        None => cmd_tui(&cli),
    }
}

/// Resolve config and documents from flags, falling back to XDG paths
fn load(cli: &Cli) -> Result<(Config, Vec<Document>, PathBuf)> {
    let (data_dir, config_dir) = ensure_directories()?;

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| config_dir.join("searchbox.toml"));
    let config = TomlConfigStorage::new(config_path).load()?;

    let documents_path = cli
        .documents
        .clone()
        .or_else(|| config.general.documents_file.clone())
        .unwrap_or_else(|| data_dir.join("documents.toml"));
    let documents = TomlDocumentStorage::new(documents_path).load()?;

    Ok((config, documents, data_dir))
}

/// Launch the interactive search box
fn cmd_tui(cli: &Cli) -> Result<()> {
    let (config, documents, data_dir) = load(cli)?;

    let (flash_tx, flash_rx) = mpsc::channel();
    logging::init_logger(
        &data_dir.join("searchbox.log"),
        Some(flash_tx),
        &config.general,
    )?;
    log::info!("Starting TUI with {} documents", documents.len());

    let mut app = App::new(config, documents, Rc::new(SystemClock), Some(flash_rx))?;

    let mut terminal = ratatui::init();
    let result = app.run(&mut terminal);
    ratatui::restore();

    result
}

/// Type the query into a mounted search box and submit it
fn cmd_query(cli: &Cli, text: &str, limit: usize) -> Result<()> {
    let (config, documents, _) = load(cli)?;

    let manager = Rc::new(
        InMemorySearchManager::new(documents).with_max_results(config.general.max_results),
    );
    let props = config.search_box.to_props();
    let mut controller = SearchInputController::mount(&props, manager.clone(), Rc::new(SystemClock))
        .context("Failed to mount search box")?;

    controller.on_input(text)?;
    controller.on_submit(&mut SubmitEvent::new())?;

    let hits = manager.results();
    println!(
        "Results for {:?} ({} of {} documents):",
        controller.query(),
        hits.len(),
        manager.documents().len()
    );
    println!("{}", "=".repeat(60));

    for (i, hit) in hits.iter().take(limit).enumerate() {
        println!("{:3}. {} [{}]", i + 1, hit.title, hit.id);
    }

    if hits.is_empty() {
        println!("(no matches)");
    }

    Ok(())
}

fn cmd_options(cli: &Cli) -> Result<()> {
    let (config, _, _) = load(cli)?;

    let props = config.search_box.to_props();
    let options = toml::to_string_pretty(&props.accessor_options())
        .context("Failed to serialize accessor options")?;

    println!("Accessor: {}", props.id);
    println!("Search on change: {}", props.search_on_change);
    println!("Throttle: {}ms", props.throttle.as_millis());
    println!("{}", "=".repeat(60));
    print!("{}", options);

    Ok(())
}
