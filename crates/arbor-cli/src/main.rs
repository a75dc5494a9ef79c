use anyhow::{Context, Result};
use arbor_application::ExplorerService;
use arbor_infrastructure::{ArborPaths, ConfigService, JsonFileTreeStore};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "arbor")]
#[command(about = "Arbor - browse and organize the persisted resource tree", long_about = None)]
struct Cli {
    /// Configuration file (defaults to ~/.config/arbor/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Tree document (overrides `tree_file` from the configuration)
    #[arg(long, global = true)]
    tree: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the visible tree
    Show {
        /// Free-text filter
        #[arg(long)]
        filter: Option<String>,
        /// Only favorites and their ancestors
        #[arg(long)]
        favorites: bool,
        /// Include hidden nodes
        #[arg(long)]
        hidden: bool,
        /// Profile scope
        #[arg(long)]
        profile: Option<String>,
    },
    /// Add a node
    Add {
        #[command(subcommand)]
        node: AddCommand,
    },
    /// Remove a node and its subtree
    Remove { id: String },
    /// Mark a node as favorite
    Favorite {
        id: String,
        /// Clear the flag instead
        #[arg(long)]
        off: bool,
    },
    /// Hide a node
    Hide {
        id: String,
        /// Unhide instead
        #[arg(long)]
        off: bool,
    },
    /// Change a node's label
    Rename { id: String, label: String },
    /// List registered node kinds and their persisted fields
    Kinds,
}

#[derive(Subcommand)]
pub enum AddCommand {
    /// A folder
    Folder {
        label: String,
        #[arg(long)]
        parent: Option<String>,
    },
    /// A note
    Note {
        label: String,
        #[arg(long)]
        content: Option<String>,
        #[arg(long)]
        parent: Option<String>,
    },
    /// A bash script
    Script {
        label: String,
        /// Script body
        #[arg(long)]
        script: String,
        #[arg(long)]
        shell: Option<String>,
        #[arg(long)]
        parent: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let paths = match &cli.config {
        Some(path) => ArborPaths::with_base_dir(
            path.parent().map(PathBuf::from).unwrap_or_default(),
        ),
        None => ArborPaths::new()?,
    };
    let config_service = match &cli.config {
        Some(path) => ConfigService::new(path, paths),
        None => ConfigService::from_paths(paths),
    };
    let config = config_service
        .load()
        .with_context(|| format!("loading {}", config_service.config_file().display()))?;

    init_tracing(&config.log_level);

    let tree_file = cli
        .tree
        .clone()
        .unwrap_or_else(|| config_service.tree_file(&config));
    tracing::debug!(tree = %tree_file.display(), "Using tree document");

    let service = ExplorerService::with_default_registry(Arc::new(JsonFileTreeStore::new(tree_file)));
    service.load().await?;

    match cli.command {
        Commands::Show {
            filter,
            favorites,
            hidden,
            profile,
        } => {
            let mut view = config.initial_filter();
            if filter.is_some() {
                view.text = filter;
            }
            if profile.is_some() {
                view.profile = profile;
            }
            view.show_only_favorites |= favorites;
            view.show_hidden |= hidden;
            commands::show(&service, &view).await;
        }
        Commands::Add { node } => commands::add(&service, node).await?,
        Commands::Remove { id } => commands::remove(&service, &id).await?,
        Commands::Favorite { id, off } => commands::favorite(&service, &id, !off).await?,
        Commands::Hide { id, off } => commands::hide(&service, &id, !off).await?,
        Commands::Rename { id, label } => commands::rename(&service, &id, &label).await?,
        Commands::Kinds => commands::kinds(&service),
    }

    Ok(())
}

/// Logs go to stderr; `RUST_LOG` wins over the configured level.
fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
