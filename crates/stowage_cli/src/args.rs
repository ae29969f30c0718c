//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::commands::export::ExportArgs;
use crate::commands::item::ItemCommands;
use crate::commands::master::MasterCommands;

#[derive(Parser)]
#[command(name = "stowage")]
#[command(author, version, about = "Personal inventory tracker")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// SQLite database file (default: platform data dir)
    #[arg(long, global = true, env = "STOWAGE_DB_PATH")]
    pub db: Option<PathBuf>,

    /// Log level: trace, debug, info, warn, error
    #[arg(long, global = true, env = "STOWAGE_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Write rolling log files to this absolute directory
    #[arg(long, global = true, env = "STOWAGE_LOG_DIR")]
    pub log_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Category management
    #[command(subcommand)]
    Category(MasterCommands),

    /// Location management
    #[command(subcommand)]
    Location(MasterCommands),

    /// Tag management
    #[command(subcommand)]
    Tag(MasterCommands),

    /// Item management
    #[command(subcommand)]
    Item(ItemCommands),

    /// Dump all masters and items as JSON
    Export(ExportArgs),
}
