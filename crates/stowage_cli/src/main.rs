//! `stowage` command-line front-end.
//!
//! # Responsibility
//! - Parse arguments, open the inventory store and dispatch subcommands.
//! - Report failures as diagnostics with a non-zero exit code.

mod args;
mod commands;
mod context;
mod helpers;

use clap::Parser;
use miette::Result;
use stowage_core::MasterKind;

use crate::args::{Cli, Commands};
use crate::context::Context;

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .unicode(true)
                .context_lines(2)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    let ctx = Context::open(&cli.global)?;

    match cli.command {
        Commands::Category(cmd) => commands::master::run(cmd, MasterKind::Category, &ctx),
        Commands::Location(cmd) => commands::master::run(cmd, MasterKind::Location, &ctx),
        Commands::Tag(cmd) => commands::master::run(cmd, MasterKind::Tag, &ctx),
        Commands::Item(cmd) => commands::item::run(cmd, &ctx),
        Commands::Export(args) => commands::export::run(args, &ctx),
    }
}
