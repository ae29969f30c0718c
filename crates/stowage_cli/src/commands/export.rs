//! `stowage export` command - JSON snapshot of the whole inventory

use console::style;
use miette::{IntoDiagnostic, Result};
use std::path::PathBuf;
use stowage_core::snapshot;

use crate::context::Context;
use crate::helpers::report;

#[derive(clap::Args, Debug)]
pub struct ExportArgs {
    /// Write to this file instead of stdout
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

pub fn run(args: ExportArgs, ctx: &Context) -> Result<()> {
    let items = ctx.item_repo()?;
    let masters = ctx.master_repo()?;
    let inventory = snapshot(&items, &masters).map_err(report)?;
    let json = serde_json::to_string_pretty(&inventory).into_diagnostic()?;

    match args.output {
        Some(path) => {
            std::fs::write(&path, json).into_diagnostic()?;
            eprintln!(
                "{} Exported {} items to {}",
                style("✓").green(),
                style(inventory.items.len()).cyan(),
                style(path.display()).dim()
            );
        }
        None => println!("{json}"),
    }
    Ok(())
}
