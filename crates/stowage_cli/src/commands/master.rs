//! `stowage category|location|tag` commands

use clap::Subcommand;
use console::style;
use miette::{IntoDiagnostic, Result};
use stowage_core::MasterKind;

use crate::context::Context;
use crate::helpers::{report, resolve_master, short_id};

#[derive(Subcommand, Debug)]
pub enum MasterCommands {
    /// Create a record
    Add {
        /// Display name (surrounding whitespace is dropped)
        name: String,
    },

    /// Rename a record
    Rename {
        /// Name, id or id prefix of the record
        record: String,
        /// New display name
        name: String,
    },

    /// Delete a record; items keep existing without it
    Delete {
        /// Name, id or id prefix of the record
        record: String,
    },

    /// List records sorted by name
    List {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

pub fn run(cmd: MasterCommands, kind: MasterKind, ctx: &Context) -> Result<()> {
    match cmd {
        MasterCommands::Add { name } => run_add(kind, &name, ctx),
        MasterCommands::Rename { record, name } => run_rename(kind, &record, &name, ctx),
        MasterCommands::Delete { record } => run_delete(kind, &record, ctx),
        MasterCommands::List { json } => run_list(kind, json, ctx),
    }
}

fn run_add(kind: MasterKind, name: &str, ctx: &Context) -> Result<()> {
    let service = ctx.masters()?;
    match service.create(kind, name).map_err(report)? {
        Some(record) => println!(
            "{} Created {kind} {} {}",
            style("✓").green(),
            style(short_id(record.id)).cyan(),
            style(&record.name).yellow()
        ),
        None => println!(
            "{} Nothing created: {kind} name is empty",
            style("!").yellow()
        ),
    }
    Ok(())
}

fn run_rename(kind: MasterKind, key: &str, name: &str, ctx: &Context) -> Result<()> {
    let service = ctx.masters()?;
    let records = service.list(kind).map_err(report)?;
    let target = resolve_master(&records, kind, key)?;

    match service.rename(kind, target.id, name).map_err(report)? {
        Some(record) => println!(
            "{} Renamed {kind} {} to {}",
            style("✓").green(),
            style(short_id(record.id)).cyan(),
            style(&record.name).yellow()
        ),
        None => println!(
            "{} Kept `{}`: new name is empty",
            style("!").yellow(),
            target.name
        ),
    }
    Ok(())
}

fn run_delete(kind: MasterKind, key: &str, ctx: &Context) -> Result<()> {
    let service = ctx.masters()?;
    let records = service.list(kind).map_err(report)?;
    let target = resolve_master(&records, kind, key)?;

    let detached = service.delete(kind, target.id).map_err(report)?;
    println!(
        "{} Deleted {kind} {} ({} item{} updated)",
        style("✓").green(),
        style(&target.name).yellow(),
        style(detached).cyan(),
        if detached == 1 { "" } else { "s" }
    );
    Ok(())
}

fn run_list(kind: MasterKind, json: bool, ctx: &Context) -> Result<()> {
    let service = ctx.masters()?;
    let usage = service.list_with_usage(kind).map_err(report)?;

    if json {
        let records: Vec<_> = usage.iter().map(|entry| &entry.record).collect();
        println!("{}", serde_json::to_string_pretty(&records).into_diagnostic()?);
        return Ok(());
    }

    if usage.is_empty() {
        println!("No {kind} records.");
        return Ok(());
    }

    println!(
        "{:<10} {:>6}  {}",
        style("ID").bold(),
        style("ITEMS").bold(),
        style("NAME").bold()
    );
    for entry in &usage {
        println!(
            "{:<10} {:>6}  {}",
            style(short_id(entry.record.id)).cyan(),
            entry.item_count,
            entry.record.name
        );
    }
    Ok(())
}
