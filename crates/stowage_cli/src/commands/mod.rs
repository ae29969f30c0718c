//! Subcommand implementations

pub mod export;
pub mod item;
pub mod master;
