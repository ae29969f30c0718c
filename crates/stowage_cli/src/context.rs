//! Runtime configuration and store handle shared by all commands.
//!
//! # Invariants
//! - Logging starts before the database is opened so open/migrate events
//!   are captured.
//! - A store that cannot be opened or migrated aborts the command.

use directories::ProjectDirs;
use log::info;
use miette::{IntoDiagnostic, Result};
use rusqlite::Connection;
use std::path::PathBuf;
use stowage_core::{
    default_log_level, init_logging, open_db, ItemService, MasterService, SqliteItemRepository,
    SqliteMasterRepository,
};

use crate::args::GlobalOpts;
use crate::helpers::report;

const DB_FILE_NAME: &str = "stowage.sqlite3";

pub type CliMasterService<'conn> = MasterService<SqliteMasterRepository<'conn>>;
pub type CliItemService<'conn> =
    ItemService<SqliteItemRepository<'conn>, SqliteMasterRepository<'conn>>;

pub struct Context {
    conn: Connection,
}

impl Context {
    pub fn open(global: &GlobalOpts) -> Result<Self> {
        if let Some(log_dir) = &global.log_dir {
            let level = global.log_level.as_deref().unwrap_or(default_log_level());
            init_logging(level, log_dir).map_err(report)?;
        }

        let db_path = match &global.db {
            Some(path) => path.clone(),
            None => default_db_path()?,
        };
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).into_diagnostic()?;
            }
        }

        let conn = open_db(&db_path).map_err(|err| {
            miette::miette!("cannot open inventory at `{}`: {err}", db_path.display())
        })?;
        info!("event=cli_store_open module=cli status=ok");
        Ok(Self { conn })
    }

    pub fn masters(&self) -> Result<CliMasterService<'_>> {
        let repo = SqliteMasterRepository::try_new(&self.conn).map_err(report)?;
        Ok(MasterService::new(repo))
    }

    pub fn items(&self) -> Result<CliItemService<'_>> {
        let items = SqliteItemRepository::try_new(&self.conn).map_err(report)?;
        let masters = SqliteMasterRepository::try_new(&self.conn).map_err(report)?;
        Ok(ItemService::new(items, masters))
    }

    pub fn item_repo(&self) -> Result<SqliteItemRepository<'_>> {
        SqliteItemRepository::try_new(&self.conn).map_err(report)
    }

    pub fn master_repo(&self) -> Result<SqliteMasterRepository<'_>> {
        SqliteMasterRepository::try_new(&self.conn).map_err(report)
    }
}

fn default_db_path() -> Result<PathBuf> {
    ProjectDirs::from("", "", "stowage")
        .map(|dirs| dirs.data_dir().join(DB_FILE_NAME))
        .ok_or_else(|| miette::miette!("Could not determine a data directory; pass --db"))
}
