//! Core domain logic for Stowage, a personal inventory tracker.
//! This crate owns the item/master invariants and the browse query engine.

pub mod db;
pub mod logging;
pub mod model;
pub mod query;
pub mod repo;
pub mod service;

pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::item::{Condition, Item, ItemEdit, ItemId, ItemValidationError, DEFAULT_ITEM_NAME};
pub use model::master::{MasterId, MasterKind, MasterRecord};
pub use model::{now_epoch_ms, Clock, EpochMs};
pub use query::collation::{compare_names, sort_masters_by_name};
pub use query::selection::{reconcile_selection, selection_after_delete};
pub use query::visible::{derive_visible_list, tag_names, FilterState, SortOption, TagNames};
pub use repo::item_repo::{ItemRepository, SqliteItemRepository};
pub use repo::master_repo::{MasterRepository, SqliteMasterRepository};
pub use repo::{RepoError, RepoResult};
pub use service::browse_session::BrowseSession;
pub use service::export_service::{snapshot, InventorySnapshot};
pub use service::item_service::{parse_price, ItemService, ItemServiceError};
pub use service::master_service::{MasterService, MasterServiceError, MasterUsage};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
