//! Whole-inventory snapshot for export.
//!
//! # Responsibility
//! - Gather every master record and item into one serializable value.
//!
//! # Invariants
//! - Master lists are in display order; items are in storage order.
//! - Snapshots are read-only; nothing here writes.

use crate::model::item::Item;
use crate::model::master::{MasterKind, MasterRecord};
use crate::model::{now_epoch_ms, EpochMs};
use crate::query::collation::sort_masters_by_name;
use crate::repo::item_repo::ItemRepository;
use crate::repo::master_repo::MasterRepository;
use crate::repo::RepoResult;
use serde::Serialize;

/// Snapshot layout version, bumped on incompatible shape changes.
pub const SNAPSHOT_FORMAT_VERSION: u32 = 1;

/// Serializable copy of the full inventory.
#[derive(Debug, Clone, Serialize)]
pub struct InventorySnapshot {
    pub format_version: u32,
    pub exported_at: EpochMs,
    pub categories: Vec<MasterRecord>,
    pub locations: Vec<MasterRecord>,
    pub tags: Vec<MasterRecord>,
    pub items: Vec<Item>,
}

/// Reads the whole inventory through the given repositories.
pub fn snapshot(
    items: &impl ItemRepository,
    masters: &impl MasterRepository,
) -> RepoResult<InventorySnapshot> {
    let sorted = |kind: MasterKind| -> RepoResult<Vec<MasterRecord>> {
        let mut records = masters.list_masters(kind)?;
        sort_masters_by_name(&mut records);
        Ok(records)
    };

    Ok(InventorySnapshot {
        format_version: SNAPSHOT_FORMAT_VERSION,
        exported_at: now_epoch_ms(),
        categories: sorted(MasterKind::Category)?,
        locations: sorted(MasterKind::Location)?,
        tags: sorted(MasterKind::Tag)?,
        items: items.list_items()?,
    })
}
