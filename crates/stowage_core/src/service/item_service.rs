//! Item use-case service.
//!
//! # Responsibility
//! - Create items with defaults taken from the active browse filter.
//! - Apply field edits through the entity and persist them atomically.
//! - Delete items and serve the derived visible list.
//!
//! # Invariants
//! - Every edit goes through `Item::apply`, so `updated_at` and the
//!   disposal timestamp follow the entity rules.
//! - A batch of edits is persisted as one write.

use crate::model::item::{Item, ItemEdit, ItemId, DEFAULT_ITEM_NAME};
use crate::model::master::{MasterId, MasterKind};
use crate::model::{now_epoch_ms, Clock};
use crate::query::collation::sort_masters_by_name;
use crate::query::visible::{derive_visible_list, tag_names, FilterState, TagNames};
use crate::repo::item_repo::ItemRepository;
use crate::repo::master_repo::MasterRepository;
use crate::repo::RepoError;
use log::{debug, info};
use rust_decimal::Decimal;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Service error for item use-cases.
#[derive(Debug)]
pub enum ItemServiceError {
    /// Target item does not exist.
    ItemNotFound(ItemId),
    /// The item would reference a missing category, location or tag.
    UnknownReference { kind: MasterKind, id: MasterId },
    Repo(RepoError),
}

impl Display for ItemServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ItemNotFound(id) => write!(f, "item not found: {id}"),
            Self::UnknownReference { kind, id } => write!(f, "{kind} not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ItemServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ItemServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::ItemNotFound(id),
            RepoError::UnknownReference { kind, id } => Self::UnknownReference { kind, id },
            other => Self::Repo(other),
        }
    }
}

pub type ItemServiceResult<T> = Result<T, ItemServiceError>;

/// Item facade over item and master repositories.
pub struct ItemService<I: ItemRepository, M: MasterRepository> {
    items: I,
    masters: M,
    clock: Clock,
}

impl<I: ItemRepository, M: MasterRepository> ItemService<I, M> {
    /// Creates a service that stamps edits with wall-clock time.
    pub fn new(items: I, masters: M) -> Self {
        Self::with_clock(items, masters, now_epoch_ms)
    }

    pub fn with_clock(items: I, masters: M, clock: Clock) -> Self {
        Self {
            items,
            masters,
            clock,
        }
    }

    /// Creates a placeholder item.
    ///
    /// Category and location come from the active filter when set,
    /// otherwise from the first record of that kind in display order, or
    /// stay empty when none exist.
    pub fn create_item(&self, filter: &FilterState) -> ItemServiceResult<Item> {
        let now = (self.clock)();
        let mut item = Item::new(DEFAULT_ITEM_NAME, now);
        item.category_id = self.default_master(MasterKind::Category, filter.category)?;
        item.location_id = self.default_master(MasterKind::Location, filter.location)?;

        self.items.create_item(&item)?;
        info!(
            "event=item_create module=service status=ok id={} has_category={} has_location={}",
            item.id,
            item.category_id.is_some(),
            item.location_id.is_some()
        );
        Ok(item)
    }

    pub fn get_item(&self, id: ItemId) -> ItemServiceResult<Option<Item>> {
        Ok(self.items.get_item(id)?)
    }

    /// All items in storage order.
    pub fn list_items(&self) -> ItemServiceResult<Vec<Item>> {
        Ok(self.items.list_items()?)
    }

    /// Applies `edits` in order and persists the result.
    pub fn edit_item(&self, id: ItemId, edits: Vec<ItemEdit>) -> ItemServiceResult<Item> {
        let mut item = self
            .items
            .get_item(id)?
            .ok_or(ItemServiceError::ItemNotFound(id))?;

        let edit_count = edits.len();
        let now = (self.clock)();
        for edit in edits {
            item.apply(edit, now);
        }

        self.items.update_item(&item)?;
        debug!("event=item_edit module=service status=ok id={id} edits={edit_count}");
        Ok(item)
    }

    pub fn delete_item(&self, id: ItemId) -> ItemServiceResult<()> {
        self.items.delete_item(id)?;
        info!("event=item_delete module=service status=ok id={id}");
        Ok(())
    }

    /// Deletes several items at once; returns how many existed.
    pub fn delete_items(&self, ids: &[ItemId]) -> ItemServiceResult<usize> {
        let removed = self.items.delete_items(ids)?;
        info!(
            "event=item_delete_batch module=service status=ok requested={} removed={removed}",
            ids.len()
        );
        Ok(removed)
    }

    /// Tag name lookup for search.
    pub fn tag_names(&self) -> ItemServiceResult<TagNames> {
        let tags = self.masters.list_masters(MasterKind::Tag)?;
        Ok(tag_names(&tags))
    }

    /// Loads everything and derives the visible list for `filter`.
    pub fn visible_items(&self, filter: &FilterState) -> ItemServiceResult<Vec<Item>> {
        let items = self.items.list_items()?;
        let names = self.tag_names()?;
        Ok(derive_visible_list(&items, &names, filter)
            .into_iter()
            .cloned()
            .collect())
    }

    fn default_master(
        &self,
        kind: MasterKind,
        active_filter: Option<MasterId>,
    ) -> ItemServiceResult<Option<MasterId>> {
        if active_filter.is_some() {
            return Ok(active_filter);
        }
        let mut records = self.masters.list_masters(kind)?;
        sort_masters_by_name(&mut records);
        Ok(records.first().map(|record| record.id))
    }
}

/// Parses user price input.
///
/// Blank or malformed input yields `None`, which clears the field instead
/// of failing the edit.
pub fn parse_price(input: &str) -> Option<Decimal> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    Decimal::from_str(trimmed).ok()
}
