//! Visible-list derivation: filter, search and sort over all items.
//!
//! # Responsibility
//! - Turn the full item set plus browse state into the ordered list the
//!   presentation layer renders.
//!
//! # Invariants
//! - Pure: no I/O, no mutation of inputs.
//! - Sorting is stable. Items with equal sort keys keep their input order,
//!   which repositories fix as `created_at ASC, id ASC`.

use crate::model::item::Item;
use crate::model::master::{MasterId, MasterRecord};
use crate::query::collation::CollationKey;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::HashMap;

/// Tag id to display name lookup used by search.
pub type TagNames = HashMap<MasterId, String>;

/// Builds a [`TagNames`] lookup from tag records.
pub fn tag_names<'a>(tags: impl IntoIterator<Item = &'a MasterRecord>) -> TagNames {
    tags.into_iter()
        .map(|tag| (tag.id, tag.name.clone()))
        .collect()
}

/// Visible-list ordering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOption {
    /// Most recently modified first.
    #[default]
    UpdatedDesc,
    /// Most recently created first.
    CreatedDesc,
    NameAsc,
    NameDesc,
}

impl SortOption {
    pub const ALL: [SortOption; 4] = [
        Self::UpdatedDesc,
        Self::CreatedDesc,
        Self::NameAsc,
        Self::NameDesc,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::UpdatedDesc => "updated_desc",
            Self::CreatedDesc => "created_desc",
            Self::NameAsc => "name_asc",
            Self::NameDesc => "name_desc",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|option| option.as_str() == value)
    }
}

/// Browse state that drives the visible list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    /// Free-text search; trimmed before use, blank disables search.
    pub search: String,
    /// Only items in this category, compared by id.
    pub category: Option<MasterId>,
    /// Only items at this location, compared by id.
    pub location: Option<MasterId>,
    /// Show disposed items as well.
    pub include_disposed: bool,
    pub sort: SortOption,
}

/// Derives the ordered visible list.
///
/// Steps, in order: drop disposed items unless included, apply the category
/// and location filters, apply the case-insensitive search over
/// [`searchable_text`], then sort by `filter.sort`.
pub fn derive_visible_list<'a>(
    items: &'a [Item],
    tag_names: &TagNames,
    filter: &FilterState,
) -> Vec<&'a Item> {
    let needle = filter.search.trim().to_lowercase();

    let mut visible = items
        .iter()
        .filter(|item| filter.include_disposed || !item.is_disposed())
        .filter(|item| {
            filter
                .category
                .map_or(true, |category| item.category_id() == Some(category))
        })
        .filter(|item| {
            filter
                .location
                .map_or(true, |location| item.location_id() == Some(location))
        })
        .filter(|item| needle.is_empty() || searchable_text(item, tag_names).contains(&needle))
        .collect::<Vec<_>>();

    sort_items(&mut visible, filter.sort);
    visible
}

/// Lowercased text the search term is matched against.
///
/// Concatenates name, notes, brand, model number, serial number, purchase
/// store, color, accessories, consumable replacement, link and the
/// assigned tag names, skipping unset fields.
pub fn searchable_text(item: &Item, tag_names: &TagNames) -> String {
    let tags = item
        .tag_ids()
        .iter()
        .filter_map(|id| tag_names.get(id).map(String::as_str))
        .collect::<Vec<_>>()
        .join(" ");

    let fields = [
        Some(item.name()),
        item.notes(),
        item.brand(),
        item.model_number(),
        item.serial_number(),
        item.purchase_store(),
        item.color(),
        item.accessories(),
        item.consumable_replacement(),
        item.link(),
        Some(tags.as_str()),
    ];

    fields
        .into_iter()
        .flatten()
        .filter(|value| !value.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

fn sort_items(items: &mut [&Item], sort: SortOption) {
    match sort {
        SortOption::UpdatedDesc => items.sort_by_key(|item| Reverse(item.updated_at())),
        SortOption::CreatedDesc => items.sort_by_key(|item| Reverse(item.created_at())),
        SortOption::NameAsc => items.sort_by_cached_key(|item| CollationKey::new(item.name())),
        SortOption::NameDesc => {
            items.sort_by_cached_key(|item| Reverse(CollationKey::new(item.name())))
        }
    }
}
