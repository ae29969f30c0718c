//! List/selection state for one browsing surface.
//!
//! # Responsibility
//! - Own the filter/sort state and the current selection.
//! - Re-derive the visible list on demand and keep the selection inside it.
//!
//! # Invariants
//! - After `refresh`, a present selection is always a member of the
//!   returned list.

use crate::model::item::{Item, ItemId};
use crate::model::master::MasterId;
use crate::query::selection::{reconcile_selection, selection_after_delete};
use crate::query::visible::{derive_visible_list, FilterState, SortOption, TagNames};

/// Browse state: filter inputs plus selection.
#[derive(Debug, Clone, Default)]
pub struct BrowseSession {
    filter: FilterState,
    selected: Option<ItemId>,
}

impl BrowseSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from an existing filter, e.g. one restored from CLI flags.
    pub fn with_filter(filter: FilterState) -> Self {
        Self {
            filter,
            selected: None,
        }
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn selected(&self) -> Option<ItemId> {
        self.selected
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.filter.search = search.into();
    }

    pub fn set_category(&mut self, category: Option<MasterId>) {
        self.filter.category = category;
    }

    pub fn set_location(&mut self, location: Option<MasterId>) {
        self.filter.location = location;
    }

    pub fn set_include_disposed(&mut self, include_disposed: bool) {
        self.filter.include_disposed = include_disposed;
    }

    pub fn set_sort(&mut self, sort: SortOption) {
        self.filter.sort = sort;
    }

    /// Derives the visible list and reconciles the selection against it.
    pub fn refresh<'a>(&mut self, items: &'a [Item], tag_names: &TagNames) -> Vec<&'a Item> {
        let visible = derive_visible_list(items, tag_names, &self.filter);
        self.selected = reconcile_selection(self.selected, &visible);
        visible
    }

    /// Selects `id` if it is visible (or clears with `None`).
    ///
    /// Returns `false` and keeps the old selection for hidden ids.
    pub fn select(&mut self, id: Option<ItemId>, visible: &[&Item]) -> bool {
        match id {
            Some(id) if !visible.iter().any(|item| item.id() == id) => false,
            other => {
                self.selected = other;
                true
            }
        }
    }

    /// Moves the selection off deleted items.
    ///
    /// `visible` is the list that was on screen when the delete happened.
    pub fn after_delete(&mut self, deleted: &[ItemId], visible: &[&Item]) {
        self.selected = selection_after_delete(self.selected, deleted, visible);
    }
}
