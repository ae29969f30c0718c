//! Selection reconciliation against the visible list.

use crate::model::item::{Item, ItemId};

/// Keeps `selected` if it is still visible, otherwise falls back to the
/// first visible item (or nothing when the list is empty).
///
/// No selection stays no selection.
pub fn reconcile_selection(selected: Option<ItemId>, visible: &[&Item]) -> Option<ItemId> {
    match selected {
        Some(id) if visible.iter().any(|item| item.id() == id) => Some(id),
        Some(_) => visible.first().map(|item| item.id()),
        None => None,
    }
}

/// Selection after `deleted` items are removed.
///
/// `visible` is the list as rendered before the deletion. When the selected
/// item was deleted, the first visible item that survives the deletion is
/// selected instead.
pub fn selection_after_delete(
    selected: Option<ItemId>,
    deleted: &[ItemId],
    visible: &[&Item],
) -> Option<ItemId> {
    match selected {
        Some(id) if !deleted.contains(&id) => Some(id),
        Some(_) => visible
            .iter()
            .map(|item| item.id())
            .find(|id| !deleted.contains(id)),
        None => None,
    }
}

#[cfg(test)]
mod tests {
    use super::{reconcile_selection, selection_after_delete};
    use crate::model::item::Item;
    use uuid::Uuid;

    #[test]
    fn reconcile_keeps_visible_selection() {
        let a = Item::new("a", 1);
        let b = Item::new("b", 2);
        let visible = vec![&a, &b];
        assert_eq!(reconcile_selection(Some(b.id()), &visible), Some(b.id()));
    }

    #[test]
    fn reconcile_falls_back_to_first_or_none() {
        let a = Item::new("a", 1);
        let b = Item::new("b", 2);
        assert_eq!(
            reconcile_selection(Some(Uuid::new_v4()), &[&a, &b]),
            Some(a.id())
        );
        assert_eq!(reconcile_selection(None, &[&a]), None);
        assert_eq!(reconcile_selection(Some(a.id()), &[]), None);
    }

    #[test]
    fn delete_skips_every_deleted_item() {
        let a = Item::new("a", 1);
        let b = Item::new("b", 2);
        let c = Item::new("c", 3);
        let visible = vec![&a, &b, &c];

        let next = selection_after_delete(Some(a.id()), &[a.id(), b.id()], &visible);
        assert_eq!(next, Some(c.id()));

        let untouched = selection_after_delete(Some(c.id()), &[a.id()], &visible);
        assert_eq!(untouched, Some(c.id()));

        let emptied = selection_after_delete(Some(a.id()), &[a.id(), b.id(), c.id()], &visible);
        assert_eq!(emptied, None);
    }
}
