use chrono::NaiveDate;
use rusqlite::Connection;
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::atomic::{AtomicI64, Ordering};
use stowage_core::db::open_db_in_memory;
use stowage_core::{
    parse_price, Condition, EpochMs, FilterState, ItemEdit, ItemService, ItemServiceError,
    MasterKind, MasterService, SqliteItemRepository, SqliteMasterRepository, DEFAULT_ITEM_NAME,
};

type Items<'conn> = ItemService<SqliteItemRepository<'conn>, SqliteMasterRepository<'conn>>;

fn fixed_clock() -> EpochMs {
    5_000
}

static TICKS: AtomicI64 = AtomicI64::new(10_000);

fn ticking_clock() -> EpochMs {
    TICKS.fetch_add(1_000, Ordering::SeqCst)
}

fn items_with(conn: &Connection, clock: fn() -> EpochMs) -> Items<'_> {
    ItemService::with_clock(
        SqliteItemRepository::try_new(conn).unwrap(),
        SqliteMasterRepository::try_new(conn).unwrap(),
        clock,
    )
}

fn masters(conn: &Connection) -> MasterService<SqliteMasterRepository<'_>> {
    MasterService::with_clock(SqliteMasterRepository::try_new(conn).unwrap(), fixed_clock)
}

#[test]
fn create_without_masters_uses_placeholder_defaults() {
    let conn = open_db_in_memory().unwrap();
    let items = items_with(&conn, fixed_clock);

    let item = items.create_item(&FilterState::default()).unwrap();
    assert_eq!(item.name(), DEFAULT_ITEM_NAME);
    assert_eq!(item.category_id(), None);
    assert_eq!(item.location_id(), None);
    assert!(item.tag_ids().is_empty());
    assert_eq!(item.condition(), Condition::Good);
    assert_eq!(item.created_at(), fixed_clock());
    assert_eq!(item.updated_at(), fixed_clock());
    assert!(!item.is_disposed());
    assert_eq!(item.disposed_at(), None);

    let stored = items.get_item(item.id()).unwrap().unwrap();
    assert_eq!(stored.name(), DEFAULT_ITEM_NAME);
    assert_eq!(stored.created_at(), item.created_at());
}

#[test]
fn create_defaults_to_first_master_by_name_or_active_filter() {
    let conn = open_db_in_memory().unwrap();
    let masters = masters(&conn);
    let items = items_with(&conn, fixed_clock);

    let workshop = masters
        .create(MasterKind::Category, "Workshop")
        .unwrap()
        .unwrap();
    let appliances = masters
        .create(MasterKind::Category, "appliances")
        .unwrap()
        .unwrap();
    let attic = masters
        .create(MasterKind::Location, "Attic")
        .unwrap()
        .unwrap();

    let defaulted = items.create_item(&FilterState::default()).unwrap();
    assert_eq!(defaulted.category_id(), Some(appliances.id));
    assert_eq!(defaulted.location_id(), Some(attic.id));

    let filtered = items
        .create_item(&FilterState {
            category: Some(workshop.id),
            ..FilterState::default()
        })
        .unwrap();
    assert_eq!(filtered.category_id(), Some(workshop.id));
    assert_eq!(filtered.location_id(), Some(attic.id));
}

#[test]
fn edits_persist_every_field() {
    let conn = open_db_in_memory().unwrap();
    let masters = masters(&conn);
    let items = items_with(&conn, fixed_clock);
    let tag = masters.create(MasterKind::Tag, "cordless").unwrap().unwrap();
    let created = items.create_item(&FilterState::default()).unwrap();

    let purchase = NaiveDate::from_ymd_opt(2023, 4, 12).unwrap();
    let warranty = NaiveDate::from_ymd_opt(2026, 4, 12).unwrap();
    items
        .edit_item(
            created.id(),
            vec![
                ItemEdit::Name("Drill".to_string()),
                ItemEdit::AddTag(tag.id),
                ItemEdit::Notes(Some("spare battery in drawer".to_string())),
                ItemEdit::Brand(Some("Bosch".to_string())),
                ItemEdit::ModelNumber(Some("GSR 12V".to_string())),
                ItemEdit::SerialNumber(Some("SN-1".to_string())),
                ItemEdit::PurchaseDate(Some(purchase)),
                ItemEdit::PurchaseStore(Some("Hardware Co".to_string())),
                ItemEdit::PurchasePrice(parse_price("129.90")),
                ItemEdit::WarrantyExpiration(Some(warranty)),
                ItemEdit::Dimensions(Some("20x18x6 cm".to_string())),
                ItemEdit::Weight(Some("1.1 kg".to_string())),
                ItemEdit::Color(Some("blue".to_string())),
                ItemEdit::Condition(Condition::Normal),
                ItemEdit::Accessories(Some("charger".to_string())),
                ItemEdit::ConsumableReplacement(Some("bits".to_string())),
                ItemEdit::Link(Some("https://example.com/drill".to_string())),
            ],
        )
        .unwrap();

    let stored = items.get_item(created.id()).unwrap().unwrap();
    assert_eq!(stored.name(), "Drill");
    assert_eq!(stored.tag_ids(), &[tag.id]);
    assert_eq!(stored.notes(), Some("spare battery in drawer"));
    assert_eq!(stored.brand(), Some("Bosch"));
    assert_eq!(stored.model_number(), Some("GSR 12V"));
    assert_eq!(stored.serial_number(), Some("SN-1"));
    assert_eq!(stored.purchase_date(), Some(purchase));
    assert_eq!(stored.purchase_store(), Some("Hardware Co"));
    assert_eq!(
        stored.purchase_price(),
        Some(Decimal::from_str("129.90").unwrap())
    );
    assert_eq!(stored.warranty_expiration(), Some(warranty));
    assert_eq!(stored.dimensions(), Some("20x18x6 cm"));
    assert_eq!(stored.weight(), Some("1.1 kg"));
    assert_eq!(stored.color(), Some("blue"));
    assert_eq!(stored.condition(), Condition::Normal);
    assert_eq!(stored.accessories(), Some("charger"));
    assert_eq!(stored.consumable_replacement(), Some("bits"));
    assert_eq!(stored.link(), Some("https://example.com/drill"));
}

#[test]
fn malformed_price_clears_the_stored_price() {
    let conn = open_db_in_memory().unwrap();
    let items = items_with(&conn, fixed_clock);
    let item = items.create_item(&FilterState::default()).unwrap();

    items
        .edit_item(item.id(), vec![ItemEdit::PurchasePrice(parse_price("40"))])
        .unwrap();
    let cleared = items
        .edit_item(item.id(), vec![ItemEdit::PurchasePrice(parse_price("forty"))])
        .unwrap();

    assert_eq!(cleared.purchase_price(), None);
    let stored = items.get_item(item.id()).unwrap().unwrap();
    assert_eq!(stored.purchase_price(), None);
}

#[test]
fn updated_at_moves_forward_on_every_edit() {
    let conn = open_db_in_memory().unwrap();
    let items = items_with(&conn, ticking_clock);
    let item = items.create_item(&FilterState::default()).unwrap();

    let mut previous = item.updated_at();
    for name in ["Hammer", "Claw hammer", "Hammer (old)"] {
        let edited = items
            .edit_item(item.id(), vec![ItemEdit::Name(name.to_string())])
            .unwrap();
        assert!(edited.updated_at() > previous);
        assert!(edited.updated_at() >= edited.created_at());
        previous = edited.updated_at();
    }
    assert_eq!(
        items.get_item(item.id()).unwrap().unwrap().updated_at(),
        previous
    );
}

#[test]
fn disposal_round_trip_persists_timestamp_rule() {
    let conn = open_db_in_memory().unwrap();
    let items = items_with(&conn, fixed_clock);
    let item = items.create_item(&FilterState::default()).unwrap();

    let disposed = items
        .edit_item(item.id(), vec![ItemEdit::Disposed(true)])
        .unwrap();
    assert!(disposed.is_disposed());
    assert_eq!(disposed.disposed_at(), Some(fixed_clock()));

    let stored = items.get_item(item.id()).unwrap().unwrap();
    assert!(stored.is_disposed());
    assert_eq!(stored.disposed_at(), Some(fixed_clock()));

    let restored = items
        .edit_item(item.id(), vec![ItemEdit::Disposed(false)])
        .unwrap();
    assert!(!restored.is_disposed());
    assert_eq!(restored.disposed_at(), None);
}

#[test]
fn edit_with_unknown_master_is_rejected_and_leaves_item_unchanged() {
    let conn = open_db_in_memory().unwrap();
    let items = items_with(&conn, fixed_clock);
    let item = items.create_item(&FilterState::default()).unwrap();
    let ghost = uuid::Uuid::new_v4();

    let err = items
        .edit_item(
            item.id(),
            vec![
                ItemEdit::Name("Ladder".to_string()),
                ItemEdit::Location(Some(ghost)),
            ],
        )
        .unwrap_err();
    assert!(matches!(
        err,
        ItemServiceError::UnknownReference {
            kind: MasterKind::Location,
            id,
        } if id == ghost
    ));

    let stored = items.get_item(item.id()).unwrap().unwrap();
    assert_eq!(stored.name(), DEFAULT_ITEM_NAME);
    assert_eq!(stored.location_id(), None);
}

#[test]
fn edit_of_missing_item_reports_not_found() {
    let conn = open_db_in_memory().unwrap();
    let items = items_with(&conn, fixed_clock);
    let missing = uuid::Uuid::new_v4();

    assert!(matches!(
        items.edit_item(missing, vec![ItemEdit::Name("x".to_string())]),
        Err(ItemServiceError::ItemNotFound(id)) if id == missing
    ));
    assert!(matches!(
        items.delete_item(missing),
        Err(ItemServiceError::ItemNotFound(_))
    ));
}

#[test]
fn delete_removes_items_and_batch_counts_existing_rows() {
    let conn = open_db_in_memory().unwrap();
    let items = items_with(&conn, fixed_clock);
    let first = items.create_item(&FilterState::default()).unwrap();
    let second = items.create_item(&FilterState::default()).unwrap();
    let third = items.create_item(&FilterState::default()).unwrap();

    items.delete_item(first.id()).unwrap();
    let removed = items
        .delete_items(&[second.id(), first.id(), uuid::Uuid::new_v4()])
        .unwrap();
    assert_eq!(removed, 1);

    let remaining: Vec<_> = items
        .list_items()
        .unwrap()
        .iter()
        .map(|item| item.id())
        .collect();
    assert_eq!(remaining, vec![third.id()]);
}

#[test]
fn list_items_returns_creation_order() {
    let conn = open_db_in_memory().unwrap();
    let items = items_with(&conn, ticking_clock);
    let created: Vec<_> = (0..3)
        .map(|_| items.create_item(&FilterState::default()).unwrap().id())
        .collect();

    let listed: Vec<_> = items
        .list_items()
        .unwrap()
        .iter()
        .map(|item| item.id())
        .collect();
    assert_eq!(listed, created);
}
