use stowage_core::db::open_db_in_memory;
use stowage_core::service::export_service::SNAPSHOT_FORMAT_VERSION;
use stowage_core::{
    snapshot, FilterState, ItemEdit, ItemService, MasterKind, MasterService,
    SqliteItemRepository, SqliteMasterRepository,
};

#[test]
fn snapshot_contains_sorted_masters_and_all_items() {
    let conn = open_db_in_memory().unwrap();
    let masters = MasterService::new(SqliteMasterRepository::try_new(&conn).unwrap());
    let items = ItemService::new(
        SqliteItemRepository::try_new(&conn).unwrap(),
        SqliteMasterRepository::try_new(&conn).unwrap(),
    );

    masters.create(MasterKind::Category, "Tools").unwrap();
    masters.create(MasterKind::Category, "Books").unwrap();
    masters.create(MasterKind::Location, "Attic").unwrap();
    let tag = masters
        .create(MasterKind::Tag, "fragile")
        .unwrap()
        .unwrap();
    let vase = items.create_item(&FilterState::default()).unwrap();
    items
        .edit_item(
            vase.id(),
            vec![ItemEdit::AddTag(tag.id), ItemEdit::Disposed(true)],
        )
        .unwrap();
    items.create_item(&FilterState::default()).unwrap();

    let inventory = snapshot(
        &SqliteItemRepository::try_new(&conn).unwrap(),
        &SqliteMasterRepository::try_new(&conn).unwrap(),
    )
    .unwrap();

    assert_eq!(inventory.format_version, SNAPSHOT_FORMAT_VERSION);
    let categories: Vec<_> = inventory
        .categories
        .iter()
        .map(|record| record.name.as_str())
        .collect();
    assert_eq!(categories, vec!["Books", "Tools"]);
    assert_eq!(inventory.locations.len(), 1);
    assert_eq!(inventory.tags.len(), 1);
    assert_eq!(inventory.items.len(), 2);

    let value = serde_json::to_value(&inventory).unwrap();
    assert_eq!(value["items"].as_array().unwrap().len(), 2);
    assert_eq!(value["tags"][0]["kind"], "tag");
    assert!(value["items"]
        .as_array()
        .unwrap()
        .iter()
        .any(|item| item["is_disposed"] == true));
}
