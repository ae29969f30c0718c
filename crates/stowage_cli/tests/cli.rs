//! Integration tests for the stowage CLI

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::TempDir;

/// Command with no stowage settings inherited from the environment
fn stowage_bare() -> Command {
    let mut cmd = Command::cargo_bin("stowage").unwrap();
    cmd.env_remove("STOWAGE_DB_PATH")
        .env_remove("STOWAGE_LOG_LEVEL")
        .env_remove("STOWAGE_LOG_DIR");
    cmd
}

/// Command bound to the given database file
fn stowage(db: &Path) -> Command {
    let mut cmd = stowage_bare();
    cmd.arg("--db").arg(db);
    cmd
}

fn temp_db() -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let db = tmp.path().join("inventory.sqlite3");
    (tmp, db)
}

fn json_stdout(cmd: &mut Command) -> Value {
    let output = cmd.assert().success().get_output().stdout.clone();
    serde_json::from_slice(&output).unwrap()
}

fn all_items(db: &Path) -> Vec<Value> {
    let value = json_stdout(stowage(db).args(["item", "list", "-a", "--json"]));
    value.as_array().unwrap().clone()
}

fn item_id(db: &Path, name: &str) -> String {
    all_items(db)
        .into_iter()
        .find(|item| item["name"] == name)
        .and_then(|item| item["id"].as_str().map(str::to_string))
        .unwrap()
}

fn show(db: &Path, id: &str) -> Value {
    json_stdout(stowage(db).args(["item", "show", id, "--json"]))
}

fn add_item(db: &Path, name: &str, extra: &[&str]) -> String {
    stowage(db)
        .args(["item", "add", "--name", name])
        .args(extra)
        .assert()
        .success();
    item_id(db, name)
}

fn add_master(db: &Path, kind: &str, name: &str) {
    stowage(db)
        .args([kind, "add", name])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created"));
}

// ============================================================================
// Masters
// ============================================================================

#[test]
fn test_blank_category_add_creates_nothing() {
    let (_tmp, db) = temp_db();

    stowage(&db)
        .args(["category", "add", "   "])
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing created"));

    stowage(&db)
        .args(["category", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No category records."));
    let records = json_stdout(stowage(&db).args(["category", "list", "--json"]));
    assert_eq!(records.as_array().unwrap().len(), 0);
}

#[test]
fn test_blank_rename_keeps_old_name() {
    let (_tmp, db) = temp_db();
    add_master(&db, "category", "Tools");

    stowage(&db)
        .args(["category", "rename", "Tools", "  "])
        .assert()
        .success()
        .stdout(predicate::str::contains("Kept `Tools`"));

    let records = json_stdout(stowage(&db).args(["category", "list", "--json"]));
    let records = records.as_array().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["name"], "Tools");
}

#[test]
fn test_rename_then_list_shows_new_name() {
    let (_tmp, db) = temp_db();
    add_master(&db, "location", "Garage");

    stowage(&db)
        .args(["location", "rename", "Garage", "Shed"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Renamed location"));

    stowage(&db)
        .args(["location", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Shed"))
        .stdout(predicate::str::contains("Garage").not());
}

// ============================================================================
// Items
// ============================================================================

#[test]
fn test_item_add_uses_first_category_unless_given_empty() {
    let (_tmp, db) = temp_db();
    add_master(&db, "category", "Tools");
    add_master(&db, "category", "Books");
    let books = json_stdout(stowage(&db).args(["category", "list", "--json"]))
        .as_array()
        .unwrap()
        .iter()
        .find(|record| record["name"] == "Books")
        .map(|record| record["id"].clone())
        .unwrap();

    let defaulted = add_item(&db, "Atlas", &[]);
    assert_eq!(show(&db, &defaulted)["category_id"], books);

    let loose = add_item(&db, "Loose screw", &["-c", ""]);
    assert!(show(&db, &loose)["category_id"].is_null());
}

#[test]
fn test_unparseable_price_clears_price() {
    let (_tmp, db) = temp_db();
    let id = add_item(&db, "Drill", &["--price", "12.50"]);
    assert!(!show(&db, &id)["purchase_price"].is_null());

    stowage(&db)
        .args(["item", "edit", &id, "--price", "abc"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated item"));

    let item = show(&db, &id);
    assert!(item["purchase_price"].is_null());
    assert_eq!(item["name"], "Drill");
}

#[test]
fn test_disposed_flag_sets_and_clears_timestamp() {
    let (_tmp, db) = temp_db();
    let id = add_item(&db, "Kettle", &[]);

    stowage(&db)
        .args(["item", "edit", &id, "--disposed", "true"])
        .assert()
        .success();
    let item = show(&db, &id);
    assert_eq!(item["is_disposed"], true);
    assert!(item["disposed_at"].is_i64());

    stowage(&db)
        .args(["item", "edit", &id, "--disposed", "false"])
        .assert()
        .success();
    let item = show(&db, &id);
    assert_eq!(item["is_disposed"], false);
    assert!(item["disposed_at"].is_null());
}

#[test]
fn test_item_list_hides_disposed_unless_all() {
    let (_tmp, db) = temp_db();
    add_item(&db, "Teapot", &[]);
    let broken = add_item(&db, "Broken kettle", &["--disposed", "true"]);
    assert_eq!(show(&db, &broken)["is_disposed"], true);

    stowage(&db)
        .args(["item", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Teapot"))
        .stdout(predicate::str::contains("Broken kettle").not())
        .stdout(predicate::str::contains("1 item(s) found."));

    stowage(&db)
        .args(["item", "list", "-a"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Broken kettle [disposed]"))
        .stdout(predicate::str::contains("2 item(s) found."));
}

#[test]
fn test_item_delete_prints_next_item_of_filtered_sorted_view() {
    let (_tmp, db) = temp_db();
    add_master(&db, "category", "Garden");
    add_master(&db, "category", "Tools");
    let axe = add_item(&db, "Axe", &["-c", "Tools"]);
    add_item(&db, "Chisel", &["-c", "Tools"]);
    add_item(&db, "Bucket", &["-c", "Garden"]);
    add_item(&db, "Brush", &["-c", "Tools"]);

    stowage(&db)
        .args(["item", "delete", &axe, "-c", "Tools", "--sort", "name-asc"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted 1 item"))
        .stdout(predicate::str::contains("Next:"))
        .stdout(predicate::str::contains("Brush"))
        .stdout(predicate::str::contains("Bucket").not());

    let names: Vec<String> = all_items(&db)
        .iter()
        .filter_map(|item| item["name"].as_str().map(str::to_string))
        .collect();
    assert_eq!(names.len(), 3);
    assert!(!names.contains(&"Axe".to_string()));
}

#[test]
fn test_deleting_last_visible_item_prints_no_next() {
    let (_tmp, db) = temp_db();
    let only = add_item(&db, "Lamp", &[]);

    stowage(&db)
        .args(["item", "delete", &only])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted 1 item"))
        .stdout(predicate::str::contains("Next:").not());

    stowage(&db)
        .args(["item", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No items found."));
}

#[test]
fn test_show_unknown_item_fails() {
    let (_tmp, db) = temp_db();

    stowage(&db)
        .args(["item", "show", "ffffffff"])
        .assert()
        .failure();
}

// ============================================================================
// Store location
// ============================================================================

#[test]
fn test_db_path_env_is_used_without_flag() {
    let (_tmp, db) = temp_db();

    stowage_bare()
        .env("STOWAGE_DB_PATH", &db)
        .args(["tag", "add", "fragile"])
        .assert()
        .success();
    assert!(db.exists());

    stowage(&db)
        .args(["tag", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("fragile"));
}

#[test]
fn test_db_flag_wins_over_env() {
    let (tmp, db) = temp_db();
    let other = tmp.path().join("other.sqlite3");

    stowage_bare()
        .env("STOWAGE_DB_PATH", &other)
        .arg("--db")
        .arg(&db)
        .args(["tag", "add", "fragile"])
        .assert()
        .success();
    assert!(db.exists());
    assert!(!other.exists());
}
