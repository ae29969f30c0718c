//! Item repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist items together with their ordered tag links.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Create/update write the item row and its tag links in one transaction.
//! - Every referenced category, location and tag must exist at write time.
//! - `list_items` returns `created_at ASC, id ASC`; the visible-list sort
//!   builds on this order for ties.

use crate::model::item::{Condition, Item, ItemId};
use crate::model::master::{MasterId, MasterKind};
use crate::repo::{bool_to_int, ensure_connection_ready, master_exists, parse_uuid};
use crate::repo::{RepoError, RepoResult};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rusqlite::{params, Connection, Row, Transaction, TransactionBehavior};
use std::collections::HashMap;
use std::str::FromStr;

const ITEM_SELECT_SQL: &str = "SELECT
    id,
    name,
    category_id,
    location_id,
    notes,
    brand,
    model_number,
    serial_number,
    purchase_date,
    purchase_store,
    purchase_price,
    warranty_expiration,
    dimensions,
    weight,
    color,
    condition,
    accessories,
    consumable_replacement,
    link,
    created_at,
    updated_at,
    is_disposed,
    disposed_at
FROM items";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Repository interface for item persistence.
pub trait ItemRepository {
    fn create_item(&self, item: &Item) -> RepoResult<ItemId>;
    /// Overwrites every column and the full tag list.
    fn update_item(&self, item: &Item) -> RepoResult<()>;
    fn get_item(&self, id: ItemId) -> RepoResult<Option<Item>>;
    /// All items in storage order.
    fn list_items(&self) -> RepoResult<Vec<Item>>;
    fn delete_item(&self, id: ItemId) -> RepoResult<()>;
    /// Deletes every listed item atomically; unknown ids are skipped.
    ///
    /// Returns the number of rows removed.
    fn delete_items(&self, ids: &[ItemId]) -> RepoResult<usize>;
}

/// SQLite-backed item repository.
pub struct SqliteItemRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteItemRepository<'conn> {
    /// Creates a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &["categories", "locations", "tags", "items", "item_tags"])?;
        Ok(Self { conn })
    }
}

impl ItemRepository for SqliteItemRepository<'_> {
    fn create_item(&self, item: &Item) -> RepoResult<ItemId> {
        item.validate()?;

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        ensure_references_exist(&tx, item)?;
        tx.execute(
            "INSERT INTO items (
                id,
                name,
                category_id,
                location_id,
                notes,
                brand,
                model_number,
                serial_number,
                purchase_date,
                purchase_store,
                purchase_price,
                warranty_expiration,
                dimensions,
                weight,
                color,
                condition,
                accessories,
                consumable_replacement,
                link,
                created_at,
                updated_at,
                is_disposed,
                disposed_at
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12,
                ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20, ?21, ?22, ?23
            );",
            params![
                item.id.to_string(),
                item.name.as_str(),
                item.category_id.map(|id| id.to_string()),
                item.location_id.map(|id| id.to_string()),
                item.notes.as_deref(),
                item.brand.as_deref(),
                item.model_number.as_deref(),
                item.serial_number.as_deref(),
                item.purchase_date.map(date_to_db),
                item.purchase_store.as_deref(),
                item.purchase_price.map(|price| price.to_string()),
                item.warranty_expiration.map(date_to_db),
                item.dimensions.as_deref(),
                item.weight.as_deref(),
                item.color.as_deref(),
                item.condition.as_str(),
                item.accessories.as_deref(),
                item.consumable_replacement.as_deref(),
                item.link.as_deref(),
                item.created_at,
                item.updated_at,
                bool_to_int(item.is_disposed),
                item.disposed_at,
            ],
        )?;
        write_tag_links(&tx, item)?;
        tx.commit()?;

        Ok(item.id)
    }

    fn update_item(&self, item: &Item) -> RepoResult<()> {
        item.validate()?;

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        ensure_references_exist(&tx, item)?;
        let changed = tx.execute(
            "UPDATE items
             SET
                name = ?2,
                category_id = ?3,
                location_id = ?4,
                notes = ?5,
                brand = ?6,
                model_number = ?7,
                serial_number = ?8,
                purchase_date = ?9,
                purchase_store = ?10,
                purchase_price = ?11,
                warranty_expiration = ?12,
                dimensions = ?13,
                weight = ?14,
                color = ?15,
                condition = ?16,
                accessories = ?17,
                consumable_replacement = ?18,
                link = ?19,
                updated_at = ?20,
                is_disposed = ?21,
                disposed_at = ?22
             WHERE id = ?1;",
            params![
                item.id.to_string(),
                item.name.as_str(),
                item.category_id.map(|id| id.to_string()),
                item.location_id.map(|id| id.to_string()),
                item.notes.as_deref(),
                item.brand.as_deref(),
                item.model_number.as_deref(),
                item.serial_number.as_deref(),
                item.purchase_date.map(date_to_db),
                item.purchase_store.as_deref(),
                item.purchase_price.map(|price| price.to_string()),
                item.warranty_expiration.map(date_to_db),
                item.dimensions.as_deref(),
                item.weight.as_deref(),
                item.color.as_deref(),
                item.condition.as_str(),
                item.accessories.as_deref(),
                item.consumable_replacement.as_deref(),
                item.link.as_deref(),
                item.updated_at,
                bool_to_int(item.is_disposed),
                item.disposed_at,
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound(item.id));
        }

        tx.execute(
            "DELETE FROM item_tags WHERE item_id = ?1;",
            [item.id.to_string()],
        )?;
        write_tag_links(&tx, item)?;
        tx.commit()?;

        Ok(())
    }

    fn get_item(&self, id: ItemId) -> RepoResult<Option<Item>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ITEM_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            let mut item = parse_item_row(row)?;
            item.tag_ids = load_tags_for_item(self.conn, id)?;
            return Ok(Some(item));
        }
        Ok(None)
    }

    fn list_items(&self) -> RepoResult<Vec<Item>> {
        let mut tags_by_item = load_all_tag_links(self.conn)?;

        let mut stmt = self
            .conn
            .prepare(&format!("{ITEM_SELECT_SQL} ORDER BY created_at ASC, id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            let mut item = parse_item_row(row)?;
            item.tag_ids = tags_by_item.remove(&item.id).unwrap_or_default();
            items.push(item);
        }
        Ok(items)
    }

    fn delete_item(&self, id: ItemId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM items WHERE id = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        Ok(())
    }

    fn delete_items(&self, ids: &[ItemId]) -> RepoResult<usize> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let mut removed = 0;
        {
            let mut stmt = tx.prepare("DELETE FROM items WHERE id = ?1;")?;
            for id in ids {
                removed += stmt.execute([id.to_string()])?;
            }
        }
        tx.commit()?;
        Ok(removed)
    }
}

fn ensure_references_exist(tx: &Transaction<'_>, item: &Item) -> RepoResult<()> {
    let references = item
        .category_id
        .map(|id| (MasterKind::Category, id))
        .into_iter()
        .chain(item.location_id.map(|id| (MasterKind::Location, id)))
        .chain(item.tag_ids.iter().map(|id| (MasterKind::Tag, *id)));

    for (kind, id) in references {
        if !master_exists(tx, kind, id)? {
            return Err(RepoError::UnknownReference { kind, id });
        }
    }
    Ok(())
}

fn write_tag_links(tx: &Transaction<'_>, item: &Item) -> RepoResult<()> {
    let mut stmt =
        tx.prepare("INSERT INTO item_tags (item_id, tag_id, position) VALUES (?1, ?2, ?3);")?;
    for (position, tag_id) in item.tag_ids.iter().enumerate() {
        stmt.execute(params![
            item.id.to_string(),
            tag_id.to_string(),
            position as i64
        ])?;
    }
    Ok(())
}

fn load_tags_for_item(conn: &Connection, id: ItemId) -> RepoResult<Vec<MasterId>> {
    let mut stmt = conn.prepare(
        "SELECT tag_id
         FROM item_tags
         WHERE item_id = ?1
         ORDER BY position ASC;",
    )?;
    let mut rows = stmt.query([id.to_string()])?;
    let mut tags = Vec::new();
    while let Some(row) = rows.next()? {
        let text: String = row.get(0)?;
        tags.push(parse_uuid(&text, "item_tags.tag_id")?);
    }
    Ok(tags)
}

fn load_all_tag_links(conn: &Connection) -> RepoResult<HashMap<ItemId, Vec<MasterId>>> {
    let mut stmt = conn.prepare(
        "SELECT item_id, tag_id
         FROM item_tags
         ORDER BY item_id ASC, position ASC;",
    )?;
    let mut rows = stmt.query([])?;
    let mut links: HashMap<ItemId, Vec<MasterId>> = HashMap::new();
    while let Some(row) = rows.next()? {
        let item_text: String = row.get(0)?;
        let tag_text: String = row.get(1)?;
        links
            .entry(parse_uuid(&item_text, "item_tags.item_id")?)
            .or_default()
            .push(parse_uuid(&tag_text, "item_tags.tag_id")?);
    }
    Ok(links)
}

fn parse_item_row(row: &Row<'_>) -> RepoResult<Item> {
    let id_text: String = row.get("id")?;
    let category_id = row
        .get::<_, Option<String>>("category_id")?
        .map(|value| parse_uuid(&value, "items.category_id"))
        .transpose()?;
    let location_id = row
        .get::<_, Option<String>>("location_id")?
        .map(|value| parse_uuid(&value, "items.location_id"))
        .transpose()?;

    let condition_text: String = row.get("condition")?;
    let condition = Condition::parse(&condition_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid condition `{condition_text}` in items.condition"
        ))
    })?;

    let purchase_price = row
        .get::<_, Option<String>>("purchase_price")?
        .map(|value| {
            Decimal::from_str(&value).map_err(|_| {
                RepoError::InvalidData(format!(
                    "invalid decimal `{value}` in items.purchase_price"
                ))
            })
        })
        .transpose()?;

    let is_disposed = match row.get::<_, i64>("is_disposed")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid is_disposed value `{other}` in items.is_disposed"
            )));
        }
    };

    Ok(Item {
        id: parse_uuid(&id_text, "items.id")?,
        name: row.get("name")?,
        category_id,
        location_id,
        tag_ids: Vec::new(),
        notes: row.get("notes")?,
        brand: row.get("brand")?,
        model_number: row.get("model_number")?,
        serial_number: row.get("serial_number")?,
        purchase_date: parse_date_column(row, "purchase_date")?,
        purchase_store: row.get("purchase_store")?,
        purchase_price,
        warranty_expiration: parse_date_column(row, "warranty_expiration")?,
        dimensions: row.get("dimensions")?,
        weight: row.get("weight")?,
        color: row.get("color")?,
        condition,
        accessories: row.get("accessories")?,
        consumable_replacement: row.get("consumable_replacement")?,
        link: row.get("link")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
        is_disposed,
        disposed_at: row.get("disposed_at")?,
    })
}

fn parse_date_column(row: &Row<'_>, column: &'static str) -> RepoResult<Option<NaiveDate>> {
    row.get::<_, Option<String>>(column)?
        .map(|value| {
            NaiveDate::parse_from_str(&value, DATE_FORMAT).map_err(|_| {
                RepoError::InvalidData(format!("invalid date `{value}` in items.{column}"))
            })
        })
        .transpose()
}

fn date_to_db(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}
