//! Master record (category/location/tag) repository and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD over the three master tables behind one contract.
//! - Answer reverse lookups ("which items use this tag?") from the item side.
//!
//! # Invariants
//! - Deleting a category or location nulls `items.category_id` /
//!   `items.location_id`; deleting a tag drops its `item_tags` links. Items
//!   are never deleted by this repository. Both rules are enforced by the
//!   schema's foreign keys.
//! - List order here is storage order (`created_at ASC, id ASC`); display
//!   ordering by name is applied by the service.

use crate::model::item::ItemId;
use crate::model::master::{MasterId, MasterKind, MasterRecord};
use crate::repo::{ensure_connection_ready, master_table, parse_uuid, RepoError, RepoResult};
use rusqlite::{params, Connection, Row};

/// Repository interface for master records.
pub trait MasterRepository {
    /// Inserts one record and returns its id.
    fn create_master(&self, record: &MasterRecord) -> RepoResult<MasterId>;
    /// Overwrites the display name.
    fn rename_master(&self, kind: MasterKind, id: MasterId, name: &str) -> RepoResult<()>;
    /// Removes the record and detaches it from every item.
    fn delete_master(&self, kind: MasterKind, id: MasterId) -> RepoResult<()>;
    fn get_master(&self, kind: MasterKind, id: MasterId) -> RepoResult<Option<MasterRecord>>;
    /// All records of one kind in storage order.
    fn list_masters(&self, kind: MasterKind) -> RepoResult<Vec<MasterRecord>>;
    /// Ids of items referencing the record, in item storage order.
    fn referencing_items(&self, kind: MasterKind, id: MasterId) -> RepoResult<Vec<ItemId>>;
}

/// SQLite-backed master repository.
pub struct SqliteMasterRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteMasterRepository<'conn> {
    /// Creates a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &["categories", "locations", "tags", "items", "item_tags"])?;
        Ok(Self { conn })
    }
}

impl MasterRepository for SqliteMasterRepository<'_> {
    fn create_master(&self, record: &MasterRecord) -> RepoResult<MasterId> {
        self.conn.execute(
            &format!(
                "INSERT INTO {} (id, name, created_at) VALUES (?1, ?2, ?3);",
                master_table(record.kind)
            ),
            params![
                record.id.to_string(),
                record.name.as_str(),
                record.created_at
            ],
        )?;
        Ok(record.id)
    }

    fn rename_master(&self, kind: MasterKind, id: MasterId, name: &str) -> RepoResult<()> {
        let changed = self.conn.execute(
            &format!("UPDATE {} SET name = ?2 WHERE id = ?1;", master_table(kind)),
            params![id.to_string(), name],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        Ok(())
    }

    fn delete_master(&self, kind: MasterKind, id: MasterId) -> RepoResult<()> {
        let changed = self.conn.execute(
            &format!("DELETE FROM {} WHERE id = ?1;", master_table(kind)),
            [id.to_string()],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        Ok(())
    }

    fn get_master(&self, kind: MasterKind, id: MasterId) -> RepoResult<Option<MasterRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT id, name, created_at FROM {} WHERE id = ?1;",
            master_table(kind)
        ))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_master_row(row, kind)?));
        }
        Ok(None)
    }

    fn list_masters(&self, kind: MasterKind) -> RepoResult<Vec<MasterRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT id, name, created_at FROM {} ORDER BY created_at ASC, id ASC;",
            master_table(kind)
        ))?;
        let mut rows = stmt.query([])?;
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            records.push(parse_master_row(row, kind)?);
        }
        Ok(records)
    }

    fn referencing_items(&self, kind: MasterKind, id: MasterId) -> RepoResult<Vec<ItemId>> {
        let sql = match kind {
            MasterKind::Category => {
                "SELECT id FROM items
                 WHERE category_id = ?1
                 ORDER BY created_at ASC, id ASC;"
            }
            MasterKind::Location => {
                "SELECT id FROM items
                 WHERE location_id = ?1
                 ORDER BY created_at ASC, id ASC;"
            }
            MasterKind::Tag => {
                "SELECT items.id AS id
                 FROM items
                 INNER JOIN item_tags ON item_tags.item_id = items.id
                 WHERE item_tags.tag_id = ?1
                 ORDER BY items.created_at ASC, items.id ASC;"
            }
        };
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query([id.to_string()])?;
        let mut ids = Vec::new();
        while let Some(row) = rows.next()? {
            let text: String = row.get(0)?;
            ids.push(parse_uuid(&text, "items.id")?);
        }
        Ok(ids)
    }
}

fn parse_master_row(row: &Row<'_>, kind: MasterKind) -> RepoResult<MasterRecord> {
    let id_text: String = row.get("id")?;
    Ok(MasterRecord {
        id: parse_uuid(&id_text, master_table(kind))?,
        kind,
        name: row.get("name")?,
        created_at: row.get("created_at")?,
    })
}
