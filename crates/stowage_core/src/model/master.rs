//! Master record model for categories, locations and tags.
//!
//! # Responsibility
//! - Define the flat named records items refer to.
//! - Provide the shared name guard used by create/rename paths.
//!
//! # Invariants
//! - `id` is stable and never reused for another record.
//! - Equality and hashing are identity-based; names are not compared.
//! - Masters never own items. Which items reference a master is derived
//!   from the item side on demand.

use crate::model::EpochMs;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::hash::{Hash, Hasher};
use uuid::Uuid;

/// Stable identifier shared by all three master kinds.
pub type MasterId = Uuid;

/// The three master record kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MasterKind {
    /// Zero-or-one per item.
    Category,
    /// Zero-or-one per item.
    Location,
    /// Zero-or-more per item.
    Tag,
}

impl MasterKind {
    /// All kinds in display order.
    pub const ALL: [MasterKind; 3] = [Self::Category, Self::Location, Self::Tag];

    /// Lowercase label used in logs and user-facing messages.
    pub fn label(self) -> &'static str {
        match self {
            Self::Category => "category",
            Self::Location => "location",
            Self::Tag => "tag",
        }
    }
}

impl Display for MasterKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One category, location or tag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MasterRecord {
    pub id: MasterId,
    pub kind: MasterKind,
    /// Display name. Duplicates across records are allowed.
    pub name: String,
    /// Unix epoch milliseconds.
    pub created_at: EpochMs,
}

impl MasterRecord {
    /// Creates a record with a generated id.
    pub fn new(kind: MasterKind, name: impl Into<String>, created_at: EpochMs) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            name: name.into(),
            created_at,
        }
    }
}

impl PartialEq for MasterRecord {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for MasterRecord {}

impl Hash for MasterRecord {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Trims a candidate master name.
///
/// Returns `None` when nothing is left, which callers treat as a refused
/// create or rename.
pub fn normalize_master_name(name: &str) -> Option<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
