//! Master record use-case service.
//!
//! # Responsibility
//! - Create, rename and delete categories, locations and tags.
//! - Serve master lists in display order, with derived usage counts.
//!
//! # Invariants
//! - Names are trimmed; a blank name refuses create and rename without
//!   raising an error (`Ok(None)`).
//! - Duplicate names are allowed.
//! - Deleting a master never deletes items.

use crate::model::item::ItemId;
use crate::model::master::{normalize_master_name, MasterId, MasterKind, MasterRecord};
use crate::model::{now_epoch_ms, Clock};
use crate::query::collation::sort_masters_by_name;
use crate::repo::master_repo::MasterRepository;
use crate::repo::RepoError;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for master use-cases.
#[derive(Debug)]
pub enum MasterServiceError {
    /// Target record does not exist.
    MasterNotFound(MasterId),
    Repo(RepoError),
}

impl Display for MasterServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MasterNotFound(id) => write!(f, "master record not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for MasterServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::MasterNotFound(_) => None,
        }
    }
}

impl From<RepoError> for MasterServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::MasterNotFound(id),
            other => Self::Repo(other),
        }
    }
}

pub type MasterServiceResult<T> = Result<T, MasterServiceError>;

/// Master record plus the number of items referencing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MasterUsage {
    pub record: MasterRecord,
    pub item_count: usize,
}

/// Master management facade over a repository implementation.
pub struct MasterService<R: MasterRepository> {
    repo: R,
    clock: Clock,
}

impl<R: MasterRepository> MasterService<R> {
    /// Creates a service that stamps records with wall-clock time.
    pub fn new(repo: R) -> Self {
        Self::with_clock(repo, now_epoch_ms)
    }

    pub fn with_clock(repo: R, clock: Clock) -> Self {
        Self { repo, clock }
    }

    /// Creates a record named `name` (trimmed).
    ///
    /// Returns `Ok(None)` and stores nothing when the name is blank.
    pub fn create(
        &self,
        kind: MasterKind,
        name: &str,
    ) -> MasterServiceResult<Option<MasterRecord>> {
        let Some(name) = normalize_master_name(name) else {
            info!("event=master_create module=service status=rejected kind={kind} reason=blank_name");
            return Ok(None);
        };

        let record = MasterRecord::new(kind, name, (self.clock)());
        self.repo.create_master(&record)?;
        info!(
            "event=master_create module=service status=ok kind={kind} id={}",
            record.id
        );
        Ok(Some(record))
    }

    /// Renames a record; blank names are refused the same way as on create.
    pub fn rename(
        &self,
        kind: MasterKind,
        id: MasterId,
        name: &str,
    ) -> MasterServiceResult<Option<MasterRecord>> {
        let Some(name) = normalize_master_name(name) else {
            info!(
                "event=master_rename module=service status=rejected kind={kind} id={id} reason=blank_name"
            );
            return Ok(None);
        };

        self.repo.rename_master(kind, id, &name)?;
        info!("event=master_rename module=service status=ok kind={kind} id={id}");
        self.repo
            .get_master(kind, id)?
            .map(Some)
            .ok_or(MasterServiceError::MasterNotFound(id))
    }

    /// Deletes a record and returns how many items were detached from it.
    pub fn delete(&self, kind: MasterKind, id: MasterId) -> MasterServiceResult<usize> {
        let detached = self.repo.referencing_items(kind, id)?.len();
        self.repo.delete_master(kind, id)?;
        info!(
            "event=master_delete module=service status=ok kind={kind} id={id} detached_items={detached}"
        );
        Ok(detached)
    }

    pub fn get(&self, kind: MasterKind, id: MasterId) -> MasterServiceResult<Option<MasterRecord>> {
        Ok(self.repo.get_master(kind, id)?)
    }

    /// All records of one kind sorted by name for display.
    pub fn list(&self, kind: MasterKind) -> MasterServiceResult<Vec<MasterRecord>> {
        let mut records = self.repo.list_masters(kind)?;
        sort_masters_by_name(&mut records);
        Ok(records)
    }

    /// Items currently referencing the record.
    pub fn usage(&self, kind: MasterKind, id: MasterId) -> MasterServiceResult<Vec<ItemId>> {
        if self.repo.get_master(kind, id)?.is_none() {
            return Err(MasterServiceError::MasterNotFound(id));
        }
        Ok(self.repo.referencing_items(kind, id)?)
    }

    /// [`Self::list`] with per-record item counts.
    pub fn list_with_usage(&self, kind: MasterKind) -> MasterServiceResult<Vec<MasterUsage>> {
        self.list(kind)?
            .into_iter()
            .map(|record| -> MasterServiceResult<MasterUsage> {
                let item_count = self.repo.referencing_items(kind, record.id)?.len();
                Ok(MasterUsage { record, item_count })
            })
            .collect()
    }
}
