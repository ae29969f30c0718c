//! Shared helpers for CLI commands

use chrono::{DateTime, NaiveDate, Utc};
use miette::Result;
use std::fmt::Display;
use stowage_core::{EpochMs, Item, MasterKind, MasterRecord};
use uuid::Uuid;

const SHORT_ID_LEN: usize = 8;
const MIN_PREFIX_LEN: usize = 4;

/// Converts a core error into a diagnostic.
pub fn report(err: impl Display) -> miette::Report {
    miette::miette!("{err}")
}

/// First characters of a UUID, enough to type back in.
pub fn short_id(id: Uuid) -> String {
    id.to_string().chars().take(SHORT_ID_LEN).collect()
}

pub fn format_timestamp(ms: EpochMs) -> String {
    DateTime::<Utc>::from_timestamp_millis(ms)
        .map(|at| at.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| ms.to_string())
}

/// Empty input clears an optional text field.
pub fn none_if_blank(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

/// Parses `YYYY-MM-DD`; empty input clears the date.
pub fn parse_date(value: &str) -> Result<Option<NaiveDate>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| miette::miette!("Invalid date `{trimmed}`; expected YYYY-MM-DD"))
}

/// Finds a master record by full id, unique id prefix, or exact name
/// (case-insensitive).
pub fn resolve_master<'a>(
    records: &'a [MasterRecord],
    kind: MasterKind,
    key: &str,
) -> Result<&'a MasterRecord> {
    let key = key.trim();
    let by_name: Vec<_> = records
        .iter()
        .filter(|record| record.name.eq_ignore_ascii_case(key))
        .collect();
    match by_name.as_slice() {
        [record] => return Ok(*record),
        [] => {}
        _ => {
            return Err(miette::miette!(
                "Several {kind} records are named `{key}`; use the id instead"
            ))
        }
    }

    let ids: Vec<Uuid> = records.iter().map(|record| record.id).collect();
    let id = resolve_id(&ids, kind.label(), key)?;
    records
        .iter()
        .find(|record| record.id == id)
        .ok_or_else(|| miette::miette!("No {kind} matches `{key}`"))
}

/// Finds an item by full id or unique id prefix.
pub fn resolve_item<'a>(items: &'a [Item], key: &str) -> Result<&'a Item> {
    let ids: Vec<Uuid> = items.iter().map(Item::id).collect();
    let id = resolve_id(&ids, "item", key.trim())?;
    items
        .iter()
        .find(|item| item.id() == id)
        .ok_or_else(|| miette::miette!("No item matches `{key}`"))
}

fn resolve_id(ids: &[Uuid], label: &str, key: &str) -> Result<Uuid> {
    if let Ok(id) = Uuid::parse_str(key) {
        return ids
            .contains(&id)
            .then_some(id)
            .ok_or_else(|| miette::miette!("No {label} with id {id}"));
    }
    if key.len() < MIN_PREFIX_LEN {
        return Err(miette::miette!(
            "`{key}` is too short; give at least {MIN_PREFIX_LEN} characters of the id"
        ));
    }

    let prefix = key.to_ascii_lowercase();
    let matches: Vec<Uuid> = ids
        .iter()
        .copied()
        .filter(|id| id.to_string().starts_with(&prefix))
        .collect();
    match matches.as_slice() {
        [id] => Ok(*id),
        [] => Err(miette::miette!("No {label} matches `{key}`")),
        _ => Err(miette::miette!(
            "`{key}` matches {} {label} records; use a longer prefix",
            matches.len()
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str) -> MasterRecord {
        MasterRecord::new(MasterKind::Location, name, 0)
    }

    #[test]
    fn resolve_master_prefers_exact_name() {
        let records = vec![record("Garage"), record("Attic")];
        let found = resolve_master(&records, MasterKind::Location, "garage").unwrap();
        assert_eq!(found.name, "Garage");
    }

    #[test]
    fn resolve_master_accepts_id_prefix() {
        let records = vec![record("Garage"), record("Attic")];
        let prefix = short_id(records[1].id);
        let found = resolve_master(&records, MasterKind::Location, &prefix).unwrap();
        assert_eq!(found.id, records[1].id);
    }

    #[test]
    fn resolve_master_rejects_ambiguous_names() {
        let records = vec![record("Shed"), record("Shed")];
        assert!(resolve_master(&records, MasterKind::Location, "Shed").is_err());
    }

    #[test]
    fn short_prefixes_are_rejected() {
        let records = vec![record("Garage")];
        assert!(resolve_master(&records, MasterKind::Location, "ab").is_err());
    }

    #[test]
    fn parse_date_handles_blank_and_malformed_input() {
        assert_eq!(parse_date("  ").unwrap(), None);
        assert_eq!(
            parse_date("2024-03-01").unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 1)
        );
        assert!(parse_date("03/01/2024").is_err());
    }
}
