//! Locale-style name ordering.
//!
//! Names are compared the way a user-facing list expects rather than by
//! byte value:
//! - accents and case are ignored at the first level (`éclair` ~ `Eclair`),
//! - runs of digits compare by numeric value (`Box 2` < `Box 10`),
//! - remaining ties break lowercase-first, then by raw text, so the order is
//!   total and deterministic.

use crate::model::master::MasterRecord;
use std::cmp::Ordering;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Full sort key for one name; derives the display order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct CollationKey {
    primary: Vec<KeyPart>,
    /// Per-char uppercase flags; `false < true` puts lowercase first.
    case: Vec<bool>,
    raw: String,
}

// Variant order matters: digits sort before letters.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum KeyPart {
    /// Significant digit count, then the digits without leading zeros.
    Number(usize, String),
    Text(String),
}

impl CollationKey {
    pub fn new(value: &str) -> Self {
        Self {
            primary: primary_parts(value),
            case: value.chars().map(char::is_uppercase).collect(),
            raw: value.to_string(),
        }
    }
}

fn primary_parts(value: &str) -> Vec<KeyPart> {
    let mut parts = Vec::new();
    let mut text = String::new();
    let mut digits = String::new();

    for c in value.nfkd().filter(|c| !is_combining_mark(*c)) {
        if c.is_ascii_digit() {
            if !text.is_empty() {
                parts.push(KeyPart::Text(std::mem::take(&mut text)));
            }
            digits.push(c);
        } else {
            if !digits.is_empty() {
                parts.push(number_part(std::mem::take(&mut digits)));
            }
            text.extend(c.to_lowercase());
        }
    }
    if !text.is_empty() {
        parts.push(KeyPart::Text(text));
    }
    if !digits.is_empty() {
        parts.push(number_part(digits));
    }
    parts
}

fn number_part(digits: String) -> KeyPart {
    let significant = digits.trim_start_matches('0');
    let significant = if significant.is_empty() { "0" } else { significant };
    KeyPart::Number(significant.len(), significant.to_string())
}

/// Compares two names in display order.
pub fn compare_names(left: &str, right: &str) -> Ordering {
    CollationKey::new(left).cmp(&CollationKey::new(right))
}

/// Sorts master records by name in display order.
///
/// Stable: records with identical names keep their incoming order.
pub fn sort_masters_by_name(records: &mut [MasterRecord]) {
    records.sort_by_cached_key(|record| CollationKey::new(&record.name));
}
