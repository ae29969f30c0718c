//! Browse-side derivations over in-memory items.
//!
//! # Responsibility
//! - Filter, search and sort items into the visible list.
//! - Keep the current selection consistent with that list.
//! - Provide the name ordering shared by items and master lists.
//!
//! # Invariants
//! - Everything here is a pure function of its inputs; callers re-derive
//!   whenever an input changes.

pub mod collation;
pub mod selection;
pub mod visible;
