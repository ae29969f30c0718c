//! Item domain model.
//!
//! # Responsibility
//! - Define the central inventory record and its field set.
//! - Own every mutation through [`Item::apply`], so the touch and disposal
//!   rules cannot be bypassed by callers.
//!
//! # Invariants
//! - `id` and `created_at` never change after construction.
//! - Every applied edit sets `updated_at = max(updated_at, now)`.
//! - The disposal toggle keeps `disposed_at` set exactly while
//!   `is_disposed` is true. Loaded state is taken as-is.
//! - The tag list holds no duplicate ids.
//! - Equality and hashing are identity-based.

use crate::model::master::MasterId;
use crate::model::EpochMs;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::hash::{Hash, Hasher};
use uuid::Uuid;

/// Stable identifier for items.
pub type ItemId = Uuid;

/// Name given to items created without user input.
pub const DEFAULT_ITEM_NAME: &str = "New Item";

/// Physical condition of an item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    BrandNew,
    #[default]
    Good,
    Normal,
    Deteriorated,
    Broken,
}

impl Condition {
    pub const ALL: [Condition; 5] = [
        Self::BrandNew,
        Self::Good,
        Self::Normal,
        Self::Deteriorated,
        Self::Broken,
    ];

    /// Storage and CLI label.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::BrandNew => "brand_new",
            Self::Good => "good",
            Self::Normal => "normal",
            Self::Deteriorated => "deteriorated",
            Self::Broken => "broken",
        }
    }

    /// Parses a storage label. Unknown labels return `None`.
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == value)
    }
}

/// Item construction errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemValidationError {
    /// The nil UUID cannot identify an item.
    NilId,
    /// The same tag appears twice in the tag list.
    DuplicateTag(MasterId),
}

impl Display for ItemValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilId => write!(f, "item id must not be nil"),
            Self::DuplicateTag(id) => write!(f, "tag {id} is assigned twice"),
        }
    }
}

impl Error for ItemValidationError {}

/// One field-level mutation.
///
/// `None` clears an optional field.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemEdit {
    Name(String),
    Category(Option<MasterId>),
    Location(Option<MasterId>),
    /// Appends a tag unless it is already assigned.
    AddTag(MasterId),
    RemoveTag(MasterId),
    /// Replaces the tag list; later duplicates are dropped.
    Tags(Vec<MasterId>),
    Notes(Option<String>),
    Brand(Option<String>),
    ModelNumber(Option<String>),
    SerialNumber(Option<String>),
    PurchaseDate(Option<NaiveDate>),
    PurchaseStore(Option<String>),
    PurchasePrice(Option<Decimal>),
    WarrantyExpiration(Option<NaiveDate>),
    Dimensions(Option<String>),
    Weight(Option<String>),
    Color(Option<String>),
    Condition(Condition),
    Accessories(Option<String>),
    ConsumableReplacement(Option<String>),
    Link(Option<String>),
    Disposed(bool),
}

/// Inventory record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub(crate) id: ItemId,
    pub(crate) name: String,
    pub(crate) category_id: Option<MasterId>,
    pub(crate) location_id: Option<MasterId>,
    pub(crate) tag_ids: Vec<MasterId>,
    pub(crate) notes: Option<String>,
    pub(crate) brand: Option<String>,
    pub(crate) model_number: Option<String>,
    pub(crate) serial_number: Option<String>,
    pub(crate) purchase_date: Option<NaiveDate>,
    pub(crate) purchase_store: Option<String>,
    pub(crate) purchase_price: Option<Decimal>,
    pub(crate) warranty_expiration: Option<NaiveDate>,
    pub(crate) dimensions: Option<String>,
    pub(crate) weight: Option<String>,
    pub(crate) color: Option<String>,
    pub(crate) condition: Condition,
    pub(crate) accessories: Option<String>,
    pub(crate) consumable_replacement: Option<String>,
    pub(crate) link: Option<String>,
    pub(crate) created_at: EpochMs,
    pub(crate) updated_at: EpochMs,
    pub(crate) is_disposed: bool,
    pub(crate) disposed_at: Option<EpochMs>,
}

impl Item {
    /// Creates an item with a generated id and both timestamps at `now`.
    pub fn new(name: impl Into<String>, now: EpochMs) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            category_id: None,
            location_id: None,
            tag_ids: Vec::new(),
            notes: None,
            brand: None,
            model_number: None,
            serial_number: None,
            purchase_date: None,
            purchase_store: None,
            purchase_price: None,
            warranty_expiration: None,
            dimensions: None,
            weight: None,
            color: None,
            condition: Condition::default(),
            accessories: None,
            consumable_replacement: None,
            link: None,
            created_at: now,
            updated_at: now,
            is_disposed: false,
            disposed_at: None,
        }
    }

    /// Creates an item with a caller-provided id; nil ids are rejected.
    pub fn with_id(
        id: ItemId,
        name: impl Into<String>,
        now: EpochMs,
    ) -> Result<Self, ItemValidationError> {
        if id.is_nil() {
            return Err(ItemValidationError::NilId);
        }
        let mut item = Self::new(name, now);
        item.id = id;
        Ok(item)
    }

    /// Checks structural invariants before persistence.
    pub fn validate(&self) -> Result<(), ItemValidationError> {
        if self.id.is_nil() {
            return Err(ItemValidationError::NilId);
        }
        for (index, tag) in self.tag_ids.iter().enumerate() {
            if self.tag_ids[..index].contains(tag) {
                return Err(ItemValidationError::DuplicateTag(*tag));
            }
        }
        Ok(())
    }

    /// Applies one edit and touches `updated_at`.
    ///
    /// Tag edits that change nothing (adding an assigned tag, removing an
    /// unassigned one) are not writes and leave `updated_at` alone.
    pub fn apply(&mut self, edit: ItemEdit, now: EpochMs) {
        match edit {
            ItemEdit::Name(value) => self.name = value,
            ItemEdit::Category(value) => self.category_id = value,
            ItemEdit::Location(value) => self.location_id = value,
            ItemEdit::AddTag(tag) => {
                if self.tag_ids.contains(&tag) {
                    return;
                }
                self.tag_ids.push(tag);
            }
            ItemEdit::RemoveTag(tag) => {
                let before = self.tag_ids.len();
                self.tag_ids.retain(|id| *id != tag);
                if self.tag_ids.len() == before {
                    return;
                }
            }
            ItemEdit::Tags(tags) => {
                let mut unique = Vec::with_capacity(tags.len());
                for tag in tags {
                    if !unique.contains(&tag) {
                        unique.push(tag);
                    }
                }
                self.tag_ids = unique;
            }
            ItemEdit::Notes(value) => self.notes = value,
            ItemEdit::Brand(value) => self.brand = value,
            ItemEdit::ModelNumber(value) => self.model_number = value,
            ItemEdit::SerialNumber(value) => self.serial_number = value,
            ItemEdit::PurchaseDate(value) => self.purchase_date = value,
            ItemEdit::PurchaseStore(value) => self.purchase_store = value,
            ItemEdit::PurchasePrice(value) => self.purchase_price = value,
            ItemEdit::WarrantyExpiration(value) => self.warranty_expiration = value,
            ItemEdit::Dimensions(value) => self.dimensions = value,
            ItemEdit::Weight(value) => self.weight = value,
            ItemEdit::Color(value) => self.color = value,
            ItemEdit::Condition(value) => self.condition = value,
            ItemEdit::Accessories(value) => self.accessories = value,
            ItemEdit::ConsumableReplacement(value) => self.consumable_replacement = value,
            ItemEdit::Link(value) => self.link = value,
            ItemEdit::Disposed(value) => self.set_disposed(value, now),
        }
        self.touch(now);
    }

    /// Drops a deleted master from this item's references.
    ///
    /// Same effect as the storage foreign keys on master deletion. Not a
    /// user write, so `updated_at` is untouched.
    pub fn detach_master(&mut self, id: MasterId) {
        if self.category_id == Some(id) {
            self.category_id = None;
        }
        if self.location_id == Some(id) {
            self.location_id = None;
        }
        self.tag_ids.retain(|tag| *tag != id);
    }

    fn set_disposed(&mut self, value: bool, now: EpochMs) {
        match (self.is_disposed, value) {
            (false, true) => {
                if self.disposed_at.is_none() {
                    self.disposed_at = Some(now);
                }
            }
            (true, false) => self.disposed_at = None,
            _ => {}
        }
        self.is_disposed = value;
    }

    fn touch(&mut self, now: EpochMs) {
        self.updated_at = self.updated_at.max(now);
    }

    pub fn id(&self) -> ItemId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn category_id(&self) -> Option<MasterId> {
        self.category_id
    }

    pub fn location_id(&self) -> Option<MasterId> {
        self.location_id
    }

    /// Assigned tags in assignment order.
    pub fn tag_ids(&self) -> &[MasterId] {
        &self.tag_ids
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    pub fn brand(&self) -> Option<&str> {
        self.brand.as_deref()
    }

    pub fn model_number(&self) -> Option<&str> {
        self.model_number.as_deref()
    }

    pub fn serial_number(&self) -> Option<&str> {
        self.serial_number.as_deref()
    }

    pub fn purchase_date(&self) -> Option<NaiveDate> {
        self.purchase_date
    }

    pub fn purchase_store(&self) -> Option<&str> {
        self.purchase_store.as_deref()
    }

    pub fn purchase_price(&self) -> Option<Decimal> {
        self.purchase_price
    }

    pub fn warranty_expiration(&self) -> Option<NaiveDate> {
        self.warranty_expiration
    }

    pub fn dimensions(&self) -> Option<&str> {
        self.dimensions.as_deref()
    }

    pub fn weight(&self) -> Option<&str> {
        self.weight.as_deref()
    }

    pub fn color(&self) -> Option<&str> {
        self.color.as_deref()
    }

    pub fn condition(&self) -> Condition {
        self.condition
    }

    pub fn accessories(&self) -> Option<&str> {
        self.accessories.as_deref()
    }

    pub fn consumable_replacement(&self) -> Option<&str> {
        self.consumable_replacement.as_deref()
    }

    pub fn link(&self) -> Option<&str> {
        self.link.as_deref()
    }

    pub fn created_at(&self) -> EpochMs {
        self.created_at
    }

    pub fn updated_at(&self) -> EpochMs {
        self.updated_at
    }

    pub fn is_disposed(&self) -> bool {
        self.is_disposed
    }

    pub fn disposed_at(&self) -> Option<EpochMs> {
        self.disposed_at
    }

    /// Whether the item references `id` as category, location or tag.
    pub fn references(&self, id: MasterId) -> bool {
        self.category_id == Some(id) || self.location_id == Some(id) || self.tag_ids.contains(&id)
    }
}

impl PartialEq for Item {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Item {}

impl Hash for Item {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::{Item, ItemEdit};
    use uuid::Uuid;

    #[test]
    fn tags_edit_drops_duplicates_keeping_first_position() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let mut item = Item::new("box", 10);
        item.apply(ItemEdit::Tags(vec![a, b, a]), 20);
        assert_eq!(item.tag_ids(), &[a, b]);
        assert!(item.validate().is_ok());
    }

    #[test]
    fn noop_tag_edits_do_not_touch() {
        let tag = Uuid::new_v4();
        let mut item = Item::new("box", 10);
        item.apply(ItemEdit::AddTag(tag), 20);
        item.apply(ItemEdit::AddTag(tag), 30);
        item.apply(ItemEdit::RemoveTag(Uuid::new_v4()), 40);
        assert_eq!(item.tag_ids(), &[tag]);
        assert_eq!(item.updated_at(), 20);
    }

    #[test]
    fn clock_going_backwards_keeps_updated_at() {
        let mut item = Item::new("box", 100);
        item.apply(ItemEdit::Color(Some("red".to_string())), 50);
        assert_eq!(item.updated_at(), 100);
        assert_eq!(item.color(), Some("red"));
    }

    #[test]
    fn detach_master_clears_every_reference_slot() {
        let shared = Uuid::new_v4();
        let mut item = Item::new("box", 10);
        item.category_id = Some(shared);
        item.location_id = Some(shared);
        item.tag_ids = vec![shared, Uuid::new_v4()];

        item.detach_master(shared);
        assert!(!item.references(shared));
        assert_eq!(item.tag_ids().len(), 1);
        assert_eq!(item.updated_at(), 10);
    }
}
