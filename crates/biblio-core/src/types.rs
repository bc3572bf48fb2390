//! # Domain Types
//!
//! Core domain types used throughout Biblio.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                │
//! │                                                                     │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐    │
//! │  │      Item       │   │      Actor      │   │   ItemStatus    │    │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │    │
//! │  │  id (immutable) │   │  id (immutable) │   │  Available      │    │
//! │  │  title          │   │  name           │   │  LoanedTo(id)   │    │
//! │  │  creator        │   │  held_items     │   └─────────────────┘    │
//! │  │  category (mut) │   │  (ordered set)  │                          │
//! │  └─────────────────┘   └─────────────────┘                          │
//! │                                                                     │
//! │  ┌─────────────────┐   ┌─────────────────┐                          │
//! │  │  CatalogEntry   │   │   ActorLoans    │   (query result views)   │
//! │  │  item + status  │   │  items+missing  │                          │
//! │  └─────────────────┘   └─────────────────┘                          │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Immutability
//! `Item` keeps its fields private: `id`, `title` and `creator` are fixed
//! at construction and only `category` has a setter. The compiler, not a
//! convention, enforces that descriptive fields never drift.

use serde::{Deserialize, Serialize};

use crate::validation::{validate_category, validate_id, validate_text, ValidationResult};

// =============================================================================
// Item
// =============================================================================

/// A catalog item (a book in the original domain).
///
/// ## Identity
/// `id` is the business identifier (an ISBN for books). It is supplied by
/// the caller, unique within a catalog, and immutable after construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Unique identifier, immutable.
    id: String,

    /// Display title, immutable.
    title: String,

    /// Author / creator, immutable.
    creator: String,

    /// Classification tag, the only mutable field.
    category: String,
}

impl Item {
    /// Creates a new item, validating every field.
    ///
    /// Fields are stored trimmed, so `" ISBN-1001 "` and `"ISBN-1001"`
    /// name the same item.
    ///
    /// ## Example
    /// ```rust
    /// use biblio_core::Item;
    ///
    /// let item = Item::new(
    ///     "ISBN-1001",
    ///     "Cien años de soledad",
    ///     "García Márquez",
    ///     "Novela",
    /// )
    /// .unwrap();
    /// assert_eq!(item.id(), "ISBN-1001");
    /// ```
    pub fn new(id: &str, title: &str, creator: &str, category: &str) -> ValidationResult<Self> {
        validate_id(id)?;
        validate_text("title", title)?;
        validate_text("creator", creator)?;
        validate_category(category)?;

        Ok(Item {
            id: id.trim().to_string(),
            title: title.trim().to_string(),
            creator: creator.trim().to_string(),
            category: category.trim().to_string(),
        })
    }

    /// Returns the unique identifier.
    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the title.
    #[inline]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the creator.
    #[inline]
    pub fn creator(&self) -> &str {
        &self.creator
    }

    /// Returns the current category.
    #[inline]
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Reclassifies the item. The only mutation an item supports.
    pub fn set_category(&mut self, category: &str) -> ValidationResult<()> {
        validate_category(category)?;
        self.category = category.trim().to_string();
        Ok(())
    }
}

// =============================================================================
// Actor
// =============================================================================

/// A registered actor (a library user in the original domain).
///
/// ## Held Items
/// `held_items` is an ordered, duplicate-free list of item ids. It is a
/// *derived view* of the loan ledger: the ledger is authoritative, and
/// the catalog keeps both in lockstep on every mutation and rebuilds
/// this list from the ledger after every load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// Unique identifier, immutable.
    id: String,

    /// Display name.
    name: String,

    /// Item ids currently held, in loan order, no duplicates.
    held_items: Vec<String>,
}

impl Actor {
    /// Creates a new actor with an empty held list.
    pub fn new(id: &str, name: &str) -> ValidationResult<Self> {
        validate_id(id)?;
        validate_text("name", name)?;

        Ok(Actor {
            id: id.trim().to_string(),
            name: name.trim().to_string(),
            held_items: Vec::new(),
        })
    }

    /// Returns the unique identifier.
    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the display name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the held item ids in loan order.
    #[inline]
    pub fn held_items(&self) -> &[String] {
        &self.held_items
    }

    /// Returns true if the actor currently holds the given item.
    pub fn is_holding(&self, item_id: &str) -> bool {
        self.held_items.iter().any(|held| held == item_id)
    }

    /// Returns true if the actor holds no items.
    #[inline]
    pub fn holds_nothing(&self) -> bool {
        self.held_items.is_empty()
    }

    /// Records that the actor now holds an item.
    ///
    /// Idempotent: holding an item twice leaves a single entry, so no
    /// sequence of operations can produce duplicates in the list.
    pub(crate) fn hold(&mut self, item_id: &str) {
        if !self.is_holding(item_id) {
            self.held_items.push(item_id.to_string());
        }
    }

    /// Removes an item from the held list.
    ///
    /// Returns whether an entry was actually removed, so callers can
    /// detect (and report) a ledger/held-list disagreement instead of
    /// silently ignoring it.
    pub(crate) fn release(&mut self, item_id: &str) -> bool {
        let before = self.held_items.len();
        self.held_items.retain(|held| held != item_id);
        before != self.held_items.len()
    }

    /// Drops every held entry, used when reconciliation rebuilds the
    /// list from the ledger.
    pub(crate) fn clear_held(&mut self) {
        self.held_items.clear();
    }
}

// =============================================================================
// Item Status
// =============================================================================

/// Availability of an item, derived from the loan ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    /// Not present in the ledger.
    Available,
    /// Ledgered to the given actor id.
    LoanedTo(String),
}

impl ItemStatus {
    /// Returns true for [`ItemStatus::Available`].
    #[inline]
    pub fn is_available(&self) -> bool {
        matches!(self, ItemStatus::Available)
    }
}

// =============================================================================
// Query Result Views
// =============================================================================

/// A catalog item annotated with its availability, as returned by the
/// search and listing operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    pub item: Item,
    pub status: ItemStatus,
}

/// The loans held by one actor, with held ids resolved to full items.
///
/// An id present in the held list but missing from the item collection
/// is reported in `missing`, never silently skipped. That situation can
/// only arise from a reload of a file whose ledger referenced items the
/// catalog no longer contains.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActorLoans {
    /// The actor the loans belong to.
    pub actor_id: String,

    /// Held items still present in the catalog, in loan order.
    pub items: Vec<Item>,

    /// Held ids with no backing item record.
    pub missing: Vec<String>,
}

// =============================================================================
// Unit Tests
// =============================================================================
