//! # biblio-core: Pure Domain Logic for Biblio
//!
//! This crate is the **heart** of Biblio, a catalog-and-lending tracker.
//! It contains all domain logic as pure state transitions with zero I/O
//! dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                       Biblio Architecture                           │
//! │                                                                     │
//! │  ┌───────────────────────────────────────────────────────────────┐  │
//! │  │           External callers (console menu, GUI, tests)         │  │
//! │  │       add item ──► loan ──► search ──► return ──► remove      │  │
//! │  └─────────────────────────────┬─────────────────────────────────┘  │
//! │                                │                                    │
//! │  ┌─────────────────────────────▼─────────────────────────────────┐  │
//! │  │                 biblio-store (Library handle)                 │  │
//! │  │       auto-load on open, save after every mutation            │  │
//! │  └─────────────────────────────┬─────────────────────────────────┘  │
//! │                                │                                    │
//! │  ┌─────────────────────────────▼─────────────────────────────────┐  │
//! │  │               ★ biblio-core (THIS CRATE) ★                    │  │
//! │  │                                                               │  │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │  │
//! │  │   │   types   │  │  ledger   │  │  catalog  │  │validation │  │  │
//! │  │   │   Item    │  │LoanLedger │  │  Catalog  │  │   rules   │  │  │
//! │  │   │   Actor   │  │ item→actor│  │ Snapshot  │  │  checks   │  │  │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │  │
//! │  │                                                               │  │
//! │  │   NO I/O • NO CLOCK • NO GLOBALS • PURE STATE TRANSITIONS     │  │
//! │  └───────────────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Item, Actor, status and view types)
//! - [`ledger`] - The authoritative item → actor loan mapping
//! - [`catalog`] - The aggregate root: operations, snapshot, reconciliation
//! - [`error`] - Domain error types
//! - [`validation`] - Field validation rules
//!
//! ## Design Principles
//!
//! 1. **Typed outcomes**: every operation returns `Ok` or a
//!    [`CatalogError`] variant - never a panic, never a string
//! 2. **No partial state**: a failed operation leaves the catalog
//!    exactly as it found it
//! 3. **Ledger is authoritative**: held-item lists are derived views,
//!    kept in lockstep on mutation and rebuilt on restore
//! 4. **No globals**: a [`Catalog`] is a plain value; independent
//!    instances never interfere
//!
//! ## Example Usage
//!
//! ```rust
//! use biblio_core::{Actor, Catalog, Item};
//!
//! let mut catalog = Catalog::new();
//! catalog
//!     .add_item(Item::new("ISBN-1001", "Cien años de soledad", "García Márquez", "Novela").unwrap())
//!     .unwrap();
//! catalog
//!     .register_actor(Actor::new("U100", "María Pérez").unwrap())
//!     .unwrap();
//!
//! catalog.loan("ISBN-1001", "U100").unwrap();
//! assert!(catalog.remove_item("ISBN-1001").is_err()); // on loan
//!
//! catalog.return_item("ISBN-1001", "U100").unwrap();
//! assert!(catalog.remove_item("ISBN-1001").is_ok());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod catalog;
pub mod error;
pub mod ledger;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use biblio_core::Catalog` instead of
// `use biblio_core::catalog::Catalog`

pub use catalog::{Catalog, CatalogSnapshot, ReconcileReport};
pub use error::{CatalogError, CatalogResult, ValidationError};
pub use ledger::LoanLedger;
pub use types::{Actor, ActorLoans, CatalogEntry, Item, ItemStatus};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum length of an item or actor id.
///
/// ## Why a cap?
/// Ids are caller-supplied business identifiers (ISBNs, member codes).
/// 64 characters covers every real identifier scheme while keeping the
/// persisted file and error messages readable.
pub const MAX_ID_LEN: usize = 64;

/// Maximum length of free-text fields (title, creator, actor name).
pub const MAX_TEXT_LEN: usize = 200;

/// Maximum length of a classification category.
pub const MAX_CATEGORY_LEN: usize = 100;

/// Maximum length of a search query.
pub const MAX_QUERY_LEN: usize = 100;
