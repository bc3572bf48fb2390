//! # Error Types
//!
//! Domain-specific error types for biblio-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                 │
//! │                                                                     │
//! │  biblio-core errors (this file)                                     │
//! │  ├── CatalogError     - Business-rule violations                    │
//! │  └── ValidationError  - Input validation failures                   │
//! │                                                                     │
//! │  biblio-store errors (separate crate)                               │
//! │  └── StoreError       - File persistence failures                   │
//! │                                                                     │
//! │  Flow: ValidationError → CatalogError → caller renders a message    │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (item id, holder id, etc.)
//! 3. Errors are enum variants, never String
//! 4. Every variant is recoverable: a failed operation leaves the
//!    catalog exactly as it was

use thiserror::Error;

// =============================================================================
// Catalog Error
// =============================================================================

/// Business-rule violations raised by catalog operations.
///
/// These are expected outcomes, not faults: callers match on them and
/// render a user-facing message. None of them leave partial state behind.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    /// An item or actor with this id is already present.
    ///
    /// ## When This Occurs
    /// - `add_item` with an id already in the item collection
    /// - `register_actor` with an id already in the registry
    #[error("id '{id}' is already registered")]
    DuplicateId { id: String },

    /// No item with this id exists in the catalog.
    #[error("item not found: {id}")]
    ItemNotFound { id: String },

    /// No actor with this id exists in the registry.
    #[error("actor not found: {id}")]
    ActorNotFound { id: String },

    /// The item cannot be removed while it is on loan.
    ///
    /// ## When This Occurs
    /// - `remove_item` while the ledger still maps the item to a holder
    ///
    /// The holder id is included so the caller can say who must return it.
    #[error("item {id} is on loan to {holder} and cannot be removed")]
    ItemOnLoan { id: String, holder: String },

    /// The actor cannot be deregistered while holding items.
    #[error("actor {id} still holds {held} item(s) and cannot be deregistered")]
    ActorHasOutstandingLoans { id: String, held: usize },

    /// The item is already loaned out, possibly to the same actor.
    ///
    /// ## When This Occurs
    /// - `loan` for an item the ledger already maps to a holder
    #[error("item {id} is already loaned to {holder}")]
    ItemAlreadyLoaned { id: String, holder: String },

    /// The item is not currently on loan, so it cannot be returned.
    #[error("item {id} is not on loan")]
    NotOnLoan { id: String },

    /// The item is on loan, but to a different actor than the one returning.
    #[error("item {id} is loaned to {holder}, not to {returned_by}")]
    LoanedToSomeoneElse {
        id: String,
        holder: String,
        returned_by: String,
    },

    /// Validation error (wraps ValidationError).
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These occur when caller-supplied fields don't meet requirements.
/// Used for early validation before any catalog state is touched.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Invalid format (e.g., disallowed characters in an id).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CatalogError.
pub type CatalogResult<T> = Result<T, CatalogError>;

// =============================================================================
// Unit Tests
// =============================================================================
