//! # biblio-store: Persistence Layer for Biblio
//!
//! This crate persists a [`biblio_core::Catalog`] to a single JSON file
//! and exposes [`Library`], the handle external callers construct.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                       Biblio Data Flow                              │
//! │                                                                     │
//! │  External caller (console menu, GUI, tests)                         │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  ┌───────────────────────────────────────────────────────────────┐  │
//! │  │                  biblio-store (THIS CRATE)                    │  │
//! │  │                                                               │  │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │  │
//! │  │   │    Library    │    │   FileStore   │    │  StoreError  │  │  │
//! │  │   │ (library.rs)  │───►│   (file.rs)   │    │  (error.rs)  │  │  │
//! │  │   │               │    │               │    │              │  │  │
//! │  │   │ open/mutate/  │    │ atomic save   │    │ Permission   │  │  │
//! │  │   │ query         │    │ quarantine    │    │ Denied / Io  │  │  │
//! │  │   └───────┬───────┘    └───────────────┘    └──────────────┘  │  │
//! │  │           │ pure operations                                   │  │
//! │  └───────────┼───────────────────────────────────────────────────┘  │
//! │              ▼                                                      │
//! │  biblio-core (Catalog, LoanLedger, typed errors)                    │
//! │              │                                                      │
//! │              ▼                                                      │
//! │  ./biblioteca.json  (fully-old or fully-new, never partial)         │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`file`] - `FileStore`: atomic snapshot writes, quarantine recovery
//! - [`library`] - `Library`: auto-loading aggregate handle
//! - [`error`] - Store error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use biblio_core::{Actor, Item};
//! use biblio_store::Library;
//!
//! let mut library = Library::open("./biblioteca.json")?;
//! library.add_item(Item::new("ISBN-1001", "Cien años de soledad", "García Márquez", "Novela")?)?;
//! library.register_actor(Actor::new("U100", "María Pérez")?)?;
//! let status = library.loan("ISBN-1001", "U100")?;
//! assert!(status.is_persisted());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod file;
pub mod library;

#[cfg(test)]
mod testutil;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{StoreError, StoreResult};
pub use file::{FileStore, LoadOutcome};
pub use library::{Library, SaveStatus};
