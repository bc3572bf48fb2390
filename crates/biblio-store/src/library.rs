//! # Library Handle
//!
//! A [`Catalog`] bound to a [`FileStore`]: the handle external callers
//! (console menu, GUI, tests) construct and talk to.
//!
//! ## Operation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                    Library Operation Flow                           │
//! │                                                                     │
//! │  library.loan("ISBN-1001", "U100")                                  │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  Catalog::loan ── validate invariants, mutate in memory             │
//! │       │                                                             │
//! │       │ Err(CatalogError) ──► nothing changed, nothing saved        │
//! │       ▼                                                             │
//! │  FileStore::save(snapshot)                                          │
//! │       │                                                             │
//! │       ├── Ok  ──► Ok(SaveStatus::Persisted)                         │
//! │       │                                                             │
//! │       └── Err ──► Ok(SaveStatus::MemoryOnly { reason })             │
//! │                   change exists only in memory; the caller may      │
//! │                   warn the user and retry the whole operation       │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Startup
//! `Library::open` auto-loads the store file, quarantining corrupt
//! content, and runs the reconciliation pass that re-derives held-item
//! lists from the loan ledger. Both results are kept as informational
//! state, queryable but never raised as errors.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use biblio_core::{
    Actor, ActorLoans, Catalog, CatalogEntry, CatalogResult, Item, ItemStatus, ReconcileReport,
};

use crate::error::{StoreError, StoreResult};
use crate::file::{FileStore, LoadOutcome};

// =============================================================================
// Save Status
// =============================================================================

/// Whether a successful mutation reached durable storage.
///
/// A mutation that validates and applies in memory is a success even if
/// the following save fails; this type is how the caller learns the
/// difference. Marked `#[must_use]` because ignoring `MemoryOnly` means
/// silently dropping the user's data on the next crash.
#[must_use]
#[derive(Debug)]
pub enum SaveStatus {
    /// The change is on disk.
    Persisted,

    /// The change applied in memory but the save failed; it will be
    /// written out by the next successful save, or lost on exit.
    MemoryOnly { reason: StoreError },
}

impl SaveStatus {
    /// Returns true for [`SaveStatus::Persisted`].
    pub fn is_persisted(&self) -> bool {
        matches!(self, SaveStatus::Persisted)
    }
}

// =============================================================================
// Library
// =============================================================================

/// The catalog-and-lending tracker, bound to its store file.
///
/// ## Usage
/// ```rust,ignore
/// let mut library = Library::open("./biblioteca.json")?;
///
/// library.add_item(Item::new("ISBN-1001", "Cien años de soledad", "García Márquez", "Novela")?)?;
/// library.register_actor(Actor::new("U100", "María Pérez")?)?;
/// library.loan("ISBN-1001", "U100")?;
///
/// for entry in library.list_all() {
///     println!("{} - {:?}", entry.item.title(), entry.status);
/// }
/// ```
///
/// ## Concurrency
/// Single-threaded by design: every operation runs to completion,
/// including its save, before returning. One `Library` instance per
/// store file per process; embedders needing shared access must wrap
/// the whole instance in a mutex so mutation and save stay one unit.
#[derive(Debug)]
pub struct Library {
    catalog: Catalog,
    store: FileStore,
    load_outcome: LoadOutcome,
    reconcile_report: ReconcileReport,
}

impl Library {
    /// Opens (and if necessary initializes) the library at `path`.
    ///
    /// ## What This Does
    /// 1. Loads the store file, bootstrapping or quarantining as needed
    /// 2. Rebuilds the catalog, reconciling held lists from the ledger
    /// 3. Logs every dangling reference the reconciliation found
    ///
    /// ## Errors
    /// - [`StoreError::PermissionDenied`] / [`StoreError::Io`] when the
    ///   file cannot be read or the directory cannot be written
    ///
    /// Corrupt content is recovered, not raised; check
    /// [`load_outcome`](Self::load_outcome) for the quarantine path.
    pub fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let store = FileStore::new(path);
        let (snapshot, load_outcome) = store.load()?;
        let (catalog, reconcile_report) = Catalog::restore(snapshot);

        if let Some(quarantine) = &load_outcome.quarantined {
            warn!(
                quarantine = %quarantine.display(),
                "previous store content was corrupt; starting from an empty catalog"
            );
        }
        for (item_id, actor_id) in &reconcile_report.missing_items {
            warn!(item = %item_id, actor = %actor_id, "loan references an unknown item");
        }
        for (item_id, actor_id) in &reconcile_report.missing_actors {
            warn!(item = %item_id, actor = %actor_id, "loan references an unknown actor");
        }
        if reconcile_report.stale_held_dropped > 0 {
            warn!(
                dropped = reconcile_report.stale_held_dropped,
                "held-item entries had no ledger backing and were dropped"
            );
        }
        if reconcile_report.duplicate_records_dropped > 0 {
            warn!(
                dropped = reconcile_report.duplicate_records_dropped,
                "duplicate records in the store file were skipped"
            );
        }

        info!(
            path = %store.path().display(),
            items = catalog.item_count(),
            actors = catalog.actor_count(),
            loans = catalog.loan_count(),
            "library opened"
        );

        Ok(Library {
            catalog,
            store,
            load_outcome,
            reconcile_report,
        })
    }

    // =========================================================================
    // Mutations (validate → mutate → save)
    // =========================================================================

    /// Adds an item to the catalog and persists.
    pub fn add_item(&mut self, item: Item) -> CatalogResult<SaveStatus> {
        self.catalog.add_item(item)?;
        Ok(self.persist())
    }

    /// Removes an item (only while not on loan) and persists.
    pub fn remove_item(&mut self, id: &str) -> CatalogResult<SaveStatus> {
        self.catalog.remove_item(id)?;
        Ok(self.persist())
    }

    /// Changes an item's category tag and persists.
    pub fn reclassify_item(&mut self, id: &str, category: &str) -> CatalogResult<SaveStatus> {
        self.catalog.reclassify_item(id, category)?;
        Ok(self.persist())
    }

    /// Registers an actor and persists.
    pub fn register_actor(&mut self, actor: Actor) -> CatalogResult<SaveStatus> {
        self.catalog.register_actor(actor)?;
        Ok(self.persist())
    }

    /// Deregisters an actor (only with no outstanding loans) and persists.
    pub fn deregister_actor(&mut self, id: &str) -> CatalogResult<SaveStatus> {
        self.catalog.deregister_actor(id)?;
        Ok(self.persist())
    }

    /// Loans an item to an actor and persists.
    pub fn loan(&mut self, item_id: &str, actor_id: &str) -> CatalogResult<SaveStatus> {
        self.catalog.loan(item_id, actor_id)?;
        Ok(self.persist())
    }

    /// Returns a loaned item and persists.
    pub fn return_item(&mut self, item_id: &str, actor_id: &str) -> CatalogResult<SaveStatus> {
        self.catalog.return_item(item_id, actor_id)?;
        Ok(self.persist())
    }

    /// Saves the current state, downgrading failure to `MemoryOnly`.
    fn persist(&mut self) -> SaveStatus {
        match self.store.save(&self.catalog.snapshot()) {
            Ok(()) => SaveStatus::Persisted,
            Err(reason) => {
                warn!(
                    path = %self.store.path().display(),
                    error = %reason,
                    "change applied in memory but not persisted"
                );
                SaveStatus::MemoryOnly { reason }
            }
        }
    }

    // =========================================================================
    // Queries (delegate to the catalog, no I/O)
    // =========================================================================

    /// Case-insensitive substring search over titles.
    pub fn search_by_title(&self, query: &str) -> CatalogResult<Vec<CatalogEntry>> {
        self.catalog.search_by_title(query)
    }

    /// Case-insensitive substring search over creators.
    pub fn search_by_creator(&self, query: &str) -> CatalogResult<Vec<CatalogEntry>> {
        self.catalog.search_by_creator(query)
    }

    /// Case-insensitive exact category match.
    pub fn search_by_category(&self, category: &str) -> CatalogResult<Vec<CatalogEntry>> {
        self.catalog.search_by_category(category)
    }

    /// Every item with availability, in insertion order.
    pub fn list_all(&self) -> Vec<CatalogEntry> {
        self.catalog.list_all()
    }

    /// The loans held by one actor.
    pub fn loans_for_actor(&self, actor_id: &str) -> CatalogResult<ActorLoans> {
        self.catalog.loans_for_actor(actor_id)
    }

    /// Availability of one item.
    pub fn status_of(&self, item_id: &str) -> ItemStatus {
        self.catalog.status_of(item_id)
    }

    /// Read access to the underlying catalog.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The store file path this library is bound to.
    pub fn path(&self) -> &Path {
        self.store.path()
    }

    /// What happened when the store file was loaded (created empty?
    /// quarantined?). Informational, never an error.
    pub fn load_outcome(&self) -> &LoadOutcome {
        &self.load_outcome
    }

    /// What the load-time reconciliation pass found.
    pub fn reconcile_report(&self) -> &ReconcileReport {
        &self.reconcile_report
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
