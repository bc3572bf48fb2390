//! # Catalog Aggregate
//!
//! The aggregate root owning items, actors, and the loan ledger.
//!
//! ## Data Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                     Catalog Operation Flow                          │
//! │                                                                     │
//! │  External caller (Library / tests)                                  │
//! │       │                                                             │
//! │       │  catalog.loan("ISBN-1001", "U100")                          │
//! │       ▼                                                             │
//! │  ┌───────────────────────────────────────────────────────────────┐  │
//! │  │ Catalog (THIS MODULE)                                         │  │
//! │  │                                                               │  │
//! │  │  1. validate  ── item exists? actor exists? already loaned?   │  │
//! │  │  2. mutate    ── ledger.record() + actor.hold()               │  │
//! │  │                                                               │  │
//! │  │  On any validation failure: return early, state UNTOUCHED     │  │
//! │  └───────────────────────────────────────────────────────────────┘  │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  Ok(()) or typed CatalogError                                       │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## The Bidirectional Invariant
//! After every operation and after every successful restore:
//!
//! ```text
//! ledger[k] = u  ⇔  k ∈ actors[u].held_items
//! ```
//!
//! The ledger is authoritative; held lists are a cached view kept in
//! lockstep by every mutation and rebuilt from the ledger on restore.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::error::{CatalogError, CatalogResult};
use crate::ledger::LoanLedger;
use crate::types::{Actor, ActorLoans, CatalogEntry, Item, ItemStatus};
use crate::validation::validate_search_query;

// =============================================================================
// Snapshot
// =============================================================================

/// The full catalog state as persisted to disk.
///
/// Items and actors are stored as arrays so their insertion order
/// survives the JSON round trip (object key order does not); loans are
/// an object keyed by item id, matching the ledger exactly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    pub items: Vec<Item>,
    pub actors: Vec<Actor>,
    pub loans: BTreeMap<String, String>,
}

impl CatalogSnapshot {
    /// Returns true if the snapshot carries no state at all.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty() && self.actors.is_empty() && self.loans.is_empty()
    }
}

// =============================================================================
// Reconcile Report
// =============================================================================

/// What the reconciliation pass found while restoring a snapshot.
///
/// Dangling ledger references are *tolerated but flagged*: they stay in
/// the ledger, and this report is how the caller learns about them.
/// Nothing here is an error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Ledger entries whose item id is absent from the catalog,
    /// as `(item_id, actor_id)` pairs.
    pub missing_items: Vec<(String, String)>,

    /// Ledger entries whose actor id is absent from the registry,
    /// as `(item_id, actor_id)` pairs.
    pub missing_actors: Vec<(String, String)>,

    /// Persisted held-list entries with no backing ledger entry.
    /// The ledger is authoritative, so these were dropped.
    pub stale_held_dropped: usize,

    /// Items or actors skipped because an earlier record claimed the
    /// same id (first record wins).
    pub duplicate_records_dropped: usize,
}

impl ReconcileReport {
    /// Returns true if the snapshot restored without findings.
    pub fn is_clean(&self) -> bool {
        self.missing_items.is_empty()
            && self.missing_actors.is_empty()
            && self.stale_held_dropped == 0
            && self.duplicate_records_dropped == 0
    }
}

// =============================================================================
// Catalog
// =============================================================================

/// The catalog-and-lending aggregate.
///
/// Owns the item collection, the actor registry, and the loan ledger
/// exclusively; no other component mutates them. A `Catalog` is a plain
/// constructible value with no global state, so independent instances
/// (one per test, say) never interfere.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    /// Items by id.
    items: HashMap<String, Item>,

    /// Item ids in insertion order, the order `list_all` reports.
    item_order: Vec<String>,

    /// Actors by id.
    actors: HashMap<String, Actor>,

    /// Actor ids in registration order.
    actor_order: Vec<String>,

    /// The authoritative loan mapping.
    ledger: LoanLedger,
}

impl Catalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Catalog::default()
    }

    // =========================================================================
    // Item Operations
    // =========================================================================

    /// Adds an item to the catalog.
    ///
    /// ## Errors
    /// - [`CatalogError::DuplicateId`] if an item with that id exists
    pub fn add_item(&mut self, item: Item) -> CatalogResult<()> {
        if self.items.contains_key(item.id()) {
            return Err(CatalogError::DuplicateId {
                id: item.id().to_string(),
            });
        }

        self.item_order.push(item.id().to_string());
        self.items.insert(item.id().to_string(), item);
        Ok(())
    }

    /// Removes an item, returning the removed record.
    ///
    /// ## Errors
    /// - [`CatalogError::ItemNotFound`] if no such item
    /// - [`CatalogError::ItemOnLoan`] while the ledger maps the item
    pub fn remove_item(&mut self, id: &str) -> CatalogResult<Item> {
        if !self.items.contains_key(id) {
            return Err(CatalogError::ItemNotFound { id: id.to_string() });
        }

        if let Some(holder) = self.ledger.holder_of(id) {
            return Err(CatalogError::ItemOnLoan {
                id: id.to_string(),
                holder: holder.to_string(),
            });
        }

        self.item_order.retain(|ordered| ordered != id);
        self.items
            .remove(id)
            .ok_or_else(|| CatalogError::ItemNotFound { id: id.to_string() })
    }

    /// Reclassifies an item's category tag, the only item field that
    /// may change after creation.
    pub fn reclassify_item(&mut self, id: &str, category: &str) -> CatalogResult<()> {
        let item = self
            .items
            .get_mut(id)
            .ok_or_else(|| CatalogError::ItemNotFound { id: id.to_string() })?;
        item.set_category(category)?;
        Ok(())
    }

    /// Looks up an item by id.
    pub fn item(&self, id: &str) -> Option<&Item> {
        self.items.get(id)
    }

    /// Number of items in the catalog.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    // =========================================================================
    // Actor Operations
    // =========================================================================

    /// Registers an actor. Registration always starts with an empty held
    /// list, whatever the supplied record carried.
    ///
    /// ## Errors
    /// - [`CatalogError::DuplicateId`] if an actor with that id exists
    pub fn register_actor(&mut self, actor: Actor) -> CatalogResult<()> {
        if self.actors.contains_key(actor.id()) {
            return Err(CatalogError::DuplicateId {
                id: actor.id().to_string(),
            });
        }

        let mut actor = actor;
        actor.clear_held();

        self.actor_order.push(actor.id().to_string());
        self.actors.insert(actor.id().to_string(), actor);
        Ok(())
    }

    /// Deregisters an actor, returning the removed record.
    ///
    /// ## Errors
    /// - [`CatalogError::ActorNotFound`] if no such actor
    /// - [`CatalogError::ActorHasOutstandingLoans`] while the actor
    ///   still holds items
    pub fn deregister_actor(&mut self, id: &str) -> CatalogResult<Actor> {
        let actor = self
            .actors
            .get(id)
            .ok_or_else(|| CatalogError::ActorNotFound { id: id.to_string() })?;

        if !actor.holds_nothing() {
            return Err(CatalogError::ActorHasOutstandingLoans {
                id: id.to_string(),
                held: actor.held_items().len(),
            });
        }

        self.actor_order.retain(|ordered| ordered != id);
        self.actors
            .remove(id)
            .ok_or_else(|| CatalogError::ActorNotFound { id: id.to_string() })
    }

    /// Looks up an actor by id.
    pub fn actor(&self, id: &str) -> Option<&Actor> {
        self.actors.get(id)
    }

    /// Number of registered actors.
    pub fn actor_count(&self) -> usize {
        self.actors.len()
    }

    // =========================================================================
    // Loan Operations
    // =========================================================================

    /// Loans an item to an actor.
    ///
    /// ## Errors (checked in this order)
    /// - [`CatalogError::ItemNotFound`]
    /// - [`CatalogError::ActorNotFound`]
    /// - [`CatalogError::ItemAlreadyLoaned`]
    pub fn loan(&mut self, item_id: &str, actor_id: &str) -> CatalogResult<()> {
        if !self.items.contains_key(item_id) {
            return Err(CatalogError::ItemNotFound {
                id: item_id.to_string(),
            });
        }

        let actor = self
            .actors
            .get_mut(actor_id)
            .ok_or_else(|| CatalogError::ActorNotFound {
                id: actor_id.to_string(),
            })?;

        if let Some(holder) = self.ledger.holder_of(item_id) {
            return Err(CatalogError::ItemAlreadyLoaned {
                id: item_id.to_string(),
                holder: holder.to_string(),
            });
        }

        self.ledger.record(item_id, actor_id);
        // hold() is idempotent, so the held list can never grow a duplicate
        actor.hold(item_id);
        Ok(())
    }

    /// Returns an item previously loaned to the given actor.
    ///
    /// ## Errors
    /// - [`CatalogError::NotOnLoan`] if the ledger has no entry
    /// - [`CatalogError::LoanedToSomeoneElse`] if the entry names a
    ///   different holder
    pub fn return_item(&mut self, item_id: &str, actor_id: &str) -> CatalogResult<()> {
        let holder = match self.ledger.holder_of(item_id) {
            None => {
                return Err(CatalogError::NotOnLoan {
                    id: item_id.to_string(),
                })
            }
            Some(holder) => holder.to_string(),
        };

        if holder != actor_id {
            return Err(CatalogError::LoanedToSomeoneElse {
                id: item_id.to_string(),
                holder,
                returned_by: actor_id.to_string(),
            });
        }

        self.ledger.settle(item_id);
        if let Some(actor) = self.actors.get_mut(actor_id) {
            actor.release(item_id);
        }
        Ok(())
    }

    /// Number of outstanding loans.
    pub fn loan_count(&self) -> usize {
        self.ledger.len()
    }

    /// Availability of one item, derived from the ledger.
    pub fn status_of(&self, item_id: &str) -> ItemStatus {
        match self.ledger.holder_of(item_id) {
            Some(holder) => ItemStatus::LoanedTo(holder.to_string()),
            None => ItemStatus::Available,
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Case-insensitive substring search over titles, in catalog order.
    ///
    /// An empty query matches every item.
    pub fn search_by_title(&self, query: &str) -> CatalogResult<Vec<CatalogEntry>> {
        let query = validate_search_query(query)?.to_lowercase();
        Ok(self.collect_entries(|item| item.title().to_lowercase().contains(&query)))
    }

    /// Case-insensitive substring search over creators, in catalog order.
    pub fn search_by_creator(&self, query: &str) -> CatalogResult<Vec<CatalogEntry>> {
        let query = validate_search_query(query)?.to_lowercase();
        Ok(self.collect_entries(|item| item.creator().to_lowercase().contains(&query)))
    }

    /// Case-insensitive *exact* category match, in catalog order.
    pub fn search_by_category(&self, category: &str) -> CatalogResult<Vec<CatalogEntry>> {
        let category = validate_search_query(category)?.to_lowercase();
        Ok(self.collect_entries(|item| item.category().to_lowercase() == category))
    }

    /// Every item with its availability, in insertion order.
    pub fn list_all(&self) -> Vec<CatalogEntry> {
        self.collect_entries(|_| true)
    }

    /// The loans held by one actor, resolved to full item records.
    ///
    /// Held ids missing from the item collection are reported in
    /// [`ActorLoans::missing`], never silently skipped.
    ///
    /// ## Errors
    /// - [`CatalogError::ActorNotFound`]
    pub fn loans_for_actor(&self, actor_id: &str) -> CatalogResult<ActorLoans> {
        let actor = self.actors.get(actor_id).ok_or_else(|| {
            CatalogError::ActorNotFound {
                id: actor_id.to_string(),
            }
        })?;

        let mut items = Vec::new();
        let mut missing = Vec::new();
        for held_id in actor.held_items() {
            match self.items.get(held_id) {
                Some(item) => items.push(item.clone()),
                None => missing.push(held_id.clone()),
            }
        }

        Ok(ActorLoans {
            actor_id: actor_id.to_string(),
            items,
            missing,
        })
    }

    fn collect_entries(&self, keep: impl Fn(&Item) -> bool) -> Vec<CatalogEntry> {
        self.item_order
            .iter()
            .filter_map(|id| self.items.get(id))
            .filter(|item| keep(item))
            .map(|item| CatalogEntry {
                item: item.clone(),
                status: self.status_of(item.id()),
            })
            .collect()
    }

    // =========================================================================
    // Snapshot / Restore
    // =========================================================================

    /// Captures the full catalog state for persistence.
    pub fn snapshot(&self) -> CatalogSnapshot {
        CatalogSnapshot {
            items: self
                .item_order
                .iter()
                .filter_map(|id| self.items.get(id))
                .cloned()
                .collect(),
            actors: self
                .actor_order
                .iter()
                .filter_map(|id| self.actors.get(id))
                .cloned()
                .collect(),
            loans: self.ledger.to_entries(),
        }
    }

    /// Rebuilds a catalog from a persisted snapshot, reconciling loan
    /// state into actor records.
    ///
    /// ## Reconciliation
    /// The ledger is authoritative:
    /// 1. Persisted held entries the ledger does not confirm are dropped
    ///    (counted in the report).
    /// 2. Ledger entries absent from a held list are appended, restoring
    ///    the invariant.
    /// 3. Ledger entries naming an unknown item or actor stay in the
    ///    ledger and are flagged in the report.
    pub fn restore(snapshot: CatalogSnapshot) -> (Self, ReconcileReport) {
        let mut catalog = Catalog::new();
        let mut report = ReconcileReport::default();

        for item in snapshot.items {
            if catalog.items.contains_key(item.id()) {
                report.duplicate_records_dropped += 1;
                continue;
            }
            catalog.item_order.push(item.id().to_string());
            catalog.items.insert(item.id().to_string(), item);
        }

        for actor in snapshot.actors {
            if catalog.actors.contains_key(actor.id()) {
                report.duplicate_records_dropped += 1;
                continue;
            }
            catalog.actor_order.push(actor.id().to_string());
            catalog.actors.insert(actor.id().to_string(), actor);
        }

        catalog.ledger = LoanLedger::from_entries(snapshot.loans);

        // Pass 1: keep only held entries the ledger confirms, preserving
        // the persisted order for those that survive.
        for actor in catalog.actors.values_mut() {
            let persisted: Vec<String> = actor.held_items().to_vec();
            actor.clear_held();
            for held_id in persisted {
                if catalog.ledger.holder_of(&held_id) == Some(actor.id()) {
                    actor.hold(&held_id);
                } else {
                    report.stale_held_dropped += 1;
                }
            }
        }

        // Pass 2: re-derive the rest of the held lists from the ledger,
        // flagging dangling references without dropping them.
        for (item_id, actor_id) in catalog.ledger.iter() {
            if !catalog.items.contains_key(item_id) {
                report
                    .missing_items
                    .push((item_id.to_string(), actor_id.to_string()));
            }
            if !catalog.actors.contains_key(actor_id) {
                report
                    .missing_actors
                    .push((item_id.to_string(), actor_id.to_string()));
            }
        }
        let ledger_pairs: Vec<(String, String)> = catalog
            .ledger
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        for (item_id, actor_id) in ledger_pairs {
            if let Some(actor) = catalog.actors.get_mut(&actor_id) {
                actor.hold(&item_id);
            }
        }

        (catalog, report)
    }

    /// Checks the bidirectional ledger/held-list invariant.
    ///
    /// Intended for tests and debug assertions; production paths keep
    /// the invariant by construction.
    pub fn is_consistent(&self) -> bool {
        // ledger → held
        for (item_id, actor_id) in self.ledger.iter() {
            if let Some(actor) = self.actors.get(actor_id) {
                if !actor.is_holding(item_id) {
                    return false;
                }
            }
        }
        // held → ledger
        for actor in self.actors.values() {
            for held_id in actor.held_items() {
                if self.ledger.holder_of(held_id) != Some(actor.id()) {
                    return false;
                }
            }
        }
        true
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, title: &str) -> Item {
        Item::new(id, title, "García Márquez", "Novela").unwrap()
    }

    fn seeded() -> Catalog {
        let mut catalog = Catalog::new();
        catalog
            .add_item(item("ISBN-1001", "Cien años de soledad"))
            .unwrap();
        catalog
            .add_item(Item::new("ISBN-1002", "El Principito", "Saint-Exupéry", "Infantil").unwrap())
            .unwrap();
        catalog
            .register_actor(Actor::new("U100", "María Pérez").unwrap())
            .unwrap();
        catalog
            .register_actor(Actor::new("U101", "Juan López").unwrap())
            .unwrap();
        catalog
    }

    // -------------------------------------------------------------------------
    // Item lifecycle
    // -------------------------------------------------------------------------

    #[test]
    fn test_add_item_rejects_duplicate_id() {
        let mut catalog = seeded();
        let err = catalog.add_item(item("ISBN-1001", "Otro libro")).unwrap_err();
        assert_eq!(
            err,
            CatalogError::DuplicateId {
                id: "ISBN-1001".to_string()
            }
        );
        assert_eq!(catalog.item_count(), 2);
    }

    #[test]
    fn test_add_then_remove_restores_prior_state() {
        let mut catalog = seeded();
        catalog.add_item(item("ISBN-9999", "Efímero")).unwrap();
        let removed = catalog.remove_item("ISBN-9999").unwrap();
        assert_eq!(removed.id(), "ISBN-9999");
        assert_eq!(catalog.item_count(), 2);
        assert!(catalog.item("ISBN-9999").is_none());
    }

    #[test]
    fn test_remove_missing_item() {
        let mut catalog = seeded();
        let err = catalog.remove_item("ISBN-0000").unwrap_err();
        assert_eq!(
            err,
            CatalogError::ItemNotFound {
                id: "ISBN-0000".to_string()
            }
        );
    }

    #[test]
    fn test_reclassify_item() {
        let mut catalog = seeded();
        catalog.reclassify_item("ISBN-1001", "Clásicos").unwrap();
        assert_eq!(catalog.item("ISBN-1001").unwrap().category(), "Clásicos");
        assert!(matches!(
            catalog.reclassify_item("ISBN-0000", "X"),
            Err(CatalogError::ItemNotFound { .. })
        ));
    }

    // -------------------------------------------------------------------------
    // Actor lifecycle
    // -------------------------------------------------------------------------

    #[test]
    fn test_register_actor_rejects_duplicate_id() {
        let mut catalog = seeded();
        let err = catalog
            .register_actor(Actor::new("U100", "Otra María").unwrap())
            .unwrap_err();
        assert_eq!(
            err,
            CatalogError::DuplicateId {
                id: "U100".to_string()
            }
        );
    }

    #[test]
    fn test_deregister_blocked_by_outstanding_loans() {
        let mut catalog = seeded();
        catalog.loan("ISBN-1001", "U100").unwrap();

        let err = catalog.deregister_actor("U100").unwrap_err();
        assert_eq!(
            err,
            CatalogError::ActorHasOutstandingLoans {
                id: "U100".to_string(),
                held: 1
            }
        );

        // succeeds immediately after all held items are returned
        catalog.return_item("ISBN-1001", "U100").unwrap();
        let actor = catalog.deregister_actor("U100").unwrap();
        assert_eq!(actor.id(), "U100");
        assert!(catalog.actor("U100").is_none());
    }

    // -------------------------------------------------------------------------
    // Loans
    // -------------------------------------------------------------------------

    #[test]
    fn test_loan_error_order() {
        let mut catalog = seeded();
        catalog.loan("ISBN-1001", "U100").unwrap();

        // item checked before actor
        assert!(matches!(
            catalog.loan("ISBN-0000", "U999"),
            Err(CatalogError::ItemNotFound { .. })
        ));
        // actor checked before loan state
        assert!(matches!(
            catalog.loan("ISBN-1001", "U999"),
            Err(CatalogError::ActorNotFound { .. })
        ));
        // double loan fails with the current holder named, state unchanged
        let err = catalog.loan("ISBN-1001", "U101").unwrap_err();
        assert_eq!(
            err,
            CatalogError::ItemAlreadyLoaned {
                id: "ISBN-1001".to_string(),
                holder: "U100".to_string()
            }
        );
        assert_eq!(catalog.status_of("ISBN-1001"), ItemStatus::LoanedTo("U100".to_string()));
        assert!(!catalog.actor("U101").unwrap().is_holding("ISBN-1001"));
    }

    #[test]
    fn test_return_requires_matching_holder() {
        let mut catalog = seeded();

        assert!(matches!(
            catalog.return_item("ISBN-1001", "U100"),
            Err(CatalogError::NotOnLoan { .. })
        ));

        catalog.loan("ISBN-1001", "U100").unwrap();
        let err = catalog.return_item("ISBN-1001", "U101").unwrap_err();
        assert_eq!(
            err,
            CatalogError::LoanedToSomeoneElse {
                id: "ISBN-1001".to_string(),
                holder: "U100".to_string(),
                returned_by: "U101".to_string(),
            }
        );

        catalog.return_item("ISBN-1001", "U100").unwrap();
        assert!(catalog.status_of("ISBN-1001").is_available());
    }

    #[test]
    fn test_invariant_holds_across_loan_sequences() {
        let mut catalog = seeded();
        catalog.add_item(item("ISBN-1003", "La hojarasca")).unwrap();

        // arbitrary interleaving of loans, failed ops, and returns
        catalog.loan("ISBN-1001", "U100").unwrap();
        catalog.loan("ISBN-1002", "U100").unwrap();
        assert!(catalog.is_consistent());

        let _ = catalog.loan("ISBN-1001", "U101"); // fails, must not disturb state
        assert!(catalog.is_consistent());

        catalog.loan("ISBN-1003", "U101").unwrap();
        catalog.return_item("ISBN-1002", "U100").unwrap();
        assert!(catalog.is_consistent());

        let _ = catalog.return_item("ISBN-1002", "U100"); // NotOnLoan
        let _ = catalog.return_item("ISBN-1003", "U100"); // LoanedToSomeoneElse
        assert!(catalog.is_consistent());

        catalog.return_item("ISBN-1001", "U100").unwrap();
        catalog.return_item("ISBN-1003", "U101").unwrap();
        assert!(catalog.is_consistent());
        assert_eq!(catalog.loan_count(), 0);
    }

    #[test]
    fn test_remove_item_blocked_while_on_loan() {
        let mut catalog = seeded();
        catalog.loan("ISBN-1001", "U100").unwrap();

        let err = catalog.remove_item("ISBN-1001").unwrap_err();
        assert_eq!(
            err,
            CatalogError::ItemOnLoan {
                id: "ISBN-1001".to_string(),
                holder: "U100".to_string()
            }
        );

        catalog.return_item("ISBN-1001", "U100").unwrap();
        assert!(catalog.remove_item("ISBN-1001").is_ok());
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    #[test]
    fn test_search_by_title_case_insensitive_substring() {
        let mut catalog = seeded();
        catalog.loan("ISBN-1001", "U100").unwrap();

        let hits = catalog.search_by_title("SOLEDAD").unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].item.id(), "ISBN-1001");
        assert_eq!(hits[0].status, ItemStatus::LoanedTo("U100".to_string()));

        assert!(catalog.search_by_title("zzz").unwrap().is_empty());
    }

    #[test]
    fn test_search_by_creator() {
        let catalog = seeded();
        let hits = catalog.search_by_creator("márquez").unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].item.creator(), "García Márquez");
    }

    #[test]
    fn test_search_by_category_is_exact() {
        let catalog = seeded();
        assert_eq!(catalog.search_by_category("novela").unwrap().len(), 1);
        // substring of a category is not a match
        assert!(catalog.search_by_category("nov").unwrap().is_empty());
    }

    #[test]
    fn test_list_all_in_insertion_order() {
        let mut catalog = seeded();
        catalog.add_item(item("ISBN-0500", "El otoño del patriarca")).unwrap();

        let ids: Vec<_> = catalog
            .list_all()
            .into_iter()
            .map(|entry| entry.item.id().to_string())
            .collect();
        assert_eq!(ids, ["ISBN-1001", "ISBN-1002", "ISBN-0500"]);
    }

    #[test]
    fn test_loans_for_actor() {
        let mut catalog = seeded();
        catalog.loan("ISBN-1002", "U100").unwrap();
        catalog.loan("ISBN-1001", "U100").unwrap();

        let loans = catalog.loans_for_actor("U100").unwrap();
        let ids: Vec<_> = loans.items.iter().map(|i| i.id().to_string()).collect();
        assert_eq!(ids, ["ISBN-1002", "ISBN-1001"]); // loan order
        assert!(loans.missing.is_empty());

        assert!(matches!(
            catalog.loans_for_actor("U999"),
            Err(CatalogError::ActorNotFound { .. })
        ));
    }

    // -------------------------------------------------------------------------
    // Snapshot / Restore
    // -------------------------------------------------------------------------

    #[test]
    fn test_snapshot_restore_round_trip() {
        let mut catalog = seeded();
        catalog.loan("ISBN-1001", "U100").unwrap();

        let json = serde_json::to_string(&catalog.snapshot()).unwrap();
        let snapshot: CatalogSnapshot = serde_json::from_str(&json).unwrap();
        let (restored, report) = Catalog::restore(snapshot);

        assert!(report.is_clean());
        assert!(restored.is_consistent());
        assert_eq!(restored.item_count(), 2);
        assert_eq!(restored.actor_count(), 2);
        assert_eq!(restored.status_of("ISBN-1001"), ItemStatus::LoanedTo("U100".to_string()));
        assert!(restored.actor("U100").unwrap().is_holding("ISBN-1001"));

        // item order survives the round trip
        let ids: Vec<_> = restored
            .list_all()
            .into_iter()
            .map(|entry| entry.item.id().to_string())
            .collect();
        assert_eq!(ids, ["ISBN-1001", "ISBN-1002"]);
    }

    #[test]
    fn test_restore_rebuilds_held_lists_from_ledger() {
        // snapshot whose actor record lost its held entry: the ledger wins
        let mut snapshot = seeded().snapshot();
        snapshot
            .loans
            .insert("ISBN-1001".to_string(), "U100".to_string());

        let (restored, report) = Catalog::restore(snapshot);
        assert!(restored.actor("U100").unwrap().is_holding("ISBN-1001"));
        assert!(restored.is_consistent());
        assert!(report.missing_items.is_empty());
    }

    #[test]
    fn test_restore_drops_stale_held_entries() {
        // held entry with no ledger backing: dropped and counted
        let mut catalog = seeded();
        catalog.loan("ISBN-1001", "U100").unwrap();
        let mut snapshot = catalog.snapshot();
        snapshot.loans.clear();

        let (restored, report) = Catalog::restore(snapshot);
        assert!(restored.actor("U100").unwrap().holds_nothing());
        assert_eq!(report.stale_held_dropped, 1);
        assert!(restored.is_consistent());
    }

    #[test]
    fn test_restore_flags_dangling_references() {
        let mut snapshot = seeded().snapshot();
        snapshot
            .loans
            .insert("ISBN-GONE".to_string(), "U100".to_string());
        snapshot
            .loans
            .insert("ISBN-1002".to_string(), "U-GONE".to_string());

        let (restored, report) = Catalog::restore(snapshot);
        assert_eq!(
            report.missing_items,
            [("ISBN-GONE".to_string(), "U100".to_string())]
        );
        assert_eq!(
            report.missing_actors,
            [("ISBN-1002".to_string(), "U-GONE".to_string())]
        );
        // dangling entries are tolerated, not dropped
        assert_eq!(restored.loan_count(), 2);
        assert!(restored.is_consistent());

        // the unknown item still shows up for its holder, distinctly
        let loans = restored.loans_for_actor("U100").unwrap();
        assert!(loans.items.is_empty());
        assert_eq!(loans.missing, ["ISBN-GONE"]);
    }

    #[test]
    fn test_restore_skips_duplicate_records() {
        let mut snapshot = seeded().snapshot();
        snapshot.items.push(item("ISBN-1001", "Impostor"));

        let (restored, report) = Catalog::restore(snapshot);
        assert_eq!(report.duplicate_records_dropped, 1);
        // first record wins
        assert_eq!(restored.item("ISBN-1001").unwrap().title(), "Cien años de soledad");
    }

    // -------------------------------------------------------------------------
    // Concrete end-to-end scenario
    // -------------------------------------------------------------------------

    #[test]
    fn test_full_lending_scenario() {
        let mut catalog = Catalog::new();
        catalog
            .add_item(Item::new("ISBN-1001", "Cien años de soledad", "García Márquez", "Novela").unwrap())
            .unwrap();
        catalog
            .register_actor(Actor::new("U100", "María Pérez").unwrap())
            .unwrap();

        catalog.loan("ISBN-1001", "U100").unwrap();
        assert!(matches!(
            catalog.remove_item("ISBN-1001"),
            Err(CatalogError::ItemOnLoan { .. })
        ));
        catalog.return_item("ISBN-1001", "U100").unwrap();
        catalog.remove_item("ISBN-1001").unwrap();
        assert_eq!(catalog.item_count(), 0);
    }
}
