//! # Loan Ledger
//!
//! The authoritative item → actor loan mapping.
//!
//! ## Single Source of Truth
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  "Is ISBN-1001 on loan, and to whom?"                               │
//! │                                                                     │
//! │   LoanLedger                         Actor.held_items               │
//! │   ┌──────────────────────┐           ┌──────────────────────┐       │
//! │   │ ISBN-1001 → U100     │  derives  │ U100: [ISBN-1001]    │       │
//! │   │ ISBN-2044 → U113     │ ────────► │ U113: [ISBN-2044]    │       │
//! │   └──────────────────────┘           └──────────────────────┘       │
//! │         AUTHORITATIVE                    CACHED VIEW                │
//! │                                                                     │
//! │  Absence of a key means the item is available.                      │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The ledger itself knows nothing about items or actors existing; the
//! [`Catalog`](crate::catalog::Catalog) enforces referential rules before
//! recording anything here.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Item id → holder actor id, present only while the item is on loan.
///
/// Backed by a `BTreeMap` so iteration and serialization are
/// deterministic, which keeps the persisted file stable across saves.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LoanLedger(BTreeMap<String, String>);

impl LoanLedger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        LoanLedger(BTreeMap::new())
    }

    /// Returns the holder of an item, or `None` if it is available.
    pub fn holder_of(&self, item_id: &str) -> Option<&str> {
        self.0.get(item_id).map(String::as_str)
    }

    /// Returns true if the item is currently on loan.
    #[inline]
    pub fn is_loaned(&self, item_id: &str) -> bool {
        self.0.contains_key(item_id)
    }

    /// Records a loan. Overwrites nothing: the catalog checks for an
    /// existing entry first, so a double record is a logic error there,
    /// not here.
    pub(crate) fn record(&mut self, item_id: &str, actor_id: &str) {
        self.0.insert(item_id.to_string(), actor_id.to_string());
    }

    /// Settles a loan, returning the holder the entry pointed at.
    pub(crate) fn settle(&mut self, item_id: &str) -> Option<String> {
        self.0.remove(item_id)
    }

    /// Iterates over `(item_id, actor_id)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of outstanding loans.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if nothing is on loan.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Builds a ledger from persisted entries.
    pub(crate) fn from_entries(entries: BTreeMap<String, String>) -> Self {
        LoanLedger(entries)
    }

    /// Copies the entries out for a snapshot.
    pub(crate) fn to_entries(&self) -> BTreeMap<String, String> {
        self.0.clone()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
