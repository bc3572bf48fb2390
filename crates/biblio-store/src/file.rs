//! # File Store
//!
//! Durable round-trip of a catalog snapshot to a single JSON file.
//!
//! ## Save Cycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      Atomic Replace                                 │
//! │                                                                     │
//! │   Idle                                                              │
//! │    │  save(snapshot)                                                │
//! │    ▼                                                                │
//! │   Writing-Temp    serialize into biblioteca.json.tmp                │
//! │    │                                                                │
//! │    ▼                                                                │
//! │   Fsync           flush + sync_all: bytes reach durable storage     │
//! │    │                                                                │
//! │    ▼                                                                │
//! │   Renaming        rename(.tmp → biblioteca.json), atomic on POSIX   │
//! │    │                                                                │
//! │    ▼                                                                │
//! │   Idle            reader sees fully-old or fully-new, never partial │
//! │                                                                     │
//! │   Any step fails ──► Cleanup-Temp (Drop guard removes .tmp) ──► Err │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Load Recovery
//! A missing file is bootstrapped empty. A malformed file is renamed to
//! `<file>.corrupt-<timestamp>` (quarantined, never deleted) and replaced
//! with a fresh empty file; the caller gets an empty snapshot and the
//! quarantine path, never a hard error.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use chrono::Local;
use tracing::{debug, info, warn};

use biblio_core::CatalogSnapshot;

use crate::error::{StoreError, StoreResult};

// =============================================================================
// Load Outcome
// =============================================================================

/// Informational result of a load, alongside the snapshot itself.
///
/// Corruption recovery is *not* an error: it is reported here so the
/// caller can warn the user while continuing with an empty catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadOutcome {
    /// The store file did not exist and was created empty.
    pub created: bool,

    /// The store file was malformed and moved to this quarantine path;
    /// a fresh empty file took its place.
    pub quarantined: Option<PathBuf>,
}

// =============================================================================
// File Store
// =============================================================================

/// Persists [`CatalogSnapshot`]s to one JSON file with atomic-replace
/// semantics.
///
/// ## Usage
/// ```rust,ignore
/// let store = FileStore::new("./biblioteca.json");
/// let (snapshot, outcome) = store.load()?;
/// // ... mutate a catalog ...
/// store.save(&catalog.snapshot())?;
/// ```
#[derive(Debug, Clone)]
pub struct FileStore {
    /// Path of the target store file.
    path: PathBuf,
}

impl FileStore {
    /// Creates a store bound to the given file path.
    ///
    /// Nothing is touched on disk until [`load`](Self::load) or
    /// [`save`](Self::save) is called.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileStore { path: path.into() }
    }

    /// Returns the target file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes a snapshot with atomic-replace semantics.
    ///
    /// ## What This Does
    /// 1. Serializes into `<file>.tmp` in the same directory (a rename
    ///    is only atomic within one filesystem)
    /// 2. Flushes and `sync_all`s the temp file to durable storage
    /// 3. Renames the temp file over the target
    ///
    /// The temp file is removed on every failure path.
    ///
    /// ## Errors
    /// - [`StoreError::PermissionDenied`] if the file or directory is
    ///   not writable
    /// - [`StoreError::Io`] for any other filesystem failure
    pub fn save(&self, snapshot: &CatalogSnapshot) -> StoreResult<()> {
        let tmp_path = self.temp_path();
        let guard = TempCleanup::new(&tmp_path);

        let file = File::create(&tmp_path).map_err(|e| StoreError::from_io(&tmp_path, e))?;
        serde_json::to_writer_pretty(&file, snapshot).map_err(|e| {
            // an io fault inside the serializer is an io failure, not a
            // malformed-snapshot condition
            match e.io_error_kind() {
                Some(kind) => StoreError::from_io(&tmp_path, io::Error::new(kind, e)),
                None => StoreError::Serialize(e),
            }
        })?;
        file.sync_all()
            .map_err(|e| StoreError::from_io(&tmp_path, e))?;

        fs::rename(&tmp_path, &self.path).map_err(|e| StoreError::from_io(&self.path, e))?;
        guard.disarm();

        debug!(
            path = %self.path.display(),
            items = snapshot.items.len(),
            actors = snapshot.actors.len(),
            loans = snapshot.loans.len(),
            "snapshot persisted"
        );
        Ok(())
    }

    /// Loads the snapshot, recovering from absence and corruption.
    ///
    /// ## Behavior
    /// - Missing file: an empty well-formed file is created (atomically,
    ///   via [`save`](Self::save)) and an empty snapshot returned with
    ///   `created = true`
    /// - Malformed content: the file is renamed to a timestamped
    ///   quarantine name, a fresh empty file is written, and an empty
    ///   snapshot returned with the quarantine path in the outcome
    ///
    /// ## Errors
    /// - [`StoreError::PermissionDenied`] for unreadable files or an
    ///   unwritable directory during recovery
    /// - [`StoreError::Io`] for other filesystem failures
    ///
    /// Malformed content alone never produces an error.
    pub fn load(&self) -> StoreResult<(CatalogSnapshot, LoadOutcome)> {
        if !self.path.exists() {
            let empty = CatalogSnapshot::default();
            self.save(&empty)?;
            info!(path = %self.path.display(), "store file created empty");
            return Ok((
                empty,
                LoadOutcome {
                    created: true,
                    quarantined: None,
                },
            ));
        }

        let content =
            fs::read_to_string(&self.path).map_err(|e| StoreError::from_io(&self.path, e))?;

        match serde_json::from_str::<CatalogSnapshot>(&content) {
            Ok(snapshot) => {
                debug!(
                    path = %self.path.display(),
                    items = snapshot.items.len(),
                    actors = snapshot.actors.len(),
                    loans = snapshot.loans.len(),
                    "snapshot loaded"
                );
                Ok((snapshot, LoadOutcome::default()))
            }
            Err(parse_err) => self.quarantine(&parse_err),
        }
    }

    /// Moves the malformed store file aside and resets the store.
    ///
    /// The corrupt file is renamed, never deleted, so it stays available
    /// for inspection.
    fn quarantine(&self, parse_err: &serde_json::Error) -> StoreResult<(CatalogSnapshot, LoadOutcome)> {
        let quarantine_path = self.quarantine_path();

        warn!(
            path = %self.path.display(),
            quarantine = %quarantine_path.display(),
            error = %parse_err,
            "store file is malformed, quarantining and resetting"
        );

        fs::rename(&self.path, &quarantine_path)
            .map_err(|e| StoreError::from_io(&self.path, e))?;

        let empty = CatalogSnapshot::default();
        self.save(&empty)?;

        Ok((
            empty,
            LoadOutcome {
                created: false,
                quarantined: Some(quarantine_path),
            },
        ))
    }

    /// `<file>.tmp`, in the same directory as the target.
    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".tmp");
        PathBuf::from(name)
    }

    /// `<file>.corrupt-YYYYMMDD-HHMMSS`.
    fn quarantine_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(format!(".corrupt-{}", Local::now().format("%Y%m%d-%H%M%S")));
        PathBuf::from(name)
    }
}

// =============================================================================
// Temp Cleanup Guard
// =============================================================================

/// Removes the temp file on drop unless the save completed.
///
/// Covers every early return in [`FileStore::save`] with one mechanism
/// instead of per-branch cleanup calls.
struct TempCleanup<'a> {
    path: &'a Path,
    armed: bool,
}

impl<'a> TempCleanup<'a> {
    fn new(path: &'a Path) -> Self {
        TempCleanup { path, armed: true }
    }

    /// The rename succeeded; the temp file no longer exists.
    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for TempCleanup<'_> {
    fn drop(&mut self) {
        if self.armed {
            // nothing useful to do if removal fails; the next save
            // recreates the same temp path anyway
            let _ = fs::remove_file(self.path);
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::TestDir;
    use biblio_core::{Actor, Catalog, Item};

    fn sample_snapshot() -> CatalogSnapshot {
        let mut catalog = Catalog::new();
        catalog
            .add_item(Item::new("B2", "El Principito", "Saint-Exupéry", "Infantil").unwrap())
            .unwrap();
        catalog
            .add_item(Item::new("B1", "Cien años de soledad", "García Márquez", "Novela").unwrap())
            .unwrap();
        catalog
            .register_actor(Actor::new("U1", "María Pérez").unwrap())
            .unwrap();
        catalog.loan("B1", "U1").unwrap();
        catalog.snapshot()
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let dir = TestDir::new();
        let store = FileStore::new(dir.path("biblioteca.json"));

        let snapshot = sample_snapshot();
        store.save(&snapshot).unwrap();

        let (loaded, outcome) = store.load().unwrap();
        assert_eq!(loaded, snapshot);
        assert_eq!(outcome, LoadOutcome::default());

        // item order survives, B2 before B1
        let ids: Vec<_> = loaded.items.iter().map(|i| i.id()).collect();
        assert_eq!(ids, ["B2", "B1"]);
    }

    #[test]
    fn test_load_missing_file_bootstraps_empty() {
        let dir = TestDir::new();
        let store = FileStore::new(dir.path("biblioteca.json"));

        let (snapshot, outcome) = store.load().unwrap();
        assert!(snapshot.is_empty());
        assert!(outcome.created);
        assert!(outcome.quarantined.is_none());

        // the created file is well-formed on disk
        let content = fs::read_to_string(store.path()).unwrap();
        let parsed: CatalogSnapshot = serde_json::from_str(&content).unwrap();
        assert!(parsed.is_empty());
    }

    #[test]
    fn test_corrupt_file_is_quarantined_not_deleted() {
        let dir = TestDir::new();
        let store = FileStore::new(dir.path("biblioteca.json"));
        fs::write(store.path(), "{ this is not json").unwrap();

        let (snapshot, outcome) = store.load().unwrap();
        assert!(snapshot.is_empty());
        assert!(!outcome.created);

        let quarantine = outcome.quarantined.expect("quarantine path");
        assert_eq!(fs::read_to_string(&quarantine).unwrap(), "{ this is not json");

        // the store file was reset to a well-formed empty snapshot
        let (reloaded, outcome) = store.load().unwrap();
        assert!(reloaded.is_empty());
        assert!(outcome.quarantined.is_none());
    }

    #[test]
    fn test_well_formed_but_wrong_shape_is_quarantined() {
        let dir = TestDir::new();
        let store = FileStore::new(dir.path("biblioteca.json"));
        // valid JSON, wrong structure
        fs::write(store.path(), r#"{"items": 42}"#).unwrap();

        let (snapshot, outcome) = store.load().unwrap();
        assert!(snapshot.is_empty());
        assert!(outcome.quarantined.is_some());
    }

    #[test]
    fn test_save_leaves_no_temp_file() {
        let dir = TestDir::new();
        let store = FileStore::new(dir.path("biblioteca.json"));
        store.save(&sample_snapshot()).unwrap();

        assert!(!dir.path("biblioteca.json.tmp").exists());
    }

    #[test]
    fn test_failed_save_cleans_up_temp_file() {
        let dir = TestDir::new();
        // target is an existing directory, so the final rename must fail
        let target = dir.path("blocked");
        fs::create_dir(&target).unwrap();

        let store = FileStore::new(&target);
        assert!(store.save(&sample_snapshot()).is_err());
        assert!(!dir.path("blocked.tmp").exists());
    }

    #[test]
    fn test_save_into_missing_directory_fails() {
        let dir = TestDir::new();
        let store = FileStore::new(dir.path("no/such/dir/biblioteca.json"));
        assert!(matches!(
            store.save(&CatalogSnapshot::default()),
            Err(StoreError::Io { .. })
        ));
    }
}
