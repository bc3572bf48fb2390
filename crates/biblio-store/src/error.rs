//! # Store Error Types
//!
//! Error types for file persistence operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                │
//! │                                                                     │
//! │  std::io::Error (OS level)                                          │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  StoreError (this module) ← adds the path and categorizes           │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  Library caller ← renders a user-facing message                     │
//! │                                                                     │
//! │  NOT an error: corrupt file content. That is recovered internally   │
//! │  (quarantine + reset) and reported through LoadOutcome instead.     │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// File persistence errors.
///
/// Every variant carries the path involved so callers can tell the user
/// *which* file could not be written.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The process lacks permission to read or write the store file.
    ///
    /// ## When This Occurs
    /// - Store file or its directory is not writable
    /// - Store file exists but is not readable
    #[error("permission denied: {}", path.display())]
    PermissionDenied { path: PathBuf },

    /// Any other I/O failure (disk full, directory vanished, ...).
    #[error("i/o failure on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The snapshot could not be serialized.
    ///
    /// With plain string/map data this should never fire; it exists so
    /// a serializer fault surfaces as a typed error instead of a panic.
    #[error("snapshot serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl StoreError {
    /// Categorizes an `io::Error` against the path it happened on.
    ///
    /// Permission problems get their own variant per the error taxonomy;
    /// everything else is a generic I/O failure.
    pub(crate) fn from_io(path: &Path, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::PermissionDenied {
            StoreError::PermissionDenied {
                path: path.to_path_buf(),
            }
        } else {
            StoreError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
