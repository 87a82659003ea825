use std::io;
use std::path::PathBuf;

/// Errors from content store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No content exists for the requested path.
    ///
    /// Also reported when a path would resolve outside a store's root, so
    /// callers cannot probe the layout around it.
    #[error("{path:?} not found")]
    NotFound { path: String },

    /// The backing medium failed for a reason other than absence.
    ///
    /// Only produced by stores configured not to collapse I/O failures.
    #[error("I/O error reading {path:?}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    /// A filesystem root could not be opened.
    #[error("invalid store root {}: {source}", root.display())]
    InvalidRoot {
        root: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl StoreError {
    /// Build a [`StoreError::NotFound`] for `path`.
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::NotFound { path: path.into() }
    }

    /// Returns `true` for [`StoreError::NotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Lookup failures inside a resource bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum BundleError {
    /// Nothing in the bundle has this name.
    #[error("resource missing")]
    Missing,

    /// The name is a directory of other resources, not a resource.
    #[error("resource is a directory")]
    IsDirectory,
}
