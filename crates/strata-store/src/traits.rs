use std::sync::Arc;

use crate::error::StoreResult;

/// Read-only source of static content.
///
/// All implementations must satisfy these invariants:
/// - `read` never mutates shared state, so one store may serve any number
///   of concurrent requests without locking.
/// - A path naming a directory yields that directory's default document.
/// - Absence is reported as [`StoreError::NotFound`](crate::StoreError::NotFound),
///   never as empty content.
pub trait Store: Send + Sync {
    /// Read the full content addressed by `path`.
    ///
    /// `path` is request-relative: a leading `/` means the store's root.
    fn read(&self, path: &str) -> StoreResult<Vec<u8>>;
}

impl<T: Store + ?Sized> Store for &T {
    fn read(&self, path: &str) -> StoreResult<Vec<u8>> {
        (**self).read(path)
    }
}

impl<T: Store + ?Sized> Store for Box<T> {
    fn read(&self, path: &str) -> StoreResult<Vec<u8>> {
        (**self).read(path)
    }
}

impl<T: Store + ?Sized> Store for Arc<T> {
    fn read(&self, path: &str) -> StoreResult<Vec<u8>> {
        (**self).read(path)
    }
}
