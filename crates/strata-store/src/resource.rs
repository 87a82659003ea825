use std::collections::BTreeMap;

use strata_types::{PathError, RequestPath};
use tracing::trace;

use crate::bundle::{MemoryBundle, ResourceBundle};
use crate::error::{BundleError, StoreError, StoreResult};
use crate::traits::Store;
use crate::DEFAULT_FILE_NAME;

/// Store backed by a [`ResourceBundle`].
///
/// The bundle is injected rather than looked up by name, so any closed
/// namespace (compiled-in assets, a snapshot of a directory, a test map)
/// can back the store. Directory requests fall back to the default
/// document exactly as in [`FileStore`](crate::FileStore).
#[derive(Clone, Debug)]
pub struct ResourceStore<B> {
    bundle: B,
    default_file: String,
}

/// A [`ResourceStore`] over an owned map of documents.
pub type MemoryStore = ResourceStore<MemoryBundle>;

impl<B: ResourceBundle> ResourceStore<B> {
    /// Create a store over `bundle` serving `index.html` for directories.
    pub fn new(bundle: B) -> Self {
        Self {
            bundle,
            default_file: DEFAULT_FILE_NAME.to_string(),
        }
    }

    /// Serve `name` when a request names a directory.
    pub fn with_default_file(mut self, name: impl Into<String>) -> Self {
        self.default_file = name.into();
        self
    }

    /// The underlying bundle.
    pub fn bundle(&self) -> &B {
        &self.bundle
    }

    /// The default document name.
    pub fn default_file(&self) -> &str {
        &self.default_file
    }
}

impl MemoryStore {
    /// Build a store from `(path, content)` pairs.
    ///
    /// ```
    /// use strata_store::{MemoryStore, Store};
    ///
    /// let store = MemoryStore::from_documents([("a/index.html", "a")]).unwrap();
    /// assert_eq!(store.read("a/").unwrap(), b"a");
    /// ```
    pub fn from_documents<I, K, V>(documents: I) -> Result<Self, PathError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Vec<u8>>,
    {
        let mut bundle = MemoryBundle::new();
        for (path, content) in documents {
            bundle.insert(path.as_ref(), content)?;
        }
        Ok(Self::new(bundle))
    }

    /// Build a store from an existing map of documents.
    pub fn from_map(documents: BTreeMap<String, Vec<u8>>) -> Result<Self, PathError> {
        Self::from_documents(documents)
    }
}

impl<B: ResourceBundle> Store for ResourceStore<B> {
    fn read(&self, path: &str) -> StoreResult<Vec<u8>> {
        let not_found = || StoreError::not_found(path);
        let request = RequestPath::parse(path).map_err(|_| not_found())?;

        match self.bundle.get(&request) {
            Ok(content) => Ok(content.into_owned()),
            Err(BundleError::IsDirectory) => {
                trace!(path, default_file = %self.default_file, "resource is a directory; trying default document");
                let index = request.child(&self.default_file).map_err(|_| not_found())?;
                // One level only: a default document that is itself a
                // directory is not served.
                self.bundle
                    .get(&index)
                    .map(|content| content.into_owned())
                    .map_err(|_| not_found())
            }
            Err(BundleError::Missing) => Err(not_found()),
        }
    }
}
