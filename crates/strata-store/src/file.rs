use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use strata_types::RequestPath;
use tracing::{debug, trace, warn};

use crate::confine::{self, ResolveError};
use crate::error::{StoreError, StoreResult};
use crate::traits::Store;
use crate::DEFAULT_FILE_NAME;

/// Store backed by a directory on disk.
///
/// The root is canonicalized once at construction. Every read is confined
/// to it: a request whose canonical target lies outside the root fails
/// exactly like a request for a file that does not exist.
///
/// Symlinks are followed and the *target* is checked, so a link inside the
/// root that points elsewhere on disk is not served.
#[derive(Clone, Debug)]
pub struct FileStore {
    root: PathBuf,
    default_file: String,
    collapse_io_errors: bool,
}

impl FileStore {
    /// Open a store over the directory at `root`.
    ///
    /// Fails with [`StoreError::InvalidRoot`] if `root` does not exist or is
    /// not a directory.
    pub fn open(root: impl AsRef<Path>) -> StoreResult<Self> {
        let given = root.as_ref();
        let invalid = |source| StoreError::InvalidRoot {
            root: given.to_path_buf(),
            source,
        };

        let root = given.canonicalize().map_err(invalid)?;
        if !root.is_dir() {
            return Err(invalid(io::Error::new(
                io::ErrorKind::InvalidInput,
                "not a directory",
            )));
        }

        debug!(root = %root.display(), "opened file store");
        Ok(Self {
            root,
            default_file: DEFAULT_FILE_NAME.to_string(),
            collapse_io_errors: true,
        })
    }

    /// Serve `name` when a request names a directory (default: `index.html`).
    pub fn with_default_file(mut self, name: impl Into<String>) -> Self {
        self.default_file = name.into();
        self
    }

    /// Whether I/O failures other than absence are reported as not found.
    ///
    /// Defaults to `true`: every failure becomes [`StoreError::NotFound`].
    /// With `false`, a file that exists but cannot be read yields
    /// [`StoreError::Io`].
    pub fn collapse_io_errors(mut self, collapse: bool) -> Self {
        self.collapse_io_errors = collapse;
        self
    }

    /// The canonical root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The default document name.
    pub fn default_file(&self) -> &str {
        &self.default_file
    }

    /// Resolve `path` to the file a read would return, without reading it.
    pub fn resolve(&self, path: &str) -> StoreResult<PathBuf> {
        let request = RequestPath::parse(path).map_err(|_| StoreError::not_found(path))?;
        confine::resolve(&self.root, &self.default_file, &request)
            .map_err(|err| self.to_store_error(path, err))
    }

    fn to_store_error(&self, path: &str, err: ResolveError) -> StoreError {
        match err {
            ResolveError::Missing => StoreError::not_found(path),
            ResolveError::OutsideRoot => {
                debug!(path, "request resolves outside store root");
                StoreError::not_found(path)
            }
            ResolveError::Io(source) => self.io_error(path, source),
        }
    }

    fn io_error(&self, path: &str, source: io::Error) -> StoreError {
        if self.collapse_io_errors {
            warn!(path, error = %source, "I/O failure reported as not found");
            StoreError::not_found(path)
        } else {
            StoreError::Io {
                path: path.to_string(),
                source,
            }
        }
    }
}

impl Store for FileStore {
    fn read(&self, path: &str) -> StoreResult<Vec<u8>> {
        let file = self.resolve(path)?;
        trace!(path, file = %file.display(), "reading file");
        // The handle is opened and closed inside `fs::read` on every path.
        fs::read(&file).map_err(|err| match err.kind() {
            io::ErrorKind::NotFound => StoreError::not_found(path),
            _ => self.io_error(path, err),
        })
    }
}
