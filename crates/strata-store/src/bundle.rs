//! Closed namespaces of named byte blobs.
//!
//! A bundle stands in for a filesystem: keys are `/`-separated relative
//! paths, and a key that prefixes other keys (followed by `/`) behaves like
//! a directory. Nothing outside the key set can be addressed, so bundles
//! need no confinement check; parent segments are simply never found.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;
use std::sync::Arc;

use strata_types::{PathError, RequestPath};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::{BundleError, StoreError, StoreResult};

/// Source of packaged resources for a [`ResourceStore`](crate::ResourceStore).
pub trait ResourceBundle: Send + Sync {
    /// Look up the resource named by `path`.
    ///
    /// Returns [`BundleError::IsDirectory`] when `path` names a directory of
    /// other resources, and [`BundleError::Missing`] when it names nothing.
    fn get(&self, path: &RequestPath) -> Result<Cow<'_, [u8]>, BundleError>;
}

impl<T: ResourceBundle + ?Sized> ResourceBundle for &T {
    fn get(&self, path: &RequestPath) -> Result<Cow<'_, [u8]>, BundleError> {
        (**self).get(path)
    }
}

impl<T: ResourceBundle + ?Sized> ResourceBundle for Box<T> {
    fn get(&self, path: &RequestPath) -> Result<Cow<'_, [u8]>, BundleError> {
        (**self).get(path)
    }
}

impl<T: ResourceBundle + ?Sized> ResourceBundle for Arc<T> {
    fn get(&self, path: &RequestPath) -> Result<Cow<'_, [u8]>, BundleError> {
        (**self).get(path)
    }
}

/// Bundle compiled into the binary.
///
/// ```
/// use strata_store::{EmbeddedBundle, ResourceStore, Store};
///
/// static FILES: &[(&str, &[u8])] = &[("docs/index.html", b"<h1>docs</h1>")];
///
/// let store = ResourceStore::new(EmbeddedBundle::new(FILES));
/// assert_eq!(store.read("/docs/").unwrap(), b"<h1>docs</h1>");
/// ```
#[derive(Clone, Copy, Debug)]
pub struct EmbeddedBundle {
    entries: &'static [(&'static str, &'static [u8])],
}

impl EmbeddedBundle {
    /// Wrap a static table of `(key, content)` pairs, usually filled with
    /// `include_bytes!`. Keys must be relative and `/`-separated.
    pub const fn new(entries: &'static [(&'static str, &'static [u8])]) -> Self {
        Self { entries }
    }

    /// Number of resources in the bundle.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the bundle holds no resources.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ResourceBundle for EmbeddedBundle {
    fn get(&self, path: &RequestPath) -> Result<Cow<'_, [u8]>, BundleError> {
        if path.has_parent_segment() {
            return Err(BundleError::Missing);
        }
        let key = path.to_key();
        if let Some((_, content)) = self.entries.iter().find(|(name, _)| *name == key) {
            return Ok(Cow::Borrowed(*content));
        }
        let is_dir = key.is_empty()
            || self
                .entries
                .iter()
                .any(|(name, _)| is_below(name, &key));
        if is_dir {
            Err(BundleError::IsDirectory)
        } else {
            Err(BundleError::Missing)
        }
    }
}

/// Owned, map-backed bundle.
///
/// Built up with [`insert`](Self::insert) or loaded from a directory tree
/// with [`from_dir`](Self::from_dir), which snapshots the files so later
/// changes on disk are not seen.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemoryBundle {
    entries: BTreeMap<String, Vec<u8>>,
}

impl MemoryBundle {
    /// Create an empty bundle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the resource at `path`, returning the old content.
    ///
    /// `path` is normalized like a request (`/a//b` is `a/b`). Parent
    /// segments are rejected, since they could never be looked up.
    pub fn insert(
        &mut self,
        path: &str,
        content: impl Into<Vec<u8>>,
    ) -> Result<Option<Vec<u8>>, PathError> {
        let key = entry_key(path)?;
        Ok(self.entries.insert(key, content.into()))
    }

    /// Remove the resource at `path`, returning its content.
    pub fn remove(&mut self, path: &str) -> Option<Vec<u8>> {
        let key = entry_key(path).ok()?;
        self.entries.remove(&key)
    }

    /// Snapshot every regular file under `dir` into a bundle.
    ///
    /// Symlinks are not followed. Files whose relative path is not valid
    /// UTF-8 are skipped. Fails with [`StoreError::InvalidRoot`] if `dir`
    /// does not exist or is not a directory.
    pub fn from_dir(dir: impl AsRef<Path>) -> StoreResult<Self> {
        let dir = dir.as_ref();
        let invalid = |source: io::Error| StoreError::InvalidRoot {
            root: dir.to_path_buf(),
            source,
        };
        if !fs::metadata(dir).map_err(invalid)?.is_dir() {
            return Err(invalid(io::Error::new(
                io::ErrorKind::InvalidInput,
                "not a directory",
            )));
        }

        let io_error = |path: &Path, source: io::Error| StoreError::Io {
            path: path.display().to_string(),
            source,
        };

        let mut bundle = Self::new();
        for entry in WalkDir::new(dir).follow_links(false) {
            let entry = entry.map_err(|e| io_error(dir, e.into()))?;
            if !entry.file_type().is_file() {
                continue;
            }
            let rel = entry
                .path()
                .strip_prefix(dir)
                .map_err(|e| io_error(entry.path(), io::Error::other(e)))?;
            let Some(key) = relative_key(rel) else {
                warn!(path = %entry.path().display(), "skipping resource with non UTF-8 name");
                continue;
            };
            let content = fs::read(entry.path()).map_err(|e| io_error(entry.path(), e))?;
            bundle.entries.insert(key, content);
        }

        debug!(dir = %dir.display(), resources = bundle.len(), "loaded resource bundle");
        Ok(bundle)
    }

    /// Number of resources in the bundle.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the bundle holds no resources.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over resource keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl ResourceBundle for MemoryBundle {
    fn get(&self, path: &RequestPath) -> Result<Cow<'_, [u8]>, BundleError> {
        if path.has_parent_segment() {
            return Err(BundleError::Missing);
        }
        let key = path.to_key();
        if let Some(content) = self.entries.get(&key) {
            return Ok(Cow::Borrowed(content.as_slice()));
        }
        if key.is_empty() {
            return Err(BundleError::IsDirectory);
        }
        // Keys sort after their directory prefix, so the first key at or
        // after `key/` decides whether anything lives below it.
        let prefix = format!("{key}/");
        match self.entries.range(prefix.clone()..).next() {
            Some((name, _)) if name.starts_with(&prefix) => Err(BundleError::IsDirectory),
            _ => Err(BundleError::Missing),
        }
    }
}

impl<K: AsRef<str>, V: Into<Vec<u8>>> FromIterator<(K, V)> for MemoryBundle {
    /// Collect `(path, content)` pairs. Paths that cannot be keys are skipped.
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut bundle = Self::new();
        for (path, content) in iter {
            if bundle.insert(path.as_ref(), content).is_err() {
                warn!(path = path.as_ref(), "skipping resource with invalid path");
            }
        }
        bundle
    }
}

fn entry_key(path: &str) -> Result<String, PathError> {
    let request = RequestPath::parse(path)?;
    if request.has_parent_segment() {
        return Err(PathError::InvalidSegment {
            segment: path.to_string(),
            reason: "resource keys cannot contain '..'".into(),
        });
    }
    if request.is_root() {
        return Err(PathError::InvalidSegment {
            segment: path.to_string(),
            reason: "resource keys cannot be empty".into(),
        });
    }
    Ok(request.to_key())
}

fn relative_key(rel: &Path) -> Option<String> {
    let parts: Option<Vec<&str>> = rel.iter().map(|part| part.to_str()).collect();
    Some(parts?.join("/"))
}

fn is_below(name: &str, dir: &str) -> bool {
    name.strip_prefix(dir)
        .is_some_and(|rest| rest.starts_with('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(raw: &str) -> RequestPath {
        RequestPath::parse(raw).unwrap()
    }

    static FILES: &[(&str, &[u8])] = &[
        ("index.html", b"home"),
        ("a/b/c/index.html", b"deep"),
        ("a/page.html", b"page"),
    ];

    // -----------------------------------------------------------------------
    // EmbeddedBundle
    // -----------------------------------------------------------------------

    #[test]
    fn embedded_finds_exact_key() {
        let bundle = EmbeddedBundle::new(FILES);
        assert_eq!(bundle.get(&request("a/page.html")).unwrap().as_ref(), b"page");
        assert_eq!(bundle.len(), 3);
    }

    #[test]
    fn embedded_reports_directories() {
        let bundle = EmbeddedBundle::new(FILES);
        assert_eq!(bundle.get(&RequestPath::root()), Err(BundleError::IsDirectory));
        assert_eq!(bundle.get(&request("a/b")), Err(BundleError::IsDirectory));
    }

    #[test]
    fn embedded_prefix_is_not_a_directory() {
        let bundle = EmbeddedBundle::new(FILES);
        // "a/pa" prefixes "a/page.html" but is not a directory of it.
        assert_eq!(bundle.get(&request("a/pa")), Err(BundleError::Missing));
    }

    #[test]
    fn embedded_rejects_parent_segments() {
        let bundle = EmbeddedBundle::new(FILES);
        assert_eq!(bundle.get(&request("a/../index.html")), Err(BundleError::Missing));
    }

    #[test]
    fn empty_embedded_root_is_directory() {
        let bundle = EmbeddedBundle::new(&[]);
        assert!(bundle.is_empty());
        assert_eq!(bundle.get(&RequestPath::root()), Err(BundleError::IsDirectory));
    }

    // -----------------------------------------------------------------------
    // MemoryBundle
    // -----------------------------------------------------------------------

    #[test]
    fn memory_insert_normalizes_keys() {
        let mut bundle = MemoryBundle::new();
        bundle.insert("/a//b/./c.txt", "c").unwrap();
        assert_eq!(bundle.keys().collect::<Vec<_>>(), vec!["a/b/c.txt"]);
        assert_eq!(bundle.get(&request("a/b/c.txt")).unwrap().as_ref(), b"c");
    }

    #[test]
    fn memory_insert_returns_previous() {
        let mut bundle = MemoryBundle::new();
        assert_eq!(bundle.insert("x", "1").unwrap(), None);
        assert_eq!(bundle.insert("x", "2").unwrap(), Some(b"1".to_vec()));
        assert_eq!(bundle.remove("/x"), Some(b"2".to_vec()));
        assert!(bundle.is_empty());
    }

    #[test]
    fn memory_insert_rejects_bad_keys() {
        let mut bundle = MemoryBundle::new();
        assert!(bundle.insert("../escape", "x").is_err());
        assert!(bundle.insert("/", "x").is_err());
    }

    #[test]
    fn memory_reports_directories() {
        let bundle: MemoryBundle = [("a/b/c/index.html", "deep"), ("a/b.txt", "b")]
            .into_iter()
            .collect();
        assert_eq!(bundle.get(&request("a")), Err(BundleError::IsDirectory));
        assert_eq!(bundle.get(&request("a/b")), Err(BundleError::IsDirectory));
        assert_eq!(bundle.get(&request("a/b/c")), Err(BundleError::IsDirectory));
        assert_eq!(bundle.get(&request("a/x")), Err(BundleError::Missing));
    }

    #[test]
    fn memory_sibling_with_shared_prefix_is_not_a_directory() {
        // "a-b" sorts between "a" and "a/", which must not confuse the scan.
        let bundle: MemoryBundle = [("a-b/x", "x")].into_iter().collect();
        assert_eq!(bundle.get(&request("a")), Err(BundleError::Missing));
    }

    #[test]
    fn memory_from_dir_snapshots_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("a/b")).unwrap();
        fs::write(dir.path().join("index.html"), "home").unwrap();
        fs::write(dir.path().join("a/b/page.html"), "page").unwrap();

        let bundle = MemoryBundle::from_dir(dir.path()).unwrap();
        assert_eq!(bundle.len(), 2);
        fs::write(dir.path().join("index.html"), "changed").unwrap();
        assert_eq!(bundle.get(&request("index.html")).unwrap().as_ref(), b"home");
        assert_eq!(bundle.get(&request("a/b/page.html")).unwrap().as_ref(), b"page");
        assert_eq!(bundle.get(&request("a/b")), Err(BundleError::IsDirectory));
    }

    #[test]
    fn memory_from_missing_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = MemoryBundle::from_dir(dir.path().join("nope")).unwrap_err();
        assert!(matches!(err, StoreError::InvalidRoot { .. }));
    }

    #[test]
    fn memory_from_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("page.html");
        fs::write(&file, "page").unwrap();
        let err = MemoryBundle::from_dir(&file).unwrap_err();
        assert!(matches!(err, StoreError::InvalidRoot { .. }));
    }
}
