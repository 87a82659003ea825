use std::fmt;
use std::path::{Path, PathBuf};

use strata_store::{AggregateStore, FileStore, Store, StoreError, DEFAULT_FILE_NAME};
use tracing::debug;

use crate::error::{NotFound, PageError, PageResult};
use crate::welcome;

/// Serves static content from a [`Store`].
///
/// A page is built once and then only read; every call to
/// [`handle`](Self::handle) is independent, so one page can serve
/// concurrent requests from any number of threads.
///
/// ```
/// use strata_page::ContentPage;
/// use strata_store::MemoryStore;
///
/// let store = MemoryStore::from_documents([("index.html", "example")]).unwrap();
/// let page = ContentPage::new(store);
/// assert_eq!(page.handle("/").unwrap(), b"example");
/// assert!(page.handle("/nofile.html").unwrap_err().is_not_found());
/// ```
pub struct ContentPage {
    store: Box<dyn Store>,
}

impl ContentPage {
    /// Serve content from `store`.
    pub fn new(store: impl Store + 'static) -> Self {
        Self {
            store: Box::new(store),
        }
    }

    /// Serve the directory at `dir`, with `index.html` as default document.
    pub fn from_directory(dir: impl AsRef<Path>) -> PageResult<Self> {
        Ok(Self::new(FileStore::open(dir)?))
    }

    /// Start building a page from a store or a directory.
    pub fn builder() -> ContentPageBuilder {
        ContentPageBuilder::default()
    }

    /// The store requests are delegated to.
    pub fn store(&self) -> &dyn Store {
        self.store.as_ref()
    }

    /// Answer a request for `request_path`.
    ///
    /// `request_path` is the path component of the request, already split
    /// from query and host by the front end. Content is returned unchanged.
    /// Missing content yields [`PageError::NotFound`]; store failures other
    /// than absence yield [`PageError::Store`].
    pub fn handle(&self, request_path: &str) -> PageResult<Vec<u8>> {
        match self.store.read(request_path) {
            Ok(content) => Ok(content),
            Err(StoreError::NotFound { .. }) => {
                debug!(path = request_path, "no content for request");
                Err(NotFound::new(request_path).into())
            }
            Err(err) => Err(PageError::Store(err)),
        }
    }
}

impl fmt::Debug for ContentPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContentPage").finish_non_exhaustive()
    }
}

/// Builder for [`ContentPage`].
///
/// Exactly one source is used: a store given with [`store`](Self::store)
/// takes precedence, and [`directory`](Self::directory) is ignored then.
#[derive(Default)]
pub struct ContentPageBuilder {
    store: Option<Box<dyn Store>>,
    directory: Option<PathBuf>,
    default_file: Option<String>,
    welcome_page: bool,
}

impl ContentPageBuilder {
    /// Serve content from `store`.
    pub fn store(mut self, store: impl Store + 'static) -> Self {
        self.store = Some(Box::new(store));
        self
    }

    /// Serve the directory at `dir` through a [`FileStore`].
    pub fn directory(mut self, dir: impl Into<PathBuf>) -> Self {
        self.directory = Some(dir.into());
        self
    }

    /// Default document for a directory source and name of the welcome
    /// document (default: `index.html`).
    pub fn default_file(mut self, name: impl Into<String>) -> Self {
        self.default_file = Some(name.into());
        self
    }

    /// Fall back to the built-in welcome document for `/` and
    /// `/<default_file>` when the source has no content there.
    pub fn welcome_page(mut self, enabled: bool) -> Self {
        self.welcome_page = enabled;
        self
    }

    /// Build the page.
    ///
    /// Fails with [`PageError::NoSource`] if neither a store nor a directory
    /// was given, or with [`PageError::Store`] if the directory cannot be
    /// opened.
    pub fn build(self) -> PageResult<ContentPage> {
        let default_file = self.default_file.as_deref().unwrap_or(DEFAULT_FILE_NAME);
        let store: Box<dyn Store> = match (self.store, self.directory) {
            (Some(store), _) => store,
            (None, Some(dir)) => Box::new(FileStore::open(dir)?.with_default_file(default_file)),
            (None, None) => return Err(PageError::NoSource),
        };

        if self.welcome_page {
            let welcome = welcome::store(default_file);
            return Ok(ContentPage::new(AggregateStore::new(store, welcome)));
        }
        Ok(ContentPage { store })
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::io;
    use std::sync::Arc;
    use std::thread;

    use strata_store::{MemoryStore, StoreResult};

    use super::*;

    fn site(files: &[(&str, &str)]) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        for (path, content) in files {
            let file = dir.path().join(path);
            fs::create_dir_all(file.parent().unwrap()).unwrap();
            fs::write(file, content).unwrap();
        }
        dir
    }

    // -----------------------------------------------------------------------
    // Serving
    // -----------------------------------------------------------------------

    #[test]
    fn serve_static_page() {
        let dir = site(&[("index.html", "example")]);
        let page = ContentPage::from_directory(dir.path()).unwrap();
        assert_eq!(page.handle("/index.html").unwrap(), b"example");
    }

    #[test]
    fn serve_index_html() {
        let dir = site(&[("index.html", "example")]);
        let page = ContentPage::from_directory(dir.path()).unwrap();
        assert_eq!(page.handle("/").unwrap(), b"example");
        assert_eq!(page.handle("").unwrap(), b"example");
    }

    #[test]
    fn serve_subdir() {
        let dir = site(&[("a/b/c/index.html", "example")]);
        let page = ContentPage::from_directory(dir.path()).unwrap();
        assert_eq!(page.handle("/a/b/c/index.html").unwrap(), b"example");
        assert_eq!(page.handle("/a/b/c/").unwrap(), b"example");
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = site(&[("index.html", "example")]);
        let page = ContentPage::from_directory(dir.path()).unwrap();
        match page.handle("/nofile.html").unwrap_err() {
            PageError::NotFound(nf) => {
                assert_eq!(nf.path, "/nofile.html");
                assert_eq!(nf.message, "\"/nofile.html\" not found.");
            }
            other => panic!("expected not found, got {other:?}"),
        }
    }

    #[test]
    fn missing_file_in_subdir_is_not_found() {
        let dir = site(&[("a/b/c/index.html", "example")]);
        let page = ContentPage::from_directory(dir.path()).unwrap();
        assert!(page.handle("/a/b/c/nofile.html").unwrap_err().is_not_found());
    }

    #[test]
    fn parent_dir_is_not_found() {
        let outer = site(&[("passwd", "example"), ("site/index.html", "home")]);
        let page = ContentPage::from_directory(outer.path().join("site")).unwrap();
        let err = page.handle("/../passwd").unwrap_err();
        assert!(err.is_not_found());
        assert!(!err.to_string().contains("example"));
    }

    #[test]
    fn page_can_use_store() {
        let dir = site(&[("index.html", "example")]);
        let page = ContentPage::new(FileStore::open(dir.path()).unwrap());
        assert_eq!(page.handle("/index.html").unwrap(), b"example");
    }

    #[test]
    fn content_is_returned_unchanged() {
        let bytes: Vec<u8> = vec![0, 159, 146, 150, b'<', b'/'];
        let store = MemoryStore::from_documents([("blob.bin", bytes.clone())]).unwrap();
        let page = ContentPage::new(store);
        assert_eq!(page.handle("/blob.bin").unwrap(), bytes);
    }

    #[test]
    fn other_store_errors_are_not_not_found() {
        struct Broken;
        impl Store for Broken {
            fn read(&self, path: &str) -> StoreResult<Vec<u8>> {
                Err(StoreError::Io {
                    path: path.to_string(),
                    source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
                })
            }
        }

        let err = ContentPage::new(Broken).handle("/x").unwrap_err();
        assert!(matches!(err, PageError::Store(StoreError::Io { .. })));
    }

    #[test]
    fn concurrent_requests_share_one_page() {
        let dir = site(&[("index.html", "example"), ("a/b.txt", "b")]);
        let page = Arc::new(ContentPage::from_directory(dir.path()).unwrap());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let page = Arc::clone(&page);
                thread::spawn(move || {
                    for _ in 0..50 {
                        if i % 2 == 0 {
                            assert_eq!(page.handle("/").unwrap(), b"example");
                        } else {
                            assert_eq!(page.handle("/a/b.txt").unwrap(), b"b");
                        }
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
    }

    // -----------------------------------------------------------------------
    // Construction
    // -----------------------------------------------------------------------

    #[test]
    fn from_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = ContentPage::from_directory(dir.path().join("nope")).unwrap_err();
        assert!(matches!(err, PageError::Store(StoreError::InvalidRoot { .. })));
    }

    #[test]
    fn builder_requires_a_source() {
        let err = ContentPage::builder().build().unwrap_err();
        assert!(matches!(err, PageError::NoSource));
    }

    #[test]
    fn builder_store_wins_over_directory() {
        let dir = site(&[("index.html", "from dir")]);
        let store = MemoryStore::from_documents([("index.html", "from store")]).unwrap();
        let page = ContentPage::builder()
            .directory(dir.path())
            .store(store)
            .build()
            .unwrap();
        assert_eq!(page.handle("/").unwrap(), b"from store");
    }

    #[test]
    fn builder_directory_with_default_file() {
        let dir = site(&[("default.txt", "abc")]);
        let page = ContentPage::builder()
            .directory(dir.path())
            .default_file("default.txt")
            .build()
            .unwrap();
        assert_eq!(page.handle("/").unwrap(), b"abc");
    }

    // -----------------------------------------------------------------------
    // Welcome page
    // -----------------------------------------------------------------------

    #[test]
    fn page_has_default_index_html() {
        let dir = site(&[]);
        let page = ContentPage::builder()
            .store(FileStore::open(dir.path()).unwrap())
            .welcome_page(true)
            .build()
            .unwrap();
        let body = page.handle("/index.html").unwrap();
        assert!(!body.is_empty());
        assert_eq!(page.handle("/").unwrap(), body);
    }

    #[test]
    fn site_index_overrides_welcome_page() {
        let dir = site(&[("index.html", "mine")]);
        let page = ContentPage::builder()
            .directory(dir.path())
            .welcome_page(true)
            .build()
            .unwrap();
        assert_eq!(page.handle("/").unwrap(), b"mine");
    }

    #[test]
    fn welcome_page_does_not_mask_missing_content() {
        let dir = site(&[]);
        let page = ContentPage::builder()
            .directory(dir.path())
            .welcome_page(true)
            .build()
            .unwrap();
        assert!(page.handle("/nofile.html").unwrap_err().is_not_found());
    }

    #[test]
    fn welcome_page_follows_default_file() {
        let dir = site(&[]);
        let page = ContentPage::builder()
            .directory(dir.path())
            .default_file("home.html")
            .welcome_page(true)
            .build()
            .unwrap();
        let body = page.handle("/home.html").unwrap();
        assert_eq!(page.handle("/").unwrap(), body);
        assert!(page.handle("/index.html").unwrap_err().is_not_found());
    }

    #[test]
    fn no_welcome_page_by_default() {
        let dir = site(&[]);
        let page = ContentPage::builder().directory(dir.path()).build().unwrap();
        assert!(page.handle("/").unwrap_err().is_not_found());
    }
}
