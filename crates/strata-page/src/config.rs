use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use strata_store::{chain_stores, FileStore, Store, DEFAULT_FILE_NAME};
use tracing::debug;

use crate::error::{PageError, PageResult};
use crate::page::ContentPage;

/// Serializable description of a [`ContentPage`] over directories.
///
/// The page reads from `root` first, then from each of `fallbacks` in order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    pub root: PathBuf,
    pub fallbacks: Vec<PathBuf>,
    pub default_file: String,
    pub welcome_page: bool,
    pub collapse_io_errors: bool,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            fallbacks: Vec::new(),
            default_file: DEFAULT_FILE_NAME.to_string(),
            welcome_page: true,
            collapse_io_errors: true,
        }
    }
}

impl PageConfig {
    /// Config serving `root` alone, with every other field at its default.
    pub fn for_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    /// Open every directory and build the page.
    pub fn build(&self) -> PageResult<ContentPage> {
        self.validate()?;

        let mut stores: Vec<Box<dyn Store>> = Vec::with_capacity(1 + self.fallbacks.len());
        for dir in std::iter::once(&self.root).chain(&self.fallbacks) {
            let store = FileStore::open(dir)?
                .with_default_file(self.default_file.as_str())
                .collapse_io_errors(self.collapse_io_errors);
            stores.push(Box::new(store));
        }
        debug!(
            root = %self.root.display(),
            fallbacks = self.fallbacks.len(),
            welcome_page = self.welcome_page,
            "building content page"
        );

        let store = chain_stores(stores).ok_or(PageError::NoSource)?;
        ContentPage::builder()
            .store(store)
            .default_file(self.default_file.as_str())
            .welcome_page(self.welcome_page)
            .build()
    }

    fn validate(&self) -> PageResult<()> {
        let name = self.default_file.as_str();
        if name.is_empty() || name == "." || name == ".." || name.contains('/') {
            return Err(PageError::Config(format!(
                "default_file must be a plain file name, got {name:?}"
            )));
        }
        Ok(())
    }
}
