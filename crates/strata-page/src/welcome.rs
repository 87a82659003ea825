//! Built-in introduction document, served when a site has no index of its own.

use std::borrow::Cow;

use strata_store::{BundleError, ResourceBundle, ResourceStore};
use strata_types::RequestPath;

static WELCOME_PAGE: &[u8] = include_bytes!("../assets/welcome/index.html");

/// Bundle holding the welcome document at the root, under one file name.
#[derive(Clone, Debug)]
pub struct WelcomeBundle {
    name: String,
}

impl WelcomeBundle {
    /// Serve the welcome document as `/<name>`.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// The file name the document is served under.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl ResourceBundle for WelcomeBundle {
    fn get(&self, path: &RequestPath) -> Result<Cow<'_, [u8]>, BundleError> {
        if path.is_root() {
            return Err(BundleError::IsDirectory);
        }
        if path.len() == 1 && path.file_name() == Some(self.name.as_str()) {
            Ok(Cow::Borrowed(WELCOME_PAGE))
        } else {
            Err(BundleError::Missing)
        }
    }
}

/// Store answering `/` and `/<default_file>` with the welcome document.
pub fn store(default_file: &str) -> ResourceStore<WelcomeBundle> {
    ResourceStore::new(WelcomeBundle::new(default_file)).with_default_file(default_file)
}
