use thiserror::Error;

use strata_store::StoreError;

/// A request for which no content exists.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct NotFound {
    /// The request path as received.
    pub path: String,
    /// Human-readable diagnostic naming the path.
    pub message: String,
}

impl NotFound {
    pub fn new(path: impl Into<String>) -> Self {
        let path = path.into();
        let message = format!("\"{path}\" not found.");
        Self { path, message }
    }
}

#[derive(Debug, Error)]
pub enum PageError {
    #[error(transparent)]
    NotFound(#[from] NotFound),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("content page needs a store or a directory")]
    NoSource,

    #[error("configuration error: {0}")]
    Config(String),
}

impl PageError {
    /// Returns `true` if this is a not-found outcome.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

pub type PageResult<T> = Result<T, PageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_names_path() {
        let nf = NotFound::new("/nofile.html");
        assert_eq!(nf.message, "\"/nofile.html\" not found.");
        assert_eq!(nf.to_string(), nf.message);
        assert!(PageError::from(nf).is_not_found());
    }

    #[test]
    fn store_errors_are_not_not_found() {
        let err = PageError::from(StoreError::not_found("x"));
        // Raw conversions keep the store error; `ContentPage::handle` is the
        // place that turns store not-found into a page outcome.
        assert!(!err.is_not_found());
    }
}
