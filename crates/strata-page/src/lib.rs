//! Request adapter for Strata.
//!
//! A [`ContentPage`] sits between a request-handling front end and a
//! [`Store`](strata_store::Store). It hands each request path to the store
//! and turns "nothing here" into a [`NotFound`] outcome the front end can
//! map to its own not-found response. It never fails the caller for
//! missing content.
//!
//! # Modules
//!
//! - [`page`] -- [`ContentPage`] and its builder
//! - [`config`] -- [`PageConfig`], a serializable description of a page
//! - [`welcome`] -- the built-in introduction document
//! - [`error`] -- [`PageError`] and [`NotFound`]

pub mod config;
pub mod error;
pub mod page;
pub mod welcome;

pub use config::PageConfig;
pub use error::{NotFound, PageError, PageResult};
pub use page::{ContentPage, ContentPageBuilder};
