//! Read-only content stores for Strata.
//!
//! A store turns a request path into the bytes of a static resource, or
//! reports that nothing exists there. Every backend implements the [`Store`]
//! trait, so front ends never know which medium served a request.
//!
//! # Storage Backends
//!
//! - [`FileStore`] -- a directory on disk, confined to its root
//! - [`ResourceStore`] -- a closed [`ResourceBundle`] of named byte blobs
//! - [`MemoryStore`] -- a `ResourceStore` over an owned [`MemoryBundle`]
//! - [`AggregateStore`] -- a primary store with a secondary fallback
//!
//! # Design Rules
//!
//! 1. Stores never write. Concurrent reads are always safe.
//! 2. A path naming a directory is served by that directory's default
//!    document (one level, never a search).
//! 3. No `FileStore` read resolves outside its root, whatever the input.
//! 4. Escaping the root and missing content look the same to callers:
//!    both are [`StoreError::NotFound`].
//! 5. Only `NotFound` moves an [`AggregateStore`] on to its secondary.

mod confine;

pub mod aggregate;
pub mod bundle;
pub mod error;
pub mod file;
pub mod resource;
pub mod traits;

// Re-export primary types at crate root for ergonomic imports.
pub use aggregate::{chain_stores, AggregateStore};
pub use bundle::{EmbeddedBundle, MemoryBundle, ResourceBundle};
pub use error::{BundleError, StoreError, StoreResult};
pub use file::FileStore;
pub use resource::{MemoryStore, ResourceStore};
pub use traits::Store;

/// Document served when a request names a directory.
pub const DEFAULT_FILE_NAME: &str = "index.html";
