//! Foundation types for Strata.
//!
//! Strata resolves logical request paths to static content. Every store in
//! the workspace sees a request through the same lens: a [`RequestPath`],
//! the request string split into segments with the noise removed.
//!
//! # Key Types
//!
//! - [`RequestPath`] -- Segment-level view of a request-relative path
//! - [`PathError`] -- Rejection of a path that cannot name any resource

pub mod error;
pub mod path;

pub use error::PathError;
pub use path::{RequestPath, PARENT_SEGMENT, SEPARATOR};
