//! HTTP front end for Strata.
//!
//! Serves a [`ContentPage`](strata_page::ContentPage) over HTTP. Every
//! `GET` or `HEAD` request path is percent-decoded and handed to the page;
//! the server itself knows nothing about where content lives.

pub mod config;
pub mod error;
pub mod handler;
pub mod router;
pub mod server;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use server::StrataServer;
