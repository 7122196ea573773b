//! pw-store - Document store abstraction for Patchwork
//!
//! This crate provides the [`DocumentStore`] trait, an HTTP client for a
//! hosted content lake, and a DuckDB-backed local store used to rehearse
//! migrations against a dataset export.

pub mod error;
pub mod http;
pub mod local;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use http::HttpStore;
pub use local::LocalStore;
pub use traits::DocumentStore;
