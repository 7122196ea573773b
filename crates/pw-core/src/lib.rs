//! pw-core - Core library for Patchwork
//!
//! This crate provides the document model, field paths, filter predicates,
//! patch operations, store configuration, and run reports shared by every
//! Patchwork component.

pub mod config;
pub mod document;
pub mod error;
pub mod field_path;
pub mod filter;
pub mod ids;
pub mod patch;
pub mod report;

pub use config::{ConfigFile, StoreConfig};
pub use document::Document;
pub use error::{CoreError, CoreResult};
pub use field_path::FieldPath;
pub use filter::{Filter, Query};
pub use ids::{DocumentId, DocumentType, DRAFT_PREFIX};
pub use patch::{FieldOp, PatchOp, Plan};
pub use report::{ApplyPolicy, Failure, FailureScope, RunMode, RunReport};
