//! CLI command implementations

pub(crate) mod common;
pub(crate) mod console;
pub(crate) mod export;
pub(crate) mod import;
pub(crate) mod list;
pub(crate) mod run;
