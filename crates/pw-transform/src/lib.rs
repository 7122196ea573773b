//! pw-transform - Document transforms for Patchwork
//!
//! A [`Transform`] turns one document into the [`FieldChanges`] a migration
//! wants applied to it. Rule-driven transforms (icon inference, date and
//! locale normalization) are backed by ordered [`RuleTable`]s where the first
//! matching entry wins.

pub mod dates;
pub mod error;
pub mod fields;
pub mod icon;
pub mod locale;
pub mod rules;
pub mod transform;

pub use dates::{normalize_period, DateNormalization};
pub use error::{TransformError, TransformResult};
pub use fields::{Backfill, Chain, GeoPoint, Relocate, Removal};
pub use icon::{infer_icon, Icon, IconInference};
pub use locale::{canonical_locale, LocaleNormalization};
pub use rules::RuleTable;
pub use transform::{FieldChanges, Transform};
