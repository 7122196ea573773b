//! Migration definitions and the built-in registry.

use crate::error::{RunError, RunResult};
use pw_core::{ApplyPolicy, DocumentType, FieldPath, Filter, Query};
use pw_transform::{
    Backfill, Chain, DateNormalization, GeoPoint, IconInference, LocaleNormalization, Relocate,
    Removal, Transform,
};
use serde_json::json;

/// A named, repeatable content migration.
///
/// The filter selects the working set and must exclude documents that are
/// already migrated, so re-running a finished migration matches nothing.
pub struct Migration {
    pub name: &'static str,
    pub description: &'static str,
    pub filter: Filter,
    pub transform: Box<dyn Transform>,
    pub policy: ApplyPolicy,
}

impl Migration {
    /// The select query for this migration
    pub fn query(&self, include_drafts: bool) -> Query {
        Query::new(self.filter.clone()).including_drafts(include_drafts)
    }
}

fn field(path: &'static str) -> FieldPath {
    FieldPath::parse(path).expect("valid built-in field path")
}

fn of_type(name: &'static str) -> Filter {
    Filter::TypeIs(DocumentType::try_new(name).expect("valid built-in type"))
}

fn equipment_icons() -> Migration {
    Migration {
        name: "equipment-icons",
        description: "Infer an icon for each equipment entry from its name",
        filter: of_type("equipment").and(Filter::Undefined(field("icon"))),
        transform: Box::new(IconInference::new(field("name"), field("icon"))),
        policy: ApplyPolicy::PerItem,
    }
}

fn villa_property_type() -> Migration {
    Migration {
        name: "villa-property-type",
        description: "Backfill propertyType = \"villa\" on villas missing it",
        filter: of_type("villa").and(Filter::Undefined(field("propertyType"))),
        transform: Box::new(Backfill::constant(field("propertyType"), json!("villa"))),
        policy: ApplyPolicy::PerItem,
    }
}

fn villa_geo_private_info() -> Migration {
    Migration {
        name: "villa-geo-private-info",
        description: "Move address and owner phone into privateInfo and build the location geopoint",
        filter: of_type("villa")
            .and(Filter::Undefined(field("privateInfo")))
            .and(Filter::Defined(field("address"))),
        transform: Box::new(
            Chain::new("geo-private-info")
                .then(Relocate::new(field("address"), field("privateInfo.address")))
                .then(Relocate::new(
                    field("ownerPhone"),
                    field("privateInfo.ownerPhone"),
                ))
                .then(GeoPoint::new(
                    field("latitude"),
                    field("longitude"),
                    field("location"),
                )),
        ),
        policy: ApplyPolicy::Batched,
    }
}

fn rate_period_dates() -> Migration {
    Migration {
        name: "rate-period-dates",
        description: "Spell out abbreviated month names in rate periods",
        filter: of_type("rate").and(Filter::Defined(field("period"))),
        transform: Box::new(DateNormalization::new(field("period"))),
        policy: ApplyPolicy::PerItem,
    }
}

fn villa_locale() -> Migration {
    Migration {
        name: "villa-locale",
        description: "Normalize villa language codes to fr / en",
        filter: of_type("villa")
            .and(Filter::Defined(field("language")))
            .and(Filter::Equals(field("language"), json!("fr")).negate())
            .and(Filter::Equals(field("language"), json!("en")).negate()),
        transform: Box::new(LocaleNormalization::new(field("language"))),
        policy: ApplyPolicy::PerItem,
    }
}

fn villa_legacy_price() -> Migration {
    Migration {
        name: "villa-legacy-price",
        description: "Remove the retired legacyPrice field from villas",
        filter: of_type("villa").and(Filter::Defined(field("legacyPrice"))),
        transform: Box::new(Removal::new(field("legacyPrice"))),
        policy: ApplyPolicy::PerItem,
    }
}

/// Every built-in migration, in `pw list` order
pub fn builtin_migrations() -> Vec<Migration> {
    vec![
        equipment_icons(),
        villa_property_type(),
        villa_geo_private_info(),
        rate_period_dates(),
        villa_locale(),
        villa_legacy_price(),
    ]
}

/// Look up a built-in migration by name
pub fn find_migration(name: &str) -> RunResult<Migration> {
    builtin_migrations()
        .into_iter()
        .find(|m| m.name == name)
        .ok_or_else(|| RunError::UnknownMigration {
            name: name.to_string(),
        })
}
