//! Icon inference for equipment entries.
//!
//! Equipment names are free text in either site language ("Wifi Haut Débit",
//! "Parking voiture", "Private pool"). The icon is picked by lowercasing the
//! name and scanning an ordered keyword table for the first keyword the name
//! contains. Order matters: "Parking voiture" must resolve to [`Icon::Car`]
//! because `voiture` sits above `parking`.

use crate::error::TransformResult;
use crate::rules::RuleTable;
use crate::transform::{FieldChanges, Transform};
use pw_core::{Document, FieldPath};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Icon identifiers understood by the site front end, stored lower-kebab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Icon {
    Wifi,
    Gate,
    Car,
    Parking,
    Pool,
    Jacuzzi,
    Sauna,
    AirConditioning,
    Heating,
    Fireplace,
    Tv,
    Dishwasher,
    WashingMachine,
    Kitchen,
    Barbecue,
    Garden,
    Terrace,
    Gym,
    SeaView,
    Beach,
    Pets,
    Baby,
    Elevator,
    Security,
    /// Sentinel for names no keyword matches
    Check,
}

impl Icon {
    pub fn as_str(&self) -> &'static str {
        match self {
            Icon::Wifi => "wifi",
            Icon::Gate => "gate",
            Icon::Car => "car",
            Icon::Parking => "parking",
            Icon::Pool => "pool",
            Icon::Jacuzzi => "jacuzzi",
            Icon::Sauna => "sauna",
            Icon::AirConditioning => "air-conditioning",
            Icon::Heating => "heating",
            Icon::Fireplace => "fireplace",
            Icon::Tv => "tv",
            Icon::Dishwasher => "dishwasher",
            Icon::WashingMachine => "washing-machine",
            Icon::Kitchen => "kitchen",
            Icon::Barbecue => "barbecue",
            Icon::Garden => "garden",
            Icon::Terrace => "terrace",
            Icon::Gym => "gym",
            Icon::SeaView => "sea-view",
            Icon::Beach => "beach",
            Icon::Pets => "pets",
            Icon::Baby => "baby",
            Icon::Elevator => "elevator",
            Icon::Security => "security",
            Icon::Check => "check",
        }
    }
}

impl fmt::Display for Icon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Keyword table in priority order. Keywords are lowercase.
pub fn default_keywords() -> RuleTable<&'static str, Icon> {
    RuleTable::new(vec![
        ("wifi", Icon::Wifi),
        ("wi-fi", Icon::Wifi),
        ("internet", Icon::Wifi),
        ("fibre", Icon::Wifi),
        ("portail", Icon::Gate),
        ("gate", Icon::Gate),
        ("voiture", Icon::Car),
        ("garage", Icon::Car),
        ("parking", Icon::Parking),
        ("jacuzzi", Icon::Jacuzzi),
        ("bain à remous", Icon::Jacuzzi),
        ("hot tub", Icon::Jacuzzi),
        ("piscine", Icon::Pool),
        ("pool", Icon::Pool),
        ("sauna", Icon::Sauna),
        ("hammam", Icon::Sauna),
        ("climatisation", Icon::AirConditioning),
        ("air conditionné", Icon::AirConditioning),
        ("air conditioning", Icon::AirConditioning),
        ("cheminée", Icon::Fireplace),
        ("fireplace", Icon::Fireplace),
        ("chauffage", Icon::Heating),
        ("heating", Icon::Heating),
        ("télévision", Icon::Tv),
        ("television", Icon::Tv),
        ("satellite", Icon::Tv),
        ("lave-vaisselle", Icon::Dishwasher),
        ("dishwasher", Icon::Dishwasher),
        ("lave-linge", Icon::WashingMachine),
        ("machine à laver", Icon::WashingMachine),
        ("washing machine", Icon::WashingMachine),
        ("cuisine", Icon::Kitchen),
        ("kitchen", Icon::Kitchen),
        ("barbecue", Icon::Barbecue),
        ("plancha", Icon::Barbecue),
        ("bbq", Icon::Barbecue),
        ("jardin", Icon::Garden),
        ("garden", Icon::Garden),
        ("terrasse", Icon::Terrace),
        ("terrace", Icon::Terrace),
        ("salle de sport", Icon::Gym),
        ("fitness", Icon::Gym),
        ("gym", Icon::Gym),
        ("vue mer", Icon::SeaView),
        ("sea view", Icon::SeaView),
        ("plage", Icon::Beach),
        ("beach", Icon::Beach),
        ("animaux", Icon::Pets),
        ("pets", Icon::Pets),
        ("bébé", Icon::Baby),
        ("lit parapluie", Icon::Baby),
        ("baby", Icon::Baby),
        ("ascenseur", Icon::Elevator),
        ("elevator", Icon::Elevator),
        ("alarme", Icon::Security),
        ("coffre-fort", Icon::Security),
        ("safe", Icon::Security),
    ])
}

/// Pick an icon for a free-text name.
pub fn infer_icon(table: &RuleTable<&'static str, Icon>, name: &str) -> Icon {
    let name = name.to_lowercase();
    table
        .first_match(|keyword| name.contains(keyword))
        .copied()
        .unwrap_or(Icon::Check)
}

/// Sets `target` from the name in `source` wherever `target` is undefined.
pub struct IconInference {
    source: FieldPath,
    target: FieldPath,
    keywords: RuleTable<&'static str, Icon>,
}

impl IconInference {
    pub fn new(source: FieldPath, target: FieldPath) -> Self {
        Self {
            source,
            target,
            keywords: default_keywords(),
        }
    }

    pub fn with_keywords(mut self, keywords: RuleTable<&'static str, Icon>) -> Self {
        self.keywords = keywords;
        self
    }
}

impl Transform for IconInference {
    fn name(&self) -> &str {
        "icon-inference"
    }

    fn compute(&self, doc: &Document) -> TransformResult<FieldChanges> {
        if doc.is_defined(&self.target) {
            return Ok(FieldChanges::new());
        }
        let name = doc.text(&self.source).unwrap_or_default();
        let icon = infer_icon(&self.keywords, name);
        if icon == Icon::Check {
            log::debug!("No icon keyword in '{name}' ({}), using default", doc.id);
        }
        Ok(FieldChanges::new().set(self.target.clone(), Value::String(icon.as_str().to_string())))
    }
}

#[cfg(test)]
#[path = "icon_test.rs"]
mod tests;
