//! Filter predicates for selecting a migration's working set.
//!
//! A [`Filter`] is evaluated in-process by stores that hold documents locally
//! and rendered to GROQ by stores that query a remote content lake. Both
//! renderings must agree; `filter_test.rs` checks them side by side.

use crate::document::Document;
use crate::field_path::FieldPath;
use crate::ids::{DocumentType, DRAFT_PREFIX};
use serde_json::Value;

/// Boolean query over document type and field presence/equality.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// `_type == "<type>"`
    TypeIs(DocumentType),
    /// Field is present and not null
    Defined(FieldPath),
    /// Field is absent or null
    Undefined(FieldPath),
    /// Field equals a JSON value
    Equals(FieldPath, Value),
    And(Vec<Filter>),
    Or(Vec<Filter>),
    Not(Box<Filter>),
}

impl Filter {
    /// Conjunction, flattening nested `And`s.
    pub fn and(self, other: Filter) -> Filter {
        match (self, other) {
            (Filter::And(mut left), Filter::And(right)) => {
                left.extend(right);
                Filter::And(left)
            }
            (Filter::And(mut left), other) => {
                left.push(other);
                Filter::And(left)
            }
            (this, Filter::And(mut right)) => {
                right.insert(0, this);
                Filter::And(right)
            }
            (this, other) => Filter::And(vec![this, other]),
        }
    }

    pub fn or(self, other: Filter) -> Filter {
        match self {
            Filter::Or(mut filters) => {
                filters.push(other);
                Filter::Or(filters)
            }
            this => Filter::Or(vec![this, other]),
        }
    }

    pub fn negate(self) -> Filter {
        Filter::Not(Box::new(self))
    }

    /// Evaluate against a document held in memory.
    pub fn matches(&self, doc: &Document) -> bool {
        match self {
            Filter::TypeIs(doc_type) => doc.doc_type == *doc_type,
            Filter::Defined(field) => doc.is_defined(field),
            Filter::Undefined(field) => !doc.is_defined(field),
            Filter::Equals(field, value) => doc.get(field) == Some(value),
            Filter::And(filters) => filters.iter().all(|f| f.matches(doc)),
            Filter::Or(filters) => filters.iter().any(|f| f.matches(doc)),
            Filter::Not(filter) => !filter.matches(doc),
        }
    }

    /// The document type every match must have, when the filter pins one.
    ///
    /// Stores use this to narrow a scan before evaluating the full filter.
    pub fn required_type(&self) -> Option<&DocumentType> {
        match self {
            Filter::TypeIs(doc_type) => Some(doc_type),
            Filter::And(filters) => filters.iter().find_map(Filter::required_type),
            _ => None,
        }
    }

    /// Render as a GROQ filter expression.
    pub fn to_groq(&self) -> String {
        match self {
            Filter::TypeIs(doc_type) => format!("_type == {}", groq_string(doc_type.as_str())),
            Filter::Defined(field) => format!("defined({field})"),
            Filter::Undefined(field) => format!("!defined({field})"),
            Filter::Equals(field, value) => format!("{field} == {value}"),
            Filter::And(filters) if filters.is_empty() => "true".to_string(),
            Filter::And(filters) => filters
                .iter()
                .map(Filter::to_groq_conjunct)
                .collect::<Vec<_>>()
                .join(" && "),
            Filter::Or(filters) if filters.is_empty() => "false".to_string(),
            Filter::Or(filters) => filters
                .iter()
                .map(Filter::to_groq)
                .collect::<Vec<_>>()
                .join(" || "),
            Filter::Not(filter) => format!("!({})", filter.to_groq()),
        }
    }

    fn to_groq_conjunct(&self) -> String {
        match self {
            Filter::Or(filters) if filters.len() > 1 => format!("({})", self.to_groq()),
            _ => self.to_groq(),
        }
    }
}

fn groq_string(s: &str) -> String {
    // serde_json's string escaping is valid GROQ string syntax
    Value::String(s.to_string()).to_string()
}

/// A filter plus draft handling; the unit a store's `fetch` accepts.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub filter: Filter,
    pub include_drafts: bool,
}

impl Query {
    /// Query over published documents only.
    pub fn new(filter: Filter) -> Self {
        Self {
            filter,
            include_drafts: false,
        }
    }

    pub fn including_drafts(mut self, include: bool) -> Self {
        self.include_drafts = include;
        self
    }

    pub fn matches(&self, doc: &Document) -> bool {
        (self.include_drafts || !doc.id.is_draft()) && self.filter.matches(doc)
    }

    /// Full GROQ query, ordered by `_id` so iteration order is stable.
    pub fn to_groq(&self) -> String {
        let mut conjuncts = vec![self.filter.to_groq_conjunct()];
        if !self.include_drafts {
            conjuncts.push(format!(
                "!(_id in path({}))",
                groq_string(&format!("{DRAFT_PREFIX}**"))
            ));
        }
        format!("*[{}] | order(_id asc)", conjuncts.join(" && "))
    }
}

#[cfg(test)]
#[path = "filter_test.rs"]
mod tests;
