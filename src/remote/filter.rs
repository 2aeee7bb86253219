//! Compound query filters in the remote API's JSON shape.

use chrono::NaiveDate;
use serde_json::{json, Value};

use crate::period::{DateRange, DATE_FORMAT};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    And(Vec<Filter>),
    RelationContains { property: String, id: String },
    DateOnOrAfter { property: String, date: NaiveDate },
    DateOnOrBefore { property: String, date: NaiveDate },
    TitleEquals { property: String, value: String },
}

impl Filter {
    /// `date_property` within `range`, optionally restricted to records whose
    /// `relation` contains `related_id`.
    pub fn date_range(
        date_property: &str,
        range: &DateRange,
        relation: Option<(&str, &str)>,
    ) -> Self {
        let mut clauses = Vec::with_capacity(3);
        if let Some((property, id)) = relation {
            clauses.push(Filter::RelationContains {
                property: property.to_string(),
                id: id.to_string(),
            });
        }
        clauses.push(Filter::DateOnOrAfter {
            property: date_property.to_string(),
            date: range.start,
        });
        clauses.push(Filter::DateOnOrBefore {
            property: date_property.to_string(),
            date: range.end,
        });
        Filter::And(clauses)
    }

    pub fn title_equals(property: &str, value: &str) -> Self {
        Filter::TitleEquals {
            property: property.to_string(),
            value: value.to_string(),
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            Filter::And(clauses) => json!({
                "and": clauses.iter().map(Filter::to_json).collect::<Vec<_>>()
            }),
            Filter::RelationContains { property, id } => json!({
                "property": property,
                "relation": { "contains": id }
            }),
            Filter::DateOnOrAfter { property, date } => json!({
                "property": property,
                "date": { "on_or_after": date.format(DATE_FORMAT).to_string() }
            }),
            Filter::DateOnOrBefore { property, date } => json!({
                "property": property,
                "date": { "on_or_before": date.format(DATE_FORMAT).to_string() }
            }),
            Filter::TitleEquals { property, value } => json!({
                "property": property,
                "title": { "equals": value }
            }),
        }
    }
}
