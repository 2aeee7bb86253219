use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// One page of a database query.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QueryResponse {
    #[serde(default)]
    pub results: Vec<Page>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub next_cursor: Option<String>,
}

/// A raw remote record: an id, an optional icon and a bag of typed properties.
#[derive(Debug, Clone, Deserialize)]
pub struct Page {
    pub id: String,
    #[serde(default)]
    pub icon: Option<Icon>,
    #[serde(default)]
    pub properties: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FileRef {
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Icon {
    External { external: FileRef },
    File { file: FileRef },
    Emoji { emoji: String },
    #[serde(other)]
    Other,
}

impl Icon {
    pub fn url(&self) -> Option<&str> {
        match self {
            Icon::External { external } => Some(&external.url),
            Icon::File { file } => Some(&file.url),
            Icon::Emoji { .. } | Icon::Other => None,
        }
    }
}

/// A property exists but holds a different kind of value than requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyError {
    pub property: String,
    pub expected: &'static str,
    pub found: String,
}

impl fmt::Display for PropertyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "property '{}' expected {} but found {}",
            self.property, self.expected, self.found
        )
    }
}

impl std::error::Error for PropertyError {}

fn property_type(value: &Value) -> &str {
    value.get("type").and_then(Value::as_str).unwrap_or("unknown")
}

fn join_plain_text(fragments: &Value) -> Option<String> {
    let text: String = fragments
        .as_array()?
        .iter()
        .filter_map(|fragment| fragment.get("plain_text").and_then(Value::as_str))
        .collect();
    let text = text.trim().to_string();
    (!text.is_empty()).then_some(text)
}

fn decimal_from_json(number: &serde_json::Number) -> Option<Decimal> {
    let repr = number.to_string();
    Decimal::from_str(&repr)
        .or_else(|_| Decimal::from_scientific(&repr))
        .ok()
}

impl Page {
    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }

    fn mismatch(&self, name: &str, expected: &'static str, value: &Value) -> PropertyError {
        PropertyError {
            property: name.to_string(),
            expected,
            found: property_type(value).to_string(),
        }
    }

    /// Text of a title, rich text or select property.
    pub fn text(&self, name: &str) -> Result<Option<String>, PropertyError> {
        let Some(value) = self.property(name) else {
            return Ok(None);
        };
        match property_type(value) {
            "title" | "rich_text" => Ok(value
                .get(property_type(value))
                .and_then(join_plain_text)),
            "select" => Ok(value
                .get("select")
                .and_then(|select| select.get("name"))
                .and_then(Value::as_str)
                .map(str::to_string)
                .filter(|name| !name.is_empty())),
            _ => Err(self.mismatch(name, "text", value)),
        }
    }

    /// Numeric value of a number, formula or rollup property.
    pub fn number(&self, name: &str) -> Result<Option<Decimal>, PropertyError> {
        let Some(value) = self.property(name) else {
            return Ok(None);
        };
        let raw = match property_type(value) {
            "number" => value.get("number"),
            kind @ ("formula" | "rollup") => value.get(kind).and_then(|inner| inner.get("number")),
            _ => return Err(self.mismatch(name, "number", value)),
        };
        match raw {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Number(n)) => decimal_from_json(n)
                .map(Some)
                .ok_or_else(|| self.mismatch(name, "decimal number", value)),
            Some(_) => Err(self.mismatch(name, "number", value)),
        }
    }

    /// Ids referenced by a relation property, in order.
    pub fn relation_ids(&self, name: &str) -> Result<Vec<String>, PropertyError> {
        let Some(value) = self.property(name) else {
            return Ok(Vec::new());
        };
        if property_type(value) != "relation" {
            return Err(self.mismatch(name, "relation", value));
        }
        Ok(value
            .get("relation")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| item.get("id").and_then(Value::as_str))
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default())
    }

    /// Start date of a date property. Datetimes are truncated to their date.
    pub fn date(&self, name: &str) -> Result<Option<NaiveDate>, PropertyError> {
        let Some(value) = self.property(name) else {
            return Ok(None);
        };
        if property_type(value) != "date" {
            return Err(self.mismatch(name, "date", value));
        }
        let Some(start) = value
            .get("date")
            .and_then(|date| date.get("start"))
            .and_then(Value::as_str)
        else {
            return Ok(None);
        };
        start
            .get(..10)
            .and_then(|day| NaiveDate::parse_from_str(day, crate::period::DATE_FORMAT).ok())
            .map(Some)
            .ok_or_else(|| PropertyError {
                property: name.to_string(),
                expected: "ISO date",
                found: start.to_string(),
            })
    }
}
