//! Turns raw remote records into [`Transaction`]s.

use rust_decimal::Decimal;
use serde_json::Value;
use tracing::warn;

use super::models::{
    CategoryValue, MappedRecord, MappingError, SourceSchema, Transaction, TransactionType,
    NO_DESCRIPTION,
};
use crate::remote::models::{Page, PropertyError};

/// Map one record. Absent properties take their defaults; properties of the
/// wrong kind are errors.
pub fn map_record(
    page: &Page,
    schema: &SourceSchema,
    transaction_type: TransactionType,
) -> Result<MappedRecord, MappingError> {
    if page.id.trim().is_empty() {
        return Err(MappingError::MissingId);
    }

    let amount = page.number(schema.amount_field)?.unwrap_or(Decimal::ZERO);
    let description = page
        .text(schema.description_field)?
        .unwrap_or_else(|| NO_DESCRIPTION.to_string());
    let date = page.date(schema.date_field)?;

    let category = match schema.category_field {
        Some(field) => category_value(page, field)?,
        None => None,
    };
    let sub_category = match schema.sub_category_field {
        Some(field) => category_value(page, field)?,
        None => None,
    };

    Ok(MappedRecord {
        transaction: Transaction {
            id: page.id.clone(),
            date,
            description,
            amount,
            transaction_type,
            category: None,
            sub_category: None,
        },
        category,
        sub_category,
    })
}

/// Map every record, logging and dropping the ones that fail.
pub fn map_records(
    pages: &[Page],
    schema: &SourceSchema,
    transaction_type: TransactionType,
) -> Vec<MappedRecord> {
    pages
        .iter()
        .filter_map(|page| match map_record(page, schema, transaction_type) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(record_id = %page.id, error = %e, "Skipping unmappable record");
                None
            }
        })
        .collect()
}

/// Relations become references (first related row wins), text and selects
/// become names.
fn category_value(page: &Page, field: &str) -> Result<Option<CategoryValue>, PropertyError> {
    let kind = page
        .property(field)
        .and_then(|value| value.get("type"))
        .and_then(Value::as_str);

    match kind {
        None => Ok(None),
        Some("relation") => Ok(page
            .relation_ids(field)?
            .into_iter()
            .next()
            .map(CategoryValue::Reference)),
        Some(_) => Ok(page.text(field)?.map(CategoryValue::Name)),
    }
}
