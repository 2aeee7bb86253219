use std::cmp::Ordering;

use crate::transaction::models::Transaction;

/// Rows that can be ordered by category, then sub-category.
pub trait Categorized {
    fn category(&self) -> &str;
    fn sub_category(&self) -> &str;
}

/// Newest first; transactions without a date go last. Ties break on id.
pub fn by_date_desc(transactions: &mut [Transaction]) {
    transactions.sort_by(|a, b| {
        let by_date = match (a.date, b.date) {
            (Some(a), Some(b)) => b.cmp(&a),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        by_date.then_with(|| a.id.cmp(&b.id))
    });
}

/// Category ascending, then sub-category ascending (plain string order).
pub fn by_category<T: Categorized>(rows: &mut [T]) {
    rows.sort_by(|a, b| {
        a.category()
            .cmp(b.category())
            .then_with(|| a.sub_category().cmp(b.sub_category()))
    });
}
