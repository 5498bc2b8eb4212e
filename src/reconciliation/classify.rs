//! Status classification of joined rows

use bigdecimal::{BigDecimal, Zero};
use tracing::warn;

use crate::types::*;

/// Absolute difference between two invoice values, absent values counting as zero
pub fn value_difference(books_value: Option<&BigDecimal>, gstr_value: Option<&BigDecimal>) -> BigDecimal {
    let zero = BigDecimal::zero();
    (books_value.unwrap_or(&zero) - gstr_value.unwrap_or(&zero)).abs()
}

/// Status of one joined row.
///
/// One-sided rows are missing on the other side. Rows present on both sides
/// match when the value difference is at most `tolerance`.
pub fn classify(
    provenance: Provenance,
    books_value: Option<&BigDecimal>,
    gstr_value: Option<&BigDecimal>,
    tolerance: &BigDecimal,
) -> Status {
    match provenance {
        Provenance::BooksOnly => Status::MissingInGstr,
        Provenance::GstrOnly => Status::MissingInBooks,
        Provenance::Both => {
            if value_difference(books_value, gstr_value) <= *tolerance {
                Status::Matched
            } else {
                Status::ValueMismatch
            }
        }
    }
}

/// Invoice value of a normalized record for comparison.
///
/// Text that does not parse as a number is logged and compares as zero.
pub fn invoice_amount(side: Side, key: &str, record: &Record) -> Option<BigDecimal> {
    let cell = record.get(INVOICE_VALUE_COLUMN);
    let amount = cell.comparison_amount();
    if amount.is_none() {
        warn!(
            side = %side,
            key = %key,
            value = %cell,
            "invoice value is not a number, comparing as zero"
        );
    }
    amount
}
