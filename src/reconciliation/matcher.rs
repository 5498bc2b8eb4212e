//! Key derivation and the full outer join of Books against GSTR

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::reconciliation::normalizer::NormalizedTable;
use crate::types::*;

/// Reconciliation key of a normalized record: `GSTIN|INVOICE NO`, both
/// parts upper-cased and trimmed.
///
/// Total over every record; missing identifiers become `NAN`.
pub fn derive_key(record: &Record) -> String {
    let gstin = key_part(record.get(GSTIN_COLUMN));
    let invoice_no = key_part(record.get(INVOICE_NO_COLUMN));

    let mut key = String::with_capacity(gstin.len() + invoice_no.len() + 1);
    key.push_str(&gstin);
    key.push(KEY_SEPARATOR);
    key.push_str(&invoice_no);
    key
}

fn key_part(value: &CellValue) -> String {
    value.key_text().to_uppercase().trim().to_string()
}

/// One output combination of the join
#[derive(Debug, Clone, PartialEq)]
pub struct JoinedPair<'a> {
    pub key: String,
    /// Position and record on the Books side
    pub books: Option<(usize, &'a Record)>,
    /// Position and record on the GSTR side
    pub gstr: Option<(usize, &'a Record)>,
}

impl JoinedPair<'_> {
    pub fn provenance(&self) -> Provenance {
        match (&self.books, &self.gstr) {
            (Some(_), Some(_)) => Provenance::Both,
            (Some(_), None) => Provenance::BooksOnly,
            (None, _) => Provenance::GstrOnly,
        }
    }
}

/// Full outer join on the derived key.
///
/// GSTR records are indexed by key, then Books is probed in order. A Books
/// record with no counterpart yields a books-only pair; one with counterparts
/// yields a pair per GSTR record sharing its key, so duplicate keys expand to
/// their cartesian product. GSTR records whose key was never probed follow as
/// gstr-only pairs in GSTR order.
pub fn outer_join<'a>(books: &'a NormalizedTable, gstr: &'a NormalizedTable) -> Vec<JoinedPair<'a>> {
    let gstr_keys: Vec<String> = gstr.records().iter().map(derive_key).collect();

    let mut index: HashMap<&str, Vec<usize>> = HashMap::new();
    for (position, key) in gstr_keys.iter().enumerate() {
        index.entry(key.as_str()).or_default().push(position);
    }

    debug!(
        books_rows = books.len(),
        gstr_rows = gstr.len(),
        gstr_keys = index.len(),
        "built GSTR key index"
    );

    let mut pairs = Vec::with_capacity(books.len().max(gstr.len()));
    let mut probed: HashSet<&str> = HashSet::new();

    for (books_position, books_record) in books.records().iter().enumerate() {
        let key = derive_key(books_record);
        match index.get_key_value(key.as_str()) {
            Some((&indexed_key, positions)) => {
                probed.insert(indexed_key);
                for &gstr_position in positions {
                    pairs.push(JoinedPair {
                        key: key.clone(),
                        books: Some((books_position, books_record)),
                        gstr: Some((gstr_position, &gstr.records()[gstr_position])),
                    });
                }
            }
            None => pairs.push(JoinedPair {
                key,
                books: Some((books_position, books_record)),
                gstr: None,
            }),
        }
    }

    for (gstr_position, key) in gstr_keys.iter().enumerate() {
        if !probed.contains(key.as_str()) {
            pairs.push(JoinedPair {
                key: key.clone(),
                books: None,
                gstr: Some((gstr_position, &gstr.records()[gstr_position])),
            });
        }
    }

    pairs
}
