//! Column-name normalization and schema validation

use tracing::{debug, warn};

use crate::types::*;
use crate::utils::validation::validate_required_columns;

/// A table whose column names are trimmed and lower-cased and whose
/// required columns are known to be present.
///
/// Only [`normalize_table`] can build one, so holding a `NormalizedTable`
/// is proof the schema check passed.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedTable {
    side: Side,
    name: String,
    columns: Vec<String>,
    records: Vec<Record>,
}

impl NormalizedTable {
    pub fn side(&self) -> Side {
        self.side
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Normalized column names in source order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Canonical form of a column header
pub fn normalize_column_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Columns that must exist after normalization
pub fn required_columns(require_value_column: bool) -> Vec<&'static str> {
    let mut required = vec![GSTIN_COLUMN, INVOICE_NO_COLUMN];
    if require_value_column {
        required.push(INVOICE_VALUE_COLUMN);
    }
    required
}

/// Normalize the column names of `table` and check the required columns.
///
/// Rows keep their order and values. When two headers collapse to the same
/// name the first one in header order wins, for the header and for every
/// record's value alike.
pub fn normalize_table(
    side: Side,
    table: &Table,
    require_value_column: bool,
) -> ReconResult<NormalizedTable> {
    let mut columns: Vec<String> = Vec::with_capacity(table.columns.len());
    for raw in &table.columns {
        let name = normalize_column_name(raw);
        if columns.contains(&name) {
            warn!(
                side = %side,
                table = %table.name,
                column = %raw,
                "dropping duplicate column after normalization"
            );
            continue;
        }
        columns.push(name);
    }

    validate_required_columns(side, &columns, &required_columns(require_value_column))?;

    let records: Vec<Record> = table
        .records
        .iter()
        .map(|record| normalize_record(record, &table.columns))
        .collect();

    debug!(
        side = %side,
        table = %table.name,
        rows = records.len(),
        columns = columns.len(),
        "normalized table"
    );

    Ok(NormalizedTable {
        side,
        name: table.name.clone(),
        columns,
        records,
    })
}

/// Rename the fields of `record`, resolving clashes in `header` order.
/// Fields the header does not list follow in the record's own order.
fn normalize_record<'a>(record: &'a Record, header: &'a [String]) -> Record {
    let listed = header
        .iter()
        .filter(|raw| record.contains(raw))
        .map(|raw| (raw.as_str(), record.get(raw)));
    let unlisted = record
        .iter()
        .filter(|(raw, _)| !header.iter().any(|h| h.as_str() == *raw));

    let mut normalized = Record::new();
    for (raw, value) in listed.chain(unlisted) {
        let name = normalize_column_name(raw);
        if !normalized.contains(&name) {
            normalized.insert(name, value.clone());
        }
    }
    normalized
}
