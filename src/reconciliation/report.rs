//! Reconciliation output: annotated rows, status summary and export layout

use bigdecimal::BigDecimal;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use uuid::Uuid;

use crate::config::ReconConfig;
use crate::types::*;

/// Column holding the reconciliation key in the flattened export
pub const KEY_HEADER: &str = "key";
/// Column holding the provenance tag in the flattened export
pub const PROVENANCE_HEADER: &str = "provenance";
/// Column holding the status in the flattened export
pub const STATUS_HEADER: &str = "Status";

const RESERVED_HEADERS: [&str; 3] = [KEY_HEADER, PROVENANCE_HEADER, STATUS_HEADER];

/// Full result of one reconciliation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciliationReport {
    /// Unique identifier of this run
    pub run_id: Uuid,
    /// When the run finished
    pub generated_at: NaiveDateTime,
    /// Tolerance the rows were classified with
    pub tolerance: BigDecimal,
    /// Normalized Books columns
    pub books_columns: Vec<String>,
    /// Normalized GSTR columns
    pub gstr_columns: Vec<String>,
    /// Reconciled rows; callers must not rely on their order
    pub rows: Vec<ReconciledRow>,
}

impl ReconciliationReport {
    /// Wrap freshly classified rows in a new report
    pub fn new(
        tolerance: BigDecimal,
        books_columns: Vec<String>,
        gstr_columns: Vec<String>,
        rows: Vec<ReconciledRow>,
    ) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            generated_at: chrono::Utc::now().naive_utc(),
            tolerance,
            books_columns,
            gstr_columns,
            rows,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Count of rows per status
    pub fn summary(&self) -> StatusSummary {
        StatusSummary::from_rows(&self.rows)
    }

    /// Rows with the given status
    pub fn rows_with_status(&self, status: Status) -> impl Iterator<Item = &ReconciledRow> {
        self.rows.iter().filter(move |row| row.status == status)
    }

    /// Check that every input record shows up in at least one row.
    ///
    /// Each Books position in `0..books_len` must appear on some row, and no
    /// row may point past the end; likewise for GSTR.
    pub fn check_completeness(&self, books_len: usize, gstr_len: usize) -> bool {
        let books: BTreeSet<usize> = self.rows.iter().filter_map(|r| r.books_row).collect();
        let gstr: BTreeSet<usize> = self.rows.iter().filter_map(|r| r.gstr_row).collect();

        covers(&books, books_len) && covers(&gstr, gstr_len)
    }

    /// Lay the report out as a single sheet.
    ///
    /// Columns are the key, the Books columns, the GSTR columns, then
    /// provenance and status. A column present on both sides, or named like
    /// one of the key, provenance and status columns, gets the configured
    /// side suffix.
    pub fn flatten(&self, config: &ReconConfig) -> (Vec<String>, Vec<Vec<CellValue>>) {
        let mut header = Vec::with_capacity(self.books_columns.len() + self.gstr_columns.len() + 3);
        header.push(KEY_HEADER.to_string());
        header.extend(suffixed(&self.books_columns, &self.gstr_columns, &config.books_suffix));
        header.extend(suffixed(&self.gstr_columns, &self.books_columns, &config.gstr_suffix));
        header.push(PROVENANCE_HEADER.to_string());
        header.push(STATUS_HEADER.to_string());

        let rows = self
            .rows
            .iter()
            .map(|row| {
                let mut cells = Vec::with_capacity(header.len());
                cells.push(CellValue::text(row.key.clone()));
                cells.extend(side_cells(row.books.as_ref(), &self.books_columns));
                cells.extend(side_cells(row.gstr.as_ref(), &self.gstr_columns));
                cells.push(CellValue::text(row.provenance.as_str()));
                cells.push(CellValue::text(row.status.as_str()));
                cells
            })
            .collect();

        (header, rows)
    }
}

fn covers(positions: &BTreeSet<usize>, len: usize) -> bool {
    positions.len() == len && positions.iter().next_back().is_none_or(|last| *last < len)
}

fn suffixed<'a>(
    columns: &'a [String],
    other: &'a [String],
    suffix: &'a str,
) -> impl Iterator<Item = String> + 'a {
    columns.iter().map(move |column| {
        if other.contains(column) || is_reserved(column) {
            format!("{}{}", column, suffix)
        } else {
            column.clone()
        }
    })
}

fn is_reserved(column: &str) -> bool {
    RESERVED_HEADERS
        .iter()
        .any(|reserved| reserved.eq_ignore_ascii_case(column))
}

fn side_cells<'a>(
    record: Option<&'a Record>,
    columns: &'a [String],
) -> impl Iterator<Item = CellValue> + 'a {
    columns.iter().map(move |column| {
        record
            .map(|r| r.get(column).clone())
            .unwrap_or_default()
    })
}

/// Number of reconciled rows per status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusSummary {
    /// Every status, including those with no rows
    pub counts: BTreeMap<Status, usize>,
    /// Total number of rows
    pub total: usize,
}

impl StatusSummary {
    /// Aggregate statuses over a set of rows
    pub fn from_rows(rows: &[ReconciledRow]) -> Self {
        let mut counts: BTreeMap<Status, usize> =
            Status::ALL.iter().map(|status| (*status, 0)).collect();
        for row in rows {
            *counts.entry(row.status).or_insert(0) += 1;
        }

        Self {
            counts,
            total: rows.len(),
        }
    }

    pub fn count(&self, status: Status) -> usize {
        self.counts.get(&status).copied().unwrap_or(0)
    }

    pub fn matched(&self) -> usize {
        self.count(Status::Matched)
    }

    pub fn value_mismatches(&self) -> usize {
        self.count(Status::ValueMismatch)
    }

    pub fn missing_in_gstr(&self) -> usize {
        self.count(Status::MissingInGstr)
    }

    pub fn missing_in_books(&self) -> usize {
        self.count(Status::MissingInBooks)
    }

    /// True when every row matched
    pub fn is_fully_reconciled(&self) -> bool {
        self.matched() == self.total
    }
}

impl fmt::Display for StatusSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (status, count) in &self.counts {
            writeln!(f, "{}: {}", status, count)?;
        }
        write!(f, "Total: {}", self.total)
    }
}
