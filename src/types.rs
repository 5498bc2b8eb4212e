//! Core types and data structures for the reconciliation system

use bigdecimal::{BigDecimal, Zero};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Normalized name of the supplier GSTIN column
pub const GSTIN_COLUMN: &str = "gstin";
/// Normalized name of the invoice number column
pub const INVOICE_NO_COLUMN: &str = "invoice no";
/// Normalized name of the invoice value column
pub const INVOICE_VALUE_COLUMN: &str = "invoice value";
/// Separator placed between GSTIN and invoice number in a reconciliation key
pub const KEY_SEPARATOR: char = '|';

/// Which input table a record belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// The internal purchase register
    Books,
    /// The GSTR-2A / 2B statement issued by the tax authority
    Gstr,
}

impl Side {
    /// Human-readable label used in messages
    pub fn label(&self) -> &'static str {
        match self {
            Side::Books => "Books",
            Side::Gstr => "GSTR",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

/// A single cell as delivered by a table source
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum CellValue {
    /// Free text
    Text(String),
    /// Exact decimal number
    Number(BigDecimal),
    /// Empty cell or absent field
    #[default]
    Missing,
}

static MISSING: CellValue = CellValue::Missing;

impl CellValue {
    /// Create a text cell
    pub fn text(value: impl Into<String>) -> Self {
        CellValue::Text(value.into())
    }

    /// Create a numeric cell
    pub fn number(value: impl Into<BigDecimal>) -> Self {
        CellValue::Number(value.into())
    }

    /// Parse a decimal literal such as `"1000.30"` into a numeric cell.
    /// Falls back to a text cell when the literal is not a number.
    pub fn decimal(literal: &str) -> Self {
        match BigDecimal::from_str(literal.trim()) {
            Ok(value) => CellValue::Number(value),
            Err(_) => CellValue::Text(literal.to_string()),
        }
    }

    /// True for empty cells and absent fields
    pub fn is_missing(&self) -> bool {
        matches!(self, CellValue::Missing)
    }

    /// Text form of the value as it takes part in a reconciliation key.
    ///
    /// Missing values become `"NaN"` so that every record still yields a key.
    pub fn key_text(&self) -> String {
        match self {
            CellValue::Text(text) => text.clone(),
            CellValue::Number(number) => number.to_string(),
            CellValue::Missing => "NaN".to_string(),
        }
    }

    /// Amount used for value comparison.
    ///
    /// Missing and blank cells count as zero. Text is parsed after removing
    /// thousands separators; `None` means the text is not a number.
    pub fn comparison_amount(&self) -> Option<BigDecimal> {
        match self {
            CellValue::Number(number) => Some(number.clone()),
            CellValue::Missing => Some(BigDecimal::zero()),
            CellValue::Text(text) => {
                let cleaned: String = text.trim().chars().filter(|c| *c != ',').collect();
                if cleaned.is_empty() {
                    Some(BigDecimal::zero())
                } else {
                    BigDecimal::from_str(&cleaned).ok()
                }
            }
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(text) => f.write_str(text),
            CellValue::Number(number) => write!(f, "{}", number),
            CellValue::Missing => Ok(()),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<BigDecimal> for CellValue {
    fn from(value: BigDecimal) -> Self {
        CellValue::Number(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Number(BigDecimal::from(value))
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(CellValue::Missing, Into::into)
    }
}

/// One row of a table: an ordered mapping from column name to value
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Record {
    fields: IndexMap<String, CellValue>,
}

impl Record {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a record from `(column, value)` pairs, keeping their order
    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<CellValue>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self {
            fields: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Set a field, replacing any previous value under the same column
    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<CellValue>) {
        self.fields.insert(column.into(), value.into());
    }

    /// Value of a field; absent fields read as [`CellValue::Missing`]
    pub fn get(&self, column: &str) -> &CellValue {
        self.fields.get(column).unwrap_or(&MISSING)
    }

    /// True when the record has a field named `column`
    pub fn contains(&self, column: &str) -> bool {
        self.fields.contains_key(column)
    }

    /// Field names in insertion order
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// `(column, value)` pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CellValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// A loaded table with its header exactly as found in the source
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Table {
    /// Name of the source (file name, sheet name, etc.)
    pub name: String,
    /// Column headers in source order
    pub columns: Vec<String>,
    /// Data rows
    pub records: Vec<Record>,
}

impl Table {
    /// Create an empty table with the given header
    pub fn new<S: Into<String>>(name: impl Into<String>, columns: Vec<S>) -> Self {
        Self {
            name: name.into(),
            columns: columns.into_iter().map(Into::into).collect(),
            records: Vec::new(),
        }
    }

    /// Append a row given positionally against the header.
    /// Short rows are padded with missing values; cells beyond the header are dropped.
    pub fn push_row(&mut self, row: Vec<CellValue>) {
        let mut cells = row.into_iter();
        let record = Record {
            fields: self
                .columns
                .iter()
                .map(|column| (column.clone(), cells.next().unwrap_or_default()))
                .collect(),
        };
        self.records.push(record);
    }

    /// Builder form of [`Table::push_row`]
    pub fn with_row(mut self, row: Vec<CellValue>) -> Self {
        self.push_row(row);
        self
    }

    /// Append a record, extending the header with any column it introduces
    pub fn push_record(&mut self, record: Record) {
        for column in record.columns() {
            if !self.columns.iter().any(|c| c == column) {
                self.columns.push(column.to_string());
            }
        }
        self.records.push(record);
    }

    /// Number of data rows
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Which side(s) of the join produced a reconciled row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Provenance {
    /// Key found in both Books and GSTR
    #[serde(rename = "both")]
    Both,
    /// Key found only in Books
    #[serde(rename = "books-only")]
    BooksOnly,
    /// Key found only in GSTR
    #[serde(rename = "gstr-only")]
    GstrOnly,
}

impl Provenance {
    /// Label used in reports and exports
    pub fn as_str(&self) -> &'static str {
        match self {
            Provenance::Both => "both",
            Provenance::BooksOnly => "books-only",
            Provenance::GstrOnly => "gstr-only",
        }
    }
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Reconciliation outcome of a single row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Status {
    /// Present on both sides and values agree within tolerance
    #[serde(rename = "Matched")]
    Matched,
    /// Present on both sides but values differ by more than the tolerance
    #[serde(rename = "Mismatch (Value)")]
    ValueMismatch,
    /// Recorded in books but absent from the GSTR statement
    #[serde(rename = "Missing in GSTR")]
    MissingInGstr,
    /// Reported in the GSTR statement but absent from books
    #[serde(rename = "Missing in Books")]
    MissingInBooks,
}

impl Status {
    /// Every status, in report order
    pub const ALL: [Status; 4] = [
        Status::Matched,
        Status::ValueMismatch,
        Status::MissingInGstr,
        Status::MissingInBooks,
    ];

    /// Label used in reports and exports
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Matched => "Matched",
            Status::ValueMismatch => "Mismatch (Value)",
            Status::MissingInGstr => "Missing in GSTR",
            Status::MissingInBooks => "Missing in Books",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// One row of the reconciliation output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciledRow {
    /// Normalized `GSTIN|INVOICE NO` key shared by both sides
    pub key: String,
    /// Books record, absent for GSTR-only rows
    pub books: Option<Record>,
    /// GSTR record, absent for Books-only rows
    pub gstr: Option<Record>,
    /// Zero-based position of the Books record in its input table
    pub books_row: Option<usize>,
    /// Zero-based position of the GSTR record in its input table
    pub gstr_row: Option<usize>,
    /// Which side(s) contributed to this row
    pub provenance: Provenance,
    /// Computed reconciliation status
    pub status: Status,
    /// Absolute invoice value difference, only for rows present on both sides
    pub value_difference: Option<BigDecimal>,
}

/// Errors that can occur during reconciliation
#[derive(Debug, thiserror::Error)]
pub enum ReconError {
    /// A required column is absent after normalization
    #[error("Schema error: {side} table is missing required column '{column}'")]
    Schema { side: Side, column: String },
    /// One of the two tables was never supplied
    #[error("Input missing: {0} table was not supplied")]
    InputMissing(Side),
    /// Tolerance is negative
    #[error("Invalid tolerance: {0}")]
    InvalidTolerance(String),
    /// Configuration could not be parsed or is inconsistent
    #[error("Configuration error: {0}")]
    Config(String),
    /// A table source failed to load
    #[error("Source error: {0}")]
    Source(String),
    /// A table sink rejected or failed to write the output
    #[error("Sink error: {0}")]
    Sink(String),
}

/// Result type for reconciliation operations
pub type ReconResult<T> = Result<T, ReconError>;
