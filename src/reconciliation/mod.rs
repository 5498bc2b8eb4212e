//! Reconciliation of the purchase register (Books) against GSTR statements
//!
//! Both tables are normalized, every record gets a `GSTIN|INVOICE NO` key,
//! the tables are outer-joined on that key and each joined row is classified
//! as matched, value-mismatched or missing on one side.

pub mod classify;
pub mod matcher;
pub mod normalizer;
pub mod report;

pub use classify::*;
pub use matcher::*;
pub use normalizer::*;
pub use report::*;

use bigdecimal::BigDecimal;
use tracing::{debug, info};

use crate::config::ReconConfig;
use crate::traits::*;
use crate::types::*;

/// Reconcile `books` against `gstr` with the given value tolerance.
///
/// Uses the default configuration otherwise. Never produces a partial result.
///
/// # Errors
///
/// - [`ReconError::Schema`] when either table lacks a required column after
///   normalization.
/// - [`ReconError::InvalidTolerance`] when `tolerance` is negative. This is
///   checked before either table is looked at.
pub fn reconcile(
    books: &Table,
    gstr: &Table,
    tolerance: &BigDecimal,
) -> ReconResult<ReconciliationReport> {
    let config = ReconConfig::default().with_tolerance(tolerance.clone());
    reconcile_with_config(books, gstr, &config)
}

/// Reconcile `books` against `gstr` under an explicit configuration.
///
/// Fails as [`reconcile`] does, and with [`ReconError::Config`] when the
/// export suffixes are empty or equal.
pub fn reconcile_with_config(
    books: &Table,
    gstr: &Table,
    config: &ReconConfig,
) -> ReconResult<ReconciliationReport> {
    config.validate()?;

    let books = normalize_table(Side::Books, books, config.require_value_column)?;
    let gstr = normalize_table(Side::Gstr, gstr, config.require_value_column)?;

    let rows: Vec<ReconciledRow> = outer_join(&books, &gstr)
        .into_iter()
        .map(|pair| build_row(pair, &config.tolerance))
        .collect();

    let report = ReconciliationReport::new(
        config.tolerance.clone(),
        books.columns().to_vec(),
        gstr.columns().to_vec(),
        rows,
    );

    let summary = report.summary();
    info!(
        run_id = %report.run_id,
        books = books.len(),
        gstr = gstr.len(),
        rows = summary.total,
        matched = summary.matched(),
        value_mismatches = summary.value_mismatches(),
        missing_in_gstr = summary.missing_in_gstr(),
        missing_in_books = summary.missing_in_books(),
        "reconciliation complete"
    );

    Ok(report)
}

fn build_row(pair: JoinedPair<'_>, tolerance: &BigDecimal) -> ReconciledRow {
    let provenance = pair.provenance();
    let books_value = pair
        .books
        .and_then(|(_, record)| invoice_amount(Side::Books, &pair.key, record));
    let gstr_value = pair
        .gstr
        .and_then(|(_, record)| invoice_amount(Side::Gstr, &pair.key, record));

    let status = classify(provenance, books_value.as_ref(), gstr_value.as_ref(), tolerance);
    let value_difference = match provenance {
        Provenance::Both => Some(classify::value_difference(
            books_value.as_ref(),
            gstr_value.as_ref(),
        )),
        _ => None,
    };

    ReconciledRow {
        key: pair.key,
        books: pair.books.map(|(_, record)| record.clone()),
        gstr: pair.gstr.map(|(_, record)| record.clone()),
        books_row: pair.books.map(|(position, _)| position),
        gstr_row: pair.gstr.map(|(position, _)| position),
        provenance,
        status,
        value_difference,
    }
}

/// Reconciliation engine bound to a configuration
#[derive(Debug, Clone, Default)]
pub struct ReconciliationEngine {
    config: ReconConfig,
}

impl ReconciliationEngine {
    /// Create an engine with the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine with a custom configuration
    pub fn with_config(config: ReconConfig) -> ReconResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ReconConfig {
        &self.config
    }

    /// Reconcile two tables, either of which may not have been supplied
    pub fn run(
        &self,
        books: Option<&Table>,
        gstr: Option<&Table>,
    ) -> ReconResult<ReconciliationReport> {
        let books = books.ok_or(ReconError::InputMissing(Side::Books))?;
        let gstr = gstr.ok_or(ReconError::InputMissing(Side::Gstr))?;
        reconcile_with_config(books, gstr, &self.config)
    }

    /// Load both tables from their sources, then reconcile them
    pub fn run_sources(
        &self,
        books: Option<&dyn TableSource>,
        gstr: Option<&dyn TableSource>,
    ) -> ReconResult<ReconciliationReport> {
        let books = books.ok_or(ReconError::InputMissing(Side::Books))?;
        let gstr = gstr.ok_or(ReconError::InputMissing(Side::Gstr))?;

        debug!(books = books.name(), gstr = gstr.name(), "loading tables");
        let books_table = books.load()?;
        let gstr_table = gstr.load()?;

        reconcile_with_config(&books_table, &gstr_table, &self.config)
    }

    /// Write a report to a sink as a single sheet
    pub fn export(
        &self,
        report: &ReconciliationReport,
        sink: &mut dyn TableSink,
    ) -> ReconResult<()> {
        let (header, rows) = report.flatten(&self.config);
        debug!(run_id = %report.run_id, rows = rows.len(), "exporting report");
        sink.write(&header, &rows)
    }
}
