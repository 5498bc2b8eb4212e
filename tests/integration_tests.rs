//! Integration tests for gst-recon

use bigdecimal::BigDecimal;
use gst_recon::{
    reconcile, reconcile_with_config,
    utils::{MemorySink, MemorySource},
    CellValue, Provenance, ReconConfig, ReconError, ReconciliationEngine, Side, Status, Table,
    TableSource,
};
use std::str::FromStr;

fn dec(literal: &str) -> BigDecimal {
    BigDecimal::from_str(literal).unwrap()
}

fn books_with(rows: &[(&str, &str, &str)]) -> Table {
    let mut table = Table::new(
        "Purchase Register.xlsx",
        vec!["GSTIN", "Invoice No", "Invoice Value", "Supplier Name"],
    );
    for (gstin, invoice_no, value) in rows {
        table.push_row(vec![
            (*gstin).into(),
            (*invoice_no).into(),
            CellValue::decimal(value),
            "Supplier".into(),
        ]);
    }
    table
}

fn gstr_with(rows: &[(&str, &str, &str)]) -> Table {
    let mut table = Table::new(
        "GSTR-2B.xlsx",
        vec![" gstin", "Invoice No ", "INVOICE VALUE", "Place Of Supply"],
    );
    for (gstin, invoice_no, value) in rows {
        table.push_row(vec![
            (*gstin).into(),
            (*invoice_no).into(),
            CellValue::decimal(value),
            "Karnataka".into(),
        ]);
    }
    table
}

#[test]
fn test_case_insensitive_match_within_tolerance() {
    let books = books_with(&[("29ABCDE1234F1Z5", "INV-01", "1000")]);
    let gstr = gstr_with(&[("29abcde1234f1z5", "inv-01", "1000.3")]);

    let report = reconcile(&books, &gstr, &dec("0.5")).unwrap();

    assert_eq!(report.len(), 1);
    let row = &report.rows[0];
    assert_eq!(row.key, "29ABCDE1234F1Z5|INV-01");
    assert_eq!(row.provenance, Provenance::Both);
    assert_eq!(row.status, Status::Matched);
    assert_eq!(row.value_difference, Some(dec("0.3")));
}

#[test]
fn test_value_mismatch_beyond_tolerance() {
    let books = books_with(&[("29ABCDE1234F1Z5", "INV-01", "1000")]);
    let gstr = gstr_with(&[("29abcde1234f1z5", "inv-01", "1002")]);

    let report = reconcile(&books, &gstr, &dec("0.5")).unwrap();

    assert_eq!(report.len(), 1);
    assert_eq!(report.rows[0].provenance, Provenance::Both);
    assert_eq!(report.rows[0].status, Status::ValueMismatch);
}

#[test]
fn test_books_only_record_is_missing_in_gstr() {
    let books = books_with(&[("K1", "1", "10")]);
    let gstr = gstr_with(&[]);

    let report = reconcile(&books, &gstr, &dec("0.5")).unwrap();

    assert_eq!(report.len(), 1);
    assert_eq!(report.rows[0].provenance, Provenance::BooksOnly);
    assert_eq!(report.rows[0].status, Status::MissingInGstr);
    assert!(report.rows[0].gstr.is_none());
}

#[test]
fn test_duplicate_books_keys_are_each_classified() {
    let books = books_with(&[("K1", "1", "100"), ("K1", "1", "150")]);
    let gstr = gstr_with(&[("k1", "1", "100")]);

    let report = reconcile(&books, &gstr, &dec("0.5")).unwrap();

    assert_eq!(report.len(), 2);
    assert!(report.rows.iter().all(|r| r.provenance == Provenance::Both));

    let statuses: Vec<Status> = report.rows.iter().map(|r| r.status).collect();
    assert!(statuses.contains(&Status::Matched));
    assert!(statuses.contains(&Status::ValueMismatch));
}

#[test]
fn test_mixed_reconciliation_summary() {
    let books = books_with(&[
        ("29AAA", "INV-1", "1180"),
        ("29BBB", "INV-2", "590"),
        ("29CCC", "INV-3", "2360"),
    ]);
    let gstr = gstr_with(&[
        ("29aaa", "inv-1", "1180.00"),
        ("29bbb", "inv-2", "600"),
        ("29DDD", "INV-4", "118"),
    ]);

    let report = reconcile(&books, &gstr, &dec("0.5")).unwrap();
    let summary = report.summary();

    assert_eq!(summary.total, 4);
    assert_eq!(summary.matched(), 1);
    assert_eq!(summary.value_mismatches(), 1);
    assert_eq!(summary.missing_in_gstr(), 1);
    assert_eq!(summary.missing_in_books(), 1);
    assert!(report.check_completeness(books.len(), gstr.len()));
}

#[test]
fn test_empty_books_reports_everything_missing_in_books() {
    let books = books_with(&[]);
    let gstr = gstr_with(&[("A", "1", "1"), ("A", "1", "2"), ("B", "2", "3")]);

    let report = reconcile(&books, &gstr, &dec("0.5")).unwrap();

    assert_eq!(report.len(), 3);
    assert!(report
        .rows
        .iter()
        .all(|r| r.status == Status::MissingInBooks && r.provenance == Provenance::GstrOnly));
}

#[test]
fn test_both_empty_yields_empty_report() {
    let report = reconcile(&books_with(&[]), &gstr_with(&[]), &dec("0.5")).unwrap();
    assert!(report.is_empty());
    assert_eq!(report.summary().total, 0);
}

#[test]
fn test_missing_identifiers_still_match_each_other() {
    let mut books = Table::new("books", vec!["GSTIN", "Invoice No", "Invoice Value"]);
    books.push_row(vec![CellValue::Missing, "INV-9".into(), CellValue::decimal("50")]);
    let mut gstr = Table::new("gstr", vec!["GSTIN", "Invoice No", "Invoice Value"]);
    gstr.push_row(vec![CellValue::Missing, "inv-9".into(), CellValue::decimal("50")]);

    let report = reconcile(&books, &gstr, &dec("0")).unwrap();

    assert_eq!(report.len(), 1);
    assert_eq!(report.rows[0].key, "NAN|INV-9");
    assert_eq!(report.rows[0].status, Status::Matched);
}

#[test]
fn test_missing_value_compares_as_zero() {
    let mut books = Table::new("books", vec!["GSTIN", "Invoice No", "Invoice Value"]);
    books.push_row(vec!["A".into(), "1".into(), CellValue::Missing]);
    books.push_row(vec!["B".into(), "2".into(), CellValue::Missing]);
    let gstr = gstr_with(&[("A", "1", "0.25"), ("B", "2", "75")]);

    let report = reconcile(&books, &gstr, &dec("0.5")).unwrap();

    let status_of = |key: &str| {
        report
            .rows
            .iter()
            .find(|r| r.key == key)
            .map(|r| r.status)
            .unwrap()
    };
    assert_eq!(status_of("A|1"), Status::Matched);
    assert_eq!(status_of("B|2"), Status::ValueMismatch);
}

#[test]
fn test_schema_error_for_missing_key_column() {
    let books = Table::new("books", vec!["GSTIN", "Invoice Value"]);
    let gstr = gstr_with(&[]);

    match reconcile(&books, &gstr, &dec("0.5")) {
        Err(ReconError::Schema { side, column }) => {
            assert_eq!(side, Side::Books);
            assert_eq!(column, "invoice no");
        }
        other => panic!("expected schema error, got {:?}", other),
    }

    let books = books_with(&[]);
    let gstr = Table::new("gstr", vec!["Invoice No", "Invoice Value"]);
    assert!(matches!(
        reconcile(&books, &gstr, &dec("0.5")),
        Err(ReconError::Schema {
            side: Side::Gstr,
            ..
        })
    ));
}

#[test]
fn test_value_column_optional_when_configured() {
    let mut books = Table::new("books", vec!["GSTIN", "Invoice No"]);
    books.push_row(vec!["A".into(), "1".into()]);
    let gstr = gstr_with(&[("A", "1", "0.4"), ("A", "1", "9")]);

    assert!(matches!(
        reconcile(&books, &gstr, &dec("0.5")),
        Err(ReconError::Schema { .. })
    ));

    let config = ReconConfig::default().with_required_value_column(false);
    let report = reconcile_with_config(&books, &gstr, &config).unwrap();

    assert_eq!(report.len(), 2);
    assert_eq!(report.summary().matched(), 1);
    assert_eq!(report.summary().value_mismatches(), 1);
}

#[test]
fn test_negative_tolerance_is_rejected() {
    let result = reconcile(&books_with(&[]), &gstr_with(&[]), &dec("-0.5"));
    assert!(matches!(result, Err(ReconError::InvalidTolerance(_))));
}

#[test]
fn test_negative_tolerance_is_reported_before_schema_errors() {
    let books = Table::new("books", vec!["Invoice No"]);
    let result = reconcile(&books, &gstr_with(&[]), &dec("-1"));
    assert!(matches!(result, Err(ReconError::InvalidTolerance(_))));
}

#[test]
fn test_inputs_are_not_modified() {
    let books = books_with(&[("29AAA", "INV-1", "100")]);
    let gstr = gstr_with(&[("29aaa", "inv-1", "100")]);
    let (books_before, gstr_before) = (books.clone(), gstr.clone());

    reconcile(&books, &gstr, &dec("0.5")).unwrap();

    assert_eq!(books, books_before);
    assert_eq!(gstr, gstr_before);
}

#[test]
fn test_engine_sources_to_sink_workflow() {
    let engine = ReconciliationEngine::with_config(
        ReconConfig::default().with_tolerance(dec("1")),
    )
    .unwrap();

    let books = MemorySource::new(books_with(&[("29AAA", "INV-1", "100"), ("29BBB", "INV-2", "5")]));
    let gstr = MemorySource::new(gstr_with(&[("29AAA", "INV-1", "100.99")]));
    assert_eq!(books.name(), "Purchase Register.xlsx");

    let report = engine.run_sources(Some(&books), Some(&gstr)).unwrap();
    assert_eq!(report.tolerance, dec("1"));
    assert_eq!(report.summary().matched(), 1);
    assert_eq!(report.summary().missing_in_gstr(), 1);

    let mut sink = MemorySink::new();
    engine.export(&report, &mut sink).unwrap();

    assert_eq!(
        sink.header(),
        &[
            "key",
            "gstin_books",
            "invoice no_books",
            "invoice value_books",
            "supplier name",
            "gstin_gstr",
            "invoice no_gstr",
            "invoice value_gstr",
            "place of supply",
            "provenance",
            "Status",
        ]
    );
    assert_eq!(sink.cell(0, "Status"), Some(&CellValue::text("Matched")));
    assert_eq!(sink.cell(1, "provenance"), Some(&CellValue::text("books-only")));
    assert_eq!(sink.cell(1, "place of supply"), Some(&CellValue::Missing));
}

#[test]
fn test_export_keeps_user_key_column_apart_from_derived_key() {
    let books = Table::new("books", vec!["GSTIN", "Invoice No", "Invoice Value", "Key"])
        .with_row(vec!["29AAA".into(), "INV-1".into(), CellValue::decimal("100"), "ERP-77".into()]);
    let gstr = gstr_with(&[("29AAA", "INV-1", "100")]);

    let engine = ReconciliationEngine::new();
    let report = engine.run(Some(&books), Some(&gstr)).unwrap();
    let mut sink = MemorySink::new();
    engine.export(&report, &mut sink).unwrap();

    assert_eq!(sink.header().iter().filter(|h| h.as_str() == "key").count(), 1);
    assert_eq!(sink.cell(0, "key"), Some(&CellValue::text("29AAA|INV-1")));
    assert_eq!(sink.cell(0, "key_books"), Some(&CellValue::text("ERP-77")));
}

#[test]
fn test_engine_reports_missing_input() {
    let engine = ReconciliationEngine::new();
    let err = engine.run(Some(&books_with(&[])), None).unwrap_err();

    assert!(matches!(err, ReconError::InputMissing(Side::Gstr)));
    assert_eq!(err.to_string(), "Input missing: GSTR table was not supplied");
}

#[test]
fn test_report_serializes_status_labels() {
    let books = books_with(&[("29AAA", "INV-1", "100")]);
    let gstr = gstr_with(&[("29AAA", "INV-1", "120")]);

    let report = reconcile(&books, &gstr, &dec("0.5")).unwrap();
    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(json["rows"][0]["status"], "Mismatch (Value)");
    assert_eq!(json["rows"][0]["provenance"], "both");

    let summary = serde_json::to_value(report.summary()).unwrap();
    assert_eq!(summary["counts"]["Mismatch (Value)"], 1);
    assert_eq!(summary["counts"]["Matched"], 0);
    assert_eq!(summary["total"], 1);
}

#[test]
fn test_each_run_gets_its_own_id() {
    let books = books_with(&[("29AAA", "INV-1", "100")]);
    let gstr = gstr_with(&[]);

    let first = reconcile(&books, &gstr, &dec("0.5")).unwrap();
    let second = reconcile(&books, &gstr, &dec("0.5")).unwrap();

    assert_ne!(first.run_id, second.run_id);
    assert_eq!(first.rows, second.rows);
}
