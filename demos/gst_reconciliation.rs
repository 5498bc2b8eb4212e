//! GST reconciliation walkthrough

use gst_recon::{
    utils::{MemorySink, MemorySource},
    CellValue, ReconConfig, ReconciliationEngine, Status, Table,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_target(false).init();

    println!("🧾 GST Recon - Purchase Register vs GSTR-2B\n");

    // 1. Tables as an upload handler would deliver them, headers untouched
    let books = Table::new(
        "Purchase Register.xlsx",
        vec!["GSTIN", "Invoice No", "Invoice Value", "Supplier"],
    )
    .with_row(vec![
        "29ABCDE1234F1Z5".into(),
        "INV-01".into(),
        CellValue::decimal("1000"),
        "Acme Traders".into(),
    ])
    .with_row(vec![
        "27PQRST6789K1Z2".into(),
        "PO/2024/117".into(),
        CellValue::decimal("25960"),
        "Western Supplies".into(),
    ])
    .with_row(vec![
        "33LMNOP4321Q1Z9".into(),
        "B-4410".into(),
        CellValue::decimal("4720"),
        "Chennai Metals".into(),
    ]);

    let gstr = Table::new(
        "GSTR-2B.xlsx",
        vec![" gstin ", "invoice no", "INVOICE VALUE", "Place of Supply"],
    )
    .with_row(vec![
        "29abcde1234f1z5".into(),
        "inv-01".into(),
        CellValue::decimal("1000.30"),
        "Karnataka".into(),
    ])
    .with_row(vec![
        "27PQRST6789K1Z2".into(),
        "po/2024/117".into(),
        CellValue::decimal("25690"),
        "Maharashtra".into(),
    ])
    .with_row(vec![
        "07AAACR5055K1Z1".into(),
        "DL-889".into(),
        CellValue::decimal("11800"),
        "Delhi".into(),
    ]);

    // 2. Tolerance from the environment, defaulting to half a rupee
    let config = ReconConfig::from_env()?;
    println!("⚖️  Tolerance: ₹{}\n", config.tolerance);
    let engine = ReconciliationEngine::with_config(config)?;

    // 3. Reconcile
    let report = engine.run_sources(
        Some(&MemorySource::new(books)),
        Some(&MemorySource::new(gstr)),
    )?;

    println!("📄 Reconciliation Results:");
    for row in &report.rows {
        let difference = row
            .value_difference
            .as_ref()
            .map(|d| format!(" (difference ₹{})", d))
            .unwrap_or_default();
        println!("  {:<32} {:<11} {}{}", row.key, row.provenance, row.status, difference);
    }
    println!();

    // 4. Summary
    println!("📊 Summary:");
    let summary = report.summary();
    for status in Status::ALL {
        println!("  {:<18} {}", status.to_string(), summary.count(status));
    }
    println!("  {:<18} {}", "Total", summary.total);
    println!();

    // 5. Export layout
    let mut sink = MemorySink::new();
    engine.export(&report, &mut sink)?;
    println!("⬇️  Export columns: {}", sink.header().join(", "));
    println!("   Rows written: {}", sink.rows().len());

    Ok(())
}
