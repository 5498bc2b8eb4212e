//! # GST Recon
//!
//! Reconciliation of a purchase register ("Books") against the GSTR-2A / 2B
//! statement issued by the tax authority.
//!
//! ## Features
//!
//! - **Normalization**: column headers are trimmed and lower-cased, required columns are checked up front
//! - **Key matching**: records match on `GSTIN|INVOICE NO`, case- and whitespace-insensitive
//! - **Full outer join**: every record of both tables appears in the result, duplicate keys expand
//! - **Tolerance-based comparison**: exact decimal invoice values compared within a configurable tolerance
//! - **Summaries and export layout**: per-status counts and a single-sheet flattening for exporters
//! - **I/O abstraction**: table sources and sinks are traits, the engine never touches files
//!
//! ## Quick Start
//!
//! ```rust
//! use gst_recon::{reconcile, CellValue, Status, Table};
//! use bigdecimal::BigDecimal;
//! use std::str::FromStr;
//!
//! let books = Table::new("books", vec!["GSTIN", "Invoice No", "Invoice Value"])
//!     .with_row(vec!["29ABCDE1234F1Z5".into(), "INV-01".into(), CellValue::decimal("1000")]);
//! let gstr = Table::new("gstr", vec!["gstin", "invoice no", "invoice value"])
//!     .with_row(vec!["29abcde1234f1z5".into(), "inv-01".into(), CellValue::decimal("1000.3")]);
//!
//! let report = reconcile(&books, &gstr, &BigDecimal::from_str("0.5").unwrap()).unwrap();
//! assert_eq!(report.rows[0].status, Status::Matched);
//! ```

pub mod config;
pub mod reconciliation;
pub mod traits;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use config::*;
pub use reconciliation::*;
pub use traits::*;
pub use types::*;
