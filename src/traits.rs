//! Traits for the I/O boundary of the reconciliation engine
//!
//! The engine never reads or writes files itself. Spreadsheet readers,
//! exporters and upload handlers plug in by implementing these traits.

use crate::types::*;

/// Supplier of a loaded table
///
/// Implementations must keep header text exactly as found in the source;
/// normalization is the engine's job.
pub trait TableSource {
    /// Name of the source, used in logs
    fn name(&self) -> &str;

    /// Load the full table
    fn load(&self) -> ReconResult<Table>;
}

/// Consumer of a flattened reconciliation result
pub trait TableSink {
    /// Write the header and all rows as a single sheet
    fn write(&mut self, header: &[String], rows: &[Vec<CellValue>]) -> ReconResult<()>;
}
