//! In-memory table source and sink for testing and embedding

use crate::traits::*;
use crate::types::*;

/// Table source backed by an already loaded table
#[derive(Debug, Clone)]
pub struct MemorySource {
    table: Table,
}

impl MemorySource {
    /// Create a source that hands out a copy of `table` on every load
    pub fn new(table: Table) -> Self {
        Self { table }
    }
}

impl TableSource for MemorySource {
    fn name(&self) -> &str {
        &self.table.name
    }

    fn load(&self) -> ReconResult<Table> {
        Ok(self.table.clone())
    }
}

/// Table sink that keeps the last written sheet in memory
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    header: Vec<String>,
    rows: Vec<Vec<CellValue>>,
    writes: usize,
}

impl MemorySink {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    /// Number of times the sink has been written
    pub fn writes(&self) -> usize {
        self.writes
    }

    /// Value of `column` in row `row`, if both exist
    pub fn cell(&self, row: usize, column: &str) -> Option<&CellValue> {
        let index = self.header.iter().position(|h| h == column)?;
        self.rows.get(row).and_then(|r| r.get(index))
    }

    /// Forget everything written so far, including the write count
    pub fn clear(&mut self) {
        self.header.clear();
        self.rows.clear();
        self.writes = 0;
    }
}

impl TableSink for MemorySink {
    fn write(&mut self, header: &[String], rows: &[Vec<CellValue>]) -> ReconResult<()> {
        if let Some(bad) = rows.iter().position(|r| r.len() != header.len()) {
            return Err(ReconError::Sink(format!(
                "row {} has {} cells but the header has {} columns",
                bad,
                rows[bad].len(),
                header.len()
            )));
        }

        self.header = header.to_vec();
        self.rows = rows.to_vec();
        self.writes += 1;
        Ok(())
    }
}
