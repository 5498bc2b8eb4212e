//! Utility modules

pub mod memory_table;
pub mod validation;

pub use memory_table::*;
pub use validation::*;
