//! Grid configuration.

use serde::Deserialize;

use crate::error::{GridcalcError, Result};

/// Largest column count ("ZZZ").
pub const MAX_COLUMNS: usize = 18_278;
pub const MAX_ROWS: usize = 100_000;
/// Cells are allocated up front, so the product is capped as well.
pub const MAX_CELLS: usize = 1_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GridConfig {
    pub columns: usize,
    pub rows: usize,
}

impl Default for GridConfig {
    fn default() -> Self {
        GridConfig {
            columns: 10,
            rows: 10,
        }
    }
}

impl GridConfig {
    pub fn new(columns: usize, rows: usize) -> Self {
        GridConfig { columns, rows }
    }

    pub fn validate(&self) -> Result<()> {
        if (1..=MAX_COLUMNS).contains(&self.columns)
            && (1..=MAX_ROWS).contains(&self.rows)
            && self.columns.saturating_mul(self.rows) <= MAX_CELLS
        {
            Ok(())
        } else {
            Err(GridcalcError::InvalidDimensions {
                columns: self.columns,
                rows: self.rows,
            })
        }
    }
}
