//! Cell reference parsing and formatting.
//!
//! Provides bidirectional conversion between spreadsheet-style cell ids
//! (e.g., "A1", "B12", "AA100") and grid coordinates. Column and row index
//! 0 are reserved for the label column and the header row, so the first
//! addressable input cell `A1` sits at `col == 1, row == 1`.
//!
//! # Examples
//!
//! ```ignore
//! let (column, row) = split_id("B12").unwrap();
//! assert_eq!(column, "B");
//! assert_eq!(row, 12);
//! assert_eq!(CellRef::col_to_letters(27), "AA");
//! ```

use std::fmt;

use crate::error::{EngineError, Result};

/// A reference to a cell by column and row indices.
///
/// Index 0 on either axis addresses a label cell.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, PartialOrd, Ord)]
pub struct CellRef {
    pub col: usize,
    pub row: usize,
}

impl CellRef {
    pub fn new(col: usize, row: usize) -> CellRef {
        CellRef { col, row }
    }

    /// Whether this coordinate falls on the header row or the label column.
    pub fn is_label(&self) -> bool {
        self.col == 0 || self.row == 0
    }

    /// Convert a 1-based column index to spreadsheet-style letters
    /// (1 -> A, 26 -> Z, 27 -> AA). Index 0 is the label column and maps to "0".
    pub fn col_to_letters(col: usize) -> String {
        if col == 0 {
            return "0".to_string();
        }
        let mut result = String::new();
        let mut n = col as u128;
        while n > 0 {
            n -= 1;
            result.insert(0, (b'A' + (n % 26) as u8) as char);
            n /= 26;
        }
        result
    }
}

/// Split a cell id at its first digit into the column prefix and the row number.
///
/// The row suffix must consist only of ASCII digits. The column prefix is
/// returned as written; callers decide whether it names a real column.
pub fn split_id(id: &str) -> Result<(&str, usize)> {
    let index = id
        .find(|c: char| c.is_ascii_digit())
        .ok_or_else(|| EngineError::Reference(id.to_string()))?;
    let (column, row) = id.split_at(index);
    if !row.bytes().all(|b| b.is_ascii_digit()) {
        return Err(EngineError::Reference(id.to_string()));
    }
    let row = row
        .parse::<usize>()
        .map_err(|_| EngineError::Reference(id.to_string()))?;
    Ok((column, row))
}

impl fmt::Display for CellRef {
    /// Label column cells are named by their row number alone ("0", "1", ...);
    /// every other cell is column letters followed by the row.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.col == 0 {
            write!(f, "{}", self.row)
        } else {
            write!(f, "{}{}", CellRef::col_to_letters(self.col), self.row)
        }
    }
}
