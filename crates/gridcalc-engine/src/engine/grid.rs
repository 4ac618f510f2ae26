//! Fixed-size grid storage and reference resolution.
//!
//! Cells live in a dense, column-major vector indexed by [`CellRef`]. Column
//! headers are kept in a bidirectional map so that ranges compare columns by
//! position ("Z" before "AA"), never by string order.

use std::collections::HashMap;

use super::cell::{Cell, CellValue};
use super::cell_ref::{CellRef, split_id};
use crate::error::{EngineError, Result};

#[derive(Clone, Debug)]
pub struct Grid {
    columns: usize,
    rows: usize,
    cells: Vec<Cell>,
    headers: Vec<String>,
    header_index: HashMap<String, usize>,
}

impl Grid {
    /// Create a grid with `columns` input columns and `rows` input rows,
    /// plus the header row and the label column.
    pub fn new(columns: usize, rows: usize) -> Grid {
        let headers: Vec<String> = (0..=columns).map(CellRef::col_to_letters).collect();
        let header_index = headers
            .iter()
            .enumerate()
            .skip(1)
            .map(|(i, h)| (h.clone(), i))
            .collect();

        let mut cells = Vec::with_capacity((columns + 1) * (rows + 1));
        for col in 0..=columns {
            for row in 0..=rows {
                let at = CellRef::new(col, row);
                let cell = if col == 0 {
                    let text = if row == 0 { String::new() } else { row.to_string() };
                    Cell::new_label(at, &text)
                } else if row == 0 {
                    Cell::new_label(at, &headers[col])
                } else {
                    Cell::new_input(at)
                };
                cells.push(cell);
            }
        }

        Grid {
            columns,
            rows,
            cells,
            headers,
            header_index,
        }
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Column headers in grid order, starting with the label column ("0").
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Position of a column header in the grid's column ordering.
    pub fn column_index(&self, header: &str) -> Option<usize> {
        self.header_index.get(header).copied()
    }

    fn offset(&self, at: &CellRef) -> Option<usize> {
        if at.col <= self.columns && at.row <= self.rows {
            Some(at.col * (self.rows + 1) + at.row)
        } else {
            None
        }
    }

    pub fn get(&self, at: &CellRef) -> Option<&Cell> {
        let i = self.offset(at)?;
        Some(&self.cells[i])
    }

    pub fn get_mut(&mut self, at: &CellRef) -> Option<&mut Cell> {
        let i = self.offset(at)?;
        Some(&mut self.cells[i])
    }

    pub(crate) fn cell(&self, at: &CellRef) -> Result<&Cell> {
        self.get(at)
            .ok_or_else(|| EngineError::Reference(at.to_string()))
    }

    pub(crate) fn cell_mut(&mut self, at: &CellRef) -> Result<&mut Cell> {
        self.get_mut(at)
            .ok_or_else(|| EngineError::Reference(at.to_string()))
    }

    /// Current value of a cell, `Empty` for coordinates outside the grid.
    pub fn value(&self, at: &CellRef) -> &CellValue {
        static EMPTY: CellValue = CellValue::Empty;
        self.get(at).map(|c| &c.value).unwrap_or(&EMPTY)
    }

    /// Locate any cell by id, including header-row labels such as "A0".
    /// Ids are case-insensitive.
    pub fn locate(&self, id: &str) -> Result<CellRef> {
        let upper = id.trim().to_ascii_uppercase();
        let (column, row) = split_id(&upper)?;
        let col = self
            .column_index(column)
            .ok_or_else(|| EngineError::Reference(id.to_string()))?;
        if row > self.rows {
            return Err(EngineError::Reference(id.to_string()));
        }
        Ok(CellRef::new(col, row))
    }

    /// Resolve an id to an input cell. Label cells do not resolve.
    pub fn resolve_id(&self, id: &str) -> Result<CellRef> {
        let at = self.locate(id)?;
        if at.is_label() {
            return Err(EngineError::Reference(id.to_string()));
        }
        Ok(at)
    }

    /// Resolve the rectangle spanned by two corner ids.
    ///
    /// Rows are ordered numerically and columns by their position in the
    /// grid, so the result does not depend on argument order. Cells are
    /// returned column by column.
    pub fn resolve_range(&self, first: &str, second: &str) -> Result<Vec<CellRef>> {
        let a = self.resolve_id(first)?;
        let b = self.resolve_id(second)?;
        let (min_col, max_col) = (a.col.min(b.col), a.col.max(b.col));
        let (min_row, max_row) = (a.row.min(b.row), a.row.max(b.row));

        let mut cells = Vec::with_capacity((max_col - min_col + 1) * (max_row - min_row + 1));
        for col in min_col..=max_col {
            for row in min_row..=max_row {
                cells.push(CellRef::new(col, row));
            }
        }
        Ok(cells)
    }

    /// Iterate every cell in the grid, column by column.
    pub fn iter(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }
}
