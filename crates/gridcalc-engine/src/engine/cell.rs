//! Cell data structures for the calculation grid.
//!
//! This module provides the core data types for representing cells:
//! - [`CellKind`] - Whether a cell is a read-only label or an editable input
//! - [`CellValue`] - The computed or stored content of a cell
//! - [`Cell`] - A cell with raw input, optional formula, value and dependency edges

use std::collections::BTreeSet;

use super::cell_ref::CellRef;
use super::format::format_number;

/// Prefix that marks a formula that could not be evaluated.
pub const ECHO_MARKER: char = '\'';

/// Display text for cells caught in a circular reference.
pub const CIRCULAR_DISPLAY: &str = "#CIRC!";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellKind {
    Label,
    Input,
}

/// The content of a cell.
#[derive(Clone, Debug, PartialEq)]
pub enum CellValue {
    Empty,
    Number(f64),
    Text(String),
    /// A formula that failed to evaluate, kept so it can be shown as text.
    Echo(String),
    /// The cell is part of a dependency cycle.
    Circular,
}

impl CellValue {
    /// Parse a plain (non-formula) input.
    /// - Empty or whitespace -> Empty
    /// - Finite number -> Number
    /// - Otherwise -> Text (kept verbatim)
    pub fn from_input(input: &str) -> CellValue {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return CellValue::Empty;
        }
        match trimmed.parse::<f64>() {
            Ok(n) if n.is_finite() => CellValue::Number(n),
            _ => CellValue::Text(input.to_string()),
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Text shown to the user for this value.
    pub fn display(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Number(n) => format_number(*n),
            CellValue::Text(s) => s.clone(),
            CellValue::Echo(formula) => format!("{}{}", ECHO_MARKER, formula),
            CellValue::Circular => CIRCULAR_DISPLAY.to_string(),
        }
    }
}

/// A cell in the grid.
///
/// `dependencies` and `dependents` are kept mutually consistent by the
/// dependency graph operations: `a` is in `b.dependents` exactly when `b`
/// is in `a.dependencies`.
#[derive(Clone, Debug)]
pub struct Cell {
    pub id: String,
    pub kind: CellKind,
    pub raw_input: String,
    /// Normalized (upper-cased) formula, present when the raw input starts with `=`.
    pub formula: Option<String>,
    pub value: CellValue,
    /// Cells whose formulas reference this cell.
    pub dependents: BTreeSet<CellRef>,
    /// Cells this cell's formula currently references.
    pub dependencies: BTreeSet<CellRef>,
}

impl Cell {
    pub fn new_input(at: CellRef) -> Cell {
        Cell {
            id: at.to_string(),
            kind: CellKind::Input,
            raw_input: String::new(),
            formula: None,
            value: CellValue::Empty,
            dependents: BTreeSet::new(),
            dependencies: BTreeSet::new(),
        }
    }

    pub fn new_label(at: CellRef, text: &str) -> Cell {
        Cell {
            id: at.to_string(),
            kind: CellKind::Label,
            raw_input: text.to_string(),
            formula: None,
            value: if text.is_empty() {
                CellValue::Empty
            } else {
                CellValue::Text(text.to_string())
            },
            dependents: BTreeSet::new(),
            dependencies: BTreeSet::new(),
        }
    }

    pub fn is_label(&self) -> bool {
        self.kind == CellKind::Label
    }
}
