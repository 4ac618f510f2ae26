//! Calculation engine API.
//!
//! This module provides the core computation engine for the grid:
//!
//! - [`Cell`], [`CellKind`], [`CellValue`] - Data structures for cell storage
//! - [`Grid`] - Fixed-size cell storage with id and range resolution
//! - [`CellRef`], [`split_id`] - Cell id parsing (A1 notation ↔ column/row indices)
//! - [`evaluate`], [`evaluate_formula`] - Formula evaluation with literal-echo fallback
//! - [`eval_arithmetic`] - Safe arithmetic over substituted expressions
//! - [`Grid::set_formula`], [`Grid::clear_formula`], [`Grid::add_edge`] - Dependency graph
//! - [`propagation_order`] - Propagation planning and circular reference detection
//! - [`recalculate`] - Refresh dependents after an edit
//! - [`format_number`] - Format values for display

mod cell;
mod cell_ref;
mod cycle;
mod deps;
mod eval;
mod expr;
mod format;
mod grid;
mod recalc;

pub use cell::{CIRCULAR_DISPLAY, Cell, CellKind, CellValue, ECHO_MARKER};
pub use cell_ref::{CellRef, split_id};
pub use cycle::{Propagation, propagation_order};
pub use eval::{
    Evaluation, FORMULA_MARKER, RANGE_KEYWORD, evaluate, evaluate_formula, normalize_formula,
};
pub use expr::eval_arithmetic;
pub use format::format_number;
pub use grid::Grid;
pub use recalc::{Recalculation, recalculate};
