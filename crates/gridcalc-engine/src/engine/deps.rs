//! Dependency graph maintenance.
//!
//! Edges are stored on the cells themselves: a formula cell lists the cells
//! it reads in `dependencies`, and each of those lists the formula cell in
//! `dependents`. Edges are rebuilt every time a formula is assigned; the old
//! edges are always torn down first so redefinitions never leave stale
//! dependents behind.

use super::cell::CellValue;
use super::cell_ref::CellRef;
use super::eval::evaluate;
use super::grid::Grid;
use crate::error::{EngineError, Result};

impl Grid {
    fn input_cell(&self, at: &CellRef) -> Result<()> {
        let cell = self.cell(at)?;
        if cell.is_label() {
            return Err(EngineError::LabelCell(cell.id.clone()));
        }
        Ok(())
    }

    /// Record that `dependent` reads `dependency`. Registering an existing
    /// edge is a no-op.
    pub fn add_edge(&mut self, dependency: &CellRef, dependent: &CellRef) -> Result<()> {
        self.input_cell(dependency)?;
        self.input_cell(dependent)?;
        self.cell_mut(dependency)?.dependents.insert(*dependent);
        self.cell_mut(dependent)?.dependencies.insert(*dependency);
        Ok(())
    }

    /// Remove every edge from `at` to the cells its formula referenced.
    fn tear_down_edges(&mut self, at: &CellRef) -> Result<()> {
        let old = std::mem::take(&mut self.cell_mut(at)?.dependencies);
        for dependency in &old {
            if let Some(cell) = self.get_mut(dependency) {
                cell.dependents.remove(at);
            }
        }
        Ok(())
    }

    /// Assign a normalized formula to a cell, re-evaluate it and rebuild its
    /// dependency edges.
    pub fn set_formula(&mut self, at: &CellRef, formula: &str) -> Result<()> {
        self.input_cell(at)?;
        self.tear_down_edges(at)?;
        self.cell_mut(at)?.formula = Some(formula.to_string());

        let evaluation = evaluate(self, at);
        for dependency in &evaluation.dependencies {
            self.add_edge(dependency, at)?;
        }
        log::trace!(
            "{} = {} reads {} cell(s)",
            at,
            formula,
            evaluation.dependencies.len()
        );
        self.cell_mut(at)?.value = evaluation.value;
        Ok(())
    }

    /// Drop a cell's formula and its dependency edges. The value is left as is.
    pub fn clear_formula(&mut self, at: &CellRef) -> Result<()> {
        self.input_cell(at)?;
        self.tear_down_edges(at)?;
        self.cell_mut(at)?.formula = None;
        Ok(())
    }

    /// Write a value directly, leaving formula and edges untouched.
    pub fn set_value(&mut self, at: &CellRef, value: CellValue) -> Result<()> {
        self.input_cell(at)?;
        self.cell_mut(at)?.value = value;
        Ok(())
    }
}
