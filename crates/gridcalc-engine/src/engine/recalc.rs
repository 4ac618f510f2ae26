//! Recalculation after an edit.

use super::cell::CellValue;
use super::cycle::propagation_order;
use super::eval::evaluate;
use super::{CellRef, Grid};

/// Outcome of one propagation pass.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Recalculation {
    /// Cells other than the edited one whose value changed, in pass order.
    pub changed: Vec<CellRef>,
    /// Cells found on a cycle during the pass.
    pub circular: Vec<CellRef>,
}

/// Refresh every cell that transitively depends on `start`.
///
/// `start` must already hold its new value. Each reachable cell is
/// re-evaluated once, after all the cells it reads. Cells on a cycle are
/// set to [`CellValue::Circular`] instead of being evaluated; this includes
/// `start` itself when it is part of the cycle.
pub fn recalculate(grid: &mut Grid, start: &CellRef) -> Recalculation {
    let plan = propagation_order(grid, start);

    if plan.circular.contains(start)
        && let Some(cell) = grid.get_mut(start)
    {
        cell.value = CellValue::Circular;
    }

    let mut changed = Vec::new();
    for at in &plan.order {
        let value = if plan.circular.contains(at) {
            CellValue::Circular
        } else {
            evaluate(grid, at).value
        };
        if let Some(cell) = grid.get_mut(at)
            && cell.value != value
        {
            cell.value = value;
            changed.push(*at);
        }
    }

    log::debug!(
        "recalculated from {}: {} reachable, {} changed",
        start,
        plan.order.len(),
        changed.len()
    );

    Recalculation {
        changed,
        circular: plan.circular.into_iter().collect(),
    }
}
