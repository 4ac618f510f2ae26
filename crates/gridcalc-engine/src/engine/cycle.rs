//! Propagation ordering and circular reference detection.
//!
//! Collects the strongly connected groups of the `dependents` graph
//! reachable from an edited cell (Tarjan, driven by an explicit stack so
//! deep chains cannot exhaust the call stack). Every group of two or more
//! cells, and every cell that reads itself, is a cycle. Groups come out in
//! reverse dependency order, so reversing them gives the evaluation order.

use std::collections::{BTreeSet, HashMap, HashSet};

use super::{CellRef, Grid};

/// Cells to refresh after an edit.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Propagation {
    /// Reachable cells in dependency order, excluding the edited cell.
    pub order: Vec<CellRef>,
    /// Cells found on a cycle. May include the edited cell.
    pub circular: BTreeSet<CellRef>,
}

struct Frame {
    cell: CellRef,
    children: Vec<CellRef>,
    next: usize,
}

fn frame(grid: &Grid, cell: CellRef) -> Frame {
    let children = grid
        .get(&cell)
        .map(|c| c.dependents.iter().copied().collect())
        .unwrap_or_default();
    Frame {
        cell,
        children,
        next: 0,
    }
}

fn reads_itself(grid: &Grid, cell: &CellRef) -> bool {
    grid.get(cell).is_some_and(|c| c.dependents.contains(cell))
}

#[derive(Default)]
struct Tarjan {
    index: HashMap<CellRef, usize>,
    low: HashMap<CellRef, usize>,
    on_stack: HashSet<CellRef>,
    pending: Vec<CellRef>,
    groups: Vec<Vec<CellRef>>,
}

impl Tarjan {
    fn visit(&mut self, cell: CellRef) {
        let n = self.index.len();
        self.index.insert(cell, n);
        self.low.insert(cell, n);
        self.on_stack.insert(cell);
        self.pending.push(cell);
    }

    fn lower(&mut self, cell: CellRef, to: usize) {
        if let Some(low) = self.low.get_mut(&cell)
            && to < *low
        {
            *low = to;
        }
    }

    fn finish(&mut self, cell: CellRef) {
        if self.low.get(&cell) != self.index.get(&cell) {
            return;
        }
        let mut group = Vec::new();
        while let Some(member) = self.pending.pop() {
            self.on_stack.remove(&member);
            group.push(member);
            if member == cell {
                break;
            }
        }
        self.groups.push(group);
    }
}

/// Plan a propagation pass starting at `start`.
pub fn propagation_order(grid: &Grid, start: &CellRef) -> Propagation {
    let mut tarjan = Tarjan::default();
    let mut stack = vec![frame(grid, *start)];
    tarjan.visit(*start);

    while let Some(top) = stack.last_mut() {
        let Some(child) = top.children.get(top.next).copied() else {
            let done = top.cell;
            stack.pop();
            tarjan.finish(done);
            if let Some(parent) = stack.last()
                && let Some(&low) = tarjan.low.get(&done)
            {
                tarjan.lower(parent.cell, low);
            }
            continue;
        };
        top.next += 1;
        let parent = top.cell;

        match tarjan.index.get(&child).copied() {
            None => {
                tarjan.visit(child);
                stack.push(frame(grid, child));
            }
            Some(seen) if tarjan.on_stack.contains(&child) => tarjan.lower(parent, seen),
            Some(_) => {}
        }
    }

    let mut circular = BTreeSet::new();
    for group in &tarjan.groups {
        if group.len() > 1 || reads_itself(grid, &group[0]) {
            circular.extend(group.iter().copied());
        }
    }

    if !circular.is_empty() {
        log::warn!(
            "circular reference: {}",
            circular
                .iter()
                .map(|c| c.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        );
    }

    let order = tarjan
        .groups
        .into_iter()
        .rev()
        .flatten()
        .filter(|c| c != start)
        .collect();
    Propagation { order, circular }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(grid: &Grid, id: &str) -> CellRef {
        grid.resolve_id(id).unwrap()
    }

    #[test]
    fn test_chain_is_ordered() {
        let mut grid = Grid::new(4, 2);
        grid.set_formula(&at(&grid, "B1"), "=A1+1").unwrap();
        grid.set_formula(&at(&grid, "C1"), "=B1+1").unwrap();
        grid.set_formula(&at(&grid, "D1"), "=C1+1").unwrap();

        let plan = propagation_order(&grid, &at(&grid, "A1"));
        assert_eq!(plan.order, vec![at(&grid, "B1"), at(&grid, "C1"), at(&grid, "D1")]);
        assert!(plan.circular.is_empty());
    }

    #[test]
    fn test_diamond_visits_each_cell_once() {
        let mut grid = Grid::new(4, 2);
        grid.set_formula(&at(&grid, "B1"), "=A1").unwrap();
        grid.set_formula(&at(&grid, "C1"), "=A1").unwrap();
        grid.set_formula(&at(&grid, "D1"), "=B1+C1").unwrap();

        let plan = propagation_order(&grid, &at(&grid, "A1"));
        assert_eq!(plan.order.len(), 3);
        assert_eq!(plan.order.last(), Some(&at(&grid, "D1")));
        assert!(plan.circular.is_empty());
    }

    #[test]
    fn test_cycle_is_detected() {
        let mut grid = Grid::new(3, 2);
        grid.set_formula(&at(&grid, "A1"), "=B1").unwrap();
        grid.set_formula(&at(&grid, "B1"), "=A1").unwrap();
        grid.set_formula(&at(&grid, "C1"), "=B1").unwrap();

        let plan = propagation_order(&grid, &at(&grid, "B1"));
        assert!(plan.circular.contains(&at(&grid, "A1")));
        assert!(plan.circular.contains(&at(&grid, "B1")));
        assert!(!plan.circular.contains(&at(&grid, "C1")));
    }

    #[test]
    fn test_whole_cycle_group_is_circular_from_any_member() {
        let mut grid = Grid::new(4, 1);
        grid.set_formula(&at(&grid, "A1"), "=C1").unwrap();
        grid.set_formula(&at(&grid, "B1"), "=A1").unwrap();
        grid.set_formula(&at(&grid, "C1"), "=B1+D1").unwrap();
        grid.set_formula(&at(&grid, "D1"), "=B1").unwrap();

        let all: BTreeSet<CellRef> = ["A1", "B1", "C1", "D1"]
            .iter()
            .map(|id| at(&grid, id))
            .collect();
        for id in ["A1", "B1", "C1", "D1"] {
            let plan = propagation_order(&grid, &at(&grid, id));
            assert_eq!(plan.circular, all, "edited {}", id);
        }
    }

    #[test]
    fn test_cells_after_a_cycle_are_ordered_after_it() {
        let mut grid = Grid::new(3, 1);
        grid.set_formula(&at(&grid, "A1"), "=B1").unwrap();
        grid.set_formula(&at(&grid, "B1"), "=A1").unwrap();
        grid.set_formula(&at(&grid, "C1"), "=A1+B1").unwrap();

        let plan = propagation_order(&grid, &at(&grid, "A1"));
        assert_eq!(plan.order, vec![at(&grid, "B1"), at(&grid, "C1")]);
        assert!(!plan.circular.contains(&at(&grid, "C1")));
    }

    #[test]
    fn test_self_reference() {
        let mut grid = Grid::new(1, 1);
        grid.set_formula(&at(&grid, "A1"), "=A1+1").unwrap();
        let plan = propagation_order(&grid, &at(&grid, "A1"));
        assert!(plan.order.is_empty());
        assert_eq!(plan.circular.len(), 1);
    }

    #[test]
    fn test_deep_chain_does_not_overflow() {
        let rows = 20_000;
        let mut grid = Grid::new(1, rows);
        for row in 2..=rows {
            let formula = format!("=A{}+1", row - 1);
            grid.set_formula(&CellRef::new(1, row), &formula).unwrap();
        }
        let plan = propagation_order(&grid, &CellRef::new(1, 1));
        assert_eq!(plan.order.len(), rows - 1);
        assert_eq!(plan.order[0], CellRef::new(1, 2));
    }
}
