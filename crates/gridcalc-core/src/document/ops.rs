use super::{Document, ValueChange};
use crate::error::Result;
use gridcalc_engine::engine::{CellRef, CellValue, normalize_formula, recalculate};

impl Document {
    /// Commit a completed edit.
    ///
    /// Text starting with `=` becomes the cell's formula; anything else is
    /// stored as a plain value and drops any previous formula. Every cell
    /// that transitively depends on the edited one is then refreshed. The
    /// returned changes start with the edited cell and list each other cell
    /// whose display value changed, in the order they were recomputed.
    pub fn commit_edit(&mut self, cell_id: &str, raw: &str) -> Result<Vec<ValueChange>> {
        let at = self.grid.locate(cell_id)?;
        let before = self.grid.value(&at).clone();

        match normalize_formula(raw) {
            Some(formula) => self.grid.set_formula(&at, &formula)?,
            None => {
                self.grid.clear_formula(&at)?;
                self.grid.set_value(&at, CellValue::from_input(raw))?;
            }
        }
        if let Some(cell) = self.grid.get_mut(&at) {
            cell.raw_input = raw.to_string();
        }

        let pass = recalculate(&mut self.grid, &at);
        log::debug!(
            "commit {} ({:?} -> {:?}), {} dependent(s) changed",
            at,
            before,
            self.grid.value(&at),
            pass.changed.len()
        );

        let mut changes = Vec::with_capacity(pass.changed.len() + 1);
        changes.push(self.change_for(&at));
        changes.extend(pass.changed.iter().map(|c| self.change_for(c)));

        if let Some(sink) = self.sink.as_mut() {
            for change in &changes {
                sink.value_changed(&change.cell_id, &change.display);
            }
        }
        Ok(changes)
    }

    fn change_for(&self, at: &CellRef) -> ValueChange {
        ValueChange {
            cell_id: at.to_string(),
            display: self.grid.value(at).display(),
        }
    }

    /// The stored formula of a cell, shown while the cell is being edited.
    /// Plain and label cells have none.
    pub fn focus_cell(&self, cell_id: &str) -> Result<Option<&str>> {
        let at = self.grid.locate(cell_id)?;
        Ok(self.grid.get(&at).and_then(|c| c.formula.as_deref()))
    }

    /// Current display text of any cell, labels included.
    pub fn display_value(&self, cell_id: &str) -> Result<String> {
        let at = self.grid.locate(cell_id)?;
        Ok(self.grid.value(&at).display())
    }

    /// The text last committed to a cell.
    pub fn raw_input(&self, cell_id: &str) -> Result<&str> {
        let at = self.grid.locate(cell_id)?;
        Ok(self.grid.get(&at).map(|c| c.raw_input.as_str()).unwrap_or(""))
    }

    /// Display text of the whole grid, row by row, including the header row
    /// and the label column.
    pub fn display_rows(&self) -> Vec<Vec<String>> {
        (0..=self.grid.rows())
            .map(|row| {
                (0..=self.grid.columns())
                    .map(|col| self.grid.value(&CellRef::new(col, row)).display())
                    .collect()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GridConfig;
    use crate::error::GridcalcError;
    use gridcalc_engine::EngineError;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn doc() -> Document {
        Document::new(&GridConfig::new(5, 10)).unwrap()
    }

    fn ids(changes: &[ValueChange]) -> Vec<&str> {
        changes.iter().map(|c| c.cell_id.as_str()).collect()
    }

    #[test]
    fn test_commit_plain_value() {
        let mut doc = doc();
        let changes = doc.commit_edit("A1", "42").unwrap();
        assert_eq!(
            changes,
            vec![ValueChange {
                cell_id: "A1".to_string(),
                display: "42".to_string()
            }]
        );
        assert_eq!(doc.focus_cell("A1").unwrap(), None);
        assert_eq!(doc.raw_input("A1").unwrap(), "42");
    }

    #[test]
    fn test_commit_formula_normalizes_and_focus_returns_it() {
        let mut doc = doc();
        doc.commit_edit("a1", "2").unwrap();
        let changes = doc.commit_edit("b1", "=a1*3").unwrap();
        assert_eq!(changes[0].display, "6");
        assert_eq!(doc.focus_cell("B1").unwrap(), Some("=A1*3"));
        assert_eq!(doc.raw_input("B1").unwrap(), "=a1*3");
    }

    #[test]
    fn test_transitive_propagation_in_one_pass() {
        let mut doc = doc();
        doc.commit_edit("A1", "1").unwrap();
        doc.commit_edit("B1", "=A1+1").unwrap();
        doc.commit_edit("C1", "=B1+1").unwrap();
        assert_eq!(doc.display_value("C1").unwrap(), "3");

        let changes = doc.commit_edit("A1", "10").unwrap();
        assert_eq!(ids(&changes), vec!["A1", "B1", "C1"]);
        assert_eq!(doc.display_value("B1").unwrap(), "11");
        assert_eq!(doc.display_value("C1").unwrap(), "12");
    }

    #[test]
    fn test_longer_id_precedence_through_commit() {
        let mut doc = doc();
        doc.commit_edit("A1", "1").unwrap();
        doc.commit_edit("A10", "1").unwrap();
        let changes = doc.commit_edit("B1", "=A1+A10").unwrap();
        assert_eq!(changes[0].display, "2");
    }

    #[test]
    fn test_plain_value_tears_down_formula() {
        let mut doc = doc();
        doc.commit_edit("B1", "=A1*2").unwrap();
        doc.commit_edit("B1", "7").unwrap();
        assert_eq!(doc.focus_cell("B1").unwrap(), None);

        let changes = doc.commit_edit("A1", "100").unwrap();
        assert_eq!(ids(&changes), vec!["A1"]);
        assert_eq!(doc.display_value("B1").unwrap(), "7");
    }

    #[test]
    fn test_recommitting_same_formula_keeps_dependents() {
        let mut doc = doc();
        doc.commit_edit("C1", "=A1+B1").unwrap();
        doc.commit_edit("C1", "=A1+B1").unwrap();
        let a1 = doc.grid().resolve_id("A1").unwrap();
        assert_eq!(doc.grid().get(&a1).unwrap().dependents.len(), 1);
    }

    #[test]
    fn test_garbage_formula_echoes() {
        let mut doc = doc();
        doc.commit_edit("A1", "1").unwrap();
        let changes = doc.commit_edit("B1", "=A1+xyz").unwrap();
        assert_eq!(changes[0].display, "'=A1+XYZ");
        // B1 is recomputed, but its echo is unchanged so it is not reported.
        let changes = doc.commit_edit("A1", "2").unwrap();
        assert_eq!(ids(&changes), vec!["A1"]);
        assert_eq!(doc.display_value("B1").unwrap(), "'=A1+XYZ");
    }

    #[test]
    fn test_echo_recovers_when_reference_becomes_numeric() {
        let mut doc = doc();
        doc.commit_edit("A1", "abc").unwrap();
        doc.commit_edit("B1", "=A1+1").unwrap();
        assert_eq!(doc.display_value("B1").unwrap(), "'=A1+1");
        let changes = doc.commit_edit("A1", "4").unwrap();
        assert_eq!(ids(&changes), vec!["A1", "B1"]);
        assert_eq!(doc.display_value("B1").unwrap(), "5");
    }

    #[test]
    fn test_sum_propagates() {
        let mut doc = doc();
        doc.commit_edit("A1", "1").unwrap();
        doc.commit_edit("A2", "2").unwrap();
        doc.commit_edit("B1", "=SUM(A2:A1)").unwrap();
        assert_eq!(doc.display_value("B1").unwrap(), "3");
        let changes = doc.commit_edit("A2", "5").unwrap();
        assert_eq!(ids(&changes), vec!["A2", "B1"]);
        assert_eq!(doc.display_value("B1").unwrap(), "6");
    }

    #[test]
    fn test_circular_reference_and_recovery() {
        let mut doc = doc();
        doc.commit_edit("A1", "=B1+1").unwrap();
        let changes = doc.commit_edit("B1", "=A1+1").unwrap();
        assert_eq!(changes[0].cell_id, "B1");
        assert_eq!(changes[0].display, "#CIRC!");
        assert_eq!(doc.display_value("A1").unwrap(), "#CIRC!");

        doc.commit_edit("B1", "3").unwrap();
        assert_eq!(doc.display_value("A1").unwrap(), "4");
    }

    #[test]
    fn test_cycle_display_does_not_depend_on_edit_order() {
        let mut doc = doc();
        doc.commit_edit("A1", "=C1").unwrap();
        doc.commit_edit("B1", "=A1").unwrap();
        doc.commit_edit("C1", "=B1+D1").unwrap();
        doc.commit_edit("D1", "=B1").unwrap();
        assert_eq!(doc.display_value("D1").unwrap(), "#CIRC!");

        doc.commit_edit("A1", "=C1").unwrap();
        for id in ["A1", "B1", "C1", "D1"] {
            assert_eq!(doc.display_value(id).unwrap(), "#CIRC!", "{}", id);
        }
    }

    #[test]
    fn test_diamond_reports_each_cell_once() {
        let mut doc = doc();
        doc.commit_edit("B1", "=A1+1").unwrap();
        doc.commit_edit("C1", "=A1*2").unwrap();
        doc.commit_edit("D1", "=B1+C1").unwrap();
        let changes = doc.commit_edit("A1", "1").unwrap();
        assert_eq!(changes.len(), 4);
        assert_eq!(changes.last().unwrap().cell_id, "D1");
        assert_eq!(doc.display_value("D1").unwrap(), "4");
    }

    #[test]
    fn test_sink_receives_changes() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink_seen = Rc::clone(&seen);
        let mut doc = doc();
        doc.set_sink(Box::new(move |id: &str, display: &str| {
            sink_seen.borrow_mut().push(format!("{}={}", id, display));
        }));
        doc.commit_edit("A1", "1").unwrap();
        doc.commit_edit("B1", "=A1+1").unwrap();
        doc.commit_edit("A1", "5").unwrap();
        assert_eq!(*seen.borrow(), vec!["A1=1", "B1=2", "A1=5", "B1=6"]);
    }

    #[test]
    fn test_invalid_targets() {
        let mut doc = doc();
        assert_eq!(
            doc.commit_edit("Z99", "1"),
            Err(GridcalcError::Engine(EngineError::Reference("Z99".to_string())))
        );
        assert_eq!(
            doc.commit_edit("a0", "1"),
            Err(GridcalcError::Engine(EngineError::LabelCell("A0".to_string())))
        );
        assert!(doc.commit_edit("", "1").is_err());
        assert_eq!(doc.focus_cell("A0").unwrap(), None);
        assert!(doc.focus_cell("nope").is_err());
    }

    #[test]
    fn test_display_rows_include_labels() {
        let mut doc = Document::new(&GridConfig::new(2, 2)).unwrap();
        doc.commit_edit("B2", "=1/4").unwrap();
        assert_eq!(
            doc.display_rows(),
            vec![
                vec!["", "A", "B"],
                vec!["1", "", ""],
                vec!["2", "", "0.25"],
            ]
        );
    }
}
