use crate::config::GridConfig;
use crate::error::Result;
use gridcalc_engine::engine::Grid;

/// A recomputed display value pushed to the view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueChange {
    pub cell_id: String,
    pub display: String,
}

/// Receives display values as a propagation pass updates cells.
pub trait ValueSink {
    fn value_changed(&mut self, cell_id: &str, display: &str);
}

impl<F> ValueSink for F
where
    F: FnMut(&str, &str),
{
    fn value_changed(&mut self, cell_id: &str, display: &str) {
        self(cell_id, display)
    }
}

/// UI-agnostic document state for the grid.
///
/// Edits are applied one at a time and each runs its full propagation pass
/// before returning.
pub struct Document {
    /// The calculation grid. Mutated only through `commit_edit` so the
    /// dependency edges always match the stored formulas.
    pub(crate) grid: Grid,
    /// Observer notified of every value change
    pub(crate) sink: Option<Box<dyn ValueSink>>,
}

impl Document {
    /// Create a document with an empty grid of the configured size.
    pub fn new(config: &GridConfig) -> Result<Self> {
        config.validate()?;
        Ok(Document {
            grid: Grid::new(config.columns, config.rows),
            sink: None,
        })
    }

    /// Read-only view of the calculation grid.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Register the observer that receives value changes.
    pub fn set_sink(&mut self, sink: Box<dyn ValueSink>) {
        self.sink = Some(sink);
    }
}

impl Default for Document {
    fn default() -> Self {
        let config = GridConfig::default();
        Document {
            grid: Grid::new(config.columns, config.rows),
            sink: None,
        }
    }
}
