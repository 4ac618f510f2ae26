//! Error types for the gridcalc engine.

use thiserror::Error;

/// Errors raised while resolving references or evaluating formulas.
///
/// The evaluator never lets these escape: they are converted into a
/// literal-echo value at the evaluation boundary. They surface to callers
/// only from the edit interface, when an edit targets a cell that does not
/// exist or cannot be edited.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("Invalid reference: {0}")]
    Reference(String),

    #[error("Evaluation error: {0}")]
    Evaluation(String),

    #[error("Circular reference involving {0}")]
    CircularReference(String),

    #[error("Cell {0} is a label and cannot be edited")]
    LabelCell(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;
