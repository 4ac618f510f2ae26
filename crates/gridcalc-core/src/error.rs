//! Error types for gridcalc core.

use thiserror::Error;

use gridcalc_engine::EngineError;

/// Errors that can occur when driving a document
#[derive(Error, Debug, PartialEq)]
pub enum GridcalcError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("Invalid grid dimensions {columns}x{rows}")]
    InvalidDimensions { columns: usize, rows: usize },
}

pub type Result<T> = std::result::Result<T, GridcalcError>;
