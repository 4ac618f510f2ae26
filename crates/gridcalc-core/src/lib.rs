//! gridcalc-core - UI-agnostic document model.

pub mod config;
pub mod document;
pub mod error;

pub use config::GridConfig;
pub use document::{Document, ValueChange, ValueSink};
pub use error::{GridcalcError, Result};

pub use gridcalc_engine::engine::CellRef;
