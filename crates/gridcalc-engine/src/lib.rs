//! gridcalc_engine - Grid calculation engine.

pub mod engine;
pub mod error;

pub use error::{EngineError, Result};
