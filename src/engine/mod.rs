//! Per-record recalculation of derived fields.
pub mod error;
pub mod recalc;

pub use error::EngineError;
pub use recalc::RecalcEngine;
