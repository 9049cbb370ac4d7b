//! Tolerance validation of recalculated records.
pub mod result;
pub mod validator;

pub use result::{Discrepancy, FieldComparison, RecordStatus, ValidationResult};
pub use validator::Validator;
