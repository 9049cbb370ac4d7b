//! The ordered table of derived-field formulas.
pub mod registry;
pub mod topology;

pub use registry::{pair_for_derived, registry, FieldPair, FormulaDef};
