//! recon_core: recalculation-and-validation engine for cryptocurrency
//! deposit transactions.
//!
//! The engine recomputes a fixed, ordered set of derived fields for each
//! transaction record and reconciles each against its reported
//! counterpart under per-field tolerances. Everything around it (file
//! upload, column selection, display) is a collaborator that hands in a
//! [`Table`] plus a [`ToleranceConfig`] and takes back a [`RunReport`].
//! Transfer transactions have their own, simpler reconciliation in the
//! [`transfer`] module: one recomputed fee plus amount and currency
//! equality matching.
//!
//! ```
//! use recon_core::{schema, validate_table, Table, ToleranceConfig};
//!
//! let mut columns = vec![schema::TRANSACTION_ID.to_string()];
//! columns.extend(schema::NUMERIC_FIELDS.iter().map(|f| f.to_string()));
//! let mut table = Table::new(columns);
//!
//! // An internally consistent deposit: buy rate 100, 5% total markup,
//! // 1000 tokens at 2.5 USD each.
//! let cells = [
//!     "TX-1", "1000", "100", "5", "1000", "2.5", "23.80952380952381",
//!     "2500", "105", "2380.952380952381", "2500",
//!     "1", "1", "1", "1", "1",
//!     "23.80952380952381", "23.80952380952381", "23.80952380952381",
//!     "23.80952380952381", "23.80952380952381",
//! ];
//! table.push_row(cells.iter().map(|c| c.to_string()).collect());
//!
//! let report = validate_table(&table, &ToleranceConfig::default(), &[]).unwrap();
//! assert!(report.results[0].status.is_valid());
//! assert_eq!(report.invalid_count(), 0);
//! ```

pub mod config;
pub mod engine;
pub mod formula;
pub mod numeric;
pub mod record;
pub mod run;
pub mod schema;
pub mod table;
pub mod transfer;
pub mod validation;

pub use config::{ConfigError, ToleranceConfig, ToleranceEntry};
pub use engine::{EngineError, RecalcEngine};
pub use formula::{registry, FieldPair, FormulaDef};
pub use record::Record;
pub use run::{validate_table, RunReport};
pub use table::Table;
pub use transfer::{TransferCheck, TransferChecks, TransferOutcome, TransferReport, TransferResult};
pub use validation::{Discrepancy, FieldComparison, RecordStatus, ValidationResult};
