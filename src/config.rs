//! Per-field tolerance configuration.
//!
//! Threshold entries keep their insertion order: the validator walks them
//! in sequence, and with last-failure-wins status semantics that order is
//! observable. The configuration is read-only for the duration of a run.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::schema as s;

/// A whole-run configuration problem, surfaced before any record is
/// processed.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("tolerance for '{field}' is negative ({value})")]
    NegativeTolerance { field: String, value: f64 },

    #[error("tolerance for '{field}' is not a finite number ({value})")]
    NonFiniteTolerance { field: String, value: f64 },

    #[error("no tolerance configured for '{field}'")]
    MissingTolerance { field: String },

    #[error("malformed tolerance configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Maximum allowed absolute difference for one derived field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToleranceEntry {
    pub field: String,
    pub max_abs_diff: f64,
}

/// Ordered mapping of derived-field name to tolerance threshold.
///
/// Derived fields without an entry are not validated at all; entries
/// naming a field the registry does not produce are ignored by the
/// validator. Defaults follow the field types: 1e-15 for the exchange
/// rate, 1e-10 for the monetary amounts.
///
/// Entry order is observable: with last-failure-wins status semantics,
/// the last failing entry names the record's reason. The default order
/// is registry evaluation order (markup components 1 through 5), chosen
/// so the default is explainable from the formula table; historical
/// configurations listed the markups 5 through 1, so only determinism,
/// not that legacy order, is guaranteed. Callers that need a specific
/// winner should order their own entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ToleranceConfig {
    entries: Vec<ToleranceEntry>,
}

impl Default for ToleranceConfig {
    fn default() -> Self {
        let mut config = Self { entries: Vec::new() };
        config.set(s::RC_REFERENCE_SELL_RATE, 1e-15);
        config.set(s::RC_DEPOSIT_AMOUNT_USD, 1e-10);
        config.set(s::RC_CLIENT_RECEIVE, 1e-10);
        config.set(s::RC_COGS, 1e-10);
        config.set(s::RC_REVENUE, 1e-10);
        config.set(s::RC_MARKUP_1_VALUE, 1e-10);
        config.set(s::RC_MARKUP_2_VALUE, 1e-10);
        config.set(s::RC_MARKUP_3_VALUE, 1e-10);
        config.set(s::RC_MARKUP_4_VALUE, 1e-10);
        config.set(s::RC_MARKUP_5_VALUE, 1e-10);
        config
    }
}

impl ToleranceConfig {
    /// An empty configuration: nothing is validated.
    pub fn empty() -> Self {
        Self { entries: Vec::new() }
    }

    /// Parses a JSON array of `{ "field": ..., "max_abs_diff": ... }`
    /// entries, preserving their order.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Replaces the threshold for `field`, or appends a new entry.
    pub fn set(&mut self, field: &str, max_abs_diff: f64) {
        match self.entries.iter_mut().find(|e| e.field == field) {
            Some(entry) => entry.max_abs_diff = max_abs_diff,
            None => self.entries.push(ToleranceEntry {
                field: field.to_string(),
                max_abs_diff,
            }),
        }
    }

    pub fn get(&self, field: &str) -> Option<f64> {
        self.entries.iter().find(|e| e.field == field).map(|e| e.max_abs_diff)
    }

    /// Entries in validation order.
    pub fn entries(&self) -> &[ToleranceEntry] {
        &self.entries
    }

    /// Rejects thresholds the comparison cannot meaningfully apply.
    /// Runs once per batch, before any record is touched.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for entry in &self.entries {
            if !entry.max_abs_diff.is_finite() {
                return Err(ConfigError::NonFiniteTolerance {
                    field: entry.field.clone(),
                    value: entry.max_abs_diff,
                });
            }
            if entry.max_abs_diff < 0.0 {
                return Err(ConfigError::NegativeTolerance {
                    field: entry.field.clone(),
                    value: entry.max_abs_diff,
                });
            }
        }
        Ok(())
    }

    /// Asserts that every field the collaborator expects validated has an
    /// entry.
    pub fn require_coverage<'a, I>(&self, fields: I) -> Result<(), ConfigError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        for field in fields {
            if self.get(field).is_none() {
                return Err(ConfigError::MissingTolerance { field: field.to_string() });
            }
        }
        Ok(())
    }
}
