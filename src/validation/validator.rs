//! The per-record validator: positivity gate plus tolerance comparison.

use crate::config::ToleranceConfig;
use crate::engine::EngineError;
use crate::formula::pair_for_derived;
use crate::numeric::exceeds_tolerance;
use crate::record::Record;
use crate::schema;
use crate::validation::result::{Discrepancy, FieldComparison, RecordStatus, ValidationResult};

/// Applies the tolerance configuration to recalculated records.
///
/// Checks do not short-circuit: the positivity gate and every configured
/// field are always evaluated, and every failure appends a discrepancy.
/// The status reason is overwritten on each failure, so the last failing
/// check in configuration order names the record's reason. That overwrite
/// semantic is long-standing observed behavior; change it deliberately or
/// not at all.
pub struct Validator<'a> {
    config: &'a ToleranceConfig,
}

impl<'a> Validator<'a> {
    pub fn new(config: &'a ToleranceConfig) -> Self {
        Self { config }
    }

    /// Produces the validation result for one record whose derived fields
    /// are already populated. Field-resolution failures bubble up as
    /// per-record errors for the caller to fold into a failed result.
    pub fn validate(&self, record: &Record) -> Result<ValidationResult, EngineError> {
        let mut reason: Option<String> = None;

        // Positivity gate. Evaluated first, never short-circuits the
        // tolerance checks below.
        if record.require(schema::AMOUNT_DC)? <= 0.0 {
            reason = Some("amount must be positive".to_string());
        }

        let mut discrepancies = Vec::new();
        let mut values = Vec::new();

        for entry in self.config.entries() {
            // Entries naming a field the registry does not produce are
            // not validated.
            let Some(pair) = pair_for_derived(&entry.field) else { continue };
            let recomputed = record.require(pair.derived)?;
            let reported = record.require(pair.reported)?;

            if exceeds_tolerance(recomputed, reported, entry.max_abs_diff) {
                reason = Some(format!("discrepancy in {}", pair.reported));
                discrepancies.push(Discrepancy {
                    field: pair.reported.to_string(),
                    expected: recomputed,
                    actual: reported,
                });
            }

            values.push(FieldComparison {
                reported_field: pair.reported.to_string(),
                derived_field: pair.derived.to_string(),
                recomputed,
                reported,
            });
        }

        let status = match reason {
            None => RecordStatus::Valid,
            Some(reason) => RecordStatus::Invalid { reason },
        };

        Ok(ValidationResult {
            transaction_id: record.transaction_id().to_string(),
            status,
            discrepancies,
            values,
            passthrough: Default::default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::recalc::tests::consistent_record;
    use crate::engine::RecalcEngine;
    use crate::formula::registry;
    use crate::schema as s;
    use rstest::rstest;

    fn recalculated(id: &str) -> Record {
        let mut record = consistent_record(id);
        RecalcEngine::new(registry())
            .recalculate(&mut record)
            .expect("consistent fixture must recalculate");
        record
    }

    #[test]
    fn test_consistent_record_is_valid() {
        let record = recalculated("TX-1");
        let result = Validator::new(&ToleranceConfig::default()).validate(&record).unwrap();
        assert_eq!(result.status, RecordStatus::Valid);
        assert!(result.discrepancies.is_empty());
        // Every configured field still contributes a comparison row.
        assert_eq!(result.values.len(), 10);
    }

    #[test]
    fn test_sell_rate_discrepancy_is_itemized() {
        let mut record = recalculated("TX-2");
        record.set(s::REFERENCE_SELL_RATE, 105.5);
        let result = Validator::new(&ToleranceConfig::default()).validate(&record).unwrap();

        assert_eq!(
            result.status,
            RecordStatus::Invalid { reason: "discrepancy in Reference_Sell_Rate".to_string() }
        );
        assert_eq!(
            result.discrepancies,
            vec![Discrepancy {
                field: s::REFERENCE_SELL_RATE.to_string(),
                expected: 105.0,
                actual: 105.5,
            }]
        );
    }

    #[test]
    fn test_last_failing_check_names_the_reason() {
        // Sell rate comes before Revenue in the default configuration, so
        // with both off, Revenue wins the reason while both discrepancies
        // accumulate.
        let mut record = recalculated("TX-3");
        record.set(s::REFERENCE_SELL_RATE, 106.0);
        record.set(s::REVENUE, 9999.0);
        let result = Validator::new(&ToleranceConfig::default()).validate(&record).unwrap();

        let failing: Vec<&str> = result.discrepancies.iter().map(|d| d.field.as_str()).collect();
        assert_eq!(failing, vec![s::REFERENCE_SELL_RATE, s::REVENUE]);
        assert_eq!(
            result.status,
            RecordStatus::Invalid { reason: "discrepancy in Revenue".to_string() }
        );
    }

    #[test]
    fn test_non_positive_amount_is_invalid_even_when_all_checks_pass() {
        let mut record = recalculated("TX-4");
        record.set(s::AMOUNT_DC, 0.0);
        let result = Validator::new(&ToleranceConfig::default()).validate(&record).unwrap();
        assert_eq!(
            result.status,
            RecordStatus::Invalid { reason: "amount must be positive".to_string() }
        );
        assert!(result.discrepancies.is_empty());
    }

    #[test]
    fn test_positivity_gate_does_not_short_circuit_discrepancies() {
        let mut record = recalculated("TX-5");
        record.set(s::AMOUNT_DC, -10.0);
        record.set(s::REFERENCE_SELL_RATE, 200.0);
        let result = Validator::new(&ToleranceConfig::default()).validate(&record).unwrap();

        // The discrepancy is still collected, and its reason overwrites
        // the positivity reason.
        assert_eq!(result.discrepancies.len(), 1);
        assert_eq!(
            result.status,
            RecordStatus::Invalid { reason: "discrepancy in Reference_Sell_Rate".to_string() }
        );
    }

    #[test]
    fn test_exact_match_passes_at_zero_tolerance() {
        let record = recalculated("TX-6");
        let defaults = ToleranceConfig::default();
        let mut config = ToleranceConfig::default();
        for entry in defaults.entries() {
            config.set(&entry.field, 0.0);
        }
        let result = Validator::new(&config).validate(&record).unwrap();
        assert_eq!(result.status, RecordStatus::Valid);
    }

    #[rstest]
    #[case(1e-12, false)] // tighter than the 0.5 error: flagged
    #[case(0.4, false)]
    #[case(0.5, true)] // difference equal to the tolerance passes
    #[case(10.0, true)]
    fn test_raising_tolerance_only_removes_discrepancies(
        #[case] tolerance: f64,
        #[case] valid: bool,
    ) {
        let mut record = recalculated("TX-7");
        record.set(s::REFERENCE_SELL_RATE, 105.5);
        let mut config = ToleranceConfig::default();
        config.set(s::RC_REFERENCE_SELL_RATE, tolerance);
        let result = Validator::new(&config).validate(&record).unwrap();
        assert_eq!(result.status.is_valid(), valid);
    }

    #[test]
    fn test_unconfigured_fields_are_not_validated() {
        let mut record = recalculated("TX-8");
        record.set(s::REVENUE, 0.0); // wildly off, but unconfigured
        let mut config = ToleranceConfig::empty();
        config.set(s::RC_REFERENCE_SELL_RATE, 1e-15);
        let result = Validator::new(&config).validate(&record).unwrap();
        assert_eq!(result.status, RecordStatus::Valid);
        assert_eq!(result.values.len(), 1);
    }

    #[test]
    fn test_unknown_config_entry_is_skipped() {
        let record = recalculated("TX-9");
        let mut config = ToleranceConfig::default();
        config.set("RC_Not_A_Field", 0.0);
        let result = Validator::new(&config).validate(&record).unwrap();
        assert_eq!(result.status, RecordStatus::Valid);
        assert_eq!(result.values.len(), 10);
    }

    #[test]
    fn test_missing_reported_counterpart_is_a_resolution_failure() {
        let mut config = ToleranceConfig::empty();
        config.set(s::RC_REVENUE, 1e-10);
        // A record that never carried the reported Revenue column.
        let mut record = Record::from_pairs("TX-10", &[(s::AMOUNT_DC, 1.0)]);
        record.set(s::RC_REVENUE, 2500.0);

        let err = Validator::new(&config).validate(&record).unwrap_err();
        assert_eq!(
            err,
            EngineError::MissingField {
                field: s::REVENUE.to_string(),
                transaction_id: "TX-10".to_string(),
            }
        );
    }
}
