//! A synchronous recalculation engine, one record at a time.

use smallvec::SmallVec;

use crate::engine::error::EngineError;
use crate::formula::FormulaDef;
use crate::numeric::ArithmeticError;
use crate::record::Record;

/// Evaluates the formula registry against single records.
///
/// The registry order is a verified topological order over the declared
/// inputs, so by the time a formula runs, every derived field it reads is
/// already on the record. All failures name the field or formula and the
/// transaction, and are per-record; the caller decides what happens to
/// the rest of the batch (nothing).
pub struct RecalcEngine<'a> {
    registry: &'a [FormulaDef],
}

impl<'a> RecalcEngine<'a> {
    pub fn new(registry: &'a [FormulaDef]) -> Self {
        Self { registry }
    }

    /// Recomputes every registered derived field, enriching the record in
    /// place. On error the record is left partially enriched; the caller
    /// discards it into a failed result.
    pub fn recalculate(&self, record: &mut Record) -> Result<(), EngineError> {
        for def in self.registry {
            let mut args: SmallVec<[f64; 4]> = SmallVec::with_capacity(def.inputs.len());
            for &input in def.inputs {
                args.push(record.require(input)?);
            }

            let value = (def.eval)(&args).map_err(|err| match err {
                ArithmeticError::DivisionByZero => EngineError::DivisionByZero {
                    formula: def.fields.derived.to_string(),
                    transaction_id: record.transaction_id().to_string(),
                },
            })?;

            if !value.is_finite() {
                return Err(EngineError::NonFinite {
                    formula: def.fields.derived.to_string(),
                    transaction_id: record.transaction_id().to_string(),
                });
            }

            record.insert_derived(def.fields.derived, value);
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::formula::registry;
    use crate::schema as s;

    /// A record whose reported values are internally consistent with the
    /// registry formulas, so every derived field matches exactly.
    pub(crate) fn consistent_record(id: &str) -> Record {
        let buy_rate = 100.0;
        let total_markup = 5.0;
        let sell_rate = buy_rate * (100.0 + total_markup) / 100.0; // 105
        let deposit_oc = 1000.0;
        let token_rate = 2.5;
        let deposit_usd = deposit_oc * token_rate; // 2500
        let client_receive = deposit_usd / sell_rate;
        let cogs = client_receive * buy_rate;
        let revenue = client_receive * sell_rate;

        let mut pairs = vec![
            (s::AMOUNT_DC, 1000.0),
            (s::REFERENCE_BUY_RATE, buy_rate),
            (s::TOTAL_MARKUP, total_markup),
            (s::REFERENCE_SELL_RATE, sell_rate),
            (s::DEPOSIT_AMOUNT_OC, deposit_oc),
            (s::BUY_TOKEN_USD_RATE, token_rate),
            (s::DEPOSIT_AMOUNT_USD, deposit_usd),
            (s::CLIENT_RECEIVE, client_receive),
            (s::COGS, cogs),
            (s::REVENUE, revenue),
        ];
        let rates = [
            (s::MARKUP_RATE_1, s::MARKUP_1_VALUE),
            (s::MARKUP_RATE_2, s::MARKUP_2_VALUE),
            (s::MARKUP_RATE_3, s::MARKUP_3_VALUE),
            (s::MARKUP_RATE_4, s::MARKUP_4_VALUE),
            (s::MARKUP_RATE_5, s::MARKUP_5_VALUE),
        ];
        for (rate_field, value_field) in rates {
            let rate = 1.0;
            pairs.push((rate_field, rate));
            pairs.push((value_field, rate / total_markup * (revenue - cogs)));
        }
        Record::from_pairs(id, &pairs)
    }

    #[test]
    fn test_recalculate_produces_all_derived_fields() {
        let mut record = consistent_record("TX-1");
        RecalcEngine::new(registry()).recalculate(&mut record).unwrap();

        assert_eq!(record.get(s::RC_REFERENCE_SELL_RATE), Some(105.0));
        assert_eq!(record.get(s::RC_DEPOSIT_AMOUNT_USD), Some(2500.0));
        assert_eq!(record.get(s::RC_CLIENT_RECEIVE), Some(2500.0 / 105.0));
        for derived in [
            s::RC_COGS,
            s::RC_REVENUE,
            s::RC_MARKUP_1_VALUE,
            s::RC_MARKUP_5_VALUE,
        ] {
            assert!(record.get(derived).is_some(), "{derived} not produced");
        }
    }

    #[test]
    fn test_derived_inputs_feed_later_formulas() {
        // RC_Client_Receive must divide the recomputed USD amount by the
        // recomputed sell rate, not the reported ones.
        let mut record = consistent_record("TX-2");
        record.set(s::REFERENCE_SELL_RATE, 999.0); // reported, ignored by step 3
        RecalcEngine::new(registry()).recalculate(&mut record).unwrap();
        assert_eq!(record.get(s::RC_CLIENT_RECEIVE), Some(2500.0 / 105.0));
    }

    #[test]
    fn test_zero_total_markup_is_a_division_error_naming_the_formula() {
        let mut record = consistent_record("TX-3");
        record.set(s::TOTAL_MARKUP, 0.0);
        let err = RecalcEngine::new(registry()).recalculate(&mut record).unwrap_err();
        // Step 1 only multiplies by (100 + Total_Markup) / 100; the first
        // division by Total_Markup is the markup-1 component.
        assert_eq!(
            err,
            EngineError::DivisionByZero {
                formula: s::RC_MARKUP_1_VALUE.to_string(),
                transaction_id: "TX-3".to_string(),
            }
        );
    }

    #[test]
    fn test_missing_input_names_field_and_record() {
        let mut record = Record::from_pairs(
            "TX-4",
            &[(s::REFERENCE_BUY_RATE, 100.0)], // no Total_Markup
        );
        let err = RecalcEngine::new(registry()).recalculate(&mut record).unwrap_err();
        assert_eq!(
            err,
            EngineError::MissingField {
                field: s::TOTAL_MARKUP.to_string(),
                transaction_id: "TX-4".to_string(),
            }
        );
    }
}
