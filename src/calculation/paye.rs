//! PAYE calculation functionality.
//!
//! PAYE is charged on gross salary through progressive bands: the band
//! covering the amount contributes its cumulative base plus the marginal
//! slice at the band rate. Fixed personal and insurance reliefs are then
//! subtracted and the result is floored at zero.

use rust_decimal::Decimal;

use crate::config::{TaxPeriod, TaxReliefs, TaxTable};
use crate::error::EngineResult;
use crate::models::AuditStep;

/// The statutory instrument for individual PAYE rates.
pub const PAYE_STATUTE: &str = "Income Tax Act Cap 470, Third Schedule, Head B";

/// Result of a PAYE calculation.
#[derive(Debug, Clone)]
pub struct PayeResult {
    /// Tax from the band table before reliefs.
    pub gross_tax: Decimal,
    /// Tax payable after reliefs, floored at zero.
    pub tax: Decimal,
    /// Audit step documenting the calculation.
    pub audit_step: AuditStep,
}

/// Calculates PAYE on a gross amount using a band table and fixed reliefs.
///
/// An amount exactly equal to a band bound belongs to the lower band.
/// Reliefs never push the tax below zero, and an unused relief balance is
/// not refunded.
///
/// The same function serves both periods; monthly and annual callers pass
/// their own table and reliefs.
///
/// # Errors
///
/// Returns [`crate::error::EngineError::BandNotFound`] if the table has no
/// band covering the amount (unreachable for validated tables).
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::calculate_paye;
/// use payroll_engine::config::StatutoryConfig;
/// use rust_decimal::Decimal;
///
/// let config = StatutoryConfig::current().unwrap();
/// let result = calculate_paye(
///     Decimal::from(55000),
///     config.monthly_tax(),
///     config.monthly_reliefs(),
///     1,
/// )
/// .unwrap();
///
/// // 4483.25 + (55000 - 32333) x 30% = 11283.35, less reliefs 7400
/// assert_eq!(result.tax.to_string(), "3883.35");
/// ```
pub fn calculate_paye(
    gross_salary: Decimal,
    table: &TaxTable,
    reliefs: &TaxReliefs,
    step_number: u32,
) -> EngineResult<PayeResult> {
    let (band, lower_edge) = table.band_for(gross_salary)?;
    let marginal_amount = gross_salary - lower_edge;
    let gross_tax = band.cumulative_base + marginal_amount * band.rate;
    let relief_total = reliefs.total();
    let tax = (gross_tax - relief_total).max(Decimal::ZERO);
    let relief_floor_applied = relief_total > gross_tax;

    let rate_percent = (band.rate * Decimal::from(100)).normalize();
    let rule_name = match table.period() {
        TaxPeriod::Monthly => "Monthly PAYE",
        TaxPeriod::Annual => "Annual PAYE",
    };

    let reasoning = if relief_floor_applied {
        format!(
            "Gross tax: Ksh {} + (Ksh {} - Ksh {}) × {}% = Ksh {}; \
             reliefs of Ksh {} exceed gross tax, PAYE floored at Ksh 0",
            band.cumulative_base.normalize(),
            gross_salary.normalize(),
            lower_edge.normalize(),
            rate_percent,
            gross_tax.normalize(),
            relief_total.normalize(),
        )
    } else {
        format!(
            "Gross tax: Ksh {} + (Ksh {} - Ksh {}) × {}% = Ksh {}; \
             less reliefs Ksh {} = Ksh {}",
            band.cumulative_base.normalize(),
            gross_salary.normalize(),
            lower_edge.normalize(),
            rate_percent,
            gross_tax.normalize(),
            relief_total.normalize(),
            tax.normalize(),
        )
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: format!("paye_{}", table.period()),
        rule_name: rule_name.to_string(),
        statute_ref: PAYE_STATUTE.to_string(),
        input: serde_json::json!({
            "gross_salary": gross_salary.normalize().to_string(),
            "period": table.period().as_str(),
            "relief_total": relief_total.normalize().to_string(),
        }),
        output: serde_json::json!({
            "band_upper_bound": band.upper_bound.map(|b| b.normalize().to_string()),
            "band_rate": band.rate.normalize().to_string(),
            "lower_edge": lower_edge.normalize().to_string(),
            "marginal_amount": marginal_amount.normalize().to_string(),
            "gross_tax": gross_tax.normalize().to_string(),
            "tax": tax.normalize().to_string(),
            "relief_floor_applied": relief_floor_applied,
        }),
        reasoning,
    };

    Ok(PayeResult {
        gross_tax,
        tax,
        audit_step,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StatutoryConfig;
    use std::str::FromStr;

    /// Helper to create a Decimal from a string.
    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn monthly(gross: &str) -> PayeResult {
        let config = StatutoryConfig::current().unwrap();
        calculate_paye(
            dec(gross),
            config.monthly_tax(),
            config.monthly_reliefs(),
            1,
        )
        .unwrap()
    }

    fn annual(gross: &str) -> PayeResult {
        let config = StatutoryConfig::current().unwrap();
        calculate_paye(dec(gross), config.annual_tax(), config.annual_reliefs(), 1).unwrap()
    }

    /// PAYE-001: Gross 55,000 falls in band 3.
    /// 4483.25 + (55000 - 32333) x 0.30 = 11283.35; less 7400 = 3883.35
    #[test]
    fn test_monthly_paye_mid_band() {
        let result = monthly("55000");
        assert_eq!(result.gross_tax, dec("11283.35"));
        assert_eq!(result.tax, dec("3883.35"));
    }

    /// PAYE-002: Gross exactly 24,000 belongs to band 1.
    /// 24000 x 0.10 = 2400; reliefs 7400 floor the tax at 0.
    #[test]
    fn test_monthly_paye_at_first_bound_floors_to_zero() {
        let result = monthly("24000");
        assert_eq!(result.gross_tax, dec("2400"));
        assert_eq!(result.tax, Decimal::ZERO);
        assert_eq!(result.audit_step.output["relief_floor_applied"], true);
    }

    /// PAYE-003: Gross exactly 32,333 belongs to band 2.
    /// 2400 + 8333 x 0.25 = 4483.25; still below reliefs, floored at 0.
    #[test]
    fn test_monthly_paye_at_second_bound_floors_to_zero() {
        let result = monthly("32333");
        assert_eq!(result.gross_tax, dec("4483.25"));
        assert_eq!(result.tax, Decimal::ZERO);
    }

    /// PAYE-004: The relief crossover point.
    /// 4483.25 + (42055.50 - 32333) x 0.30 = 7400 exactly; tax is 0 without
    /// the floor engaging.
    #[test]
    fn test_monthly_paye_exact_relief_crossover() {
        let result = monthly("42055.50");
        assert_eq!(result.gross_tax, dec("7400"));
        assert_eq!(result.tax, Decimal::ZERO);
        assert_eq!(result.audit_step.output["relief_floor_applied"], false);
    }

    /// PAYE-005: Just past the crossover the tax becomes positive.
    /// Gross tax 7400.15; less 7400 = 0.15
    #[test]
    fn test_monthly_paye_just_past_crossover() {
        let result = monthly("42056");
        assert_eq!(result.tax, dec("0.15"));
    }

    /// PAYE-006: Gross exactly 500,000 belongs to band 3.
    /// 4483.25 + 467667 x 0.30 = 144783.35; less 7400 = 137383.35
    #[test]
    fn test_monthly_paye_at_third_bound() {
        let result = monthly("500000");
        assert_eq!(result.tax, dec("137383.35"));
    }

    /// PAYE-007: Gross exactly 800,000 belongs to band 4.
    /// 144783.35 + 300000 x 0.325 = 242283.35; less 7400 = 234883.35
    #[test]
    fn test_monthly_paye_at_fourth_bound() {
        let result = monthly("800000");
        assert_eq!(result.tax, dec("234883.35"));
    }

    /// PAYE-008: Gross 900,000 reaches the open 35% band.
    /// 242283.35 + 100000 x 0.35 = 277283.35; less 7400 = 269883.35
    #[test]
    fn test_monthly_paye_top_band() {
        let result = monthly("900000");
        assert_eq!(result.gross_tax, dec("277283.35"));
        assert_eq!(result.tax, dec("269883.35"));
    }

    /// PAYE-009: Zero gross attracts zero tax.
    #[test]
    fn test_monthly_paye_zero_gross() {
        let result = monthly("0");
        assert_eq!(result.gross_tax, Decimal::ZERO);
        assert_eq!(result.tax, Decimal::ZERO);
    }

    /// PAYE-010: Annual gross 660,000 on the annual table.
    /// 53800 + (660000 - 388000) x 0.30 = 135400; less 88800 = 46600
    #[test]
    fn test_annual_paye_mid_band() {
        let result = annual("660000");
        assert_eq!(result.gross_tax, dec("135400"));
        assert_eq!(result.tax, dec("46600"));
    }

    /// PAYE-011: Annual gross at the first bound floors to zero.
    /// 288000 x 0.10 = 28800, below annual reliefs of 88800.
    #[test]
    fn test_annual_paye_at_first_bound_floors_to_zero() {
        let result = annual("288000");
        assert_eq!(result.tax, Decimal::ZERO);
    }

    /// PAYE-012: Annual gross 10,000,000 reaches the open 35% band.
    /// 2907400 + 400000 x 0.35 = 3047400; less 88800 = 2958600
    #[test]
    fn test_annual_paye_top_band() {
        let result = annual("10000000");
        assert_eq!(result.tax, dec("2958600"));
    }

    /// PAYE-013: The audit step documents the band selection.
    #[test]
    fn test_audit_step_fields() {
        let result = monthly("55000");
        let step = result.audit_step;

        assert_eq!(step.step_number, 1);
        assert_eq!(step.rule_id, "paye_monthly");
        assert_eq!(step.rule_name, "Monthly PAYE");
        assert_eq!(step.statute_ref, PAYE_STATUTE);
        assert_eq!(step.input["gross_salary"], "55000");
        assert_eq!(step.input["relief_total"], "7400");
        assert_eq!(step.output["band_rate"], "0.3");
        assert_eq!(step.output["lower_edge"], "32333");
        assert_eq!(step.output["gross_tax"], "11283.35");
        assert_eq!(step.output["tax"], "3883.35");
        assert!(step.reasoning.contains("less reliefs Ksh 7400"));
    }

    /// PAYE-014: The annual rule id reflects the table period.
    #[test]
    fn test_annual_audit_rule_id() {
        let result = annual("660000");
        assert_eq!(result.audit_step.rule_id, "paye_annual");
        assert_eq!(result.audit_step.rule_name, "Annual PAYE");
        assert_eq!(result.audit_step.output["band_upper_bound"], "6000000");
    }

    /// PAYE-015: The floor shows up in the reasoning.
    #[test]
    fn test_floor_reasoning() {
        let result = monthly("24000");
        assert!(result.audit_step.reasoning.contains("floored at Ksh 0"));
    }

    /// PAYE-016: The open band serializes its missing bound as null.
    #[test]
    fn test_open_band_upper_bound_is_null() {
        let result = monthly("900000");
        assert_eq!(result.audit_step.output["band_upper_bound"], serde_json::Value::Null);
    }
}
