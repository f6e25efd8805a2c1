//! NSSF pension contribution calculation functionality.
//!
//! The contribution is tiered: Tier I applies the rate to basic salary up
//! to the lower earnings limit, Tier II applies the same rate to the
//! portion between the lower and upper earnings limits. Earnings above the
//! upper limit attract no further contribution. The base is basic salary,
//! not gross.

use rust_decimal::Decimal;

use crate::config::PensionTiers;
use crate::models::AuditStep;

/// The statutory instrument for NSSF contribution tiers.
pub const NSSF_STATUTE: &str = "NSSF Act 2013, Third Schedule";

/// Result of an NSSF contribution calculation.
#[derive(Debug, Clone)]
pub struct NssfResult {
    /// Contribution on earnings up to the Tier I limit.
    pub tier1: Decimal,
    /// Contribution on earnings between the Tier I and Tier II limits.
    pub tier2: Decimal,
    /// Total contribution, both tiers.
    pub total: Decimal,
    /// Audit step documenting the calculation.
    pub audit_step: AuditStep,
}

/// Calculates the tiered NSSF contribution on a basic salary.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::calculate_nssf;
/// use payroll_engine::config::StatutoryConfig;
/// use rust_decimal::Decimal;
///
/// let config = StatutoryConfig::current().unwrap();
/// let result = calculate_nssf(Decimal::from(50000), config.pension(), 2);
///
/// // Tier I: 6% x 8000 = 480; Tier II: 6% x 42000 = 2520
/// assert_eq!(result.total.to_string(), "3000.00");
/// ```
pub fn calculate_nssf(basic_salary: Decimal, tiers: &PensionTiers, step_number: u32) -> NssfResult {
    let tier1_base = basic_salary.min(tiers.tier1_cap());
    let tier1 = tiers.rate() * tier1_base;

    let tier2_base = if basic_salary > tiers.tier1_cap() {
        basic_salary.min(tiers.tier2_cap()) - tiers.tier1_cap()
    } else {
        Decimal::ZERO
    };
    let tier2 = tiers.rate() * tier2_base;

    let total = tier1 + tier2;
    let rate_percent = (tiers.rate() * Decimal::from(100)).normalize();

    let reasoning = if tier2_base > Decimal::ZERO {
        format!(
            "Tier I: {}% × Ksh {} = Ksh {}; Tier II: {}% × Ksh {} = Ksh {}; total Ksh {}",
            rate_percent,
            tier1_base.normalize(),
            tier1.normalize(),
            rate_percent,
            tier2_base.normalize(),
            tier2.normalize(),
            total.normalize(),
        )
    } else {
        format!(
            "Tier I: {}% × Ksh {} = Ksh {}; basic salary does not exceed the \
             Ksh {} Tier I limit, no Tier II contribution",
            rate_percent,
            tier1_base.normalize(),
            tier1.normalize(),
            tiers.tier1_cap().normalize(),
        )
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "nssf_tiers".to_string(),
        rule_name: "NSSF Contribution".to_string(),
        statute_ref: NSSF_STATUTE.to_string(),
        input: serde_json::json!({
            "basic_salary": basic_salary.normalize().to_string(),
            "rate": tiers.rate().normalize().to_string(),
            "tier1_cap": tiers.tier1_cap().normalize().to_string(),
            "tier2_cap": tiers.tier2_cap().normalize().to_string(),
        }),
        output: serde_json::json!({
            "tier1_base": tier1_base.normalize().to_string(),
            "tier1": tier1.normalize().to_string(),
            "tier2_base": tier2_base.normalize().to_string(),
            "tier2": tier2.normalize().to_string(),
            "total": total.normalize().to_string(),
        }),
        reasoning,
    };

    NssfResult {
        tier1,
        tier2,
        total,
        audit_step,
    }
}
