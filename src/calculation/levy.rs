//! Flat statutory levy calculation functionality.
//!
//! One function serves every flat levy on gross salary; the schedule
//! supplies the rate, name, and statute. The engine instantiates it twice,
//! for SHIF and for the Affordable Housing Levy.

use rust_decimal::Decimal;

use crate::config::StatutoryLevy;
use crate::models::AuditStep;

/// Result of a flat levy calculation.
#[derive(Debug, Clone)]
pub struct LevyResult {
    /// The levied amount.
    pub amount: Decimal,
    /// Audit step documenting the calculation.
    pub audit_step: AuditStep,
}

/// Calculates a flat levy on a gross amount.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::calculate_levy;
/// use payroll_engine::config::StatutoryConfig;
/// use rust_decimal::Decimal;
///
/// let config = StatutoryConfig::current().unwrap();
/// let result = calculate_levy(Decimal::from(55000), config.health_levy(), 3);
///
/// // 2.75% x 55000 = 1512.50
/// assert_eq!(result.amount.to_string(), "1512.5000");
/// ```
pub fn calculate_levy(gross_salary: Decimal, levy: &StatutoryLevy, step_number: u32) -> LevyResult {
    let amount = levy.rate() * gross_salary;
    let rate_percent = (levy.rate() * Decimal::from(100)).normalize();

    let audit_step = AuditStep {
        step_number,
        rule_id: levy.code().as_str().to_string(),
        rule_name: levy.name().to_string(),
        statute_ref: levy.statute_ref().to_string(),
        input: serde_json::json!({
            "gross_salary": gross_salary.normalize().to_string(),
            "rate": levy.rate().normalize().to_string(),
        }),
        output: serde_json::json!({
            "amount": amount.normalize().to_string(),
        }),
        reasoning: format!(
            "{}: {}% × Ksh {} = Ksh {}",
            levy.name(),
            rate_percent,
            gross_salary.normalize(),
            amount.normalize(),
        ),
    };

    LevyResult { amount, audit_step }
}
