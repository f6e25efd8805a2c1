//! Net salary statement calculation.
//!
//! The composition root of the engine: runs the PAYE evaluator and the
//! statutory deduction calculators in order, assembles the deduction lines,
//! the breakdown, and the audit trace, and stamps the statement with the
//! engine version and timestamp.

use std::time::Instant;

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::config::StatutoryConfig;
use crate::error::EngineResult;
use crate::models::{
    AnnualBreakdown, AnnualStatement, AuditTrace, AuditWarning, DeductionCode, DeductionLine,
    MonthlyBreakdown, MonthlyStatement, PayInput,
};

use super::levy::calculate_levy;
use super::nssf::{NSSF_STATUTE, calculate_nssf};
use super::paye::{PAYE_STATUTE, calculate_paye};

/// Months in a calendar year, for annual scaling.
const MONTHS_PER_YEAR: Decimal = Decimal::from_parts(12, 0, 0, false, 0);

/// Calculates a complete monthly salary statement.
///
/// Gross salary is basic plus benefits. PAYE runs on gross against the
/// monthly band table, NSSF on basic salary, SHIF and the housing levy on
/// gross. Net salary is gross minus all deductions and is surfaced as-is
/// when negative (with a `NEGATIVE_NET_SALARY` warning in the audit trace),
/// never floored and never an error.
///
/// # Errors
///
/// Returns [`crate::error::EngineError::BandNotFound`] if the schedule's
/// band table cannot cover the gross amount (unreachable for validated
/// tables).
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::calculate_monthly_statement;
/// use payroll_engine::config::StatutoryConfig;
/// use payroll_engine::models::PayInput;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let config = StatutoryConfig::current().unwrap();
/// let input = PayInput::new(Decimal::from(50000), Decimal::from(5000)).unwrap();
/// let statement = calculate_monthly_statement(&input, &config).unwrap();
///
/// assert_eq!(
///     statement.breakdown.net_salary,
///     Decimal::from_str("45779.15").unwrap()
/// );
/// println!("{}", statement.breakdown);
/// ```
pub fn calculate_monthly_statement(
    input: &PayInput,
    config: &StatutoryConfig,
) -> EngineResult<MonthlyStatement> {
    let start_time = Instant::now();
    let gross_salary = input.gross_salary();

    info!(
        basic_salary = %input.basic_salary(),
        benefits = %input.benefits(),
        "Calculating monthly salary statement"
    );

    let paye = calculate_paye(
        gross_salary,
        config.monthly_tax(),
        config.monthly_reliefs(),
        1,
    )?;
    let nssf = calculate_nssf(input.basic_salary(), config.pension(), 2);
    let shif = calculate_levy(gross_salary, config.health_levy(), 3);
    let housing = calculate_levy(gross_salary, config.housing_levy(), 4);

    let total_deductions = paye.tax + nssf.total + shif.amount + housing.amount;
    let net_salary = gross_salary - total_deductions;

    let mut warnings = Vec::new();
    if net_salary < Decimal::ZERO {
        warn!(
            net_salary = %net_salary,
            total_deductions = %total_deductions,
            "Deductions exceed gross salary"
        );
        warnings.push(AuditWarning {
            code: "NEGATIVE_NET_SALARY".to_string(),
            message: format!(
                "Deductions Ksh {} exceed gross salary Ksh {}",
                total_deductions.normalize(),
                gross_salary.normalize()
            ),
            severity: "high".to_string(),
        });
    }

    let deductions = vec![
        DeductionLine {
            code: DeductionCode::Paye,
            description: "PAYE".to_string(),
            base: gross_salary,
            rate: None,
            amount: paye.tax,
            statute_ref: PAYE_STATUTE.to_string(),
        },
        DeductionLine {
            code: DeductionCode::Nssf,
            description: "NSSF".to_string(),
            base: input.basic_salary(),
            rate: None,
            amount: nssf.total,
            statute_ref: NSSF_STATUTE.to_string(),
        },
        DeductionLine {
            code: config.health_levy().code(),
            description: config.health_levy().name().to_string(),
            base: gross_salary,
            rate: Some(config.health_levy().rate()),
            amount: shif.amount,
            statute_ref: config.health_levy().statute_ref().to_string(),
        },
        DeductionLine {
            code: config.housing_levy().code(),
            description: config.housing_levy().name().to_string(),
            base: gross_salary,
            rate: Some(config.housing_levy().rate()),
            amount: housing.amount,
            statute_ref: config.housing_levy().statute_ref().to_string(),
        },
    ];

    let breakdown = MonthlyBreakdown {
        gross_salary,
        paye: paye.tax,
        nssf: nssf.total,
        shif: shif.amount,
        housing_levy: housing.amount,
        total_deductions,
        net_salary,
    };

    let duration_us = start_time.elapsed().as_micros() as u64;

    info!(
        gross_salary = %gross_salary,
        net_salary = %net_salary,
        duration_us,
        "Monthly salary statement calculated"
    );

    Ok(MonthlyStatement {
        timestamp: Utc::now(),
        engine_version: env!("CARGO_PKG_VERSION").to_string(),
        breakdown,
        deductions,
        audit_trace: AuditTrace {
            steps: vec![
                paye.audit_step,
                nssf.audit_step,
                shif.audit_step,
                housing.audit_step,
            ],
            warnings,
            duration_us,
        },
    })
}

/// Calculates a complete annual salary statement.
///
/// Annual gross is twelve times monthly gross. Annual PAYE is recomputed on
/// the annual band table (the schedule defines the annual bands
/// independently, so this is not twelve times the monthly tax), while NSSF,
/// SHIF, and the housing levy are the monthly amounts scaled by twelve.
///
/// # Errors
///
/// Returns [`crate::error::EngineError::BandNotFound`] if the schedule's
/// band table cannot cover the gross amount (unreachable for validated
/// tables).
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::calculate_annual_statement;
/// use payroll_engine::config::StatutoryConfig;
/// use payroll_engine::models::PayInput;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let config = StatutoryConfig::current().unwrap();
/// let input = PayInput::new(Decimal::from(50000), Decimal::from(5000)).unwrap();
/// let statement = calculate_annual_statement(&input, &config).unwrap();
///
/// assert_eq!(statement.breakdown.gross_annual, Decimal::from(660000));
/// assert_eq!(
///     statement.breakdown.paye_annual,
///     Decimal::from_str("46600").unwrap()
/// );
/// ```
pub fn calculate_annual_statement(
    input: &PayInput,
    config: &StatutoryConfig,
) -> EngineResult<AnnualStatement> {
    let start_time = Instant::now();
    let gross_monthly = input.gross_salary();
    let gross_annual = gross_monthly * MONTHS_PER_YEAR;

    info!(
        basic_salary = %input.basic_salary(),
        benefits = %input.benefits(),
        "Calculating annual salary statement"
    );

    // PAYE runs on the annual band table; the other deductions are monthly
    // amounts scaled by twelve.
    let paye = calculate_paye(gross_annual, config.annual_tax(), config.annual_reliefs(), 1)?;
    let nssf = calculate_nssf(input.basic_salary(), config.pension(), 2);
    let shif = calculate_levy(gross_monthly, config.health_levy(), 3);
    let housing = calculate_levy(gross_monthly, config.housing_levy(), 4);

    let nssf_annual = nssf.total * MONTHS_PER_YEAR;
    let shif_annual = shif.amount * MONTHS_PER_YEAR;
    let housing_levy_annual = housing.amount * MONTHS_PER_YEAR;

    let total_deductions = paye.tax + nssf_annual + shif_annual + housing_levy_annual;
    let net_annual_salary = gross_annual - total_deductions;

    let mut warnings = Vec::new();
    if net_annual_salary < Decimal::ZERO {
        warn!(
            net_annual_salary = %net_annual_salary,
            total_deductions = %total_deductions,
            "Deductions exceed annual gross salary"
        );
        warnings.push(AuditWarning {
            code: "NEGATIVE_NET_SALARY".to_string(),
            message: format!(
                "Deductions Ksh {} exceed gross annual salary Ksh {}",
                total_deductions.normalize(),
                gross_annual.normalize()
            ),
            severity: "high".to_string(),
        });
    }

    let deductions = vec![
        DeductionLine {
            code: DeductionCode::Paye,
            description: "PAYE (annual bands)".to_string(),
            base: gross_annual,
            rate: None,
            amount: paye.tax,
            statute_ref: PAYE_STATUTE.to_string(),
        },
        DeductionLine {
            code: DeductionCode::Nssf,
            description: "NSSF (12 × monthly)".to_string(),
            base: input.basic_salary(),
            rate: None,
            amount: nssf_annual,
            statute_ref: NSSF_STATUTE.to_string(),
        },
        DeductionLine {
            code: config.health_levy().code(),
            description: format!("{} (12 × monthly)", config.health_levy().name()),
            base: gross_annual,
            rate: Some(config.health_levy().rate()),
            amount: shif_annual,
            statute_ref: config.health_levy().statute_ref().to_string(),
        },
        DeductionLine {
            code: config.housing_levy().code(),
            description: format!("{} (12 × monthly)", config.housing_levy().name()),
            base: gross_annual,
            rate: Some(config.housing_levy().rate()),
            amount: housing_levy_annual,
            statute_ref: config.housing_levy().statute_ref().to_string(),
        },
    ];

    let breakdown = AnnualBreakdown {
        gross_annual,
        paye_annual: paye.tax,
        nssf_annual,
        shif_annual,
        housing_levy_annual,
        total_deductions,
        net_annual_salary,
    };

    let duration_us = start_time.elapsed().as_micros() as u64;

    info!(
        gross_annual = %gross_annual,
        net_annual_salary = %net_annual_salary,
        duration_us,
        "Annual salary statement calculated"
    );

    Ok(AnnualStatement {
        timestamp: Utc::now(),
        engine_version: env!("CARGO_PKG_VERSION").to_string(),
        breakdown,
        deductions,
        audit_trace: AuditTrace {
            steps: vec![
                paye.audit_step,
                nssf.audit_step,
                shif.audit_step,
                housing.audit_step,
            ],
            warnings,
            duration_us,
        },
    })
}
