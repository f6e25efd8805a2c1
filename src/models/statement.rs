//! Salary statement models.
//!
//! A calculation produces a statement: the breakdown totals, the itemized
//! deduction lines, and the audit trace explaining every figure. All types
//! here are plain immutable data with full serde support; amounts serialize
//! as strings to keep decimal precision across the wire.

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// The statutory deduction kinds a statement reports.
///
/// # Example
///
/// ```
/// use payroll_engine::models::DeductionCode;
///
/// let json = serde_json::to_string(&DeductionCode::HousingLevy).unwrap();
/// assert_eq!(json, "\"housing_levy\"");
/// assert_eq!(DeductionCode::Paye.as_str(), "paye");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeductionCode {
    /// Pay-As-You-Earn income tax.
    Paye,
    /// National Social Security Fund pension contribution.
    Nssf,
    /// Social Health Insurance Fund levy.
    Shif,
    /// Affordable Housing Levy.
    HousingLevy,
}

impl DeductionCode {
    /// Returns the snake_case identifier for this deduction.
    pub fn as_str(&self) -> &'static str {
        match self {
            DeductionCode::Paye => "paye",
            DeductionCode::Nssf => "nssf",
            DeductionCode::Shif => "shif",
            DeductionCode::HousingLevy => "housing_levy",
        }
    }
}

/// A single itemized deduction on a statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeductionLine {
    /// The deduction kind.
    pub code: DeductionCode,
    /// Human-readable description (e.g. "NSSF", "PAYE (annual bands)").
    pub description: String,
    /// The amount the deduction was computed on.
    pub base: Decimal,
    /// The flat rate applied to the base, when the deduction is flat-rate.
    /// `None` for banded or tiered deductions.
    pub rate: Option<Decimal>,
    /// The deducted amount.
    pub amount: Decimal,
    /// The statutory instrument the deduction derives from.
    pub statute_ref: String,
}

/// The monthly salary breakdown.
///
/// Immutable value record: two breakdowns with the same figures are the
/// same breakdown. Net salary is gross minus all deductions and may be
/// negative when deductions exceed gross.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::calculate_monthly_statement;
/// use payroll_engine::config::StatutoryConfig;
/// use payroll_engine::models::PayInput;
/// use rust_decimal::Decimal;
///
/// let config = StatutoryConfig::current().unwrap();
/// let input = PayInput::new(Decimal::from(50000), Decimal::from(5000)).unwrap();
/// let statement = calculate_monthly_statement(&input, &config).unwrap();
///
/// let rendered = statement.breakdown.to_string();
/// assert!(rendered.contains("Gross Salary: Ksh 55000.00"));
/// assert!(rendered.contains("Net Salary: Ksh 45779.15"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyBreakdown {
    /// Basic salary plus benefits.
    pub gross_salary: Decimal,
    /// PAYE after reliefs, floored at zero.
    pub paye: Decimal,
    /// NSSF contribution, both tiers.
    pub nssf: Decimal,
    /// SHIF levy.
    pub shif: Decimal,
    /// Affordable Housing Levy.
    pub housing_levy: Decimal,
    /// Sum of all deductions.
    pub total_deductions: Decimal,
    /// Gross salary minus total deductions. Never floored.
    pub net_salary: Decimal,
}

impl fmt::Display for MonthlyBreakdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Gross Salary: Ksh {}", ksh(self.gross_salary))?;
        writeln!(f, "PAYE: Ksh {}", ksh(self.paye))?;
        writeln!(f, "NSSF: Ksh {}", ksh(self.nssf))?;
        writeln!(f, "SHIF: Ksh {}", ksh(self.shif))?;
        writeln!(f, "Housing Levy: Ksh {}", ksh(self.housing_levy))?;
        writeln!(f, "Total Deductions: Ksh {}", ksh(self.total_deductions))?;
        write!(f, "Net Salary: Ksh {}", ksh(self.net_salary))
    }
}

/// The annual salary breakdown.
///
/// Annual PAYE is recomputed on the annual band table; the other deductions
/// are twelve times their monthly amounts. Gross is twelve times monthly
/// gross.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnualBreakdown {
    /// Twelve times the monthly gross salary.
    pub gross_annual: Decimal,
    /// PAYE computed on the annual band table, after annual reliefs.
    pub paye_annual: Decimal,
    /// Twelve times the monthly NSSF contribution.
    pub nssf_annual: Decimal,
    /// Twelve times the monthly SHIF levy.
    pub shif_annual: Decimal,
    /// Twelve times the monthly housing levy.
    pub housing_levy_annual: Decimal,
    /// Sum of all annual deductions.
    pub total_deductions: Decimal,
    /// Annual gross minus total deductions. Never floored.
    pub net_annual_salary: Decimal,
}

impl fmt::Display for AnnualBreakdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Gross Annual Salary: Ksh {}", ksh(self.gross_annual))?;
        writeln!(f, "Annual PAYE: Ksh {}", ksh(self.paye_annual))?;
        writeln!(f, "Annual NSSF: Ksh {}", ksh(self.nssf_annual))?;
        writeln!(f, "Annual SHIF: Ksh {}", ksh(self.shif_annual))?;
        writeln!(f, "Annual Housing Levy: Ksh {}", ksh(self.housing_levy_annual))?;
        writeln!(f, "Total Deductions: Ksh {}", ksh(self.total_deductions))?;
        write!(f, "Net Annual Salary: Ksh {}", ksh(self.net_annual_salary))
    }
}

/// A single step in the calculation audit trail.
///
/// Each calculator emits one step recording what it was given, what it
/// produced, and the arithmetic in between, so a payroll officer can verify
/// every figure against the statute.
///
/// # Example
///
/// ```
/// use payroll_engine::models::AuditStep;
/// use serde_json::json;
///
/// let step = AuditStep {
///     step_number: 1,
///     rule_id: "paye_monthly".to_string(),
///     rule_name: "Monthly PAYE".to_string(),
///     statute_ref: "Income Tax Act Cap 470, Third Schedule, Head B".to_string(),
///     input: json!({ "gross_salary": "55000" }),
///     output: json!({ "tax": "3883.35" }),
///     reasoning: "Band 3 applies; reliefs of Ksh 7400 subtracted".to_string(),
/// };
/// assert_eq!(step.rule_id, "paye_monthly");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// Position of this step in the calculation sequence, starting at 1.
    pub step_number: u32,
    /// Machine-readable rule identifier (e.g. "nssf_tiers").
    pub rule_id: String,
    /// Human-readable rule name (e.g. "NSSF Contribution").
    pub rule_name: String,
    /// The statutory instrument the rule derives from.
    pub statute_ref: String,
    /// The values the rule was applied to.
    pub input: serde_json::Value,
    /// The values the rule produced.
    pub output: serde_json::Value,
    /// Human-readable explanation of the arithmetic.
    pub reasoning: String,
}

/// A non-fatal condition noticed during calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// Machine-readable warning code (e.g. "NEGATIVE_NET_SALARY").
    pub code: String,
    /// Human-readable description of the condition.
    pub message: String,
    /// Severity level: "low", "medium", or "high".
    pub severity: String,
}

/// The complete audit trail of one calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTrace {
    /// The ordered calculation steps.
    pub steps: Vec<AuditStep>,
    /// Warnings raised during calculation.
    pub warnings: Vec<AuditWarning>,
    /// Wall-clock duration of the calculation in microseconds.
    pub duration_us: u64,
}

/// A complete monthly salary statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyStatement {
    /// When the statement was calculated.
    pub timestamp: DateTime<Utc>,
    /// The engine version that produced the statement.
    pub engine_version: String,
    /// The breakdown totals.
    pub breakdown: MonthlyBreakdown,
    /// The itemized deduction lines.
    pub deductions: Vec<DeductionLine>,
    /// The audit trail.
    pub audit_trace: AuditTrace,
}

/// A complete annual salary statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnualStatement {
    /// When the statement was calculated.
    pub timestamp: DateTime<Utc>,
    /// The engine version that produced the statement.
    pub engine_version: String,
    /// The breakdown totals.
    pub breakdown: AnnualBreakdown,
    /// The itemized deduction lines.
    pub deductions: Vec<DeductionLine>,
    /// The audit trail.
    pub audit_trace: AuditTrace,
}

/// Renders an amount at exactly two decimal places for display.
fn ksh(amount: Decimal) -> Decimal {
    let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded
}
