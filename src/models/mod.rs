//! Core data models for the payroll deduction engine.
//!
//! This module contains the validated inputs and the statement types the
//! engine produces.

mod pay_input;
mod statement;

pub use pay_input::PayInput;
pub use statement::{
    AnnualBreakdown, AnnualStatement, AuditStep, AuditTrace, AuditWarning, DeductionCode,
    DeductionLine, MonthlyBreakdown, MonthlyStatement,
};
