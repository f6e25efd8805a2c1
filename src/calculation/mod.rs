//! Calculation logic for the payroll deduction engine.
//!
//! This module contains all the calculation functions for determining
//! statutory deductions: progressive PAYE over the band tables with relief
//! subtraction, tiered NSSF contributions on basic salary, the flat SHIF
//! and housing levies on gross salary, and the monthly and annual net
//! salary statements that compose them.

mod levy;
mod net_salary;
mod nssf;
mod paye;

pub use levy::{LevyResult, calculate_levy};
pub use net_salary::{calculate_annual_statement, calculate_monthly_statement};
pub use nssf::{NSSF_STATUTE, NssfResult, calculate_nssf};
pub use paye::{PAYE_STATUTE, PayeResult, calculate_paye};
