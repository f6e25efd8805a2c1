//! Kenyan Statutory Payroll Deduction Engine
//!
//! This crate calculates the statutory deductions withheld from a Kenyan salary
//! (PAYE, NSSF, SHIF, and the Affordable Housing Levy) and produces monthly and
//! annual net salary statements with itemized deduction lines and an audit trail.

#![warn(missing_docs)]

pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
