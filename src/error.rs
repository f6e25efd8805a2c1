//! Error types for the payroll deduction engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur during payroll calculation.

use rust_decimal::Decimal;
use thiserror::Error;

/// The main error type for the payroll deduction engine.
///
/// All operations in the engine return this error type, making it easy
/// to handle errors consistently throughout the application.
///
/// # Example
///
/// ```
/// use payroll_engine::error::EngineError;
///
/// let error = EngineError::InvalidInput {
///     field: "basic_salary".to_string(),
///     message: "must not be negative, got -100".to_string(),
/// };
/// assert_eq!(
///     error.to_string(),
///     "Invalid input 'basic_salary': must not be negative, got -100"
/// );
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// A salary input was invalid (negative or otherwise out of range).
    #[error("Invalid input '{field}': {message}")]
    InvalidInput {
        /// The input field that was invalid.
        field: String,
        /// A description of what made the input invalid.
        message: String,
    },

    /// A statutory schedule component violated one of its invariants.
    #[error("Invalid statutory schedule component '{component}': {message}")]
    InvalidSchedule {
        /// The schedule component that was invalid (e.g. "monthly tax table").
        component: String,
        /// A description of the violated invariant.
        message: String,
    },

    /// No tax band in the table covered the given amount.
    #[error("No tax band found for amount {amount} in the {period} tax table")]
    BandNotFound {
        /// The table period ("monthly" or "annual").
        period: String,
        /// The amount for which a band was requested.
        amount: Decimal,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
