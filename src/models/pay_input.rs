//! Validated salary inputs.

use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};

/// The pair of salary figures a payroll calculation starts from.
///
/// Both figures are validated as non-negative at construction; a `PayInput`
/// that exists is safe to feed to every calculator. Gross salary is derived,
/// never stored.
///
/// # Example
///
/// ```
/// use payroll_engine::models::PayInput;
/// use rust_decimal::Decimal;
///
/// let input = PayInput::new(Decimal::from(50000), Decimal::from(5000)).unwrap();
/// assert_eq!(input.gross_salary(), Decimal::from(55000));
///
/// let rejected = PayInput::new(Decimal::from(-1), Decimal::ZERO);
/// assert!(rejected.is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PayInput {
    basic_salary: Decimal,
    benefits: Decimal,
}

impl PayInput {
    /// Creates a validated pay input.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidInput`] naming the offending field if
    /// either figure is negative.
    pub fn new(basic_salary: Decimal, benefits: Decimal) -> EngineResult<Self> {
        if basic_salary < Decimal::ZERO {
            return Err(EngineError::InvalidInput {
                field: "basic_salary".to_string(),
                message: format!("must not be negative, got {}", basic_salary),
            });
        }
        if benefits < Decimal::ZERO {
            return Err(EngineError::InvalidInput {
                field: "benefits".to_string(),
                message: format!("must not be negative, got {}", benefits),
            });
        }
        Ok(Self {
            basic_salary,
            benefits,
        })
    }

    /// The basic salary, the base for pension contributions.
    pub fn basic_salary(&self) -> Decimal {
        self.basic_salary
    }

    /// The cash value of benefits on top of basic salary.
    pub fn benefits(&self) -> Decimal {
        self.benefits
    }

    /// Gross salary: basic salary plus benefits.
    pub fn gross_salary(&self) -> Decimal {
        self.basic_salary + self.benefits
    }
}
