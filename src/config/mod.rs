//! Statutory schedule configuration for the payroll deduction engine.
//!
//! The schedule in force ships compiled in; [`StatutoryConfig::current`]
//! builds it. Alternative schedules (past rates, test fixtures) can be
//! assembled through the same validating constructors and injected into the
//! calculators.
//!
//! # Example
//!
//! ```
//! use payroll_engine::config::StatutoryConfig;
//!
//! let config = StatutoryConfig::current().unwrap();
//! assert_eq!(config.health_levy().rate().to_string(), "0.0275");
//! assert_eq!(config.annual_tax().bands().len(), 5);
//! ```

mod statutory;
mod types;

pub use statutory::{
    ANNUAL_INSURANCE_RELIEF, ANNUAL_PERSONAL_RELIEF, HOUSING_LEVY_RATE, MONTHLY_INSURANCE_RELIEF,
    MONTHLY_PERSONAL_RELIEF, NSSF_RATE, NSSF_TIER_1_CAP, NSSF_TIER_2_CAP, SHIF_RATE,
};
pub use types::{
    PensionTiers, StatutoryConfig, StatutoryLevy, TaxBand, TaxPeriod, TaxReliefs, TaxTable,
};
