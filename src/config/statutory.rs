//! The statutory deduction schedule currently in force.
//!
//! Rates, bands, and reliefs are taken from the governing Kenyan
//! instruments: the individual PAYE bands of the Income Tax Act (Finance
//! Act 2023 rates, effective 1 July 2023), the NSSF Act 2013 tier
//! contributions at the February 2025 earnings limits, the Social Health
//! Insurance Fund levy (October 2024), and the Affordable Housing Levy
//! (March 2024).

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};
use crate::models::DeductionCode;

use super::types::{
    PensionTiers, StatutoryConfig, StatutoryLevy, TaxBand, TaxPeriod, TaxReliefs, TaxTable,
};

/// NSSF contribution rate applied within both tiers (6%).
pub const NSSF_RATE: Decimal = Decimal::from_parts(6, 0, 0, false, 2);

/// NSSF Tier I earnings limit (the lower earnings limit), Ksh 8,000.
pub const NSSF_TIER_1_CAP: Decimal = Decimal::from_parts(8000, 0, 0, false, 0);

/// NSSF Tier II earnings limit (the upper earnings limit), Ksh 72,000.
pub const NSSF_TIER_2_CAP: Decimal = Decimal::from_parts(72000, 0, 0, false, 0);

/// SHIF rate on gross salary (2.75%).
pub const SHIF_RATE: Decimal = Decimal::from_parts(275, 0, 0, false, 4);

/// Affordable Housing Levy rate on gross salary (1.5%).
pub const HOUSING_LEVY_RATE: Decimal = Decimal::from_parts(15, 0, 0, false, 3);

/// Monthly personal relief, Ksh 2,400.
pub const MONTHLY_PERSONAL_RELIEF: Decimal = Decimal::from_parts(2400, 0, 0, false, 0);

/// Monthly insurance relief, Ksh 5,000.
pub const MONTHLY_INSURANCE_RELIEF: Decimal = Decimal::from_parts(5000, 0, 0, false, 0);

/// Annual personal relief, Ksh 28,800.
pub const ANNUAL_PERSONAL_RELIEF: Decimal = Decimal::from_parts(28800, 0, 0, false, 0);

/// Annual insurance relief, Ksh 60,000.
pub const ANNUAL_INSURANCE_RELIEF: Decimal = Decimal::from_parts(60000, 0, 0, false, 0);

impl StatutoryConfig {
    /// Builds the statutory deduction schedule currently in force.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidSchedule`] if the compiled-in
    /// constants fail validation. The shipped schedule always passes; the
    /// error path exists because the constructors are shared with
    /// caller-built schedules.
    ///
    /// # Example
    ///
    /// ```
    /// use payroll_engine::config::StatutoryConfig;
    ///
    /// let config = StatutoryConfig::current().unwrap();
    /// assert_eq!(config.monthly_tax().bands().len(), 5);
    /// assert_eq!(config.monthly_reliefs().total().to_string(), "7400");
    /// ```
    pub fn current() -> EngineResult<Self> {
        StatutoryConfig::new(
            monthly_tax_table()?,
            TaxReliefs::new(MONTHLY_PERSONAL_RELIEF, MONTHLY_INSURANCE_RELIEF)?,
            annual_tax_table()?,
            TaxReliefs::new(ANNUAL_PERSONAL_RELIEF, ANNUAL_INSURANCE_RELIEF)?,
            nssf_tiers()?,
            shif_levy()?,
            housing_levy()?,
        )
    }
}

/// Monthly PAYE bands, Finance Act 2023 rates effective 1 July 2023.
fn monthly_tax_table() -> EngineResult<TaxTable> {
    TaxTable::new(
        TaxPeriod::Monthly,
        effective_date(2023, 7, 1)?,
        vec![
            TaxBand {
                upper_bound: Some(Decimal::new(24_000, 0)),
                rate: Decimal::new(10, 2),
                cumulative_base: Decimal::ZERO,
            },
            TaxBand {
                upper_bound: Some(Decimal::new(32_333, 0)),
                rate: Decimal::new(25, 2),
                cumulative_base: Decimal::new(2_400, 0),
            },
            TaxBand {
                upper_bound: Some(Decimal::new(500_000, 0)),
                rate: Decimal::new(30, 2),
                cumulative_base: Decimal::new(448_325, 2),
            },
            TaxBand {
                upper_bound: Some(Decimal::new(800_000, 0)),
                rate: Decimal::new(325, 3),
                cumulative_base: Decimal::new(14_478_335, 2),
            },
            TaxBand {
                upper_bound: None,
                rate: Decimal::new(35, 2),
                cumulative_base: Decimal::new(24_228_335, 2),
            },
        ],
    )
}

/// Annual PAYE bands. Independently defined in the schedule, not 12x the
/// monthly bounds (388,000 vs 12 x 32,333 = 387,996).
fn annual_tax_table() -> EngineResult<TaxTable> {
    TaxTable::new(
        TaxPeriod::Annual,
        effective_date(2023, 7, 1)?,
        vec![
            TaxBand {
                upper_bound: Some(Decimal::new(288_000, 0)),
                rate: Decimal::new(10, 2),
                cumulative_base: Decimal::ZERO,
            },
            TaxBand {
                upper_bound: Some(Decimal::new(388_000, 0)),
                rate: Decimal::new(25, 2),
                cumulative_base: Decimal::new(28_800, 0),
            },
            TaxBand {
                upper_bound: Some(Decimal::new(6_000_000, 0)),
                rate: Decimal::new(30, 2),
                cumulative_base: Decimal::new(53_800, 0),
            },
            TaxBand {
                upper_bound: Some(Decimal::new(9_600_000, 0)),
                rate: Decimal::new(325, 3),
                cumulative_base: Decimal::new(1_737_400, 0),
            },
            TaxBand {
                upper_bound: None,
                rate: Decimal::new(35, 2),
                cumulative_base: Decimal::new(2_907_400, 0),
            },
        ],
    )
}

/// NSSF tiers at the February 2025 earnings limits.
fn nssf_tiers() -> EngineResult<PensionTiers> {
    PensionTiers::new(
        NSSF_RATE,
        NSSF_TIER_1_CAP,
        NSSF_TIER_2_CAP,
        effective_date(2025, 2, 1)?,
    )
}

/// SHIF levy, in force since 1 October 2024.
fn shif_levy() -> EngineResult<StatutoryLevy> {
    StatutoryLevy::new(
        DeductionCode::Shif,
        "SHIF",
        SHIF_RATE,
        "Social Health Insurance Act 2023, s.27",
        effective_date(2024, 10, 1)?,
    )
}

/// Affordable Housing Levy, in force since 19 March 2024.
fn housing_levy() -> EngineResult<StatutoryLevy> {
    StatutoryLevy::new(
        DeductionCode::HousingLevy,
        "Housing Levy",
        HOUSING_LEVY_RATE,
        "Affordable Housing Act 2024, s.4",
        effective_date(2024, 3, 19)?,
    )
}

fn effective_date(year: i32, month: u32, day: u32) -> EngineResult<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| EngineError::InvalidSchedule {
        component: "effective date".to_string(),
        message: format!("{:04}-{:02}-{:02} is not a valid calendar date", year, month, day),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use std::str::FromStr;

    /// Helper to create a Decimal from a string.
    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    /// Helper to create a date.
    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn test_current_schedule_builds() {
        let config = StatutoryConfig::current();
        assert!(config.is_ok());
    }

    #[test]
    fn test_monthly_table_shape() {
        let config = StatutoryConfig::current().unwrap();
        let table = config.monthly_tax();

        assert_eq!(table.period(), TaxPeriod::Monthly);
        assert_eq!(table.effective_from(), date(2023, 7, 1));
        assert_eq!(table.bands().len(), 5);

        let bounds: Vec<Option<Decimal>> = table.bands().iter().map(|b| b.upper_bound).collect();
        assert_eq!(
            bounds,
            vec![
                Some(dec("24000")),
                Some(dec("32333")),
                Some(dec("500000")),
                Some(dec("800000")),
                None,
            ]
        );
        assert_eq!(table.bands()[4].rate, dec("0.35"));
    }

    #[test]
    fn test_annual_table_shape() {
        let config = StatutoryConfig::current().unwrap();
        let table = config.annual_tax();

        assert_eq!(table.period(), TaxPeriod::Annual);
        assert_eq!(table.effective_from(), date(2023, 7, 1));
        assert_eq!(table.bands().len(), 5);

        let bounds: Vec<Option<Decimal>> = table.bands().iter().map(|b| b.upper_bound).collect();
        assert_eq!(
            bounds,
            vec![
                Some(dec("288000")),
                Some(dec("388000")),
                Some(dec("6000000")),
                Some(dec("9600000")),
                None,
            ]
        );
    }

    #[test]
    fn test_annual_bounds_are_not_twelve_times_monthly() {
        // 388,000 != 12 x 32,333 = 387,996. The annual table is defined
        // independently in the schedule, so it must not be derived by
        // scaling the monthly table.
        let config = StatutoryConfig::current().unwrap();
        let monthly_band_2 = config.monthly_tax().bands()[1].upper_bound.unwrap();
        let annual_band_2 = config.annual_tax().bands()[1].upper_bound.unwrap();
        assert_ne!(annual_band_2, monthly_band_2 * dec("12"));
    }

    #[test]
    fn test_monthly_reliefs() {
        let config = StatutoryConfig::current().unwrap();
        let reliefs = config.monthly_reliefs();
        assert_eq!(reliefs.personal(), dec("2400"));
        assert_eq!(reliefs.insurance(), dec("5000"));
        assert_eq!(reliefs.total(), dec("7400"));
    }

    #[test]
    fn test_annual_reliefs() {
        let config = StatutoryConfig::current().unwrap();
        let reliefs = config.annual_reliefs();
        assert_eq!(reliefs.personal(), dec("28800"));
        assert_eq!(reliefs.insurance(), dec("60000"));
        assert_eq!(reliefs.total(), dec("88800"));
    }

    #[test]
    fn test_pension_tiers() {
        let config = StatutoryConfig::current().unwrap();
        let pension = config.pension();
        assert_eq!(pension.rate(), dec("0.06"));
        assert_eq!(pension.tier1_cap(), dec("8000"));
        assert_eq!(pension.tier2_cap(), dec("72000"));
        assert_eq!(pension.effective_from(), date(2025, 2, 1));
    }

    #[test]
    fn test_levies() {
        let config = StatutoryConfig::current().unwrap();

        let shif = config.health_levy();
        assert_eq!(shif.code(), DeductionCode::Shif);
        assert_eq!(shif.name(), "SHIF");
        assert_eq!(shif.rate(), dec("0.0275"));
        assert_eq!(shif.effective_from(), date(2024, 10, 1));

        let housing = config.housing_levy();
        assert_eq!(housing.code(), DeductionCode::HousingLevy);
        assert_eq!(housing.name(), "Housing Levy");
        assert_eq!(housing.rate(), dec("0.015"));
        assert_eq!(housing.effective_from(), date(2024, 3, 19));
    }

    #[test]
    fn test_band_at_bound_belongs_to_lower_band() {
        let config = StatutoryConfig::current().unwrap();
        let table = config.monthly_tax();

        let (band, lower_edge) = table.band_for(dec("24000")).unwrap();
        assert_eq!(band.rate, dec("0.10"));
        assert_eq!(lower_edge, Decimal::ZERO);

        let (band, lower_edge) = table.band_for(dec("24000.01")).unwrap();
        assert_eq!(band.rate, dec("0.25"));
        assert_eq!(lower_edge, dec("24000"));
    }

    #[test]
    fn test_band_above_top_bound_is_open_band() {
        let config = StatutoryConfig::current().unwrap();
        let (band, lower_edge) = config.monthly_tax().band_for(dec("900000")).unwrap();
        assert_eq!(band.upper_bound, None);
        assert_eq!(band.rate, dec("0.35"));
        assert_eq!(lower_edge, dec("800000"));
    }

    #[test]
    fn test_table_rejects_empty_bands() {
        let result = TaxTable::new(TaxPeriod::Monthly, date(2023, 7, 1), vec![]);
        assert!(matches!(
            result,
            Err(EngineError::InvalidSchedule { .. })
        ));
    }

    #[test]
    fn test_table_rejects_bounded_last_band() {
        let result = TaxTable::new(
            TaxPeriod::Monthly,
            date(2023, 7, 1),
            vec![TaxBand {
                upper_bound: Some(dec("24000")),
                rate: dec("0.10"),
                cumulative_base: Decimal::ZERO,
            }],
        );
        let err = result.unwrap_err();
        assert!(err.to_string().contains("the last band must be unbounded"));
    }

    #[test]
    fn test_table_rejects_unbounded_middle_band() {
        let result = TaxTable::new(
            TaxPeriod::Monthly,
            date(2023, 7, 1),
            vec![
                TaxBand {
                    upper_bound: None,
                    rate: dec("0.10"),
                    cumulative_base: Decimal::ZERO,
                },
                TaxBand {
                    upper_bound: None,
                    rate: dec("0.25"),
                    cumulative_base: Decimal::ZERO,
                },
            ],
        );
        let err = result.unwrap_err();
        assert!(err.to_string().contains("band 1 is unbounded"));
    }

    #[test]
    fn test_table_rejects_non_increasing_bounds() {
        let result = TaxTable::new(
            TaxPeriod::Monthly,
            date(2023, 7, 1),
            vec![
                TaxBand {
                    upper_bound: Some(dec("24000")),
                    rate: dec("0.10"),
                    cumulative_base: Decimal::ZERO,
                },
                TaxBand {
                    upper_bound: Some(dec("24000")),
                    rate: dec("0.25"),
                    cumulative_base: dec("2400"),
                },
                TaxBand {
                    upper_bound: None,
                    rate: dec("0.30"),
                    cumulative_base: dec("2400"),
                },
            ],
        );
        let err = result.unwrap_err();
        assert!(
            err.to_string()
                .contains("band 2 upper bound 24000 is not above the previous bound 24000")
        );
    }

    #[test]
    fn test_table_rejects_wrong_cumulative_base() {
        // Band 2 declares 2500 but band 1 accrues 24000 x 0.10 = 2400.
        let result = TaxTable::new(
            TaxPeriod::Monthly,
            date(2023, 7, 1),
            vec![
                TaxBand {
                    upper_bound: Some(dec("24000")),
                    rate: dec("0.10"),
                    cumulative_base: Decimal::ZERO,
                },
                TaxBand {
                    upper_bound: None,
                    rate: dec("0.25"),
                    cumulative_base: dec("2500"),
                },
            ],
        );
        let err = result.unwrap_err();
        assert!(err.to_string().contains("cumulative base 2500"));
        assert!(err.to_string().contains("2400"));
    }

    #[test]
    fn test_table_rejects_rate_above_one() {
        let result = TaxTable::new(
            TaxPeriod::Annual,
            date(2023, 7, 1),
            vec![TaxBand {
                upper_bound: None,
                rate: dec("1.5"),
                cumulative_base: Decimal::ZERO,
            }],
        );
        let err = result.unwrap_err();
        assert!(err.to_string().contains("rate 1.5 is outside the range 0..=1"));
        assert!(err.to_string().contains("annual tax table"));
    }

    #[test]
    fn test_reliefs_reject_negative_amounts() {
        let result = TaxReliefs::new(dec("-2400"), dec("5000"));
        let err = result.unwrap_err();
        assert!(err.to_string().contains("personal relief must not be negative"));

        let result = TaxReliefs::new(dec("2400"), dec("-5000"));
        let err = result.unwrap_err();
        assert!(err.to_string().contains("insurance relief must not be negative"));
    }

    #[test]
    fn test_pension_rejects_inverted_caps() {
        let result = PensionTiers::new(dec("0.06"), dec("72000"), dec("8000"), date(2025, 2, 1));
        let err = result.unwrap_err();
        assert!(err.to_string().contains("tier II cap 8000 must exceed tier I cap 72000"));
    }

    #[test]
    fn test_levy_rejects_rate_above_one() {
        let result = StatutoryLevy::new(
            DeductionCode::Shif,
            "SHIF",
            dec("1.01"),
            "Social Health Insurance Act 2023, s.27",
            date(2024, 10, 1),
        );
        assert!(matches!(
            result,
            Err(EngineError::InvalidSchedule { .. })
        ));
    }

    #[test]
    fn test_config_rejects_swapped_tables() {
        let config = StatutoryConfig::current().unwrap();
        let result = StatutoryConfig::new(
            config.annual_tax().clone(),
            *config.monthly_reliefs(),
            config.annual_tax().clone(),
            *config.annual_reliefs(),
            *config.pension(),
            config.health_levy().clone(),
            config.housing_levy().clone(),
        );
        let err = result.unwrap_err();
        assert!(err.to_string().contains("table in the monthly slot has period annual"));
    }
}
