//! Statutory schedule types for the payroll deduction engine.
//!
//! These structures describe the rules the calculators apply: progressive
//! tax bands with fixed reliefs, tiered pension contributions, and flat
//! levies. Every aggregate is built through a validating constructor and is
//! immutable afterwards, so a value that exists is a value that satisfies
//! its invariants.

use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::DeductionCode;

/// The period a tax table applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxPeriod {
    /// Bands and reliefs expressed per calendar month.
    Monthly,
    /// Bands and reliefs expressed per calendar year.
    Annual,
}

impl TaxPeriod {
    /// Returns the lowercase identifier for this period.
    pub fn as_str(&self) -> &'static str {
        match self {
            TaxPeriod::Monthly => "monthly",
            TaxPeriod::Annual => "annual",
        }
    }
}

impl fmt::Display for TaxPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single band of a progressive tax table.
///
/// The band covers amounts above the previous band's upper bound, up to and
/// including its own. `cumulative_base` is the total tax accrued by all
/// prior bands, so tax within a band is
/// `cumulative_base + (amount - lower_edge) * rate` with no per-call
/// summation over earlier bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaxBand {
    /// Inclusive upper bound of the band; `None` marks the final open band.
    pub upper_bound: Option<Decimal>,
    /// Marginal rate applied to the slice of income within this band.
    pub rate: Decimal,
    /// Tax accrued by all bands below this one.
    pub cumulative_base: Decimal,
}

/// An ordered progressive tax table with its effective date.
///
/// The constructor enforces the structural invariants: at least one band,
/// strictly increasing upper bounds, exactly the last band unbounded, rates
/// within `0..=1`, and each cumulative base equal to the exact tax accrued
/// by the bands below it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxTable {
    period: TaxPeriod,
    effective_from: NaiveDate,
    bands: Vec<TaxBand>,
}

impl TaxTable {
    /// Creates a validated tax table.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidSchedule`] if the bands are empty, out
    /// of order, carry a rate outside `0..=1`, declare a cumulative base
    /// that does not match the accrued tax of the prior bands, or if any
    /// band other than the last is unbounded (or the last is bounded).
    pub fn new(
        period: TaxPeriod,
        effective_from: NaiveDate,
        bands: Vec<TaxBand>,
    ) -> EngineResult<Self> {
        let invalid = move |message: String| EngineError::InvalidSchedule {
            component: format!("{} tax table", period),
            message,
        };

        if bands.is_empty() {
            return Err(invalid("must contain at least one band".to_string()));
        }

        let last = bands.len() - 1;
        let mut lower_edge = Decimal::ZERO;
        let mut expected_base = Decimal::ZERO;

        for (index, band) in bands.iter().enumerate() {
            if band.rate < Decimal::ZERO || band.rate > Decimal::ONE {
                return Err(invalid(format!(
                    "band {} rate {} is outside the range 0..=1",
                    index + 1,
                    band.rate
                )));
            }
            if band.cumulative_base != expected_base {
                return Err(invalid(format!(
                    "band {} cumulative base {} does not equal the tax accrued \
                     by the prior bands ({})",
                    index + 1,
                    band.cumulative_base,
                    expected_base.normalize()
                )));
            }
            match band.upper_bound {
                Some(upper) => {
                    if index == last {
                        return Err(invalid(
                            "the last band must be unbounded".to_string(),
                        ));
                    }
                    if upper <= lower_edge {
                        return Err(invalid(format!(
                            "band {} upper bound {} is not above the previous bound {}",
                            index + 1,
                            upper,
                            lower_edge.normalize()
                        )));
                    }
                    expected_base += (upper - lower_edge) * band.rate;
                    lower_edge = upper;
                }
                None => {
                    if index != last {
                        return Err(invalid(format!(
                            "band {} is unbounded but is not the last band",
                            index + 1
                        )));
                    }
                }
            }
        }

        Ok(Self {
            period,
            effective_from,
            bands,
        })
    }

    /// The period this table applies to.
    pub fn period(&self) -> TaxPeriod {
        self.period
    }

    /// The date from which this table is in force.
    pub fn effective_from(&self) -> NaiveDate {
        self.effective_from
    }

    /// The ordered bands of the table.
    pub fn bands(&self) -> &[TaxBand] {
        &self.bands
    }

    /// Finds the band covering `amount`, together with the band's lower
    /// edge (the previous band's upper bound, zero for the first band).
    ///
    /// An amount exactly equal to a bound belongs to the lower band.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::BandNotFound`] if no band covers the amount.
    /// A table built through [`TaxTable::new`] always ends in an unbounded
    /// band, so this is unreachable for validated tables; the lookup stays
    /// total rather than panicking.
    pub fn band_for(&self, amount: Decimal) -> EngineResult<(&TaxBand, Decimal)> {
        let mut lower_edge = Decimal::ZERO;
        for band in &self.bands {
            match band.upper_bound {
                Some(upper) if amount > upper => lower_edge = upper,
                _ => return Ok((band, lower_edge)),
            }
        }
        Err(EngineError::BandNotFound {
            period: self.period.to_string(),
            amount,
        })
    }
}

/// Fixed relief amounts subtracted from gross computed tax.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaxReliefs {
    personal: Decimal,
    insurance: Decimal,
}

impl TaxReliefs {
    /// Creates validated reliefs; both amounts must be non-negative.
    pub fn new(personal: Decimal, insurance: Decimal) -> EngineResult<Self> {
        if personal < Decimal::ZERO {
            return Err(EngineError::InvalidSchedule {
                component: "tax reliefs".to_string(),
                message: format!("personal relief must not be negative, got {}", personal),
            });
        }
        if insurance < Decimal::ZERO {
            return Err(EngineError::InvalidSchedule {
                component: "tax reliefs".to_string(),
                message: format!("insurance relief must not be negative, got {}", insurance),
            });
        }
        Ok(Self { personal, insurance })
    }

    /// The personal relief amount.
    pub fn personal(&self) -> Decimal {
        self.personal
    }

    /// The insurance relief amount.
    pub fn insurance(&self) -> Decimal {
        self.insurance
    }

    /// The total relief subtracted from gross tax.
    pub fn total(&self) -> Decimal {
        self.personal + self.insurance
    }
}

/// The tiered pension contribution rule.
///
/// Tier I applies the rate to earnings up to `tier1_cap`; Tier II applies
/// the same rate to earnings between `tier1_cap` and `tier2_cap`. Earnings
/// above `tier2_cap` attract no further contribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PensionTiers {
    rate: Decimal,
    tier1_cap: Decimal,
    tier2_cap: Decimal,
    effective_from: NaiveDate,
}

impl PensionTiers {
    /// Creates a validated pension tier rule.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidSchedule`] if the rate is outside
    /// `0..=1`, the Tier I cap is not positive, or the Tier II cap does not
    /// exceed the Tier I cap.
    pub fn new(
        rate: Decimal,
        tier1_cap: Decimal,
        tier2_cap: Decimal,
        effective_from: NaiveDate,
    ) -> EngineResult<Self> {
        let invalid = |message: String| EngineError::InvalidSchedule {
            component: "pension tiers".to_string(),
            message,
        };
        if rate < Decimal::ZERO || rate > Decimal::ONE {
            return Err(invalid(format!("rate {} is outside the range 0..=1", rate)));
        }
        if tier1_cap <= Decimal::ZERO {
            return Err(invalid(format!(
                "tier I cap must be positive, got {}",
                tier1_cap
            )));
        }
        if tier2_cap <= tier1_cap {
            return Err(invalid(format!(
                "tier II cap {} must exceed tier I cap {}",
                tier2_cap, tier1_cap
            )));
        }
        Ok(Self {
            rate,
            tier1_cap,
            tier2_cap,
            effective_from,
        })
    }

    /// The contribution rate applied within both tiers.
    pub fn rate(&self) -> Decimal {
        self.rate
    }

    /// The upper earnings limit of Tier I.
    pub fn tier1_cap(&self) -> Decimal {
        self.tier1_cap
    }

    /// The upper earnings limit of Tier II.
    pub fn tier2_cap(&self) -> Decimal {
        self.tier2_cap
    }

    /// The date from which these tiers are in force.
    pub fn effective_from(&self) -> NaiveDate {
        self.effective_from
    }
}

/// A flat statutory levy on gross salary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatutoryLevy {
    code: DeductionCode,
    name: String,
    rate: Decimal,
    statute_ref: String,
    effective_from: NaiveDate,
}

impl StatutoryLevy {
    /// Creates a validated levy; the rate must be within `0..=1`.
    pub fn new(
        code: DeductionCode,
        name: &str,
        rate: Decimal,
        statute_ref: &str,
        effective_from: NaiveDate,
    ) -> EngineResult<Self> {
        if rate < Decimal::ZERO || rate > Decimal::ONE {
            return Err(EngineError::InvalidSchedule {
                component: name.to_string(),
                message: format!("rate {} is outside the range 0..=1", rate),
            });
        }
        Ok(Self {
            code,
            name: name.to_string(),
            rate,
            statute_ref: statute_ref.to_string(),
            effective_from,
        })
    }

    /// The deduction code this levy is reported under.
    pub fn code(&self) -> DeductionCode {
        self.code
    }

    /// The display name of the levy.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The flat rate applied to gross salary.
    pub fn rate(&self) -> Decimal {
        self.rate
    }

    /// The statutory instrument the levy derives from.
    pub fn statute_ref(&self) -> &str {
        &self.statute_ref
    }

    /// The date from which the levy is in force.
    pub fn effective_from(&self) -> NaiveDate {
        self.effective_from
    }
}

/// The complete statutory deduction schedule the calculators run against.
///
/// Holds both tax tables with their reliefs, the pension tiers, and the two
/// flat levies. The parts are validated individually by their own
/// constructors; this aggregate only checks that each table sits in the
/// slot matching its period.
#[derive(Debug, Clone)]
pub struct StatutoryConfig {
    monthly_tax: TaxTable,
    monthly_reliefs: TaxReliefs,
    annual_tax: TaxTable,
    annual_reliefs: TaxReliefs,
    pension: PensionTiers,
    health_levy: StatutoryLevy,
    housing_levy: StatutoryLevy,
}

impl StatutoryConfig {
    /// Assembles a schedule from validated parts.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidSchedule`] if a tax table is placed in
    /// the slot of the other period.
    pub fn new(
        monthly_tax: TaxTable,
        monthly_reliefs: TaxReliefs,
        annual_tax: TaxTable,
        annual_reliefs: TaxReliefs,
        pension: PensionTiers,
        health_levy: StatutoryLevy,
        housing_levy: StatutoryLevy,
    ) -> EngineResult<Self> {
        if monthly_tax.period() != TaxPeriod::Monthly {
            return Err(EngineError::InvalidSchedule {
                component: "statutory config".to_string(),
                message: format!(
                    "table in the monthly slot has period {}",
                    monthly_tax.period()
                ),
            });
        }
        if annual_tax.period() != TaxPeriod::Annual {
            return Err(EngineError::InvalidSchedule {
                component: "statutory config".to_string(),
                message: format!(
                    "table in the annual slot has period {}",
                    annual_tax.period()
                ),
            });
        }
        Ok(Self {
            monthly_tax,
            monthly_reliefs,
            annual_tax,
            annual_reliefs,
            pension,
            health_levy,
            housing_levy,
        })
    }

    /// The monthly PAYE band table.
    pub fn monthly_tax(&self) -> &TaxTable {
        &self.monthly_tax
    }

    /// The reliefs applied against monthly PAYE.
    pub fn monthly_reliefs(&self) -> &TaxReliefs {
        &self.monthly_reliefs
    }

    /// The annual PAYE band table.
    pub fn annual_tax(&self) -> &TaxTable {
        &self.annual_tax
    }

    /// The reliefs applied against annual PAYE.
    pub fn annual_reliefs(&self) -> &TaxReliefs {
        &self.annual_reliefs
    }

    /// The pension contribution tiers.
    pub fn pension(&self) -> &PensionTiers {
        &self.pension
    }

    /// The health insurance levy.
    pub fn health_levy(&self) -> &StatutoryLevy {
        &self.health_levy
    }

    /// The housing levy.
    pub fn housing_levy(&self) -> &StatutoryLevy {
        &self.housing_levy
    }
}
