use crate::error::LoanError;
use log::{debug, trace};
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Integer monetary units.
pub type Money = i64;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum RepaymentMethod {
    /// Same principal every period, interest shrinks with the balance.
    EqualPrincipal,
    /// Same total payment every period (annuity).
    #[default]
    EqualPrincipalAndInterest,
    /// Interest only, principal repaid in full at maturity.
    Bullet,
}

impl fmt::Display for RepaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RepaymentMethod::EqualPrincipal => "equal principal",
            RepaymentMethod::EqualPrincipalAndInterest => "equal principal and interest",
            RepaymentMethod::Bullet => "bullet",
        };
        f.write_str(name)
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum RoundingPolicy {
    /// Half away from zero.
    #[default]
    Nearest,
    Up,
    /// Truncate toward zero.
    Down,
}

impl RoundingPolicy {
    /// Rounds `amt` to a whole monetary unit.
    pub fn apply(self, amt: f64) -> f64 {
        match self {
            RoundingPolicy::Nearest => amt.round(),
            RoundingPolicy::Up => amt.ceil(),
            RoundingPolicy::Down => amt.trunc(),
        }
    }
}

impl fmt::Display for RoundingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RoundingPolicy::Nearest => "nearest",
            RoundingPolicy::Up => "up",
            RoundingPolicy::Down => "down",
        };
        f.write_str(name)
    }
}

/// Inputs of a single schedule calculation.
///
/// Missing keys in a persisted document fall back to [`LoanParameters::default`].
#[derive(Clone, Copy, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct LoanParameters {
    pub principal: Money,
    pub annual_rate_percent: f64,
    pub term_months: u32,
    pub grace_months: u32,
    pub repayment_method: RepaymentMethod,
    pub rounding_policy: RoundingPolicy,
}

impl Default for LoanParameters {
    fn default() -> Self {
        Self {
            principal: 100_000_000,
            annual_rate_percent: 4.,
            term_months: 360,
            grace_months: 0,
            repayment_method: RepaymentMethod::EqualPrincipalAndInterest,
            rounding_policy: RoundingPolicy::Nearest,
        }
    }
}

impl LoanParameters {
    pub fn new(
        principal: Money,
        annual_rate_percent: f64,
        term_months: u32,
        grace_months: u32,
        repayment_method: RepaymentMethod,
        rounding_policy: RoundingPolicy,
    ) -> Self {
        Self {
            principal,
            annual_rate_percent,
            term_months,
            grace_months,
            repayment_method,
            rounding_policy,
        }
    }

    /// Checks every precondition of [`compute_schedule`].
    pub fn validate(&self) -> Result<(), LoanError> {
        if self.principal < 0 {
            return Err(LoanError::invalid(
                "principal",
                format!("must not be negative, got {}", self.principal),
            ));
        }
        if !self.annual_rate_percent.is_finite() || self.annual_rate_percent < 0. {
            return Err(LoanError::invalid(
                "annual_rate_percent",
                format!(
                    "must be a finite non-negative percentage, got {}",
                    self.annual_rate_percent
                ),
            ));
        }
        if self.term_months == 0 {
            return Err(LoanError::invalid("term_months", "must be at least 1"));
        }
        if self.grace_months >= self.term_months {
            return Err(LoanError::invalid(
                "grace_months",
                format!(
                    "must be shorter than the term ({} >= {})",
                    self.grace_months, self.term_months
                ),
            ));
        }
        Ok(())
    }

    /// Nominal annual rate divided evenly across twelve months.
    pub fn monthly_rate(&self) -> f64 {
        self.annual_rate_percent / 100. / 12.
    }

    /// Number of periods that repay principal for the level-amount formulas.
    pub fn amortizing_months(&self) -> u32 {
        self.term_months - self.grace_months
    }

    pub fn schedule(&self) -> Result<Schedule, LoanError> {
        compute_schedule(self)
    }
}

impl fmt::Display for LoanParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "principal {}, rate {}%, term {} months, grace {} months, {} repayment, {} rounding",
            self.principal,
            self.annual_rate_percent,
            self.term_months,
            self.grace_months,
            self.repayment_method,
            self.rounding_policy
        )
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct PeriodRecord {
    pub sequence: u32,
    pub total_payment: Money,
    pub interest: Money,
    pub interest_cumulative: Money,
    pub principal: Money,
    pub principal_cumulative: Money,
    pub remaining_balance: Money,
}

impl fmt::Display for PeriodRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "period {}, payment {}, interest {} (total {}), principal {} (total {}), remaining balance {}",
            self.sequence,
            self.total_payment,
            self.interest,
            self.interest_cumulative,
            self.principal,
            self.principal_cumulative,
            self.remaining_balance
        )
    }
}

/// Result of [`compute_schedule`].
#[derive(Clone, PartialEq, Debug)]
pub struct Schedule {
    installment: Money,
    records: Vec<PeriodRecord>,
}

impl Schedule {
    /// The level amount of the method: the annuity payment, the equal
    /// principal step, or the fixed bullet interest.
    pub fn installment(&self) -> Money {
        self.installment
    }

    pub fn records(&self) -> &[PeriodRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn last(&self) -> Option<&PeriodRecord> {
        self.records.last()
    }

    /// Record for a 1-based period number.
    pub fn period(&self, sequence: u32) -> Option<&PeriodRecord> {
        let idx = (sequence as usize).checked_sub(1)?;
        self.records.get(idx)
    }

    pub fn total_interest(&self) -> Money {
        self.last().map_or(0, |rec| rec.interest_cumulative)
    }

    pub fn total_paid(&self) -> Money {
        self.last()
            .map_or(0, |rec| rec.interest_cumulative.saturating_add(rec.principal_cumulative))
    }
}

impl<'a> IntoIterator for &'a Schedule {
    type Item = &'a PeriodRecord;
    type IntoIter = std::slice::Iter<'a, PeriodRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Computes the month-by-month amortization schedule for `params`.
///
/// The last period always repays whatever balance is left, so the final
/// record has a zero balance and its cumulative principal equals the loan
/// principal regardless of rounding.
pub fn compute_schedule(params: &LoanParameters) -> Result<Schedule, LoanError> {
    params.validate()?;

    let installment = match params.repayment_method {
        RepaymentMethod::EqualPrincipalAndInterest => get_level_payment(params)?,
        RepaymentMethod::EqualPrincipal => get_principal_step(params)?,
        RepaymentMethod::Bullet => get_bullet_interest(params)?,
    };
    debug!(
        "{} repayment, level amount {}",
        params.repayment_method, installment
    );

    let records = add_scheduled_periods(params, installment)?;
    let schedule = Schedule {
        installment,
        records,
    };
    debug!("total interest {}", schedule.total_interest());
    Ok(schedule)
}

fn to_money(amt: f64, what: &str) -> Result<Money, LoanError> {
    // i64::MAX as f64 rounds up to 2^63, which is already out of range
    if amt.is_finite() && amt.abs() < i64::MAX as f64 {
        Ok(amt as Money)
    } else {
        Err(LoanError::degenerate(format!("{} is out of range ({})", what, amt)))
    }
}

// annuity payment over the amortizing months, always rounded to nearest
fn get_level_payment(params: &LoanParameters) -> Result<Money, LoanError> {
    if params.principal == 0 {
        return Ok(0);
    }
    let periods = params.amortizing_months() as f64;
    let rate = params.monthly_rate();
    let principal = params.principal as f64;
    let factor = (1. + rate).powf(periods);

    if rate == 0. || factor - 1. <= 0. {
        // no interest: the payment is a plain division
        return to_money(
            params.rounding_policy.apply(principal / periods),
            "level payment",
        );
    }
    to_money(
        ((principal * rate * factor) / (factor - 1.)).round(),
        "level payment",
    )
}

fn get_principal_step(params: &LoanParameters) -> Result<Money, LoanError> {
    let periods = params.amortizing_months() as f64;
    to_money(
        params
            .rounding_policy
            .apply(params.principal as f64 / periods),
        "principal installment",
    )
}

// the balance never moves before maturity, so one interest amount serves every period
fn get_bullet_interest(params: &LoanParameters) -> Result<Money, LoanError> {
    to_money(
        params
            .rounding_policy
            .apply(params.principal as f64 * params.monthly_rate()),
        "bullet interest",
    )
}

fn add_scheduled_periods(
    params: &LoanParameters,
    installment: Money,
) -> Result<Vec<PeriodRecord>, LoanError> {
    let method = params.repayment_method;
    let policy = params.rounding_policy;
    let rate = params.monthly_rate();
    let term = params.term_months;
    let grace = match method {
        RepaymentMethod::Bullet => 0,
        _ => params.grace_months,
    };

    let mut records = Vec::with_capacity(term as usize);
    let mut residual = params.principal; // outstanding balance
    let mut interest_sum: Money = 0;
    let mut principal_sum: Money = 0;

    for idx in 0..term {
        let interest = match method {
            RepaymentMethod::Bullet => installment,
            _ => to_money(policy.apply(residual as f64 * rate), "period interest")?,
        };

        let principal = if idx < grace {
            0
        } else if idx == term - 1 {
            residual
        } else {
            let due = match method {
                RepaymentMethod::EqualPrincipalAndInterest => installment - interest,
                RepaymentMethod::EqualPrincipal => installment,
                RepaymentMethod::Bullet => 0,
            };
            // rounding may ask for less than nothing or more than is left
            due.clamp(0, residual)
        };
        residual -= principal;
        principal_sum += principal;
        interest_sum = interest_sum
            .checked_add(interest)
            .ok_or_else(|| LoanError::degenerate("cumulative interest overflows"))?;
        let total_payment = interest
            .checked_add(principal)
            .ok_or_else(|| LoanError::degenerate("period payment overflows"))?;

        trace!(
            "period {}, interest {}, principal {}, balance {}",
            idx + 1,
            interest,
            principal,
            residual
        );

        records.push(PeriodRecord {
            sequence: idx + 1,
            total_payment,
            interest,
            interest_cumulative: interest_sum,
            principal,
            principal_cumulative: principal_sum,
            remaining_balance: residual,
        });
    }
    Ok(records)
}
