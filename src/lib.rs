//! Fixed-rate mortgage amortization.
//!
//! [`loan::compute_schedule`] turns a [`LoanParameters`] value into a
//! month-by-month [`Schedule`] for equal-principal, annuity and bullet
//! repayment. The remaining modules are thin collaborators around it:
//! TOML parameter persistence, text reports and CSV export.

pub mod error;
pub mod export;
pub mod loan;
pub mod report;

#[cfg(feature = "serde")]
pub mod config;

pub use error::{ExportError, LoanError};
pub use loan::{
    compute_schedule, LoanParameters, Money, PeriodRecord, RepaymentMethod, RoundingPolicy,
    Schedule,
};

#[cfg(feature = "serde")]
pub use error::ConfigError;
