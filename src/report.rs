//! Text presentation of a schedule: the monthly table, the yearly roll-up
//! and a short summary.

use crate::loan::{LoanParameters, Money, PeriodRecord, RepaymentMethod, Schedule};
use chrono::{Months, NaiveDate};
use tabled::builder::Builder;
use tabled::settings::object::Segment;
use tabled::settings::{Alignment, Modify, Style};

const MONTHS_PER_YEAR: usize = 12;

/// One row of the yearly roll-up.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct YearSummary {
    pub year: u32,
    /// Months in this year, 12 except possibly for the last one.
    pub months: u32,
    pub payment: Money,
    pub interest: Money,
    pub principal: Money,
    pub interest_cumulative: Money,
    pub principal_cumulative: Money,
    pub remaining_balance: Money,
}

/// Rolls the monthly records up into years.
///
/// Every 12th record closes a year; a trailing partial year gets its own row.
pub fn yearly_rollup(schedule: &Schedule) -> Vec<YearSummary> {
    schedule
        .records()
        .chunks(MONTHS_PER_YEAR)
        .zip(1..)
        .filter_map(|(chunk, year)| {
            let closing = chunk.last()?;
            Some(YearSummary {
                year,
                months: chunk.len() as u32,
                payment: sum_of(chunk, |rec| rec.total_payment),
                interest: sum_of(chunk, |rec| rec.interest),
                principal: sum_of(chunk, |rec| rec.principal),
                interest_cumulative: closing.interest_cumulative,
                principal_cumulative: closing.principal_cumulative,
                remaining_balance: closing.remaining_balance,
            })
        })
        .collect()
}

fn sum_of(chunk: &[PeriodRecord], field: impl Fn(&PeriodRecord) -> Money) -> Money {
    chunk.iter().map(field).fold(0, Money::saturating_add)
}

/// Formats an amount with thousands separators, e.g. `1,234,567`.
pub fn format_money(amt: Money) -> String {
    let digits = amt.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if amt < 0 {
        out.push('-');
    }
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Spells an amount in 조/억/만 groups (10^12, 10^8, 10^4), e.g.
/// `1억 2,345만 6,789` for 123,456,789.
pub fn readable_units(amt: Money) -> String {
    const UNITS: [(u64, &str); 3] = [
        (1_000_000_000_000, "조"),
        (100_000_000, "억"),
        (10_000, "만"),
    ];

    let mut rest = amt.unsigned_abs();
    let mut parts = Vec::new();
    for (size, name) in UNITS {
        let count = rest / size;
        if count > 0 {
            parts.push(format!("{}{}", format_money(count as Money), name));
        }
        rest %= size;
    }
    if rest > 0 || parts.is_empty() {
        parts.push(format_money(rest as Money));
    }

    let text = parts.join(" ");
    if amt < 0 {
        format!("-{}", text)
    } else {
        text
    }
}

/// Due date of a 1-based period when the first payment falls on `first_pmt_date`.
///
/// Dates are counted from the first payment so a month-end start stays at
/// month end instead of drifting (Jan 31, Feb 29, Mar 31, ...).
pub fn due_date(first_pmt_date: NaiveDate, sequence: u32) -> Option<NaiveDate> {
    let offset = sequence.checked_sub(1)?;
    first_pmt_date.checked_add_months(Months::new(offset))
}

/// Renders every period as a table, in export column order.
pub fn render_schedule(schedule: &Schedule, first_pmt_date: Option<NaiveDate>) -> String {
    let mut headers = Vec::with_capacity(8);
    if first_pmt_date.is_some() {
        headers.push("Due date");
    }
    headers.extend([
        "No",
        "Payment",
        "Interest",
        "Interest total",
        "Principal",
        "Principal total",
        "Balance",
    ]);

    let rows = schedule
        .records()
        .iter()
        .map(|rec| {
            let mut row = Vec::with_capacity(headers.len());
            if let Some(first) = first_pmt_date {
                row.push(
                    due_date(first, rec.sequence)
                        .map_or_else(|| "-".to_string(), |date| date.to_string()),
                );
            }
            row.push(rec.sequence.to_string());
            row.extend(
                [
                    rec.total_payment,
                    rec.interest,
                    rec.interest_cumulative,
                    rec.principal,
                    rec.principal_cumulative,
                    rec.remaining_balance,
                ]
                .map(format_money),
            );
            row
        })
        .collect::<Vec<_>>();

    render_table(&headers, rows)
}

pub fn render_yearly(years: &[YearSummary]) -> String {
    let headers = [
        "Year",
        "Months",
        "Payment",
        "Interest",
        "Principal",
        "Interest total",
        "Principal total",
        "Balance",
    ];
    let rows = years
        .iter()
        .map(|yr| {
            let mut row = vec![yr.year.to_string(), yr.months.to_string()];
            row.extend(
                [
                    yr.payment,
                    yr.interest,
                    yr.principal,
                    yr.interest_cumulative,
                    yr.principal_cumulative,
                    yr.remaining_balance,
                ]
                .map(format_money),
            );
            row
        })
        .collect::<Vec<_>>();

    render_table(&headers, rows)
}

pub fn render_summary(params: &LoanParameters, schedule: &Schedule) -> String {
    let level = match params.repayment_method {
        RepaymentMethod::EqualPrincipalAndInterest => "Monthly payment",
        RepaymentMethod::EqualPrincipal => "Monthly principal",
        RepaymentMethod::Bullet => "Monthly interest",
    };
    let lines = [
        ("Repayment", params.repayment_method.to_string()),
        (
            "Principal",
            format!(
                "{} ({})",
                format_money(params.principal),
                readable_units(params.principal)
            ),
        ),
        ("Annual rate", format!("{}%", params.annual_rate_percent)),
        (
            "Term",
            format!("{} months ({} grace)", params.term_months, params.grace_months),
        ),
        (level, format_money(schedule.installment())),
        ("Total interest", format_money(schedule.total_interest())),
        ("Total paid", format_money(schedule.total_paid())),
    ];

    let mut out = String::new();
    for (label, value) in lines {
        out.push_str(&format!("{:<19}{}\n", format!("{}:", label), value));
    }
    out
}

// header row, rule, then right-aligned cells
fn render_table(headers: &[&str], rows: Vec<Vec<String>>) -> String {
    let mut builder = Builder::default();
    builder.push_record(headers.iter().copied());
    for row in rows {
        builder.push_record(row);
    }

    let mut table = builder.build();
    table
        .with(Style::psql())
        .with(Modify::new(Segment::all()).with(Alignment::right()));
    format!("{}\n", table)
}
