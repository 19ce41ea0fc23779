use chrono::NaiveDate;
use clap::{Parser, ValueEnum};
use log::{error, info, warn, LevelFilter};
use mortgage::{config, export, report};
use mortgage::{LoanParameters, RepaymentMethod, RoundingPolicy};
use simple_logger::SimpleLogger;
use std::path::{Path, PathBuf};
use std::process;
use std::time::Instant;

/// Month-by-month mortgage amortization schedules
#[derive(Parser, Debug)]
#[command(name = "mortgage", version, about)]
struct Cli {
    /// Parameter file; flags below override its values
    #[arg(long, default_value = "config/loan.toml")]
    config: PathBuf,

    /// Do not write the effective parameters back to the parameter file
    #[arg(long)]
    no_save: bool,

    /// Loan principal in whole currency units
    #[arg(long)]
    principal: Option<i64>,

    /// Annual interest rate in percent
    #[arg(long)]
    rate: Option<f64>,

    /// Loan term
    #[arg(long)]
    term: Option<u32>,

    #[arg(long, value_enum, default_value_t = Unit::Years)]
    term_unit: Unit,

    /// Interest-only grace period
    #[arg(long)]
    grace: Option<u32>,

    #[arg(long, value_enum, default_value_t = Unit::Years)]
    grace_unit: Unit,

    #[arg(long, value_enum)]
    method: Option<Method>,

    #[arg(long, value_enum)]
    rounding: Option<Rounding>,

    /// Which table to print
    #[arg(long, value_enum, default_value_t = View::Monthly)]
    view: View,

    /// Date of the first payment (YYYY-MM-DD); adds a due date column
    #[arg(long)]
    first_payment: Option<NaiveDate>,

    /// Also write the schedule to this CSV file
    #[arg(long)]
    csv: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    log_level: LogLevel,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Unit {
    Years,
    Months,
}

impl Unit {
    fn to_months(self, value: u32) -> Result<u32, String> {
        match self {
            Unit::Years => value
                .checked_mul(12)
                .ok_or_else(|| format!("{} years does not fit in a month count", value)),
            Unit::Months => Ok(value),
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Method {
    /// Equal principal and interest (annuity)
    Annuity,
    EqualPrincipal,
    Bullet,
}

impl From<Method> for RepaymentMethod {
    fn from(method: Method) -> Self {
        match method {
            Method::Annuity => RepaymentMethod::EqualPrincipalAndInterest,
            Method::EqualPrincipal => RepaymentMethod::EqualPrincipal,
            Method::Bullet => RepaymentMethod::Bullet,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Rounding {
    Nearest,
    Up,
    Down,
}

impl From<Rounding> for RoundingPolicy {
    fn from(rounding: Rounding) -> Self {
        match rounding {
            Rounding::Nearest => RoundingPolicy::Nearest,
            Rounding::Up => RoundingPolicy::Up,
            Rounding::Down => RoundingPolicy::Down,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum View {
    Monthly,
    Yearly,
    Both,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = SimpleLogger::new().with_level(cli.log_level.into()).init() {
        eprintln!("cannot initialise logging: {}", e);
    }

    if let Err(e) = run(&cli) {
        error!("{}", e);
        process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let params = apply_overrides(cli, stored_parameters(&cli.config))?;
    info!("{}", params);

    let started = Instant::now();
    let schedule = params.schedule()?;
    info!(
        "calculated {} periods in {:.3} ms",
        schedule.len(),
        started.elapsed().as_secs_f64() * 1000.
    );

    print!("{}", report::render_summary(&params, &schedule));
    println!();
    if cli.view != View::Yearly {
        print!("{}", report::render_schedule(&schedule, cli.first_payment));
    }
    if cli.view != View::Monthly {
        if cli.view == View::Both {
            println!();
        }
        print!("{}", report::render_yearly(&report::yearly_rollup(&schedule)));
    }

    if let Some(path) = &cli.csv {
        export::export_csv(&schedule, path)?;
    }
    if !cli.no_save {
        config::save(&params, &cli.config)?;
    }
    Ok(())
}

// an unreadable parameter file should not block a calculation
fn stored_parameters(path: &Path) -> LoanParameters {
    config::load_or_default(path).unwrap_or_else(|e| {
        warn!("{}; using default parameters", e);
        LoanParameters::default()
    })
}

fn apply_overrides(cli: &Cli, mut params: LoanParameters) -> Result<LoanParameters, String> {
    if let Some(principal) = cli.principal {
        params.principal = principal;
    }
    if let Some(rate) = cli.rate {
        params.annual_rate_percent = rate;
    }
    if let Some(term) = cli.term {
        params.term_months = cli.term_unit.to_months(term)?;
    }
    if let Some(grace) = cli.grace {
        params.grace_months = cli.grace_unit.to_months(grace)?;
    }
    if let Some(method) = cli.method {
        params.repayment_method = method.into();
    }
    if let Some(rounding) = cli.rounding {
        params.rounding_policy = rounding.into();
    }
    Ok(params)
}
