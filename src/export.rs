//! CSV export of a schedule.

use crate::error::ExportError;
use crate::loan::Schedule;
use log::info;
use std::fs::File;
use std::io::Write;
use std::path::Path;

pub const COLUMNS: [&str; 7] = [
    "sequence",
    "total_payment",
    "interest",
    "interest_cumulative",
    "principal",
    "principal_cumulative",
    "remaining_balance",
];

/// Writes a header row and one row per period to `writer`.
pub fn write_csv<W: Write>(schedule: &Schedule, writer: W) -> Result<(), ExportError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(COLUMNS)?;
    for rec in schedule {
        wtr.write_record([
            rec.sequence.to_string(),
            rec.total_payment.to_string(),
            rec.interest.to_string(),
            rec.interest_cumulative.to_string(),
            rec.principal.to_string(),
            rec.principal_cumulative.to_string(),
            rec.remaining_balance.to_string(),
        ])?;
    }
    wtr.flush().map_err(csv::Error::from)?;
    Ok(())
}

pub fn export_csv(schedule: &Schedule, path: &Path) -> Result<(), ExportError> {
    let file = File::create(path).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    write_csv(schedule, file)?;
    info!("wrote {} periods to {}", schedule.len(), path.display());
    Ok(())
}
