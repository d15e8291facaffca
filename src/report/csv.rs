use super::{ReportError, ReportWriter};
use crate::ledger::Calendar;
use rust_decimal::Decimal;
use std::io::Write;
use std::path::{Path, PathBuf};

pub const HEADER: [&str; 3] = ["date", "nightly_rate", "booking_type"];

/// Writes `<property_id>.csv`: one row per date, unbooked dates as a bare date
#[derive(Debug, Clone)]
pub struct CsvWriter {
    output_dir: PathBuf,
}

impl CsvWriter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        CsvWriter {
            output_dir: output_dir.into(),
        }
    }

    /// Serialize the calendar to any writer
    pub fn write_to<W: Write>(calendar: &Calendar, writer: W) -> Result<(), ReportError> {
        // Unbooked dates are short rows, so record lengths vary
        let mut wtr = csv::WriterBuilder::new().flexible(true).from_writer(writer);
        wtr.write_record(HEADER)?;

        for (date, entry) in calendar.iter() {
            let date = date.format("%Y-%m-%d").to_string();
            match entry {
                None => wtr.write_record([date.as_str()])?,
                Some(occupancy) => {
                    let rate = occupancy.nightly_rate.map(format_rate).unwrap_or_default();
                    let booking_type = occupancy.booking_type.as_deref().unwrap_or_default();
                    wtr.write_record([date.as_str(), rate.as_str(), booking_type])?;
                }
            }
        }

        wtr.flush().map_err(::csv::Error::from)?;
        Ok(())
    }
}

impl ReportWriter for CsvWriter {
    fn extension(&self) -> &'static str {
        "csv"
    }

    fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    fn render(&self, _property_id: u64, calendar: &Calendar) -> Result<Vec<u8>, ReportError> {
        let mut buffer = Vec::new();
        CsvWriter::write_to(calendar, &mut buffer)?;
        Ok(buffer)
    }
}

/// Plain decimal with trailing zeros trimmed (`0.00` -> `0`)
fn format_rate(rate: Decimal) -> String {
    rate.normalize().to_string()
}
