pub mod calendar;
pub mod report;
pub mod schema;
pub mod summary;

use anyhow::Context;
use bachcal::ledger::{self, Booking, BookingInput, Calendar, TaxYear};
use clap::{Args, ValueEnum};
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum InputFormat {
    Json,
    Csv,
}

/// Booking source and tax year, shared by every command that builds a calendar
#[derive(Args, Debug)]
pub struct BookingArgs {
    /// Bookings file (JSON or CSV). Reads from stdin with "-"
    #[arg(short, long, default_value = "-")]
    input: PathBuf,

    /// Input format (inferred from the file extension, JSON for stdin)
    #[arg(long, value_enum)]
    input_format: Option<InputFormat>,

    /// Start year of the tax year (e.g., 2021 for 2021/22). Overrides the input file
    #[arg(short, long, env = "BACHCAL_TAX_YEAR", value_parser = clap::value_parser!(i32).range(1000..=9998))]
    year: Option<i32>,
}

/// Bookings read from the input, with optional metadata from a JSON root
pub struct LoadedBookings {
    pub property_id: Option<u64>,
    pub tax_year: TaxYear,
    pub bookings: Vec<Booking>,
}

impl LoadedBookings {
    pub fn calendar(&self) -> Calendar {
        Calendar::build(&self.bookings, self.tax_year)
    }
}

impl BookingArgs {
    pub fn load(&self) -> anyhow::Result<LoadedBookings> {
        let format = self.input_format.unwrap_or_else(|| infer_format(&self.input));
        let input = read_input(&self.input, format)
            .with_context(|| format!("reading bookings from {}", self.input.display()))?;

        let year = self
            .year
            .or(input.tax_year)
            .context("no tax year given: pass --year or set tax_year in the input")?;
        if !(1000..=9998).contains(&year) {
            anyhow::bail!("tax year {} out of range", year);
        }
        let tax_year = TaxYear::new(year)?;
        let bookings = ledger::records_to_bookings(&input.bookings)?;
        log::info!(
            "Loaded {} bookings for tax year {}",
            bookings.len(),
            tax_year
        );

        Ok(LoadedBookings {
            property_id: input.property_id,
            tax_year,
            bookings,
        })
    }
}

fn infer_format(path: &Path) -> InputFormat {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("csv") => InputFormat::Csv,
        _ => InputFormat::Json,
    }
}

fn read_input(path: &Path, format: InputFormat) -> anyhow::Result<BookingInput> {
    let reader: Box<dyn Read> = if path.as_os_str() == "-" {
        let mut buffer = Vec::new();
        io::stdin().lock().read_to_end(&mut buffer)?;
        if buffer.is_empty() {
            anyhow::bail!("No input received. Provide a file or pipe data to stdin.");
        }
        Box::new(io::Cursor::new(buffer))
    } else {
        Box::new(BufReader::new(File::open(path)?))
    };

    match format {
        InputFormat::Json => ledger::read_json(reader),
        InputFormat::Csv => Ok(BookingInput {
            property_id: None,
            tax_year: None,
            bookings: ledger::read_csv(reader)?,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_from_extension() {
        assert!(matches!(infer_format(Path::new("b.csv")), InputFormat::Csv));
        assert!(matches!(infer_format(Path::new("b.CSV")), InputFormat::Csv));
        assert!(matches!(infer_format(Path::new("b.json")), InputFormat::Json));
        assert!(matches!(infer_format(Path::new("-")), InputFormat::Json));
    }
}
