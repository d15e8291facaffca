//! Report command - write the occupancy report file(s) for a property

use super::BookingArgs;
use anyhow::Context;
use bachcal::report::{CsvWriter, ReportWriter, XlsxWriter};
use clap::{Args, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum ReportFormat {
    /// Per-day ledger as CSV
    Csv,
    /// Month grid and Summary of Use workbook
    #[default]
    Xlsx,
    /// Both CSV and XLSX
    All,
}

#[derive(Args, Debug)]
pub struct ReportCommand {
    #[command(flatten)]
    bookings: BookingArgs,

    /// Property id, names the output file. Overrides the input file
    #[arg(short, long)]
    property: Option<u64>,

    /// Directory the report files are written to
    #[arg(short, long, env = "BACHCAL_OUTPUT_DIR", default_value = ".")]
    output_dir: PathBuf,

    /// Report file format
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Xlsx)]
    format: ReportFormat,
}

impl ReportCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let loaded = self.bookings.load()?;
        let property_id = self
            .property
            .or(loaded.property_id)
            .context("no property id given: pass --property or set property_id in the input")?;
        let calendar = loaded.calendar();

        let writers: Vec<Box<dyn ReportWriter>> = match self.format {
            ReportFormat::Csv => vec![Box::new(CsvWriter::new(&self.output_dir))],
            ReportFormat::Xlsx => vec![Box::new(XlsxWriter::new(&self.output_dir))],
            ReportFormat::All => vec![
                Box::new(CsvWriter::new(&self.output_dir)),
                Box::new(XlsxWriter::new(&self.output_dir)),
            ],
        };

        for writer in writers {
            let path = writer
                .write(property_id, &calendar)
                .with_context(|| format!("writing {} report for property {}", writer.extension(), property_id))?;
            println!("{}", path.display());
        }
        Ok(())
    }
}
