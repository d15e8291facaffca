//! Calendar command - per-day ledger for the tax year

use super::BookingArgs;
use bachcal::ledger::Calendar;
use bachcal::report::CsvWriter;
use clap::Args;
use std::io;
use tabled::{
    settings::{object::Columns, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Args, Debug)]
pub struct CalendarCommand {
    #[command(flatten)]
    bookings: BookingArgs,

    /// Only show booked nights
    #[arg(long)]
    booked: bool,

    /// Output as CSV instead of formatted table
    #[arg(long)]
    csv: bool,
}

/// Row for the calendar table output
#[derive(Debug, Clone, Tabled)]
struct CalendarRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Booked By")]
    booked_by: String,
    #[tabled(rename = "Nightly Rate")]
    nightly_rate: String,
}

impl CalendarCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let calendar = self.bookings.load()?.calendar();

        if self.csv {
            CsvWriter::write_to(&calendar, io::stdout().lock())?;
        } else {
            self.print_table(&calendar);
        }
        Ok(())
    }

    fn print_table(&self, calendar: &Calendar) {
        let rows: Vec<CalendarRow> = calendar
            .iter()
            .filter(|(_, entry)| !self.booked || entry.is_some())
            .map(|(date, entry)| CalendarRow {
                date: date.format("%a %Y-%m-%d").to_string(),
                booked_by: entry
                    .and_then(|o| o.booking_type.clone())
                    .unwrap_or_default(),
                nightly_rate: entry
                    .and_then(|o| o.nightly_rate)
                    .map(|r| format!("{:.2}", r))
                    .unwrap_or_default(),
            })
            .collect();

        if rows.is_empty() {
            println!("No booked nights in {}", calendar.tax_year());
            return;
        }

        let table = Table::new(rows)
            .with(Style::rounded())
            .with(Modify::new(Columns::new(2..)).with(Alignment::right()))
            .to_string();
        println!("Occupancy {}", calendar.tax_year());
        println!("{}", table);
    }
}
