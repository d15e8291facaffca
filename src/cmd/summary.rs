//! Summary command - Summary of Use totals per booking category

use super::BookingArgs;
use bachcal::ledger::{SummaryOfUse, TaxYear, Totals};
use clap::Args;
use rust_decimal::Decimal;
use serde::Serialize;
use tabled::{
    settings::{object::Columns, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Args, Debug)]
pub struct SummaryCommand {
    #[command(flatten)]
    bookings: BookingArgs,

    /// Output as JSON instead of formatted text
    #[arg(long)]
    json: bool,
}

/// Summary data for JSON output
#[derive(Debug, Serialize)]
struct SummaryData<'a> {
    tax_year: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    property_id: Option<u64>,
    #[serde(flatten)]
    summary: &'a SummaryOfUse,
}

#[derive(Debug, Tabled)]
struct SummaryRow {
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Booking Type")]
    booking_type: String,
    #[tabled(rename = "Days")]
    days: u32,
    #[tabled(rename = "Value")]
    value: String,
}

impl SummaryCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let loaded = self.bookings.load()?;
        let summary = SummaryOfUse::from_calendar(&loaded.calendar())?;

        if self.json {
            let data = SummaryData {
                tax_year: loaded.tax_year.display(),
                property_id: loaded.property_id,
                summary: &summary,
            };
            println!("{}", serde_json::to_string_pretty(&data)?);
        } else {
            print_summary(&summary, loaded.tax_year);
        }
        Ok(())
    }
}

fn print_summary(summary: &SummaryOfUse, year: TaxYear) {
    let mut rows = Vec::new();
    for category in &summary.categories {
        for line in &category.lines {
            rows.push(row(category.category.label(), &line.booking_type, line.totals));
        }
        rows.push(row(category.category.label(), "Total", category.subtotal));
    }
    rows.push(row("Property", "Total", summary.total));

    let table = Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(2..)).with(Alignment::right()))
        .to_string();

    println!();
    println!("SUMMARY OF USE ({})", year);
    println!();
    println!("{}", table);

    if !summary.unclassified.is_empty() {
        println!();
        println!("Not included: {}", summary.unclassified.join(", "));
    }
}

fn row(category: &str, booking_type: &str, totals: Totals) -> SummaryRow {
    SummaryRow {
        category: category.to_string(),
        booking_type: booking_type.to_string(),
        days: totals.days,
        value: format_money(totals.value),
    }
}

fn format_money(amount: Decimal) -> String {
    format!("${:.2}", amount)
}
