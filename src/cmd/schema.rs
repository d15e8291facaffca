//! Schema command - print expected input formats

use bachcal::ledger::BookingInput;
use clap::Args;
use schemars::schema_for;

#[derive(Args, Debug)]
pub struct SchemaCommand {
    /// Output format: json-schema or csv-header
    #[arg(value_enum, default_value = "json-schema")]
    format: SchemaFormat,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum SchemaFormat {
    /// JSON Schema for the booking input
    JsonSchema,
    /// CSV header row with column names
    CsvHeader,
    /// CSV column descriptions
    CsvFields,
}

impl SchemaCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        match self.format {
            SchemaFormat::JsonSchema => {
                let schema = schema_for!(BookingInput);
                println!("{}", serde_json::to_string_pretty(&schema)?);
            }
            SchemaFormat::CsvHeader => {
                println!("{}", CSV_FIELDS.iter().map(|(name, _, _)| *name).collect::<Vec<_>>().join(","));
            }
            SchemaFormat::CsvFields => {
                println!("CSV Input Format");
                println!("================");
                println!();
                for (name, required, description) in CSV_FIELDS {
                    let req = if *required { "required" } else { "optional" };
                    println!("{:14} ({:8})  {}", name, req, description);
                }
                println!();
                println!("Rows are applied in order: a later booking wins any night it shares with an earlier one.");
            }
        }
        Ok(())
    }
}

const CSV_FIELDS: &[(&str, bool, &str)] = &[
    ("start_date", true, "First night of the stay (YYYY-MM-DD)"),
    ("end_date", true, "Departure date, not occupied (YYYY-MM-DD)"),
    ("nightly_rate", false, "Charge per night"),
    (
        "booking_type",
        false,
        "Label, e.g. Owner, Customer, Bachcare (drives the Summary of Use)",
    ),
];
