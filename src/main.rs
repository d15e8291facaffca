use clap::{Parser, Subcommand};

mod cmd;

#[derive(Parser, Debug)]
#[command(name = "bachcal", version, about = "Holiday home occupancy calendars and Summary of Use reports")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write the occupancy report (CSV and/or XLSX) for a property
    Report(cmd::report::ReportCommand),
    /// Show the per-day ledger for the tax year
    Calendar(cmd::calendar::CalendarCommand),
    /// Show nights and value per Summary of Use category
    Summary(cmd::summary::SummaryCommand),
    /// Print the booking input formats
    Schema(cmd::schema::SchemaCommand),
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Command::Report(report) => report.exec(),
        Command::Calendar(calendar) => calendar.exec(),
        Command::Summary(summary) => summary.exec(),
        Command::Schema(schema) => schema.exec(),
    }
}
