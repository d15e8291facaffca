//! Spreadsheet report: a month-by-month occupancy grid followed by the Summary of Use box.
//!
//! ```text
//!        | April 2021             | May 2021               | ... | March 2022
//!  Day   | Booked By | Nightly Rate | Booked By | Nightly Rate | ...
//!  1..31 | ...
//!  Total | nights    | value        | ...
//!
//!        | Summary of Use
//!        | Booking Type | Days | Value
//!        | Bachcare Date ...
//! ```

use super::sheet::{Cell, Range, Sheet, Style, Value};
use super::{ReportError, ReportWriter};
use crate::ledger::{Calendar, SummaryError, SummaryOfUse, Totals};
use chrono::NaiveDate;
use rust_xlsxwriter::Workbook;
use std::path::{Path, PathBuf};

pub const SHEET_NAME: &str = "Summary of Use";

// Month grid
pub const TITLE_ROW: u32 = 0;
pub const MONTH_HEADER_ROW: u32 = 2;
pub const COLUMN_HEADER_ROW: u32 = 3;
pub const FIRST_DAY_ROW: u32 = 4;
pub const DAYS_PER_BLOCK: u32 = 31;
pub const MONTH_TOTAL_ROW: u32 = FIRST_DAY_ROW + DAYS_PER_BLOCK;
pub const DAY_COL: u16 = 0;
pub const FIRST_MONTH_COL: u16 = 1;
pub const MONTH_BLOCK_WIDTH: u16 = 2;
pub const BOOKED_BY_OFFSET: u16 = 0;
pub const RATE_OFFSET: u16 = 1;
pub const MONTH_COUNT: u16 = 12;
pub const LAST_GRID_COL: u16 = FIRST_MONTH_COL + MONTH_COUNT * MONTH_BLOCK_WIDTH - 1;

// Summary of Use box
pub const SUMMARY_GAP_ROWS: u32 = 2;
pub const SUMMARY_TOP_ROW: u32 = MONTH_TOTAL_ROW + 1 + SUMMARY_GAP_ROWS;
pub const SUMMARY_LABEL_COL: u16 = FIRST_MONTH_COL;
pub const SUMMARY_DAYS_COL: u16 = SUMMARY_LABEL_COL + 1;
pub const SUMMARY_VALUE_COL: u16 = SUMMARY_LABEL_COL + 2;

const DAY_COL_WIDTH: f64 = 6.0;
const BOOKED_BY_WIDTH: f64 = 18.0;
const RATE_WIDTH: f64 = 13.0;

/// Writes `<property_id>.xlsx`
#[derive(Debug, Clone)]
pub struct XlsxWriter {
    output_dir: PathBuf,
}

impl XlsxWriter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        XlsxWriter {
            output_dir: output_dir.into(),
        }
    }
}

impl ReportWriter for XlsxWriter {
    fn extension(&self) -> &'static str {
        "xlsx"
    }

    fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    fn render(&self, property_id: u64, calendar: &Calendar) -> Result<Vec<u8>, ReportError> {
        let sheet = layout(property_id, calendar)?;

        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(SHEET_NAME)?;
        sheet.write_to(worksheet)?;

        Ok(workbook.save_to_buffer()?)
    }
}

/// Column of a month block's booked-by cell (`block` 0 = April)
pub fn month_col(block: u16) -> u16 {
    FIRST_MONTH_COL + block * MONTH_BLOCK_WIDTH
}

/// Place the whole report on a grid
pub fn layout(property_id: u64, calendar: &Calendar) -> Result<Sheet, ReportError> {
    let mut sheet = Sheet::new();

    sheet.text(
        Cell::new(TITLE_ROW, DAY_COL),
        format!(
            "Property {} - Summary of Use {}",
            property_id,
            calendar.tax_year().display()
        ),
        Style::LABEL,
    );

    layout_month_grid(&mut sheet, calendar)?;
    layout_summary(&mut sheet, &SummaryOfUse::from_calendar(calendar)?);

    Ok(sheet)
}

fn layout_month_grid(sheet: &mut Sheet, calendar: &Calendar) -> Result<(), SummaryError> {
    sheet.set_column_width(DAY_COL, DAY_COL_WIDTH);
    sheet.text(Cell::new(COLUMN_HEADER_ROW, DAY_COL), "Day", Style::HEADING);
    for day in 1..=DAYS_PER_BLOCK {
        sheet.put(
            Cell::new(FIRST_DAY_ROW + day - 1, DAY_COL),
            Value::Count(day),
            Style::HEADING,
        );
    }
    sheet.text(Cell::new(MONTH_TOTAL_ROW, DAY_COL), "Total", Style::TOTAL);

    for (block, (year, month)) in (0..MONTH_COUNT).zip(calendar.tax_year().months()) {
        let booked_col = month_col(block) + BOOKED_BY_OFFSET;
        let rate_col = month_col(block) + RATE_OFFSET;

        sheet.set_column_width(booked_col, BOOKED_BY_WIDTH);
        sheet.set_column_width(rate_col, RATE_WIDTH);

        let month_name = NaiveDate::from_ymd_opt(year, month, 1)
            .map(|d| d.format("%B %Y").to_string())
            .unwrap_or_default();
        sheet.merge(
            Range::new(
                Cell::new(MONTH_HEADER_ROW, booked_col),
                Cell::new(MONTH_HEADER_ROW, rate_col),
            ),
            month_name,
            Style::HEADING,
        );
        sheet.text(Cell::new(COLUMN_HEADER_ROW, booked_col), "Booked By", Style::HEADING);
        sheet.text(Cell::new(COLUMN_HEADER_ROW, rate_col), "Nightly Rate", Style::HEADING);

        let mut month_total = Totals::default();
        for day in 1..=DAYS_PER_BLOCK {
            // Short months leave their trailing rows blank
            let Some(date) = NaiveDate::from_ymd_opt(year, month, day) else {
                continue;
            };
            let Some(occupancy) = calendar.get(date) else {
                continue;
            };
            let row = FIRST_DAY_ROW + day - 1;
            if let Some(booking_type) = &occupancy.booking_type {
                sheet.text(Cell::new(row, booked_col), booking_type.as_str(), Style::PLAIN);
            }
            if let Some(rate) = occupancy.nightly_rate {
                sheet.put(Cell::new(row, rate_col), Value::Money(rate), Style::PLAIN);
            }
            month_total = month_total.with_night(occupancy.nightly_rate)?;
        }

        sheet.put(
            Cell::new(MONTH_TOTAL_ROW, booked_col),
            Value::Count(month_total.days),
            Style::TOTAL,
        );
        sheet.put(
            Cell::new(MONTH_TOTAL_ROW, rate_col),
            Value::Money(month_total.value),
            Style::TOTAL,
        );
    }

    sheet.outline(Range::new(
        Cell::new(MONTH_HEADER_ROW, DAY_COL),
        Cell::new(MONTH_TOTAL_ROW, LAST_GRID_COL),
    ));
    Ok(())
}

fn layout_summary(sheet: &mut Sheet, summary: &SummaryOfUse) {
    let mut row = SUMMARY_TOP_ROW;

    sheet.merge(
        Range::new(
            Cell::new(row, SUMMARY_LABEL_COL),
            Cell::new(row, SUMMARY_VALUE_COL),
        ),
        "Summary of Use",
        Style::HEADING,
    );
    row += 1;

    sheet.text(Cell::new(row, SUMMARY_LABEL_COL), "Booking Type", Style::LABEL);
    sheet.text(Cell::new(row, SUMMARY_DAYS_COL), "Days", Style::HEADING);
    sheet.text(Cell::new(row, SUMMARY_VALUE_COL), "Value", Style::HEADING);
    row += 1;

    for category in &summary.categories {
        sheet.text(Cell::new(row, SUMMARY_LABEL_COL), category.category.label(), Style::LABEL);
        row += 1;

        for line in &category.lines {
            summary_row(sheet, row, &line.booking_type, line.totals, Style::PLAIN);
            row += 1;
        }

        let subtotal_label = format!("{} Total", category.category.label());
        summary_row(sheet, row, &subtotal_label, category.subtotal, Style::TOTAL);
        row += 2;
    }

    summary_row(sheet, row, "Property Total", summary.total, Style::TOTAL);

    sheet.outline(Range::new(
        Cell::new(SUMMARY_TOP_ROW, SUMMARY_LABEL_COL),
        Cell::new(row, SUMMARY_VALUE_COL),
    ));
}

fn summary_row(sheet: &mut Sheet, row: u32, label: &str, totals: Totals, style: Style) {
    sheet.text(Cell::new(row, SUMMARY_LABEL_COL), label, style);
    sheet.put(Cell::new(row, SUMMARY_DAYS_COL), Value::Count(totals.days), style);
    sheet.put(
        Cell::new(row, SUMMARY_VALUE_COL),
        Value::Money(totals.value),
        style,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{generate, Booking};
    use calamine::{open_workbook, Data, Reader, Xlsx};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use tempfile::tempdir;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample_calendar() -> Calendar {
        let bookings = vec![
            Booking::new(date(2021, 4, 7), date(2021, 4, 8), dec!(0), "Owner"),
            Booking::new(date(2021, 6, 30), date(2021, 7, 5), dec!(420.69), "Customer"),
            Booking::new(date(2021, 12, 24), date(2021, 12, 27), dec!(300), "Bachcare"),
            Booking::new(date(2022, 2, 1), date(2022, 2, 3), dec!(0), "Housesitter"),
        ];
        generate(&bookings, date(2021, 1, 1)).unwrap()
    }

    /// Row of the first summary cell whose label matches
    fn summary_row_of(sheet: &Sheet, label: &str) -> Option<u32> {
        (SUMMARY_TOP_ROW..=sheet.last_row()?)
            .find(|row| sheet.text_at(Cell::new(*row, SUMMARY_LABEL_COL)) == Some(label))
    }

    #[test]
    fn month_blocks_in_fiscal_order() {
        let sheet = layout(1, &sample_calendar()).unwrap();

        assert_eq!(sheet.text_at(Cell::new(MONTH_HEADER_ROW, month_col(0))), Some("April 2021"));
        assert_eq!(sheet.text_at(Cell::new(MONTH_HEADER_ROW, month_col(8))), Some("December 2021"));
        assert_eq!(sheet.text_at(Cell::new(MONTH_HEADER_ROW, month_col(11))), Some("March 2022"));
        assert_eq!(sheet.text_at(Cell::new(COLUMN_HEADER_ROW, month_col(3))), Some("Booked By"));
        assert_eq!(
            sheet.text_at(Cell::new(COLUMN_HEADER_ROW, month_col(3) + RATE_OFFSET)),
            Some("Nightly Rate")
        );
    }

    #[test]
    fn day_margin_numbers_rows() {
        let sheet = layout(1, &sample_calendar()).unwrap();
        assert_eq!(sheet.value_at(Cell::new(FIRST_DAY_ROW, DAY_COL)), Some(&Value::Count(1)));
        assert_eq!(
            sheet.value_at(Cell::new(FIRST_DAY_ROW + 30, DAY_COL)),
            Some(&Value::Count(31))
        );
        assert_eq!(sheet.text_at(Cell::new(MONTH_TOTAL_ROW, DAY_COL)), Some("Total"));
    }

    #[test]
    fn booked_nights_land_in_month_block() {
        let sheet = layout(1, &sample_calendar()).unwrap();

        // 7 April: April block, row for day 7
        let row = FIRST_DAY_ROW + 6;
        assert_eq!(sheet.text_at(Cell::new(row, month_col(0))), Some("Owner"));
        assert_eq!(
            sheet.value_at(Cell::new(row, month_col(0) + RATE_OFFSET)),
            Some(&Value::Money(dec!(0)))
        );
        assert_eq!(sheet.get(Cell::new(row + 1, month_col(0))), None);

        // 30 June and 1-4 July
        let june_30 = FIRST_DAY_ROW + 29;
        assert_eq!(sheet.text_at(Cell::new(june_30, month_col(2))), Some("Customer"));
        assert_eq!(sheet.text_at(Cell::new(FIRST_DAY_ROW + 3, month_col(3))), Some("Customer"));
        assert_eq!(sheet.get(Cell::new(FIRST_DAY_ROW + 4, month_col(3))), None);
    }

    #[test]
    fn month_totals() {
        let sheet = layout(1, &sample_calendar()).unwrap();

        let july = month_col(3);
        assert_eq!(sheet.value_at(Cell::new(MONTH_TOTAL_ROW, july)), Some(&Value::Count(4)));
        assert_eq!(
            sheet.value_at(Cell::new(MONTH_TOTAL_ROW, july + RATE_OFFSET)),
            Some(&Value::Money(dec!(1682.76)))
        );
        assert_eq!(sheet.get(Cell::new(MONTH_TOTAL_ROW, july)).unwrap().style, Style::TOTAL);

        let may = month_col(1);
        assert_eq!(sheet.value_at(Cell::new(MONTH_TOTAL_ROW, may)), Some(&Value::Count(0)));
    }

    #[test]
    fn summary_box_lists_categories() {
        let sheet = layout(1, &sample_calendar()).unwrap();

        assert_eq!(sheet.text_at(Cell::new(SUMMARY_TOP_ROW, SUMMARY_DAYS_COL)), Some("Summary of Use"));

        let bachcare = summary_row_of(&sheet, "Bachcare Date").unwrap();
        let owner = summary_row_of(&sheet, "Owner Date").unwrap();
        assert!(bachcare < owner);

        let line = summary_row_of(&sheet, "Bachcare").unwrap();
        assert_eq!(sheet.value_at(Cell::new(line, SUMMARY_DAYS_COL)), Some(&Value::Count(3)));
        assert_eq!(
            sheet.value_at(Cell::new(line, SUMMARY_VALUE_COL)),
            Some(&Value::Money(dec!(900)))
        );

        let owner_total = summary_row_of(&sheet, "Owner Date Total").unwrap();
        assert_eq!(sheet.value_at(Cell::new(owner_total, SUMMARY_DAYS_COL)), Some(&Value::Count(3)));

        let total = summary_row_of(&sheet, "Property Total").unwrap();
        assert_eq!(sheet.value_at(Cell::new(total, SUMMARY_DAYS_COL)), Some(&Value::Count(6)));
        assert_eq!(
            sheet.value_at(Cell::new(total, SUMMARY_VALUE_COL)),
            Some(&Value::Money(dec!(900)))
        );
        assert_eq!(sheet.get(Cell::new(total, SUMMARY_VALUE_COL)).unwrap().style, Style::TOTAL);
    }

    #[test]
    fn unmatched_booking_types_not_in_summary() {
        let sheet = layout(1, &sample_calendar()).unwrap();
        assert_eq!(summary_row_of(&sheet, "Customer"), None);
    }

    #[test]
    fn write_and_read_back() {
        let dir = tempdir().unwrap();
        let path = XlsxWriter::new(dir.path()).write(42, &sample_calendar()).unwrap();
        assert_eq!(path, dir.path().join("42.xlsx"));

        let mut workbook: Xlsx<_> = open_workbook(&path).unwrap();
        let range = workbook.worksheet_range(SHEET_NAME).unwrap();

        assert_eq!(
            range.get_value((MONTH_HEADER_ROW, month_col(0) as u32)),
            Some(&Data::String("April 2021".to_string()))
        );
        assert_eq!(
            range.get_value((FIRST_DAY_ROW + 6, month_col(0) as u32)),
            Some(&Data::String("Owner".to_string()))
        );
        assert_eq!(
            range.get_value((FIRST_DAY_ROW + 23, month_col(8) as u32 + 1)),
            Some(&Data::Float(300.0))
        );
    }

    #[test]
    fn write_to_missing_dir_fails() {
        let dir = tempdir().unwrap();
        let writer = XlsxWriter::new(dir.path().join("nope"));
        let err = writer.write(42, &sample_calendar()).unwrap_err();
        assert!(matches!(err, ReportError::Io { .. }));
    }

    #[test]
    fn overflowing_totals_are_an_error() {
        let bookings = vec![Booking::new(date(2021, 4, 1), date(2021, 4, 3), Decimal::MAX, "Owner")];
        let calendar = generate(&bookings, date(2021, 1, 1)).unwrap();
        let dir = tempdir().unwrap();

        let err = XlsxWriter::new(dir.path()).write(1, &calendar).unwrap_err();
        assert!(matches!(err, ReportError::Summary(SummaryError::Overflow { .. })));
        assert!(!dir.path().join("1.xlsx").exists());
    }

    #[test]
    fn overflow_within_a_month_is_an_error() {
        // Different unclassified types keep the summary clear of the overflow
        let bookings = vec![
            Booking::new(date(2021, 4, 1), date(2021, 4, 2), Decimal::MAX, "Customer"),
            Booking::new(date(2021, 4, 2), date(2021, 4, 3), Decimal::MAX, "Guest"),
        ];
        let calendar = generate(&bookings, date(2021, 1, 1)).unwrap();
        assert!(matches!(
            layout(1, &calendar),
            Err(ReportError::Summary(SummaryError::Overflow { days: 1 }))
        ));
    }
}
