use chrono::NaiveDate;
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::io::Read;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum BookingError {
    #[error("booking {index}: invalid {field} '{value}', expected YYYY-MM-DD")]
    InvalidDate {
        index: usize,
        field: &'static str,
        value: String,
    },
}

/// A stay at the property: occupies `start_date` up to but not including `end_date`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Booking {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub nightly_rate: Option<Decimal>,
    pub booking_type: Option<String>,
}

impl Booking {
    pub fn new(
        start_date: NaiveDate,
        end_date: NaiveDate,
        nightly_rate: Decimal,
        booking_type: impl Into<String>,
    ) -> Self {
        Booking {
            start_date,
            end_date,
            nightly_rate: Some(nightly_rate),
            booking_type: Some(booking_type.into()),
        }
    }

    /// Whether the booking occupies the night of `date`
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date < self.end_date
    }
}

/// Input root for booking JSON
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct BookingInput {
    /// Property the bookings belong to (names the output files)
    #[serde(default)]
    pub property_id: Option<u64>,
    /// Start year of the tax year to report (e.g., 2021 for 2021/22)
    #[serde(default)]
    pub tax_year: Option<i32>,
    /// Bookings in precedence order; later bookings win overlapping dates
    pub bookings: Vec<BookingRecord>,
}

/// Booking as supplied by the upstream source (JSON object or CSV row)
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct BookingRecord {
    /// First night of the stay (YYYY-MM-DD)
    pub start_date: String,
    /// Departure date, not occupied (YYYY-MM-DD)
    pub end_date: String,
    /// Charge per night
    #[serde(default)]
    #[schemars(with = "Option<f64>")]
    pub nightly_rate: Option<Decimal>,
    /// Free-text label, e.g. "Owner", "Customer", "Bachcare Booking"
    #[serde(default)]
    pub booking_type: Option<String>,
}

impl BookingRecord {
    pub fn to_booking(&self, index: usize) -> Result<Booking, BookingError> {
        let parse = |field: &'static str, value: &str| {
            NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
                BookingError::InvalidDate {
                    index,
                    field,
                    value: value.to_string(),
                }
            })
        };
        let start_date = parse("start_date", &self.start_date)?;
        let end_date = parse("end_date", &self.end_date)?;

        if end_date <= start_date {
            log::warn!(
                "booking {}: end date {} is not after start date {}, it occupies no nights",
                index,
                end_date,
                start_date
            );
        }

        Ok(Booking {
            start_date,
            end_date,
            nightly_rate: self.nightly_rate,
            booking_type: self.booking_type.clone(),
        })
    }
}

/// Convert records to bookings, keeping input order
pub fn records_to_bookings(records: &[BookingRecord]) -> Result<Vec<Booking>, BookingError> {
    records
        .iter()
        .enumerate()
        .map(|(index, record)| record.to_booking(index))
        .collect()
}

/// Read booking input from JSON
pub fn read_json<R: Read>(reader: R) -> anyhow::Result<BookingInput> {
    let input: BookingInput = serde_json::from_reader(reader)?;
    log::debug!("Read {} json booking records", input.bookings.len());
    Ok(input)
}

/// Read booking records from CSV (`start_date,end_date,nightly_rate,booking_type`)
pub fn read_csv<R: Read>(reader: R) -> anyhow::Result<Vec<BookingRecord>> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let records: Result<Vec<BookingRecord>, _> = rdr.deserialize::<BookingRecord>().collect();
    let records = records?;
    log::debug!("Read {} csv booking records", records.len());
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn end_date_is_exclusive() {
        let booking = Booking::new(date(2021, 4, 7), date(2021, 4, 8), dec!(0.00), "Owner");
        assert!(booking.contains(date(2021, 4, 7)));
        assert!(!booking.contains(date(2021, 4, 8)));
        assert!(!booking.contains(date(2021, 4, 6)));
    }

    #[test]
    fn parse_json_input() {
        let json = r#"{
            "property_id": 42,
            "tax_year": 2021,
            "bookings": [
                {"nightly_rate": 0.00, "start_date": "2021-04-07", "end_date": "2021-04-08", "booking_type": "Owner"},
                {"nightly_rate": "420.69", "start_date": "2021-06-30", "end_date": "2021-07-05", "booking_type": "Customer"},
                {"start_date": "2021-08-01", "end_date": "2021-08-02"}
            ]
        }"#;

        let input = read_json(json.as_bytes()).unwrap();
        assert_eq!(input.property_id, Some(42));
        assert_eq!(input.tax_year, Some(2021));

        let bookings = records_to_bookings(&input.bookings).unwrap();
        assert_eq!(bookings.len(), 3);
        assert_eq!(bookings[0].nightly_rate, Some(dec!(0)));
        assert_eq!(bookings[1].nightly_rate, Some(dec!(420.69)));
        assert_eq!(bookings[1].start_date, date(2021, 6, 30));
        assert_eq!(bookings[2].nightly_rate, None);
        assert_eq!(bookings[2].booking_type, None);
    }

    #[test]
    fn parse_csv_keeps_input_order() {
        let csv_data = "start_date,end_date,nightly_rate,booking_type
2021-06-01,2021-06-10,150.00,Customer
2021-04-07,2021-04-08,0,Owner
2021-05-01,2021-05-03,,Bachcare";

        let records = read_csv(csv_data.as_bytes()).unwrap();
        let bookings = records_to_bookings(&records).unwrap();
        assert_eq!(bookings.len(), 3);
        assert_eq!(bookings[0].booking_type.as_deref(), Some("Customer"));
        assert_eq!(bookings[0].nightly_rate, Some(dec!(150)));
        assert_eq!(bookings[1].start_date, date(2021, 4, 7));
        assert_eq!(bookings[2].nightly_rate, None);
    }

    #[test]
    fn invalid_date_reports_index_and_field() {
        let records = vec![
            BookingRecord {
                start_date: "2021-04-01".to_string(),
                end_date: "2021-04-02".to_string(),
                nightly_rate: None,
                booking_type: None,
            },
            BookingRecord {
                start_date: "2021-04-01".to_string(),
                end_date: "2021-02-30".to_string(),
                nightly_rate: None,
                booking_type: None,
            },
        ];

        let err = records_to_bookings(&records).unwrap_err();
        assert_eq!(
            err,
            BookingError::InvalidDate {
                index: 1,
                field: "end_date",
                value: "2021-02-30".to_string(),
            }
        );
    }

    #[test]
    fn reversed_booking_is_kept() {
        let record = BookingRecord {
            start_date: "2021-05-10".to_string(),
            end_date: "2021-05-01".to_string(),
            nightly_rate: Some(dec!(100)),
            booking_type: Some("Owner".to_string()),
        };
        let booking = record.to_booking(0).unwrap();
        assert!(!booking.contains(date(2021, 5, 5)));
    }
}
