//! Per-day occupancy ledger for a tax year

use super::booking::Booking;
use super::fiscal::{TaxYear, TaxYearError};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// What a single night was booked as
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occupancy {
    pub nightly_rate: Option<Decimal>,
    pub booking_type: Option<String>,
}

impl From<&Booking> for Occupancy {
    fn from(booking: &Booking) -> Self {
        Occupancy {
            nightly_rate: booking.nightly_rate,
            booking_type: booking.booking_type.clone(),
        }
    }
}

/// Every date of a tax year mapped to its occupancy (`None` when unbooked)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Calendar {
    tax_year: TaxYear,
    days: BTreeMap<NaiveDate, Option<Occupancy>>,
}

/// Build the calendar for the tax year starting in `tax_year_anchor`'s year.
/// Fails only when that tax year cannot be represented as dates.
pub fn generate(
    bookings: &[Booking],
    tax_year_anchor: NaiveDate,
) -> Result<Calendar, TaxYearError> {
    Ok(Calendar::build(bookings, TaxYear::from_anchor(tax_year_anchor)?))
}

impl Calendar {
    /// Expand bookings into one entry per date of the tax year.
    ///
    /// Bookings are scanned in input order and the last one covering a date
    /// owns it, so later corrections override earlier bookings.
    pub fn build(bookings: &[Booking], tax_year: TaxYear) -> Self {
        log::debug!(
            "Building calendar {} to {} from {} bookings",
            tax_year.start_date(),
            tax_year.end_date(),
            bookings.len()
        );

        let days = tax_year
            .days()
            .map(|date| (date, occupancy_on(bookings, date)))
            .collect();

        Calendar { tax_year, days }
    }

    /// Calendar from explicit entries, for callers that already hold a ledger
    pub fn from_entries<I>(tax_year: TaxYear, entries: I) -> Self
    where
        I: IntoIterator<Item = (NaiveDate, Option<Occupancy>)>,
    {
        Calendar {
            tax_year,
            days: entries.into_iter().collect(),
        }
    }

    pub fn tax_year(&self) -> TaxYear {
        self.tax_year
    }

    /// Occupancy on `date`, `None` when unbooked or outside the calendar
    pub fn get(&self, date: NaiveDate) -> Option<&Occupancy> {
        self.days.get(&date).and_then(Option::as_ref)
    }

    pub fn contains_date(&self, date: NaiveDate) -> bool {
        self.days.contains_key(&date)
    }

    /// Entries in ascending date order
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, Option<&Occupancy>)> {
        self.days.iter().map(|(date, entry)| (*date, entry.as_ref()))
    }

    /// Booked entries in ascending date order
    pub fn booked(&self) -> impl Iterator<Item = (NaiveDate, &Occupancy)> {
        self.iter().filter_map(|(date, entry)| entry.map(|o| (date, o)))
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

fn occupancy_on(bookings: &[Booking], date: NaiveDate) -> Option<Occupancy> {
    let mut covering = bookings.iter().filter(|b| b.contains(date));
    let winner = covering.next_back()?;
    if covering.next().is_some() {
        log::trace!(
            "{}: overlapping bookings, keeping {:?}",
            date,
            winner.booking_type
        );
    }
    Some(winner.into())
}
