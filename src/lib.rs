//! Occupancy calendars and Summary of Use reports for holiday-home bookings.
//!
//! Bookings are expanded into a per-day [`ledger::Calendar`] for a tax year
//! (1 April to 31 March) and written out by a [`report::ReportWriter`].

pub mod ledger;
pub mod report;
