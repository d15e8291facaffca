pub mod booking;
pub mod calendar;
pub mod fiscal;
pub mod summary;

// Flat public surface for domain types and functions.
pub use booking::{read_csv, read_json, records_to_bookings, Booking, BookingError, BookingInput, BookingRecord};
pub use calendar::{generate, Calendar, Occupancy};
pub use fiscal::{TaxYear, TaxYearError};
pub use summary::{
    classify, Category, CategorySummary, LabelLine, SummaryError, SummaryOfUse, Totals, CATEGORY_RULES,
};
