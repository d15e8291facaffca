use chrono::{Datelike, NaiveDate};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TaxYearError {
    #[error("tax year {0} is outside the supported date range")]
    OutOfRange(i32),
}

/// Tax year (runs 1 April to 31 March)
/// The year value is the start year (e.g., 2021 = 2021/22 tax year)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaxYear {
    year: i32,
    start: NaiveDate,
    end: NaiveDate,
}

impl TaxYear {
    /// Tax year starting 1 April `year`. Fails when either end of the window
    /// is not a representable date.
    pub fn new(year: i32) -> Result<Self, TaxYearError> {
        let start = NaiveDate::from_ymd_opt(year, 4, 1);
        let end = year
            .checked_add(1)
            .and_then(|next| NaiveDate::from_ymd_opt(next, 3, 31));
        match (start, end) {
            (Some(start), Some(end)) => Ok(TaxYear { year, start, end }),
            _ => Err(TaxYearError::OutOfRange(year)),
        }
    }

    /// Tax year anchored on a date. Only the year component is used.
    pub fn from_anchor(anchor: NaiveDate) -> Result<Self, TaxYearError> {
        TaxYear::new(anchor.year())
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// Start date of the tax year (1 April)
    pub fn start_date(&self) -> NaiveDate {
        self.start
    }

    /// End date of the tax year (31 March of the following year)
    pub fn end_date(&self) -> NaiveDate {
        self.end
    }

    /// Every date in the tax year, ascending
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start.iter_days().take_while(move |d| *d <= end)
    }

    /// The twelve months of the tax year in fiscal order (April first) as `(year, month)`
    pub fn months(&self) -> impl Iterator<Item = (i32, u32)> {
        let start_year = self.year;
        let end_year = self.end.year();
        (0..12u32).map(move |i| {
            let month = (i + 3) % 12 + 1;
            let year = if month >= 4 { start_year } else { end_year };
            (year, month)
        })
    }

    /// Display as "2021/22" format
    pub fn display(&self) -> String {
        format!("{}/{:02}", self.year, self.end.year().rem_euclid(100))
    }
}

impl std::fmt::Display for TaxYear {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display())
    }
}
