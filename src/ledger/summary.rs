//! Summary of Use - nights and value per booking category

use super::calendar::Calendar;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeSet;
use thiserror::Error;

#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum SummaryError {
    #[error("total value overflowed after {days} nights")]
    Overflow { days: u32 },
}

/// Summary bucket a booking type is reported under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Category {
    BachcareDate,
    OwnerDate,
}

impl Category {
    /// Report order
    pub const ALL: [Category; 2] = [Category::BachcareDate, Category::OwnerDate];

    pub fn label(&self) -> &'static str {
        match self {
            Category::BachcareDate => "Bachcare Date",
            Category::OwnerDate => "Owner Date",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Case-insensitive substrings that place a booking type in a category.
/// Rules are tried in order and the first match wins.
pub const CATEGORY_RULES: &[(Category, &[&str])] = &[
    (Category::BachcareDate, &["bachcare"]),
    (Category::OwnerDate, &["own", "house", "term"]),
];

/// Category for a booking type, `None` when it belongs in neither bucket
pub fn classify(booking_type: &str) -> Option<Category> {
    let lowered = booking_type.to_lowercase();
    CATEGORY_RULES
        .iter()
        .find(|(_, needles)| needles.iter().any(|n| lowered.contains(n)))
        .map(|(category, _)| *category)
}

/// Nights and their combined value
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub days: u32,
    pub value: Decimal,
}

impl Totals {
    /// Totals with one more night at `rate` (a missing rate adds no value)
    pub fn with_night(self, rate: Option<Decimal>) -> Result<Self, SummaryError> {
        self.checked_add(Totals {
            days: 1,
            value: rate.unwrap_or(Decimal::ZERO),
        })
    }

    pub fn checked_add(self, other: Totals) -> Result<Self, SummaryError> {
        let overflow = SummaryError::Overflow { days: self.days };
        Ok(Totals {
            days: self.days.checked_add(other.days).ok_or(overflow)?,
            value: self.value.checked_add(other.value).ok_or(overflow)?,
        })
    }
}

/// One booking type within a category
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelLine {
    pub booking_type: String,
    pub totals: Totals,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategorySummary {
    pub category: Category,
    /// Booking types in the order they first appear in the calendar
    pub lines: Vec<LabelLine>,
    pub subtotal: Totals,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryOfUse {
    /// One entry per category, in `Category::ALL` order (empty categories included)
    pub categories: Vec<CategorySummary>,
    /// Property total across all categories
    pub total: Totals,
    /// Booking types left out of the summary
    pub unclassified: Vec<String>,
}

impl SummaryOfUse {
    pub fn from_calendar(calendar: &Calendar) -> Result<Self, SummaryError> {
        let categories: Vec<CategorySummary> = Category::ALL
            .iter()
            .map(|category| summarise_category(calendar, *category))
            .collect::<Result<_, _>>()?;

        let total = categories
            .iter()
            .try_fold(Totals::default(), |acc, c| acc.checked_add(c.subtotal))?;

        let unclassified: Vec<String> = calendar
            .booked()
            .filter_map(|(_, o)| o.booking_type.as_deref())
            .filter(|label| classify(label).is_none())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect();

        for label in &unclassified {
            log::warn!("Booking type '{}' matches no summary category, excluded", label);
        }

        Ok(SummaryOfUse {
            categories,
            total,
            unclassified,
        })
    }

    #[cfg(test)]
    pub fn category(&self, category: Category) -> Option<&CategorySummary> {
        self.categories.iter().find(|c| c.category == category)
    }
}

fn summarise_category(
    calendar: &Calendar,
    category: Category,
) -> Result<CategorySummary, SummaryError> {
    let mut lines: Vec<LabelLine> = Vec::new();

    for (_, occupancy) in calendar.booked() {
        let Some(label) = occupancy.booking_type.as_deref() else {
            continue;
        };
        if classify(label) != Some(category) {
            continue;
        }
        match lines.iter_mut().find(|l| l.booking_type == label) {
            Some(line) => line.totals = line.totals.with_night(occupancy.nightly_rate)?,
            None => lines.push(LabelLine {
                booking_type: label.to_string(),
                totals: Totals::default().with_night(occupancy.nightly_rate)?,
            }),
        }
    }

    let subtotal = lines
        .iter()
        .try_fold(Totals::default(), |acc, l| acc.checked_add(l.totals))?;

    Ok(CategorySummary {
        category,
        lines,
        subtotal,
    })
}
