//! Billing calculator.
//!
//! Pure functions that turn meter readings, rent and adjustments into bill
//! amounts, plus the rate helpers the dashboard uses. Nothing here touches the
//! store.

use crate::errors::{Error, Result};
use chrono::{Datelike, NaiveDate, TimeDelta};
use std::{fmt, str::FromStr};

/// Electricity price per unit when none is configured.
pub const DEFAULT_RATE_PER_UNIT: f64 = 12.0;

/// Days between the bill date and the due date when none is configured.
pub const DEFAULT_GRACE_PERIOD_DAYS: i64 = 10;

/// Charge for the units consumed between two meter readings.
///
/// No clamping is applied: a current reading below the previous one gives a
/// negative charge, i.e. a credit. Callers that treat the meter as monotonic
/// must reject that case themselves.
#[must_use]
pub fn electricity_charge(current_reading: i64, previous_reading: i64, rate_per_unit: f64) -> f64 {
    // Meter values stay far below 2^52.
    #[allow(clippy::cast_precision_loss)]
    let units = (current_reading - previous_reading) as f64;
    units * rate_per_unit
}

/// Total of a bill. The adjustment is signed and unbounded.
#[must_use]
pub fn total_bill(rent: f64, electricity_charge: f64, adjustment: f64) -> f64 {
    rent + electricity_charge + adjustment
}

/// Due date for a bill issued on `bill_date`.
#[must_use]
pub fn due_date(bill_date: NaiveDate, grace_period_days: i64) -> NaiveDate {
    bill_date
        .checked_add_signed(TimeDelta::days(grace_period_days))
        .unwrap_or(NaiveDate::MAX)
}

/// Whole days past the due date, `0` on or before it.
#[must_use]
pub fn days_overdue(due_date: NaiveDate, today: NaiveDate) -> i64 {
    (today - due_date).num_days().max(0)
}

/// Rounded percentage of `part` in `whole`, `0` when `whole` is zero.
#[must_use]
pub fn percentage(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }

    // Counts are small; result is within 0..=100 for part <= whole.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    let rate = (100.0 * part as f64 / whole as f64).round() as u32;
    rate
}

/// Share of rooms occupied, as a rounded percentage.
#[must_use]
pub fn occupancy_rate(total_rooms: usize, occupied_rooms: usize) -> u32 {
    percentage(occupied_rooms, total_rooms)
}

/// Share of bills paid, as a rounded percentage.
#[must_use]
pub fn collection_rate(total_bills: usize, paid_bills: usize) -> u32 {
    percentage(paid_bills, total_bills)
}

/// A calendar month identifying an invoice cycle, written `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BillingPeriod {
    year: i32,
    month: u32,
}

impl BillingPeriod {
    /// Builds a period, rejecting months outside 1-12 and years outside 1-9999.
    pub fn new(year: i32, month: u32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(Error::validation(format!("Invalid billing month {month}")));
        }
        if !(1..=9999).contains(&year) {
            return Err(Error::validation(format!("Invalid billing year {year}")));
        }
        Ok(Self { year, month })
    }

    /// The period containing `date`.
    #[must_use]
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Calendar year.
    #[must_use]
    pub const fn year(self) -> i32 {
        self.year
    }

    /// Calendar month, 1-12.
    #[must_use]
    pub const fn month(self) -> u32 {
        self.month
    }

    /// The following month.
    #[must_use]
    pub const fn next(self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// The preceding month.
    #[must_use]
    pub const fn previous(self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    /// First day of the month.
    #[must_use]
    pub fn first_day(self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or_default()
    }

    /// Last day of the month.
    #[must_use]
    pub fn last_day(self) -> NaiveDate {
        self.next()
            .first_day()
            .pred_opt()
            .unwrap_or_default()
    }

    /// Whether `date` falls in this month.
    #[must_use]
    pub fn contains(self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    /// Short label such as `Mar 2024`.
    #[must_use]
    pub fn label(self) -> String {
        self.first_day().format("%b %Y").to_string()
    }
}

impl fmt::Display for BillingPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for BillingPeriod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::validation(format!("Billing period must be YYYY-MM, got '{s}'"));
        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(invalid());
        }
        let year = year.parse::<i32>().map_err(|_| invalid())?;
        let month = month.parse::<u32>().map_err(|_| invalid())?;
        Self::new(year, month)
    }
}
