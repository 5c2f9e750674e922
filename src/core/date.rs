//! Compact numeric dates as sent by the occupancy endpoint.
//!
//! The encoding is `MDDYYYY` or `MMDDYYYY`, so the width alone decides where the month ends.
//! That cannot tell a single-digit day in an 8-digit string from a two-digit month in
//! a 7-digit one. Parsing stays purely positional: callers get exactly the slices back.

use std::str::FromStr;

use chrono::NaiveDate;

use crate::core::Error;

/// A `(year, month, day)` triple sliced out of the compact encoding.
///
/// Not a [`NaiveDate`]: the slices are not validated against the calendar,
/// so `2024-02-31` is representable.
#[must_use]
#[derive(
    Copy,
    Clone,
    Debug,
    Eq,
    PartialEq,
    Ord,
    PartialOrd,
    Hash,
    derive_more::Display,
    serde::Serialize,
)]
#[display("{year:04}-{month:02}-{day:02}")]
#[serde(into = "String")]
pub struct CalendarDate {
    pub year: u16,
    pub month: u8,
    pub day: u8,
}

impl CalendarDate {
    /// Parse `MDDYYYY` or `MMDDYYYY`.
    ///
    /// Any other length gives [`None`], there is no best-effort guess.
    /// Day and month ranges are not checked: `"13322024"` is `2024-13-32`.
    pub fn parse(raw: &str) -> Option<Self> {
        let month_width = match raw.len() {
            7 => 1,
            8 => 2,
            _ => return None,
        };
        if !raw.bytes().all(|byte| byte.is_ascii_digit()) {
            return None;
        }
        let (month, rest) = raw.split_at(month_width);
        let (day, year) = rest.split_at(2);
        Some(Self { year: year.parse().ok()?, month: month.parse().ok()?, day: day.parse().ok()? })
    }

    /// Calendar-checked conversion, [`None`] for dates that do not exist.
    #[must_use]
    pub fn to_naive_date(self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(i32::from(self.year), u32::from(self.month), u32::from(self.day))
    }
}

impl FromStr for CalendarDate {
    type Err = Error;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Self::parse(raw).ok_or_else(|| Error::MalformedDate(raw.to_owned()))
    }
}

impl From<CalendarDate> for String {
    fn from(date: CalendarDate) -> Self {
        date.to_string()
    }
}
