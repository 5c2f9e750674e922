use serde::{Deserialize, Deserializer, Serialize};

use crate::{core::date::CalendarDate, prelude::*};

/// Daily occupancy as returned by the analytics endpoint.
#[must_use]
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct OccupancyPoint {
    /// Compact `MDDYYYY` or `MMDDYYYY` date, sent either as a number or as a string.
    #[serde(rename = "Date", deserialize_with = "OccupancyPoint::deserialize_date")]
    pub date: String,

    /// Occupancy in percent.
    #[serde(rename = "Occupancy")]
    pub occupancy: f64,
}

impl OccupancyPoint {
    fn deserialize_date<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawDate {
            Integer(u64),

            /// Integral floats print without the fraction, anything else is kept for the warning.
            Float(f64),

            Text(String),

            /// Never a valid date, but must not fail the other rows.
            Other(serde_json::Value),
        }

        Ok(match RawDate::deserialize(deserializer)? {
            RawDate::Integer(number) => number.to_string(),
            RawDate::Float(number) => number.to_string(),
            RawDate::Text(text) => text,
            RawDate::Other(value) => value.to_string(),
        })
    }
}

/// Occupancy point with its date normalized.
#[must_use]
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct OccupancyRow {
    /// [`None`] when the raw date is malformed, the value is still kept for display.
    pub date: Option<CalendarDate>,

    pub occupancy: f64,
}

/// Normalize the dates, preserving the order and every value.
pub fn normalize(points: &[OccupancyPoint]) -> Vec<OccupancyRow> {
    points
        .iter()
        .map(|point| {
            let date = point
                .date
                .parse::<CalendarDate>()
                .inspect(|date| {
                    if date.to_naive_date().is_none() {
                        debug!(%date, "not a calendar date");
                    }
                })
                .inspect_err(|error| warn!("{error}"))
                .ok();
            OccupancyRow { date, occupancy: point.occupancy }
        })
        .collect()
}
