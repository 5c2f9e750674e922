//! Top-N market share with the long tail collapsed into «Others».

use std::cmp::Reverse;

use itertools::Itertools;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use serde_with::serde_as;

use crate::core::Error;

/// Hotels are taken into the top while the share accumulated *before* them is below this.
pub const TOP_THRESHOLD_PERCENT: f64 = 70.0;

pub const OTHERS_LABEL: &str = "Others";

/// Raw counts per hotel (reviews over the last week), in the order the endpoint sent them.
#[must_use]
#[serde_as]
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct ShareRecord(#[serde_as(as = "serde_with::Map<_, _>")] pub Vec<(String, u64)>);

/// Ring chart input: parallel labels and percentages, «Others» always last.
#[must_use]
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ShareBreakdown {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

impl ShareBreakdown {
    fn push(&mut self, label: String, value: f64) {
        self.labels.push(label);
        self.values.push(value);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.labels.iter().map(String::as_str).zip(self.values.iter().copied())
    }

    /// Share of the residual bucket, exactly as computed (may drift slightly below zero).
    #[must_use]
    pub fn others(&self) -> f64 {
        self.values.last().copied().unwrap_or_default()
    }
}

impl ShareRecord {
    /// Rank the hotels by share and collapse everything after the top into «Others».
    ///
    /// The threshold is checked before adding a hotel, so the hotel that crosses 70% is still
    /// part of the top. Ties keep the record order.
    pub fn aggregate(&self) -> Result<ShareBreakdown, Error> {
        let total: u128 = self.0.iter().map(|(_, count)| u128::from(*count)).sum();
        if total == 0 {
            return Err(Error::EmptyDenominator);
        }
        #[expect(clippy::cast_precision_loss)]
        let total = total as f64;

        let ranked = self
            .0
            .iter()
            .map(|(hotel, count)| {
                #[expect(clippy::cast_precision_loss)]
                let percentage = *count as f64 / total * 100.0;
                (hotel, percentage)
            })
            .sorted_by_key(|(_, percentage)| Reverse(OrderedFloat(*percentage)));

        let mut breakdown = ShareBreakdown::default();
        let mut accumulated = 0.0;
        for (hotel, percentage) in ranked {
            if accumulated >= TOP_THRESHOLD_PERCENT {
                break;
            }
            breakdown.push(hotel.clone(), percentage);
            accumulated += percentage;
        }
        breakdown.push(OTHERS_LABEL.to_owned(), 100.0 - accumulated);
        Ok(breakdown)
    }
}
