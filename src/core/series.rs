//! Market overview chart: price range bars, my price line and median markers.
//!
//! The rendering side looks tooltips up by dataset *position*,
//! so [`Dataset`] order is part of the contract.

use serde::{Deserialize, Serialize};

/// Competitor prices on one date, as returned by the market graph endpoints.
///
/// `min ≤ median ≤ max` is expected but never relied upon.
#[must_use]
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct PricePoint {
    pub date: String,
    pub min: f64,
    pub max: f64,
    pub my_price: f64,
    pub median: f64,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Dataset {
    /// Bar from `min` to `max`.
    PriceRange,

    /// Dashed line.
    MyPrice,

    /// Point markers only.
    Median,
}

impl Dataset {
    /// All datasets in their chart order.
    pub const ALL: [Self; 3] = [Self::PriceRange, Self::MyPrice, Self::Median];

    #[must_use]
    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::PriceRange),
            1 => Some(Self::MyPrice),
            2 => Some(Self::Median),
            _ => None,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::PriceRange => "Price Range",
            Self::MyPrice => "My Hotel Price",
            Self::Median => "Median Price",
        }
    }

    #[must_use]
    pub const fn style(self) -> DatasetStyle {
        match self {
            Self::PriceRange => DatasetStyle {
                kind: ChartKind::Bar,
                color: "rgba(75, 192, 192, 0.6)",
                bar_thickness: Some(20),
                border_dash: None,
                point_radius: None,
                point_style: None,
                show_line: None,
            },
            Self::MyPrice => DatasetStyle {
                kind: ChartKind::Line,
                color: "blue",
                bar_thickness: None,
                border_dash: Some([5, 5]),
                point_radius: Some(6),
                point_style: None,
                show_line: None,
            },
            Self::Median => DatasetStyle {
                kind: ChartKind::Scatter,
                color: "red",
                bar_thickness: None,
                border_dash: None,
                point_radius: Some(7),
                point_style: Some("rectRounded"),
                show_line: Some(false),
            },
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Bar,
    Line,
    Scatter,
}

#[must_use]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetStyle {
    #[serde(rename = "type")]
    pub kind: ChartKind,

    pub color: &'static str,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub bar_thickness: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_dash: Option<[u32; 2]>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub point_radius: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub point_style: Option<&'static str>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_line: Option<bool>,
}

/// Index-aligned chart series, one entry per input point, in the input order.
#[must_use]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChartSeriesBundle {
    pub labels: Vec<String>,

    /// `[min, max]` per date.
    pub ranges: Vec<[f64; 2]>,

    pub my_prices: Vec<f64>,
    pub medians: Vec<f64>,
}

impl ChartSeriesBundle {
    pub fn assemble(points: &[PricePoint]) -> Self {
        let mut bundle = Self {
            labels: Vec::with_capacity(points.len()),
            ranges: Vec::with_capacity(points.len()),
            my_prices: Vec::with_capacity(points.len()),
            medians: Vec::with_capacity(points.len()),
        };
        for point in points {
            bundle.labels.push(point.date.clone());
            bundle.ranges.push([point.min, point.max]);
            bundle.my_prices.push(point.my_price);
            bundle.medians.push(point.median);
        }
        bundle
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.labels.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    #[must_use]
    pub fn tooltip_title(&self, data_index: usize) -> Option<String> {
        self.labels.get(data_index).map(|label| format!("Date: {label}"))
    }

    /// Tooltip lines for the hovered element.
    ///
    /// The range bar carries the full summary and the line only its own value.
    /// Anything else is unlabeled.
    #[must_use]
    pub fn tooltip_label(&self, dataset_index: usize, data_index: usize) -> Vec<String> {
        let Some(dataset) = Dataset::from_index(dataset_index) else {
            return Vec::new();
        };
        let (Some([min, max]), Some(my_price), Some(median)) = (
            self.ranges.get(data_index),
            self.my_prices.get(data_index),
            self.medians.get(data_index),
        ) else {
            return Vec::new();
        };
        match dataset {
            Dataset::PriceRange => vec![
                format!("My Hotel Price: {my_price}"),
                format!("Price Range: {min}-{max}"),
                format!("Median Price: {median}"),
            ],
            Dataset::MyPrice => vec![format!("My Hotel Price: {my_price}")],
            Dataset::Median => Vec::new(),
        }
    }

    /// Largest of the minimums, maximums and my prices plus 10% head-room.
    #[must_use]
    pub fn y_axis_max(&self) -> Option<f64> {
        self.ranges
            .iter()
            .flatten()
            .chain(&self.my_prices)
            .copied()
            .reduce(f64::max)
            .map(|max| max + 0.1 * max)
    }

    pub fn to_chart_data(&self) -> ChartData<'_> {
        ChartData {
            labels: &self.labels,
            datasets: Dataset::ALL
                .map(|dataset| ChartDataset {
                    label: dataset.label(),
                    data: match dataset {
                        Dataset::PriceRange => DatasetValues::Ranges(&self.ranges),
                        Dataset::MyPrice => DatasetValues::Values(&self.my_prices),
                        Dataset::Median => DatasetValues::Values(&self.medians),
                    },
                    style: dataset.style(),
                })
                .to_vec(),
            tooltips: (0..self.len())
                .map(|data_index| ChartTooltip {
                    title: self.tooltip_title(data_index).unwrap_or_default(),
                    labels: (0..Dataset::ALL.len())
                        .map(|dataset_index| self.tooltip_label(dataset_index, data_index))
                        .collect(),
                })
                .collect(),
            y_axis_max: self.y_axis_max(),
        }
    }
}

/// Chart payload for a front-end, datasets in [`Dataset::ALL`] order.
#[must_use]
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartData<'a> {
    pub labels: &'a [String],
    pub datasets: Vec<ChartDataset<'a>>,

    /// Pre-rendered tooltips, one per label.
    pub tooltips: Vec<ChartTooltip>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub y_axis_max: Option<f64>,
}

#[derive(Clone, Debug, Serialize)]
pub struct ChartDataset<'a> {
    pub label: &'static str,
    pub data: DatasetValues<'a>,

    #[serde(flatten)]
    pub style: DatasetStyle,
}

#[derive(Clone, Debug, Serialize)]
pub struct ChartTooltip {
    pub title: String,

    /// Lines per dataset, indexed like the datasets.
    pub labels: Vec<Vec<String>>,
}

#[derive(Copy, Clone, Debug, Serialize)]
#[serde(untagged)]
pub enum DatasetValues<'a> {
    Ranges(&'a [[f64; 2]]),
    Values(&'a [f64]),
}
