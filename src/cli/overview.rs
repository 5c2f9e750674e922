use clap::Parser;
use itertools::Itertools;

use crate::{
    api::{Api, MarketSource, PriceQuery},
    cli::{Format, FormatArgs},
    core::{selection::SelectionSet, series::ChartSeriesBundle},
    prelude::*,
    tables::build_overview_table,
};

#[derive(Parser)]
pub struct OverviewArgs {
    /// Hotels to compare with, all eligible hotels by default.
    #[clap(long = "hotel", value_delimiter = ',', num_args = 1..)]
    hotels: Vec<String>,

    /// Request the whole market regardless of the selection.
    #[clap(long, conflicts_with = "hotels")]
    unfiltered: bool,

    #[clap(flatten)]
    output: FormatArgs,
}

impl OverviewArgs {
    #[instrument(skip_all)]
    pub async fn run(self, api: &Api) -> Result {
        let query = if self.unfiltered {
            PriceQuery::Unfiltered
        } else {
            let mut selection = SelectionSet::new(api.get_eligible_hotels().await?);
            if !self.hotels.is_empty() {
                let rejected = selection.select_only(self.hotels.iter().map(String::as_str));
                if !rejected.is_empty() {
                    warn!(hotels = rejected.iter().join(", "), "ignoring ineligible hotels");
                }
            }
            info!(n_selected = selection.len(), all = selection.is_all_selected(), "selected");
            PriceQuery::from(&selection)
        };

        let bundle = ChartSeriesBundle::assemble(&api.get_price_series(&query).await?);
        match self.output.format {
            Format::Table => println!("{}", build_overview_table(&bundle)),
            Format::Json => println!("{}", serde_json::to_string_pretty(&bundle.to_chart_data())?),
        }
        Ok(())
    }
}
