use clap::Parser;

use crate::{
    api::{Api, MarketSource},
    cli::{Format, FormatArgs},
    core::{occupancy, selection::SelectionSet},
    prelude::*,
    tables::{build_hotels_table, build_occupancy_table, build_share_table},
};

#[derive(Parser)]
pub struct HotelsArgs {
    #[clap(flatten)]
    output: FormatArgs,
}

impl HotelsArgs {
    pub async fn run(self, api: &Api) -> Result {
        let selection = SelectionSet::new(api.get_eligible_hotels().await?);
        match self.output.format {
            Format::Table => println!("{}", build_hotels_table(&selection)),
            Format::Json => println!("{}", serde_json::to_string_pretty(selection.universe())?),
        }
        Ok(())
    }
}

#[derive(Parser)]
pub struct ShareArgs {
    #[clap(flatten)]
    output: FormatArgs,
}

impl ShareArgs {
    pub async fn run(self, api: &Api) -> Result {
        let breakdown = api.get_market_share().await?.aggregate()?;
        info!(n_top = breakdown.labels.len() - 1, others = breakdown.others(), "aggregated");
        match self.output.format {
            Format::Table => println!("{}", build_share_table(&breakdown)),
            Format::Json => println!("{}", serde_json::to_string_pretty(&breakdown)?),
        }
        Ok(())
    }
}

#[derive(Parser)]
pub struct OccupancyArgs {
    #[clap(flatten)]
    output: FormatArgs,
}

impl OccupancyArgs {
    pub async fn run(self, api: &Api) -> Result {
        let rows = occupancy::normalize(&api.get_occupancy().await?);
        match self.output.format {
            Format::Table => println!("{}", build_occupancy_table(&rows)),
            Format::Json => println!("{}", serde_json::to_string_pretty(&rows)?),
        }
        Ok(())
    }
}
