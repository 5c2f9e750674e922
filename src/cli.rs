mod api;
mod dashboard;
mod market;
mod overview;

use clap::{Parser, Subcommand, ValueEnum};

use crate::{
    cli::{
        api::ApiArgs,
        dashboard::DashboardArgs,
        market::{HotelsArgs, OccupancyArgs, ShareArgs},
        overview::OverviewArgs,
    },
    prelude::*,
};

#[derive(Parser)]
#[command(author, version, about, propagate_version = true)]
#[must_use]
pub struct Args {
    #[clap(flatten)]
    api: ApiArgs,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub async fn run(self) -> Result {
        let api = self.api.new_client()?;
        match self.command {
            Command::Hotels(args) => args.run(&api).await,
            Command::Overview(args) => args.run(&api).await,
            Command::Share(args) => args.run(&api).await,
            Command::Occupancy(args) => args.run(&api).await,
            Command::Dashboard(args) => args.run(api).await,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// List the hotels eligible for comparison.
    Hotels(HotelsArgs),

    /// Competitor price ranges and medians against my price.
    Overview(OverviewArgs),

    /// Market share over the last week, top hotels and the rest.
    Share(ShareArgs),

    /// Daily occupancy.
    Occupancy(OccupancyArgs),

    /// Everything at once, with the hotel selection edited from the standard input.
    Dashboard(DashboardArgs),
}

#[derive(Copy, Clone, Default, ValueEnum)]
pub enum Format {
    /// Human-readable table.
    #[default]
    Table,

    /// JSON for a charting front-end.
    Json,
}

#[derive(Copy, Clone, Parser)]
pub struct FormatArgs {
    #[clap(long, value_enum, default_value_t, env = "REVANALYTICA_FORMAT")]
    pub format: Format,
}
