use std::{str::FromStr, sync::Arc};

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader, stdin};

use crate::{
    api::{Api, MarketSource},
    core::selection::SelectionSet,
    dashboard::Orchestrator,
    prelude::*,
    tables::{build_hotels_table, build_occupancy_table, build_overview_table, build_share_table},
};

#[derive(Parser)]
pub struct DashboardArgs {
    /// Request the whole market regardless of the selection.
    #[clap(long)]
    unfiltered: bool,
}

impl DashboardArgs {
    pub async fn run(self, api: Api) -> Result {
        let mut orchestrator = Orchestrator::new(Arc::new(api), self.unfiltered);
        orchestrator.mount().await;
        orchestrator.settle().await;
        render(&orchestrator);
        eprintln!("{}", Action::HELP);

        let mut lines = BufReader::new(stdin()).lines();
        while let Some(line) = lines.next_line().await? {
            let action = match line.parse::<Action>() {
                Ok(action) => action,
                Err(error) => {
                    warn!("{error:#}");
                    continue;
                }
            };
            match action {
                Action::SelectAll => {
                    orchestrator.update_selection(SelectionSet::select_all);
                }
                Action::UnselectAll => {
                    orchestrator.update_selection(SelectionSet::unselect_all);
                }
                Action::Toggle(hotel) => {
                    let mut is_eligible = true;
                    orchestrator.update_selection(|selection| {
                        is_eligible = selection.toggle(&hotel);
                    });
                    if !is_eligible {
                        warn!(hotel, "not an eligible hotel");
                        continue;
                    }
                }
                Action::Show => {}
                Action::Help => {
                    eprintln!("{}", Action::HELP);
                    continue;
                }
                Action::Quit => break,
            }
            orchestrator.settle().await;
            render(&orchestrator);
        }
        Ok(())
    }
}

fn render<S: MarketSource + ?Sized + 'static>(orchestrator: &Orchestrator<S>) {
    println!("{}", build_hotels_table(&orchestrator.selection()));
    let state = orchestrator.state();
    if let Some(prices) = &state.prices {
        println!("{}", build_overview_table(&prices.bundle));
    }
    if state.is_loading_prices() {
        warn!("the market graph is out of date");
    }
    if let Some(share) = &state.share {
        println!("{}", build_share_table(share));
    }
    if let Some(occupancy) = &state.occupancy {
        println!("{}", build_occupancy_table(occupancy));
    }
}

/// Selection command read from a line of input.
#[derive(Clone, Debug, Eq, PartialEq)]
enum Action {
    SelectAll,
    UnselectAll,
    Toggle(String),
    Show,
    Help,
    Quit,
}

impl Action {
    const HELP: &'static str = "commands: all, none, toggle <hotel>, show, help, quit";
}

impl FromStr for Action {
    type Err = Error;

    fn from_str(line: &str) -> Result<Self> {
        let line = line.trim();
        let (command, argument) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let argument = argument.trim();
        match (command, argument) {
            ("all", "") => Ok(Self::SelectAll),
            ("none", "") => Ok(Self::UnselectAll),
            ("toggle", "") => bail!("`toggle` needs a hotel"),
            ("toggle", hotel) => Ok(Self::Toggle(hotel.to_owned())),
            ("show" | "", "") => Ok(Self::Show),
            ("help", "") => Ok(Self::Help),
            ("quit" | "exit", "") => Ok(Self::Quit),
            _ => bail!("unknown command `{line}`, {}", Self::HELP),
        }
    }
}
