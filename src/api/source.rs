use async_trait::async_trait;

use crate::{
    core::{
        occupancy::OccupancyPoint,
        selection::SelectionSet,
        series::PricePoint,
        share::ShareRecord,
    },
    prelude::*,
};

/// Which market graph to request.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PriceQuery {
    /// The whole market, regardless of the selection.
    Unfiltered,

    /// Pipe-joined hotel identifiers, see [`SelectionSet::key`].
    Selected(String),
}

impl From<&SelectionSet> for PriceQuery {
    fn from(selection: &SelectionSet) -> Self {
        Self::Selected(selection.key())
    }
}

#[async_trait]
pub trait MarketSource: Send + Sync {
    /// Hotels eligible for the selection, in the order the endpoint sent them.
    async fn get_eligible_hotels(&self) -> Result<Vec<String>>;

    async fn get_price_series(&self, query: &PriceQuery) -> Result<Vec<PricePoint>>;

    async fn get_occupancy(&self) -> Result<Vec<OccupancyPoint>>;

    /// Review counts per hotel over the last week.
    async fn get_market_share(&self) -> Result<ShareRecord>;
}
