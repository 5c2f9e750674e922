//! Dashboard state driven by the hotel selection.
//!
//! The selection has a single owner, [`Orchestrator`]. Consumers read it or subscribe to it,
//! every effective change re-requests the market graph.

use std::sync::Arc;

use bon::Builder;
use tokio::{sync::watch, task::JoinHandle};
use tracing::Instrument;

use crate::{
    api::{MarketSource, PriceQuery},
    core::{
        occupancy::{self, OccupancyRow},
        selection::SelectionSet,
        series::ChartSeriesBundle,
        share::ShareBreakdown,
    },
    prelude::*,
};

/// Everything the dashboard renders.
///
/// Each slice keeps its last successfully fetched value, failures leave it stale.
#[must_use]
#[derive(Clone, Debug, Default)]
pub struct Dashboard {
    pub prices: Option<Prices>,
    pub share: Option<ShareBreakdown>,
    pub occupancy: Option<Vec<OccupancyRow>>,

    /// Generation of the most recently requested market graph.
    pub latest_generation: u64,
}

impl Dashboard {
    /// Whether a newer market graph has been requested than the one on display.
    #[must_use]
    pub fn is_loading_prices(&self) -> bool {
        self.prices.as_ref().is_none_or(|prices| prices.generation != self.latest_generation)
    }
}

#[must_use]
#[derive(Clone, Debug, Builder)]
pub struct Prices {
    pub query: PriceQuery,
    pub generation: u64,
    pub bundle: ChartSeriesBundle,
}

pub struct Orchestrator<S: ?Sized> {
    source: Arc<S>,
    selection: watch::Sender<SelectionSet>,
    state: Arc<watch::Sender<Dashboard>>,
    in_flight: Option<JoinHandle<()>>,

    /// Request the whole market instead of the selection.
    unfiltered: bool,
}

impl<S: MarketSource + ?Sized + 'static> Orchestrator<S> {
    pub fn new(source: Arc<S>, unfiltered: bool) -> Self {
        Self {
            source,
            selection: watch::Sender::new(SelectionSet::default()),
            state: Arc::new(watch::Sender::new(Dashboard::default())),
            in_flight: None,
            unfiltered,
        }
    }

    pub fn selection(&self) -> watch::Ref<'_, SelectionSet> {
        self.selection.borrow()
    }

    pub fn subscribe_selection(&self) -> watch::Receiver<SelectionSet> {
        self.selection.subscribe()
    }

    pub fn state(&self) -> watch::Ref<'_, Dashboard> {
        self.state.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<Dashboard> {
        self.state.subscribe()
    }

    /// Fetch the one-time data and request the first market graph.
    ///
    /// The eligible hotels replace the selection with «everything selected».
    #[instrument(skip_all)]
    pub async fn mount(&mut self) {
        let (hotels, share, occupancy) = tokio::join!(
            self.source.get_eligible_hotels(),
            self.source.get_market_share(),
            self.source.get_occupancy(),
        );

        match share.and_then(|record| Ok(record.aggregate()?)) {
            Ok(share) => self.state.send_modify(|state| state.share = Some(share)),
            Err(error) => warn!("failed to update the market share: {error:#}"),
        }
        match occupancy {
            Ok(points) => {
                let rows = occupancy::normalize(&points);
                self.state.send_modify(|state| state.occupancy = Some(rows));
            }
            Err(error) => warn!("failed to update the occupancy: {error:#}"),
        }
        match hotels {
            Ok(hotels) => {
                self.selection.send_replace(SelectionSet::new(hotels));
            }
            Err(error) => warn!("failed to update the eligible hotels: {error:#}"),
        }

        self.refresh_prices();
    }

    /// Apply the change to the selection and re-request the market graph if it did change.
    pub fn update_selection(&mut self, update: impl FnOnce(&mut SelectionSet)) -> bool {
        let is_modified = self.selection.send_if_modified(|selection| {
            let before = selection.clone();
            update(selection);
            *selection != before
        });
        if is_modified {
            self.refresh_prices();
        }
        is_modified
    }

    /// Request the market graph for the current selection.
    ///
    /// The previous request is aborted. Should it complete anyway, its generation is no longer
    /// the latest one and the response is discarded.
    pub fn refresh_prices(&mut self) {
        if let Some(in_flight) = self.in_flight.take() {
            in_flight.abort();
        }

        let mut generation = 0;
        self.state.send_modify(|state| {
            state.latest_generation += 1;
            generation = state.latest_generation;
        });

        let query = if self.unfiltered {
            PriceQuery::Unfiltered
        } else {
            PriceQuery::from(&*self.selection.borrow())
        };
        debug!(generation, ?query, "requesting the market graph…");

        let source = Arc::clone(&self.source);
        let state = Arc::clone(&self.state);
        let task = async move {
            fetch_prices(source, state, query, generation).await;
        };
        self.in_flight =
            Some(tokio::spawn(task.instrument(tracing::info_span!("prices", generation))));
    }

    /// Wait for the in-flight market graph request, if any.
    pub async fn settle(&mut self) {
        if let Some(in_flight) = self.in_flight.take()
            && let Err(error) = in_flight.await
            && !error.is_cancelled()
        {
            error!("market graph task failed: {error:#}");
        }
    }
}

/// Fetch the market graph and publish it unless a newer one has been requested meanwhile.
///
/// Returns whether the response made it into the state.
async fn fetch_prices<S: MarketSource + ?Sized>(
    source: Arc<S>,
    state: Arc<watch::Sender<Dashboard>>,
    query: PriceQuery,
    generation: u64,
) -> bool {
    let points = match source.get_price_series(&query).await {
        Ok(points) => points,
        Err(error) => {
            warn!("failed to update the market graph: {error:#}");
            return false;
        }
    };
    let bundle = ChartSeriesBundle::assemble(&points);
    let is_accepted = state.send_if_modified(|state| {
        if state.latest_generation != generation {
            return false;
        }
        let prices = Prices::builder().query(query).generation(generation).bundle(bundle);
        state.prices = Some(prices.build());
        true
    });
    if !is_accepted {
        debug!("discarded the superseded market graph");
    }
    is_accepted
}

impl<S: ?Sized> Drop for Orchestrator<S> {
    fn drop(&mut self) {
        if let Some(in_flight) = self.in_flight.take() {
            in_flight.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{
        collections::HashMap,
        sync::{
            Mutex,
            atomic::{AtomicBool, Ordering},
        },
        time::Duration,
    };

    use async_trait::async_trait;
    use tokio::time::sleep;

    use super::*;
    use crate::core::{occupancy::OccupancyPoint, series::PricePoint, share::ShareRecord};

    #[derive(Default)]
    struct FakeSource {
        hotels: Option<Vec<String>>,
        share: Option<ShareRecord>,
        occupancy: Option<Vec<OccupancyPoint>>,

        /// Response delay per selection key.
        delays: HashMap<String, Duration>,

        fail_prices: AtomicBool,
        requested: Mutex<Vec<PriceQuery>>,
    }

    impl FakeSource {
        fn with_hotels(hotels: &[&str]) -> Self {
            Self {
                hotels: Some(hotels.iter().map(|hotel| (*hotel).to_owned()).collect()),
                share: Some(ShareRecord(vec![("A".to_owned(), 3), ("B".to_owned(), 1)])),
                occupancy: Some(vec![OccupancyPoint {
                    date: "8152024".to_owned(),
                    occupancy: 70.0,
                }]),
                ..Self::default()
            }
        }

        fn n_requested(&self) -> usize {
            self.requested.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl MarketSource for FakeSource {
        async fn get_eligible_hotels(&self) -> Result<Vec<String>> {
            self.hotels.clone().context("no hotels")
        }

        /// Respond with a single point labeled by the query.
        async fn get_price_series(&self, query: &PriceQuery) -> Result<Vec<PricePoint>> {
            self.requested.lock().unwrap().push(query.clone());
            let key = match query {
                PriceQuery::Unfiltered => "*",
                PriceQuery::Selected(key) => key.as_str(),
            };
            if let Some(delay) = self.delays.get(key) {
                sleep(*delay).await;
            }
            ensure!(!self.fail_prices.load(Ordering::Relaxed), "prices are down");
            Ok(vec![PricePoint {
                date: key.to_owned(),
                min: 100.0,
                max: 200.0,
                my_price: 150.0,
                median: 160.0,
            }])
        }

        async fn get_occupancy(&self) -> Result<Vec<OccupancyPoint>> {
            self.occupancy.clone().context("no occupancy")
        }

        async fn get_market_share(&self) -> Result<ShareRecord> {
            self.share.clone().context("no market share")
        }
    }

    fn displayed_label<S: ?Sized>(orchestrator: &Orchestrator<S>) -> Option<String> {
        orchestrator.state.borrow().prices.as_ref().map(|prices| prices.bundle.labels[0].clone())
    }

    #[tokio::test(start_paused = true)]
    async fn mount_selects_everything() {
        let source = Arc::new(FakeSource::with_hotels(&["B", "A"]));
        let mut orchestrator = Orchestrator::new(source, false);
        orchestrator.mount().await;
        orchestrator.settle().await;

        assert!(orchestrator.selection().is_all_selected());
        assert_eq!(orchestrator.selection().key(), "A|B");

        let state = orchestrator.state();
        assert!(!state.is_loading_prices());
        let prices = state.prices.as_ref().unwrap();
        assert_eq!(prices.query, PriceQuery::Selected("A|B".to_owned()));
        assert_eq!(prices.bundle.len(), 1);
        assert_eq!(state.share.as_ref().unwrap().labels, ["A", "Others"]);
        assert_eq!(state.occupancy.as_ref().unwrap()[0].date.unwrap().to_string(), "2024-08-15");
    }

    #[tokio::test(start_paused = true)]
    async fn latest_selection_wins() {
        let mut source = FakeSource::with_hotels(&["A", "B"]);
        source.delays.insert("A|B".to_owned(), Duration::from_millis(100));
        source.delays.insert("A".to_owned(), Duration::from_millis(10));
        let mut orchestrator = Orchestrator::new(Arc::new(source), false);

        orchestrator.mount().await;
        assert!(orchestrator.update_selection(|selection| {
            selection.toggle("B");
        }));
        orchestrator.settle().await;
        sleep(Duration::from_millis(200)).await;

        assert_eq!(displayed_label(&orchestrator).as_deref(), Some("A"));
        let state = orchestrator.state();
        assert_eq!(state.latest_generation, 2);
        assert_eq!(state.prices.as_ref().unwrap().generation, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn unchanged_selection_does_not_refetch() {
        let source = Arc::new(FakeSource::with_hotels(&["A", "B"]));
        let mut orchestrator = Orchestrator::new(Arc::clone(&source), false);
        orchestrator.mount().await;
        orchestrator.settle().await;
        assert_eq!(source.n_requested(), 1);

        assert!(!orchestrator.update_selection(SelectionSet::select_all));
        assert!(!orchestrator.update_selection(|selection| {
            selection.toggle("unknown");
        }));
        assert_eq!(source.n_requested(), 1);

        assert!(orchestrator.update_selection(SelectionSet::unselect_all));
        orchestrator.settle().await;
        assert_eq!(source.n_requested(), 2);
        assert_eq!(displayed_label(&orchestrator).as_deref(), Some(""));
    }

    #[tokio::test(start_paused = true)]
    async fn failed_fetch_keeps_stale_prices() {
        let source = Arc::new(FakeSource::with_hotels(&["A", "B"]));
        let mut orchestrator = Orchestrator::new(Arc::clone(&source), false);
        orchestrator.mount().await;
        orchestrator.settle().await;

        source.fail_prices.store(true, Ordering::Relaxed);
        orchestrator.update_selection(|selection| {
            selection.toggle("A");
        });
        orchestrator.settle().await;

        assert_eq!(displayed_label(&orchestrator).as_deref(), Some("A|B"));
        assert!(orchestrator.state().is_loading_prices());
    }

    #[tokio::test(start_paused = true)]
    async fn failed_mount_leaves_empty_slices() {
        let source = FakeSource {
            share: Some(ShareRecord(vec![("A".to_owned(), 0)])),
            ..FakeSource::default()
        };
        let mut orchestrator = Orchestrator::new(Arc::new(source), true);
        orchestrator.mount().await;
        orchestrator.settle().await;

        assert!(orchestrator.selection().universe().is_empty());
        let state = orchestrator.state();
        assert!(state.share.is_none());
        assert!(state.occupancy.is_none());
        assert_eq!(state.prices.as_ref().unwrap().query, PriceQuery::Unfiltered);
    }

    #[tokio::test(start_paused = true)]
    async fn subscribers_see_selection_changes() -> Result {
        let source = Arc::new(FakeSource::with_hotels(&["A", "B"]));
        let mut orchestrator = Orchestrator::new(source, false);
        let mut selection = orchestrator.subscribe_selection();
        orchestrator.mount().await;
        selection.changed().await?;
        assert_eq!(selection.borrow_and_update().len(), 2);

        orchestrator.update_selection(SelectionSet::unselect_all);
        selection.changed().await?;
        assert!(selection.borrow_and_update().is_empty());
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn state_subscribers_see_fresh_prices() -> Result {
        let mut source = FakeSource::with_hotels(&["A", "B"]);
        source.delays.insert("B".to_owned(), Duration::from_millis(50));
        let mut orchestrator = Orchestrator::new(Arc::new(source), false);
        let mut state = orchestrator.subscribe();
        orchestrator.mount().await;
        orchestrator.update_selection(|selection| {
            selection.toggle("A");
        });

        let fresh = state.wait_for(|state| !state.is_loading_prices()).await?;
        let prices = fresh.prices.as_ref().context("no prices")?;
        assert_eq!(prices.query, PriceQuery::Selected("B".to_owned()));
        assert_eq!(prices.generation, 2);
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn superseded_response_is_discarded() {
        let source = Arc::new(FakeSource::with_hotels(&["A", "B"]));
        let mut orchestrator = Orchestrator::new(Arc::clone(&source), false);
        orchestrator.mount().await;
        orchestrator.settle().await;
        assert_eq!(orchestrator.state().latest_generation, 1);

        let is_accepted = fetch_prices(
            source,
            Arc::clone(&orchestrator.state),
            PriceQuery::Selected("A".to_owned()),
            0,
        )
        .await;

        assert!(!is_accepted);
        assert_eq!(displayed_label(&orchestrator).as_deref(), Some("A|B"));
        assert_eq!(orchestrator.state().prices.as_ref().unwrap().generation, 1);
    }
}
