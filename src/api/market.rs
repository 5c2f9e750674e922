//! Hotel market endpoints: the pricing host and the analytics host.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;

use crate::{
    api::{
        client,
        source::{MarketSource, PriceQuery},
    },
    core::{occupancy::OccupancyPoint, series::PricePoint, share::ShareRecord},
    prelude::*,
};

pub struct Api {
    client: Client,

    /// Eligible hotels and market graphs.
    hotels_url: Url,

    /// Occupancy and market share.
    analytics_url: Url,
}

impl Api {
    pub fn try_new(hotels_url: Url, analytics_url: Url, timeout: Duration) -> Result<Self> {
        Ok(Self { client: client::try_new(timeout)?, hotels_url, analytics_url })
    }

    fn endpoint(base_url: &Url, name: &str) -> Result<Url> {
        let mut url = base_url.clone();
        url.path_segments_mut()
            .map_err(|()| anyhow!("invalid base URL: `{base_url}`"))?
            .pop_if_empty()
            .push(name);
        Ok(url)
    }

    fn price_series_url(&self, query: &PriceQuery) -> Result<Url> {
        Ok(match query {
            PriceQuery::Unfiltered => Self::endpoint(&self.hotels_url, "market_graph")?,
            PriceQuery::Selected(hotels) => {
                let mut url = Self::endpoint(&self.hotels_url, "market_graph1")?;
                url.query_pairs_mut().append_pair("hotels", hotels);
                url
            }
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        self.client
            .get(url.clone())
            .send()
            .await
            .with_context(|| format!("failed to request `{url}`"))?
            .error_for_status()
            .with_context(|| format!("request to `{url}` failed"))?
            .json()
            .await
            .with_context(|| format!("failed to deserialize the response from `{url}`"))
    }
}

#[async_trait]
impl MarketSource for Api {
    #[instrument(skip_all)]
    async fn get_eligible_hotels(&self) -> Result<Vec<String>> {
        let hotels: Vec<String> =
            self.get_json(Self::endpoint(&self.hotels_url, "eligible_hotels")?).await?;
        info!(n_hotels = hotels.len(), "fetched eligible hotels");
        Ok(hotels)
    }

    #[instrument(skip_all, fields(query = ?query))]
    async fn get_price_series(&self, query: &PriceQuery) -> Result<Vec<PricePoint>> {
        let points: Vec<PricePoint> = self.get_json(self.price_series_url(query)?).await?;
        info!(n_points = points.len(), "fetched market graph");
        Ok(points)
    }

    #[instrument(skip_all)]
    async fn get_occupancy(&self) -> Result<Vec<OccupancyPoint>> {
        let points: Vec<OccupancyPoint> =
            self.get_json(Self::endpoint(&self.analytics_url, "daily_occupancy")?).await?;
        info!(n_points = points.len(), "fetched occupancy");
        Ok(points)
    }

    #[instrument(skip_all)]
    async fn get_market_share(&self) -> Result<ShareRecord> {
        let record: ShareRecord =
            self.get_json(Self::endpoint(&self.analytics_url, "get_market_share")?).await?;
        info!(n_hotels = record.0.len(), "fetched market share");
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api() -> Result<Api> {
        Api::try_new(
            Url::parse("https://hotels.example.com")?,
            Url::parse("https://analytics.example.com/api/")?,
            Duration::from_secs(1),
        )
    }

    #[test]
    fn endpoint_ok() -> Result {
        let api = api()?;
        assert_eq!(
            Api::endpoint(&api.hotels_url, "eligible_hotels")?.as_str(),
            "https://hotels.example.com/eligible_hotels"
        );
        assert_eq!(
            Api::endpoint(&api.analytics_url, "daily_occupancy")?.as_str(),
            "https://analytics.example.com/api/daily_occupancy"
        );
        Ok(())
    }

    #[test]
    fn price_series_url_ok() -> Result {
        let api = api()?;
        assert_eq!(
            api.price_series_url(&PriceQuery::Unfiltered)?.as_str(),
            "https://hotels.example.com/market_graph"
        );
        assert_eq!(
            api.price_series_url(&PriceQuery::Selected("Hyatt|Taj Palace".to_owned()))?.as_str(),
            "https://hotels.example.com/market_graph1?hotels=Hyatt%7CTaj+Palace"
        );
        Ok(())
    }

    #[tokio::test]
    #[ignore = "makes the API request"]
    async fn get_eligible_hotels_ok() -> Result {
        let api = Api::try_new(
            Url::parse("https://www.mfamanagement.co.in")?,
            Url::parse("https://summerville.pythonanywhere.com")?,
            Duration::from_secs(10),
        )?;
        let hotels = api.get_eligible_hotels().await?;
        assert!(!hotels.is_empty());
        Ok(())
    }
}
