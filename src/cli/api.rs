use clap::Parser;
use reqwest::Url;

use crate::{api::Api, prelude::*};

#[derive(Parser)]
pub struct ApiArgs {
    /// Base URL of the eligible hotels and market graph endpoints.
    #[clap(
        long = "hotels-url",
        env = "REVANALYTICA_HOTELS_URL",
        default_value = "https://www.mfamanagement.co.in"
    )]
    pub hotels_url: Url,

    /// Base URL of the occupancy and market share endpoints.
    #[clap(
        long = "analytics-url",
        env = "REVANALYTICA_ANALYTICS_URL",
        default_value = "https://summerville.pythonanywhere.com"
    )]
    pub analytics_url: Url,

    /// Request timeout.
    #[clap(long, env = "REVANALYTICA_TIMEOUT", default_value = "10s")]
    pub timeout: humantime::Duration,
}

impl ApiArgs {
    pub fn new_client(&self) -> Result<Api> {
        Api::try_new(self.hotels_url.clone(), self.analytics_url.clone(), self.timeout.into())
    }
}
