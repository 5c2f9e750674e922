use std::time::Duration;

use reqwest::Client;

use crate::prelude::*;

/// Build a default client.
pub fn try_new(timeout: Duration) -> Result<Client> {
    Ok(Client::builder().timeout(timeout).build()?)
}
