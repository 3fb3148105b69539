//! Provider source seam: where the list of balance-transfer agents comes
//! from. The wizard only ever reads this list.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use shared::domain::Provider;

#[async_trait]
pub trait ProviderSource: Send + Sync {
    async fn fetch_providers(&self) -> Result<Vec<Provider>>;
}

/// Fixed in-memory list, the hard-coded-markup case.
pub struct StaticProviderSource {
    providers: Vec<Provider>,
}

impl StaticProviderSource {
    pub fn new(providers: Vec<Provider>) -> Self {
        Self { providers }
    }
}

#[async_trait]
impl ProviderSource for StaticProviderSource {
    async fn fetch_providers(&self) -> Result<Vec<Provider>> {
        Ok(self.providers.clone())
    }
}

/// One-shot JSON feed fetch at startup. Non-cancelable, no retry; a failure
/// leaves the wizard with nothing to choose.
pub struct HttpProviderSource {
    client: Client,
    feed_url: Url,
}

impl HttpProviderSource {
    pub fn new(feed_url: Url) -> Self {
        Self {
            client: Client::new(),
            feed_url,
        }
    }
}

#[async_trait]
impl ProviderSource for HttpProviderSource {
    async fn fetch_providers(&self) -> Result<Vec<Provider>> {
        let response = self
            .client
            .get(self.feed_url.clone())
            .send()
            .await
            .with_context(|| format!("provider feed request to {} failed", self.feed_url))?;
        let response = response
            .error_for_status()
            .context("provider feed returned an error status")?;
        let providers = response
            .json::<Vec<Provider>>()
            .await
            .context("provider feed payload is not a valid provider list")?;
        Ok(providers)
    }
}
