use std::{collections::HashMap, time::Duration};

use reqwest::Client;

use crate::error::{NotifierError, Result};

const API_KEY_HEADER: &str = "x-cg-demo-api-key";

/// `{ "bitcoin": { "usd": 64000.0 }, ... }`
pub type SimplePriceResponse = HashMap<String, HashMap<String, f64>>;

#[derive(Clone)]
pub struct CoinGeckoClient {
    http: Client,
    base_url: String,
    api_key: Option<String>,
}

impl CoinGeckoClient {
    pub fn new(base_url: String, api_key: Option<String>, timeout: Duration) -> Result<Self> {
        let http = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// One request for the whole batch. Coins the API does not know are absent
    /// from the returned map.
    pub async fn fetch_prices(&self, ids: &[String], vs_currency: &str) -> Result<HashMap<String, f64>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let url = format!("{}/simple/price", self.base_url);
        let joined = ids.join(",");

        let mut req = self
            .http
            .get(&url)
            .query(&[("ids", joined.as_str()), ("vs_currencies", vs_currency)]);
        if let Some(key) = &self.api_key {
            req = req.header(API_KEY_HEADER, key);
        }

        let res = req.send().await?;

        if !res.status().is_success() {
            let status = res.status().as_u16();
            let body = res.text().await.unwrap_or_default();
            return Err(NotifierError::PriceApi { status, body });
        }

        let parsed = res.json::<SimplePriceResponse>().await?;
        Ok(extract_prices(parsed, vs_currency))
    }

    /// Single-coin lookup; a coin missing from the response reads as 0.0.
    pub async fn get_current_price(&self, id: &str, vs_currency: &str) -> Result<f64> {
        let prices = self.fetch_prices(&[id.to_string()], vs_currency).await?;
        Ok(prices.get(id).copied().unwrap_or(0.0))
    }
}

pub fn extract_prices(response: SimplePriceResponse, vs_currency: &str) -> HashMap<String, f64> {
    response
        .into_iter()
        .filter_map(|(id, quotes)| quotes.get(vs_currency).map(|p| (id, *p)))
        .collect()
}
