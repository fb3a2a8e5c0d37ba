use std::{collections::HashSet, env, path::Path, time::Duration};

use crate::{
    error::{NotifierError, Result},
    models::{CoinConfig, DEFAULT_NOTIFY_STEP},
};

pub const DEFAULT_TITLE_TEMPLATE: &str = "{{name}} Alert";
pub const DEFAULT_MESSAGE_TEMPLATE: &str = "{{name}} has reached {{threshold}} -> now {{price}}";

#[derive(Debug, Clone)]
pub struct Settings {
    pub host: String,
    pub port: u16,

    pub poll_interval: Duration,
    pub vs_currency: String,

    pub coingecko_base_url: String,
    pub coingecko_api_key: Option<String>,
    pub http_timeout: Duration,

    pub coins_file: Option<String>,

    pub title_template: String,
    pub message_template: String,
}

pub fn load() -> Settings {
    // Loads .env if present (no crash if missing)
    dotenvy::dotenv().ok();

    from_lookup(|key| env::var(key).ok())
}

/// Builds settings from any key lookup; unset or unparsable values fall back to defaults.
pub fn from_lookup<F>(lookup: F) -> Settings
where
    F: Fn(&str) -> Option<String>,
{
    let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    let host = non_empty("HOST").unwrap_or_else(|| "127.0.0.1".to_string());

    let port = non_empty("PORT")
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);

    let poll_secs = non_empty("POLL_INTERVAL_SECS")
        .and_then(|s| s.parse::<u64>().ok())
        .filter(|s| *s > 0)
        .unwrap_or(60);

    let vs_currency = non_empty("VS_CURRENCY")
        .map(|s| s.to_lowercase())
        .unwrap_or_else(|| "usd".to_string());

    let coingecko_base_url = non_empty("COINGECKO_BASE_URL")
        .map(|s| s.trim_end_matches('/').to_string())
        .unwrap_or_else(|| "https://api.coingecko.com/api/v3".to_string());

    let http_timeout_secs = non_empty("HTTP_TIMEOUT_SECS")
        .and_then(|s| s.parse::<u64>().ok())
        .filter(|s| *s > 0)
        .unwrap_or(10);

    Settings {
        host,
        port,
        poll_interval: Duration::from_secs(poll_secs),
        vs_currency,
        coingecko_base_url,
        coingecko_api_key: non_empty("COINGECKO_API_KEY"),
        http_timeout: Duration::from_secs(http_timeout_secs),
        coins_file: non_empty("COINS_FILE"),
        title_template: non_empty("ALERT_TITLE_TEMPLATE")
            .unwrap_or_else(|| DEFAULT_TITLE_TEMPLATE.to_string()),
        message_template: non_empty("ALERT_MESSAGE_TEMPLATE")
            .unwrap_or_else(|| DEFAULT_MESSAGE_TEMPLATE.to_string()),
    }
}

pub fn default_coins() -> Vec<CoinConfig> {
    vec![
        CoinConfig::new("bitcoin", "Bitcoin", 107_600.0, DEFAULT_NOTIFY_STEP),
        CoinConfig::new("ethereum", "Ethereum", 1_000.0, DEFAULT_NOTIFY_STEP),
        CoinConfig::new("solana", "Solana", 100.0, DEFAULT_NOTIFY_STEP),
        CoinConfig::new("dogecoin", "Dogecoin", 0.1, DEFAULT_NOTIFY_STEP),
    ]
}

/// Watch list from `COINS_FILE` when set, otherwise the built-in list. Always validated.
pub fn load_coins(settings: &Settings) -> Result<Vec<CoinConfig>> {
    let coins = match &settings.coins_file {
        Some(path) => read_coins_file(path)?,
        None => default_coins(),
    };

    validate_coins(&coins)?;
    Ok(coins)
}

pub fn read_coins_file(path: impl AsRef<Path>) -> Result<Vec<CoinConfig>> {
    let raw = std::fs::read_to_string(path)?;
    parse_coins(&raw)
}

pub fn parse_coins(raw: &str) -> Result<Vec<CoinConfig>> {
    Ok(serde_json::from_str::<Vec<CoinConfig>>(raw)?)
}

pub fn validate_coins(coins: &[CoinConfig]) -> Result<()> {
    if coins.is_empty() {
        return Err(NotifierError::Config("coin list is empty".to_string()));
    }

    let mut seen = HashSet::new();
    for coin in coins {
        let id = coin.id.trim();
        if id.is_empty() {
            return Err(NotifierError::Config(format!(
                "coin '{}' has an empty id",
                coin.name
            )));
        }
        if !seen.insert(id.to_string()) {
            return Err(NotifierError::Config(format!("duplicate coin id '{id}'")));
        }
        if !coin.threshold.is_finite() || coin.threshold <= 0.0 {
            return Err(NotifierError::Config(format!(
                "coin '{id}': threshold must be a positive number, got {}",
                coin.threshold
            )));
        }
        if !(coin.notify_step > 0.0 && coin.notify_step < 1.0) {
            return Err(NotifierError::Config(format!(
                "coin '{id}': notify_step must be in (0, 1), got {}",
                coin.notify_step
            )));
        }
    }

    Ok(())
}
