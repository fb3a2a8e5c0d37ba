use serde::{Deserialize, Serialize};

use super::alert::{AlertState, Direction};

pub const DEFAULT_NOTIFY_STEP: f64 = 0.05;

fn default_notify_step() -> f64 {
    DEFAULT_NOTIFY_STEP
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoinConfig {
    // CoinGecko id, e.g. "bitcoin"
    pub id: String,
    pub name: String,
    pub threshold: f64,

    // fraction, 0.05 == 5%
    #[serde(default = "default_notify_step")]
    pub notify_step: f64,
}

impl CoinConfig {
    pub fn new(id: &str, name: &str, threshold: f64, notify_step: f64) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            threshold,
            notify_step,
        }
    }
}

/// Read-only view of one coin served by `GET /coins`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoinSnapshot {
    pub id: String,
    pub name: String,
    pub threshold: f64,
    pub notify_step: f64,
    pub last_price: Option<f64>,
    pub active: bool,
    pub anchor_price: Option<f64>,
    pub direction: Direction,
    pub updated_at: Option<i64>,
}

impl CoinSnapshot {
    pub fn from_state(
        coin: &CoinConfig,
        state: &AlertState,
        last_price: Option<f64>,
        updated_at: Option<i64>,
    ) -> Self {
        Self {
            id: coin.id.clone(),
            name: coin.name.clone(),
            threshold: coin.threshold,
            notify_step: coin.notify_step,
            last_price,
            active: state.is_active(),
            anchor_price: state.anchor(),
            direction: state.last_direction,
            updated_at,
        }
    }
}
