//! Library entrypoint for coinwatch.
//!
//! The binary wires these together; integration tests under `tests/` import the
//! engine, monitor, and routers directly.

use std::sync::Arc;

use tokio::sync::{broadcast, RwLock};

pub mod config;
pub mod error;
pub mod models;

pub mod services;

#[path = "views/templates.rs"]
pub mod templates;

pub mod controllers;
pub mod routes;

#[derive(Clone)]
pub struct AppState {
    pub settings: config::Settings,
    pub coingecko: services::coingecko::CoinGeckoClient,
    pub renderer: templates::MessageRenderer,
    pub snapshots: Arc<RwLock<Vec<models::CoinSnapshot>>>,
    pub events_tx: broadcast::Sender<String>,
}
