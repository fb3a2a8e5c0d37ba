use std::{collections::HashMap, sync::Arc};

use tokio::{task::JoinHandle, time};

use crate::{
    models::{AlertEvent, AlertKind, AlertState, CoinConfig, CoinSnapshot},
    services::{alert_logic, notifier::Notifier},
    templates::MessageRenderer,
    AppState,
};

/// Owns one [`AlertState`] per configured coin. Driven by a single task, so ticks
/// for a coin never overlap.
pub struct PriceMonitor {
    coins: Vec<CoinConfig>,
    states: HashMap<String, AlertState>,
    last_prices: HashMap<String, (f64, i64)>,
}

impl PriceMonitor {
    pub fn new(coins: Vec<CoinConfig>) -> Self {
        Self {
            coins,
            states: HashMap::new(),
            last_prices: HashMap::new(),
        }
    }

    pub fn coins(&self) -> &[CoinConfig] {
        &self.coins
    }

    pub fn coin_ids(&self) -> Vec<String> {
        self.coins.iter().map(|c| c.id.clone()).collect()
    }

    pub fn state(&self, coin_id: &str) -> AlertState {
        self.states.get(coin_id).copied().unwrap_or_default()
    }

    /// Feeds one successful price batch through the engine.
    ///
    /// A coin missing from the batch, or priced at a negative or non-finite value, is
    /// skipped and its state is left as is. Events come out in config order, with a
    /// threshold alert before a movement alert for the same coin.
    pub fn apply_prices(&mut self, prices: &HashMap<String, f64>, now: i64) -> Vec<AlertEvent> {
        let mut events = Vec::new();

        for coin in &self.coins {
            let Some(&price) = prices.get(&coin.id) else {
                tracing::warn!(coin = %coin.id, "no price in batch, skipping");
                continue;
            };
            if !price.is_finite() || price < 0.0 {
                tracing::warn!(coin = %coin.id, price, "invalid price, skipping");
                continue;
            }

            tracing::info!("Monitoring {} at {}", coin.name, price);

            let state = self.states.entry(coin.id.clone()).or_default();
            let (outcome, next) = alert_logic::tick(*state, price, coin.threshold, coin.notify_step);
            *state = next;
            self.last_prices.insert(coin.id.clone(), (price, now));

            let mut push = |kind| {
                events.push(AlertEvent {
                    coin_id: coin.id.clone(),
                    coin_name: coin.name.clone(),
                    kind,
                    price,
                    threshold: coin.threshold,
                    direction: next.last_direction,
                    at: now,
                })
            };
            if outcome.threshold_fired {
                push(AlertKind::Threshold);
            }
            if outcome.movement_fired {
                push(AlertKind::Movement);
            }
        }

        events
    }

    pub fn snapshot(&self) -> Vec<CoinSnapshot> {
        self.coins
            .iter()
            .map(|coin| {
                let last = self.last_prices.get(&coin.id);
                CoinSnapshot::from_state(
                    coin,
                    &self.state(&coin.id),
                    last.map(|(p, _)| *p),
                    last.map(|(_, at)| *at),
                )
            })
            .collect()
    }
}

/// Renders each event and hands it to every sink. Failures are logged and never
/// undo the state change that produced the event. Returns the number of successful
/// deliveries.
pub fn deliver(events: &[AlertEvent], renderer: &MessageRenderer, notifiers: &[Arc<dyn Notifier>]) -> usize {
    let mut delivered = 0;

    for event in events {
        let notification = match renderer.render(event) {
            Ok(n) => n,
            Err(e) => {
                tracing::warn!(coin = %event.coin_id, "failed to render alert: {}", e);
                continue;
            }
        };

        for notifier in notifiers {
            match notifier.notify(event, &notification) {
                Ok(()) => delivered += 1,
                Err(e) => tracing::warn!(coin = %event.coin_id, "alert delivery failed: {}", e),
            }
        }
    }

    delivered
}

pub fn spawn_price_alert_monitor(
    state: AppState,
    mut monitor: PriceMonitor,
    notifiers: Vec<Arc<dyn Notifier>>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = time::interval(state.settings.poll_interval);
        interval.set_missed_tick_behavior(time::MissedTickBehavior::Delay);

        loop {
            interval.tick().await;
            run_tick(&state, &mut monitor, &notifiers).await;
        }
    })
}

/// Fetch, decide, publish, deliver. A failed fetch skips the tick without touching
/// any coin's state.
pub async fn run_tick(state: &AppState, monitor: &mut PriceMonitor, notifiers: &[Arc<dyn Notifier>]) {
    let ids = monitor.coin_ids();
    let prices = match state.coingecko.fetch_prices(&ids, &state.settings.vs_currency).await {
        Ok(p) => p,
        Err(e) => {
            tracing::error!("Error fetching prices: {}", e);
            return;
        }
    };

    let now = chrono::Utc::now().timestamp();
    let events = monitor.apply_prices(&prices, now);

    *state.snapshots.write().await = monitor.snapshot();

    if !events.is_empty() {
        let delivered = deliver(&events, &state.renderer, notifiers);
        tracing::debug!(events = events.len(), delivered, "tick delivered alerts");
    }
}
