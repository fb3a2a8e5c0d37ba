use std::{net::SocketAddr, sync::Arc};

use tokio::sync::{broadcast, RwLock};
use tracing_subscriber::EnvFilter;

use coinwatch::{
    config,
    error::NotifierError,
    routes,
    services::{
        alert_monitor::{self, PriceMonitor},
        coingecko::CoinGeckoClient,
        notifier::{BroadcastNotifier, LogNotifier, Notifier},
    },
    templates::MessageRenderer,
    AppState,
};

#[tokio::main]
async fn main() -> Result<(), NotifierError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("coinwatch=info")),
        )
        .init();

    let settings = config::load();
    let coins = config::load_coins(&settings)?;

    let coingecko = CoinGeckoClient::new(
        settings.coingecko_base_url.clone(),
        settings.coingecko_api_key.clone(),
        settings.http_timeout,
    )?;
    let renderer = MessageRenderer::new(&settings.title_template, &settings.message_template)?;
    let (events_tx, _events_rx) = broadcast::channel::<String>(64);

    let monitor = PriceMonitor::new(coins);

    let state = AppState {
        settings: settings.clone(),
        coingecko,
        renderer,
        snapshots: Arc::new(RwLock::new(monitor.snapshot())),
        events_tx: events_tx.clone(),
    };

    tracing::info!(
        coins = monitor.coins().len(),
        every_secs = settings.poll_interval.as_secs(),
        "starting price monitor"
    );

    let notifiers: Vec<Arc<dyn Notifier>> = vec![
        Arc::new(LogNotifier),
        Arc::new(BroadcastNotifier::new(events_tx)),
    ];
    let monitor_handle = alert_monitor::spawn_price_alert_monitor(state.clone(), monitor, notifiers);

    let ip = settings
        .host
        .parse::<std::net::IpAddr>()
        .map_err(|e| NotifierError::Config(format!("invalid HOST '{}': {e}", settings.host)))?;
    let addr = SocketAddr::from((ip, settings.port));
    tracing::info!("listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    let app = routes::app(state);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    monitor_handle.abort();
    tracing::info!("Notifier stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for ctrl-c: {}", e);
    }
}
