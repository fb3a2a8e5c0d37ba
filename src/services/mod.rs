pub mod alert_logic;
pub mod alert_monitor;
pub mod coingecko;
pub mod notifier;
