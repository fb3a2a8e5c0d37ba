pub mod alert;
pub mod coin;

pub use alert::{AlertEvent, AlertKind, AlertState, Direction};
pub use coin::{CoinConfig, CoinSnapshot, DEFAULT_NOTIFY_STEP};
