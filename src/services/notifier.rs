use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::{
    error::{NotifierError, Result},
    models::{AlertEvent, AlertKind},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub message: String,
    pub kind: AlertKind,
}

/// Sink for alert notifications.
pub trait Notifier: Send + Sync {
    fn notify(&self, event: &AlertEvent, notification: &Notification) -> Result<()>;
}

/// Writes every alert to the log.
#[derive(Debug, Clone, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, event: &AlertEvent, n: &Notification) -> Result<()> {
        match n.kind {
            AlertKind::Threshold => tracing::warn!(
                coin = %event.coin_id,
                kind = n.kind.as_str(),
                "[NOTIFY] {}: {}",
                n.title,
                n.message
            ),
            AlertKind::Movement => tracing::info!(
                coin = %event.coin_id,
                kind = n.kind.as_str(),
                "[NOTIFY] {}: {}",
                n.title,
                n.message
            ),
        }
        Ok(())
    }
}

/// Payload published on the events channel and streamed by `GET /events`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertMessage {
    #[serde(flatten)]
    pub event: AlertEvent,
    pub title: String,
    pub message: String,
}

/// Publishes alerts as JSON on a broadcast channel.
#[derive(Clone)]
pub struct BroadcastNotifier {
    tx: broadcast::Sender<String>,
}

impl BroadcastNotifier {
    pub fn new(tx: broadcast::Sender<String>) -> Self {
        Self { tx }
    }
}

impl Notifier for BroadcastNotifier {
    fn notify(&self, event: &AlertEvent, n: &Notification) -> Result<()> {
        let payload = serde_json::to_string(&AlertMessage {
            event: event.clone(),
            title: n.title.clone(),
            message: n.message.clone(),
        })?;

        // nobody listening is fine
        if self.tx.receiver_count() == 0 {
            return Ok(());
        }

        self.tx
            .send(payload)
            .map(|_| ())
            .map_err(|e| NotifierError::Delivery(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Direction;

    fn sample() -> (AlertEvent, Notification) {
        let event = AlertEvent {
            coin_id: "solana".to_string(),
            coin_name: "Solana".to_string(),
            kind: AlertKind::Movement,
            price: 97.0,
            threshold: 100.0,
            direction: Direction::Increase,
            at: 1_700_000_000,
        };
        let n = Notification {
            title: "Solana Alert".to_string(),
            message: "Solana has reached 100 -> now 97.00".to_string(),
            kind: AlertKind::Movement,
        };
        (event, n)
    }

    #[test]
    fn broadcast_without_receivers_is_ok() {
        let (tx, rx) = broadcast::channel::<String>(4);
        drop(rx);
        let (event, n) = sample();
        assert!(BroadcastNotifier::new(tx).notify(&event, &n).is_ok());
    }

    #[test]
    fn broadcast_publishes_json() {
        let (tx, mut rx) = broadcast::channel::<String>(4);
        let (event, n) = sample();
        BroadcastNotifier::new(tx).notify(&event, &n).unwrap();

        let raw = rx.try_recv().unwrap();
        let msg: AlertMessage = serde_json::from_str(&raw).unwrap();
        assert_eq!(msg.event, event);
        assert_eq!(msg.title, "Solana Alert");

        let v: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(v["kind"], "movement");
        assert_eq!(v["direction"], "increase");
    }
}
