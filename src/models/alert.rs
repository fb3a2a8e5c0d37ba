use serde::{Deserialize, Serialize};

/// Which directional rule governs the next alert of an episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    None,
    Decrease,
    Increase,
}

/// Per-coin alert state. `Default` is the inactive state.
///
/// When `has_reached_threshold` is false, `last_notified_price` is `None` and
/// `last_direction` is `Direction::None`. When it is true, the anchor price is set.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AlertState {
    pub last_notified_price: Option<f64>,
    pub has_reached_threshold: bool,
    pub last_direction: Direction,
}

impl AlertState {
    pub fn is_active(&self) -> bool {
        self.has_reached_threshold
    }

    /// Anchor price, present only while an episode is active.
    pub fn anchor(&self) -> Option<f64> {
        if self.has_reached_threshold {
            self.last_notified_price
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertKind {
    Threshold,
    Movement,
}

impl AlertKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertKind::Threshold => "threshold",
            AlertKind::Movement => "movement",
        }
    }
}

/// One fired alert, produced by the monitor after the engine has decided.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertEvent {
    pub coin_id: String,
    pub coin_name: String,
    pub kind: AlertKind,
    pub price: f64,
    pub threshold: f64,
    pub direction: Direction,
    pub at: i64,
}
