//! Per-coin alert decision logic.
//!
//! * First alert when the price first falls to or below the threshold.
//! * While the price stays below the threshold:
//!   - decrease: alert again only after a further `step` fractional drop from the
//!     last notified price;
//!   - increase: alert on any rise above the last notified price.
//! * A price back above the threshold resets the state.
//!
//! Every function takes the state by value and returns `(fired, new_state)`.
//! Call [`evaluate_threshold`] first on each tick, then [`should_notify`], with the
//! same price.

use crate::models::{AlertState, Direction};

/// Threshold crossing and recovery.
///
/// Returns `true` when the episode is active after this tick. Only the inactive to
/// active transition should be treated as a threshold alert; see [`TickOutcome`].
pub fn evaluate_threshold(state: AlertState, current_price: f64, threshold: f64) -> (bool, AlertState) {
    if !state.has_reached_threshold && current_price <= threshold {
        let next = AlertState {
            last_notified_price: Some(current_price),
            has_reached_threshold: true,
            last_direction: Direction::Decrease,
        };
        return (true, next);
    }

    if state.has_reached_threshold && current_price > threshold {
        return (false, AlertState::default());
    }

    (state.has_reached_threshold, state)
}

/// Fires when the price has fallen at least `step` below the last notified price
/// while still under the threshold.
pub fn should_notify_decrease(
    state: AlertState,
    current_price: f64,
    threshold: f64,
    step: f64,
) -> (bool, AlertState) {
    let Some(anchor) = state.anchor() else {
        return (false, state);
    };

    if current_price >= threshold {
        return (false, state);
    }

    let drop_fraction = (anchor - current_price) / anchor;
    if drop_fraction >= step {
        let next = AlertState {
            last_notified_price: Some(current_price),
            last_direction: Direction::Decrease,
            ..state
        };
        return (true, next);
    }

    (false, state)
}

/// Fires on any rise above the last notified price. `threshold` and `step` are
/// unused; the signature matches [`should_notify_decrease`].
pub fn should_notify_increase(
    state: AlertState,
    current_price: f64,
    _threshold: f64,
    _step: f64,
) -> (bool, AlertState) {
    let Some(anchor) = state.anchor() else {
        return (false, state);
    };

    if current_price > anchor {
        let next = AlertState {
            last_notified_price: Some(current_price),
            last_direction: Direction::Increase,
            ..state
        };
        return (true, next);
    }

    (false, state)
}

/// Directional alert router.
///
/// In a decrease run a bounce above the anchor flips the run to `Increase`. An
/// increase run never flips back to `Decrease`; a new decrease run starts only after
/// the price recovers above the threshold and crosses it again.
pub fn should_notify(state: AlertState, current_price: f64, threshold: f64, step: f64) -> (bool, AlertState) {
    match state.last_direction {
        Direction::Decrease => {
            let (fired, next) = should_notify_decrease(state, current_price, threshold, step);
            if fired {
                return (true, next);
            }
            should_notify_increase(next, current_price, threshold, step)
        }
        Direction::Increase => should_notify_increase(state, current_price, threshold, step),
        Direction::None => (false, state),
    }
}

/// Result of feeding one price through both decision points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickOutcome {
    pub threshold_fired: bool,
    pub movement_fired: bool,
}

/// Runs the threshold evaluator and the router for one tick.
///
/// `evaluate_threshold` keeps returning `true` for every tick of an active episode,
/// so the threshold alert is reported only on the tick that activates it.
pub fn tick(state: AlertState, current_price: f64, threshold: f64, step: f64) -> (TickOutcome, AlertState) {
    let was_active = state.has_reached_threshold;
    let (active, state) = evaluate_threshold(state, current_price, threshold);
    let (movement_fired, state) = should_notify(state, current_price, threshold, step);

    let outcome = TickOutcome {
        threshold_fired: active && !was_active,
        movement_fired,
    };
    (outcome, state)
}
