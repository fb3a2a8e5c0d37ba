use coinwatch::models::{AlertState, Direction};
use coinwatch::services::alert_logic::{
    evaluate_threshold, should_notify, should_notify_decrease, tick, TickOutcome,
};

const THRESHOLD: f64 = 100.0;
const STEP: f64 = 0.05;

fn run(state: AlertState, price: f64) -> (TickOutcome, AlertState) {
    tick(state, price, THRESHOLD, STEP)
}

fn active(anchor: f64, direction: Direction) -> AlertState {
    AlertState {
        last_notified_price: Some(anchor),
        has_reached_threshold: true,
        last_direction: direction,
    }
}

const QUIET: TickOutcome = TickOutcome {
    threshold_fired: false,
    movement_fired: false,
};
const THRESHOLD_ONLY: TickOutcome = TickOutcome {
    threshold_fired: true,
    movement_fired: false,
};
const MOVEMENT_ONLY: TickOutcome = TickOutcome {
    threshold_fired: false,
    movement_fired: true,
};

#[test]
fn full_episode_walkthrough() {
    let state = AlertState::default();

    // 110: above threshold, nothing happens
    let (out, state) = run(state, 110.0);
    assert_eq!(out, QUIET);
    assert_eq!(state, AlertState::default());

    // 100: crossing fires the threshold alert only
    let (out, state) = run(state, 100.0);
    assert_eq!(out, THRESHOLD_ONLY);
    assert_eq!(state, active(100.0, Direction::Decrease));

    // 96: 4% drop is below the step
    let (out, state) = run(state, 96.0);
    assert_eq!(out, QUIET);
    assert_eq!(state, active(100.0, Direction::Decrease));

    // 95: 5% drop from the anchor fires
    let (out, state) = run(state, 95.0);
    assert_eq!(out, MOVEMENT_ONLY);
    assert_eq!(state, active(95.0, Direction::Decrease));

    // 97: bounce above the anchor flips to increase
    let (out, state) = run(state, 97.0);
    assert_eq!(out, MOVEMENT_ONLY);
    assert_eq!(state, active(97.0, Direction::Increase));

    // 101: recovery resets without a directional alert
    let (out, state) = run(state, 101.0);
    assert_eq!(out, QUIET);
    assert_eq!(state, AlertState::default());
}

#[test]
fn threshold_boundary_is_inclusive() {
    let (out, state) = run(AlertState::default(), 100.0);
    assert_eq!(out, THRESHOLD_ONLY);
    assert_eq!(state.last_notified_price, Some(100.0));
}

#[test]
fn inactive_above_threshold_never_changes() {
    let mut state = AlertState::default();
    for price in [100.5, 250.0, 100.000_001, 1_000_000.0] {
        let (activated, next) = evaluate_threshold(state, price, THRESHOLD);
        assert!(!activated);
        assert_eq!(next, AlertState::default());
        state = next;
    }
}

#[test]
fn exact_step_fires_and_just_under_does_not() {
    let state = active(100.0, Direction::Decrease);

    let (fired, next) = should_notify_decrease(state, 95.0, THRESHOLD, STEP);
    assert!(fired);
    assert_eq!(next.last_notified_price, Some(95.0));

    let (fired, next) = should_notify_decrease(state, 95.0001, THRESHOLD, STEP);
    assert!(!fired);
    assert_eq!(next, state);
}

#[test]
fn drops_are_measured_from_the_last_alert() {
    let mut state = active(100.0, Direction::Decrease);
    let mut fired_at = Vec::new();

    for price in [97.0, 95.0, 93.0, 91.0, 90.25, 86.0] {
        let (out, next) = run(state, price);
        if out.movement_fired {
            fired_at.push(price);
        }
        state = next;
    }

    // 95 is 5% off 100; 90.25 is 5% off 95; 86 is under 5% off 90.25
    assert_eq!(fired_at, vec![95.0, 90.25]);
    assert_eq!(state.last_notified_price, Some(90.25));
}

#[test]
fn any_rise_fires_in_an_increase_run() {
    let mut state = active(80.0, Direction::Increase);
    for price in [80.01, 80.02, 95.0, 99.99] {
        let (out, next) = run(state, price);
        assert_eq!(out, MOVEMENT_ONLY, "price {price}");
        assert_eq!(next.last_notified_price, Some(price));
        state = next;
    }
}

#[test]
fn increase_run_stays_quiet_on_falls() {
    let state = active(97.0, Direction::Increase);
    for price in [97.0, 90.0, 50.0] {
        let (out, next) = run(state, price);
        assert_eq!(out, QUIET);
        assert_eq!(next, state);
    }
}

#[test]
fn repeated_price_never_fires() {
    for start in [active(90.0, Direction::Decrease), active(90.0, Direction::Increase)] {
        let mut state = start;
        for _ in 0..5 {
            let (out, next) = run(state, 90.0);
            assert_eq!(out, QUIET);
            state = next;
        }
        assert_eq!(state, start);
    }
}

#[test]
fn reset_from_any_active_state_is_quiet() {
    for start in [active(60.0, Direction::Decrease), active(99.0, Direction::Increase)] {
        let (out, next) = run(start, 100.01);
        assert_eq!(out, QUIET);
        assert_eq!(next, AlertState::default());

        let (fired, after) = should_notify(next, 100.01, THRESHOLD, STEP);
        assert!(!fired);
        assert_eq!(after, AlertState::default());
    }
}

#[test]
fn new_episode_after_recovery_starts_over() {
    let (_, state) = run(AlertState::default(), 90.0);
    let (_, state) = run(state, 95.0);
    assert_eq!(state.last_direction, Direction::Increase);

    let (_, state) = run(state, 120.0);
    let (out, state) = run(state, 99.0);
    assert_eq!(out, THRESHOLD_ONLY);
    assert_eq!(state, active(99.0, Direction::Decrease));
}

#[test]
fn active_state_always_has_an_anchor() {
    let prices = [120.0, 99.0, 94.0, 96.0, 101.0, 80.0, 70.0, 75.0, 60.0, 200.0, 100.0];
    let mut state = AlertState::default();
    for price in prices {
        let (_, next) = run(state, price);
        if next.has_reached_threshold {
            assert!(next.last_notified_price.is_some());
            assert_ne!(next.last_direction, Direction::None);
        } else {
            assert_eq!(next, AlertState::default());
        }
        state = next;
    }
}
