use std::{convert::Infallible, time::Duration};

use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
};
use futures_util::stream::Stream;
use tokio::sync::broadcast::error::RecvError;

use crate::{services::notifier::AlertMessage, AppState};

/// Event name for a published alert: its kind, or `alert` if the payload can't be read.
fn event_name(payload: &str) -> &'static str {
    serde_json::from_str::<AlertMessage>(payload)
        .map(|m| m.event.kind.as_str())
        .unwrap_or("alert")
}

// GET /events
pub async fn sse_events(State(state): State<AppState>) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.events_tx.subscribe();

    let stream = futures_util::stream::unfold(rx, |mut rx| async move {
        let evt = match rx.recv().await {
            Ok(payload) => Event::default().event(event_name(&payload)).data(payload),
            Err(RecvError::Lagged(n)) => {
                tracing::warn!(skipped = n, "sse subscriber lagged");
                Event::default().event("ping").data("lagged")
            }
            Err(RecvError::Closed) => return None,
        };

        Some((Ok(evt), rx))
    });

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(20))
            .text("keep-alive"),
    )
}
