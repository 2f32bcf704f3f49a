//! Server-sent events stream.
//!
//! Browsers hold one long-lived connection and reload their cached enum
//! dropdowns whenever an `enum_changed` event arrives (a migration ran
//! and the enum cache was invalidated).

use std::convert::Infallible;

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::Stream;
use tokio::sync::broadcast::error::RecvError;
use tracing::instrument;

use crate::state::AppState;

/// SSE stream handler for `GET /events`.
#[instrument(skip(state))]
pub async fn stream(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = std::result::Result<Event, Infallible>>> {
    let mut rx = state.enum_cache.subscribe();

    let stream = async_stream::stream! {
        loop {
            match rx.recv().await {
                Ok(()) => {
                    yield Ok(Event::default().event("enum_changed").data("changed"));
                }
                // Missed notifications still mean "something changed".
                Err(RecvError::Lagged(_)) => {
                    yield Ok(Event::default().event("enum_changed").data("changed"));
                }
                Err(RecvError::Closed) => break,
            }
        }
    };

    Sse::new(stream).keep_alive(KeepAlive::default())
}
