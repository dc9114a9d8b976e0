//! Server-Sent-Events notification stream.

use std::convert::Infallible;

use axum::extract::State;
use axum::http::header::CONNECTION;
use axum::response::sse::Sse;
use axum::response::{IntoResponse, Response};
use futures::StreamExt;

use saasboard_realtime::open_stream;

use crate::extractors::StreamUser;
use crate::state::AppState;

/// GET /api/notifications/stream
///
/// The body ends when the client disconnects or the stream is evicted;
/// dropping it runs the stream's cleanup. `Sse` sets the content type and
/// `Cache-Control: no-cache`; keep-alive comments come from the stream
/// itself.
pub async fn stream(State(state): State<AppState>, user: StreamUser) -> Response {
    let frames = open_stream(&state.registry, user.user_id, &state.config.realtime);
    let events = frames.map(|frame| Ok::<_, Infallible>(frame.into_event()));

    ([(CONNECTION, "keep-alive")], Sse::new(events)).into_response()
}
