//! Server-Sent-Events frames.

use axum::response::sse::Event;
use serde::Serialize;

use saasboard_core::result::AppResult;

/// Payload of the first frame on every stream.
pub const CONNECTED_PAYLOAD: &str = r#"{"type":"connected"}"#;

/// Text of the keep-alive comment.
pub const PING_COMMENT: &str = "ping";

/// One frame on a notification stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// An event carrying a JSON payload on a single `data:` line.
    Data(String),
    /// A comment line, ignored by `EventSource` clients.
    Comment(String),
}

impl Frame {
    /// The `{"type":"connected"}` event written when a stream opens.
    pub fn connected() -> Self {
        Self::Data(CONNECTED_PAYLOAD.to_string())
    }

    /// The keep-alive comment.
    pub fn ping() -> Self {
        Self::Comment(PING_COMMENT.to_string())
    }

    /// Serializes `payload` into a data frame.
    pub fn json<T: Serialize + ?Sized>(payload: &T) -> AppResult<Self> {
        Ok(Self::Data(serde_json::to_string(payload)?))
    }

    /// Converts into an axum SSE event for the response body.
    pub fn into_event(self) -> Event {
        match self {
            Self::Data(json) => Event::default().data(json),
            Self::Comment(text) => Event::default().comment(text),
        }
    }
}
