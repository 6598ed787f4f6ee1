use std::sync::Arc;

use serde::Serialize;
use utoipa::ToSchema;

/// Named SSE message, pre-rendered once and shared by every subscriber of a hub.
#[derive(Clone, Debug)]
pub struct ServerEvent {
    /// SSE `event:` field.
    pub name: &'static str,
    /// SSE `data:` field, already serialized.
    pub data: Arc<str>,
}

impl ServerEvent {
    pub fn new(name: &'static str, data: impl Into<Arc<str>>) -> Self {
        Self {
            name,
            data: data.into(),
        }
    }

    /// Serialize `payload` as the data field.
    pub fn json(name: &'static str, payload: &impl Serialize) -> serde_json::Result<Self> {
        serde_json::to_string(payload).map(|data| Self::new(name, data))
    }
}

/// First event of every stream.
#[derive(Debug, Serialize, ToSchema)]
pub struct Handshake {
    /// `public` or `room:<id>`.
    pub stream: String,
    pub message: String,
    /// True while no storage backend is connected.
    pub degraded: bool,
}

/// Public event sent whenever degraded mode is entered or left.
#[derive(Debug, Serialize, ToSchema)]
pub struct SystemStatus {
    pub degraded: bool,
}
