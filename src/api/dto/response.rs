//! Generic success bodies.

use serde::Serialize;

/// `{"ok": true, "message": "..."}` returned by mutating endpoints.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub ok: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            message: message.into(),
        }
    }
}

/// Service state as reported by the service manager.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub ok: bool,
    pub status: String,
}
