//! HTTP error type and its JSON representation.
//!
//! Every failed request answers with
//!
//! ```json
//! { "ok": false, "message": "...", "error": { "code": "...", "details": { ... } } }
//! ```

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};
use validator::ValidationErrors;

use crate::domain::errors::{ErrorKind, OperationError, ProvisionError};

#[derive(Debug, Serialize)]
struct ErrorBody {
    ok: bool,
    message: String,
    error: ErrorInfo,
}

#[derive(Debug, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub details: Value,
}

#[derive(Debug)]
pub enum AppError {
    /// Rejected request: malformed input, duplicate or unknown resource.
    BadRequest {
        code: &'static str,
        message: String,
        details: Value,
    },
    Unauthorized {
        message: String,
        details: Value,
    },
    /// The host failed the request: file system, reload, certificate tool.
    Internal {
        code: &'static str,
        message: String,
        details: Value,
    },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::BadRequest {
            code: "invalid_input",
            message: message.into(),
            details,
        }
    }

    pub fn unauthorized(message: impl Into<String>, details: Value) -> Self {
        Self::Unauthorized {
            message: message.into(),
            details,
        }
    }

    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            code: "internal_error",
            message: message.into(),
            details,
        }
    }

    fn from_kind(kind: ErrorKind, message: String, details: Value) -> Self {
        if kind.is_client_error() {
            Self::BadRequest {
                code: kind.as_str(),
                message,
                details,
            }
        } else {
            Self::Internal {
                code: kind.as_str(),
                message,
                details,
            }
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::BadRequest { code, .. } | Self::Internal { code, .. } => code,
            Self::Unauthorized { .. } => "unauthorized",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::BadRequest { message, .. }
            | Self::Unauthorized { message, .. }
            | Self::Internal { message, .. } => message,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code();
        let unauthorized = matches!(self, Self::Unauthorized { .. });

        let (message, details) = match self {
            Self::BadRequest {
                message, details, ..
            }
            | Self::Unauthorized { message, details }
            | Self::Internal {
                message, details, ..
            } => (message, details),
        };

        if status.is_server_error() {
            tracing::error!(code, %message, %details, "request failed");
        }

        let body = ErrorBody {
            ok: false,
            message,
            error: ErrorInfo { code, details },
        };

        let mut response = (status, Json(body)).into_response();
        if unauthorized {
            response.headers_mut().insert(
                header::WWW_AUTHENTICATE,
                header::HeaderValue::from_static("Bearer"),
            );
        }
        response
    }
}

impl From<ProvisionError> for AppError {
    fn from(e: ProvisionError) -> Self {
        Self::from_kind(e.kind(), e.to_string(), json!({}))
    }
}

impl From<OperationError> for AppError {
    fn from(e: OperationError) -> Self {
        let mut details = serde_json::Map::new();
        if let Some(step) = e.step {
            details.insert("step".to_string(), json!(step));
        }
        if !e.rollback.is_empty() {
            let rollback: Vec<String> = e.rollback.iter().map(ToString::to_string).collect();
            details.insert("rollback".to_string(), json!(rollback));
        }

        Self::from_kind(e.kind(), e.cause.to_string(), Value::Object(details))
    }
}

impl From<ValidationErrors> for AppError {
    fn from(e: ValidationErrors) -> Self {
        Self::bad_request("Validation failed", json!({ "reason": e.to_string() }))
    }
}

impl From<JsonRejection> for AppError {
    fn from(e: JsonRejection) -> Self {
        Self::bad_request("Invalid JSON body", json!({ "reason": e.body_text() }))
    }
}
