//! Structured command responses
//!
//! Results are data: `success` is always present, failures carry `error`
//! and usually `hint`, and success payload fields are flattened into the
//! same object.

use serde::Serialize;
use serde_json::Value;

use crate::error::StudioError;

/// The uniform response envelope for every command.
#[derive(Debug, Clone, Serialize)]
pub struct CommandResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    #[serde(flatten)]
    pub data: Value,
}

impl CommandResponse {
    /// Success with a payload. The payload must serialize to a JSON
    /// object so its fields flatten into the envelope.
    pub fn ok<T: Serialize>(data: T) -> Self {
        match serde_json::to_value(data) {
            Ok(value @ Value::Object(_)) => Self {
                success: true,
                error: None,
                hint: None,
                data: value,
            },
            Ok(other) => Self::error_text(format!(
                "Internal error: response payload was not an object ({other})"
            )),
            Err(e) => Self::error_text(format!("Internal error: {e}")),
        }
    }

    /// Success with no payload beyond the flag.
    pub fn ok_empty() -> Self {
        Self {
            success: true,
            error: None,
            hint: None,
            data: Value::Object(Default::default()),
        }
    }

    /// Failure derived from the error taxonomy, with its hint.
    pub fn fail(err: &StudioError) -> Self {
        Self {
            success: false,
            error: Some(err.to_string()),
            hint: err.hint(),
            data: Value::Object(Default::default()),
        }
    }

    /// Failure with a plain message and no hint.
    pub fn error_text(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(message.into()),
            hint: None,
            data: Value::Object(Default::default()),
        }
    }

    /// Attach or replace the hint.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Convert an operation result into the response envelope.
pub fn respond<T: Serialize>(result: Result<T, StudioError>) -> CommandResponse {
    match result {
        Ok(data) => CommandResponse::ok(data),
        Err(err) => CommandResponse::fail(&err),
    }
}
