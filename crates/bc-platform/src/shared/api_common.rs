//! Common API response envelopes
//!
//! Every successful customer endpoint answers with
//! `{ "status": "success", "message": ..., "payload": ... }`; operations
//! without a payload omit the field.

use serde::Serialize;
use utoipa::ToSchema;

const SUCCESS: &str = "success";

/// Success envelope carrying a payload
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    /// Always "success"
    pub status: String,
    pub message: String,
    pub payload: T,
}

impl<T> ApiResponse<T> {
    pub fn success(message: impl Into<String>, payload: T) -> Self {
        Self {
            status: SUCCESS.to_string(),
            message: message.into(),
            payload,
        }
    }
}

/// Success envelope without a payload
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub status: String,
    pub message: String,
}

impl MessageResponse {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: SUCCESS.to_string(),
            message: message.into(),
        }
    }
}
