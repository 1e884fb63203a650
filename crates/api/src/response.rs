//! Shared response envelope types for API handlers.
//!
//! All successful responses use a
//! `{ "success": true, "data": ..., "message"?: ..., "timestamp": ... }`
//! envelope. Failures are produced by [`crate::error::AppError`].

use serde::Serialize;
use storefront_core::types::Timestamp;

/// Standard success envelope.
///
/// # Example
///
/// ```ignore
/// Ok(Json(DataResponse::new(items)))
/// ```
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub timestamp: Timestamp,
}

impl<T: Serialize> DataResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
            message: None,
            timestamp: chrono::Utc::now(),
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// Payload of the slug availability endpoints.
#[derive(Debug, Serialize)]
pub struct SlugAvailability {
    pub slug: String,
    pub available: bool,
}
