//! HTTP handlers for the accessibility analyzer API.

pub mod analysis;
pub mod explanation;
pub mod extract;
pub mod health;
pub mod learning;
pub mod metrics;
pub mod quiz;

use service_core::error::AppError;

/// Title used when a request body lacks fields the handler needs.
pub(crate) fn missing_fields(message: &'static str) -> AppError {
    AppError::BadRequest(anyhow::anyhow!(message)).titled("Missing required fields")
}
