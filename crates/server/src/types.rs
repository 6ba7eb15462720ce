use serde::{Deserialize, Serialize};

/// RFQ match request
#[derive(Debug, Deserialize)]
pub struct RfqRequest {
    /// Free-text RFQ block; line items separated by commas or newlines
    pub rfq: Option<String>,
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}
