//! Structured API error responses with error codes
//!
//! Every failing endpoint answers with the same JSON envelope and an
//! `x-error-code` header carrying the machine-readable code.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::infra::RiskError;

// ============================================================================
// Error Codes
// ============================================================================

/// Error codes for API responses
///
/// These codes are stable and can be used by clients for programmatic error handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Validation errors (3xxx)
    /// Request body is malformed
    InvalidRequestBody,
    /// Required field is missing
    MissingRequiredField,
    /// Field value is invalid
    InvalidFieldValue,

    // Resource errors (4xxx)
    /// Requested resource not found
    ResourceNotFound,
    /// The primary provider had no data for the vessel
    NoPrimaryData,

    // Provider errors (6xxx)
    /// A provider rejected our credentials
    ProviderAuthFailed,
    /// A provider is unreachable or rate limiting
    ProviderUnavailable,
    /// A provider answered with something other than JSON
    ProviderMalformed,

    // Infrastructure errors (8xxx)
    /// Database operation failed
    DatabaseError,
    /// Internal server error
    InternalError,
}

impl ErrorCode {
    /// Get the numeric code for this error
    pub fn numeric_code(&self) -> u32 {
        match self {
            ErrorCode::InvalidRequestBody => 3001,
            ErrorCode::MissingRequiredField => 3002,
            ErrorCode::InvalidFieldValue => 3003,

            ErrorCode::ResourceNotFound => 4001,
            ErrorCode::NoPrimaryData => 4002,

            ErrorCode::ProviderAuthFailed => 6001,
            ErrorCode::ProviderUnavailable => 6002,
            ErrorCode::ProviderMalformed => 6003,

            ErrorCode::DatabaseError => 8001,
            ErrorCode::InternalError => 8999,
        }
    }

    /// Get the HTTP status code for this error
    pub fn http_status(&self) -> StatusCode {
        match self {
            ErrorCode::InvalidRequestBody
            | ErrorCode::MissingRequiredField
            | ErrorCode::InvalidFieldValue => StatusCode::BAD_REQUEST,

            ErrorCode::ResourceNotFound | ErrorCode::NoPrimaryData => StatusCode::NOT_FOUND,

            ErrorCode::ProviderAuthFailed
            | ErrorCode::ProviderUnavailable
            | ErrorCode::ProviderMalformed => StatusCode::BAD_GATEWAY,

            ErrorCode::DatabaseError | ErrorCode::InternalError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let code_str = match self {
            ErrorCode::InvalidRequestBody => "INVALID_REQUEST_BODY",
            ErrorCode::MissingRequiredField => "MISSING_REQUIRED_FIELD",
            ErrorCode::InvalidFieldValue => "INVALID_FIELD_VALUE",
            ErrorCode::ResourceNotFound => "RESOURCE_NOT_FOUND",
            ErrorCode::NoPrimaryData => "NO_PRIMARY_DATA",
            ErrorCode::ProviderAuthFailed => "PROVIDER_AUTH_FAILED",
            ErrorCode::ProviderUnavailable => "PROVIDER_UNAVAILABLE",
            ErrorCode::ProviderMalformed => "PROVIDER_MALFORMED",
            ErrorCode::DatabaseError => "DATABASE_ERROR",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        };
        write!(f, "{}", code_str)
    }
}

// ============================================================================
// API Error Response
// ============================================================================

/// Structured API error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub error: ErrorDetails,
}

/// Error details
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetails {
    /// Machine-readable error code
    pub code: ErrorCode,

    /// Numeric error code
    pub numeric_code: u32,

    /// Human-readable error message
    pub message: String,

    /// Additional error details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,

    /// ID of the resource involved
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<String>,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            error: ErrorDetails {
                code,
                numeric_code: code.numeric_code(),
                message: message.into(),
                details: None,
                resource_id: None,
            },
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.error.details = Some(details);
        self
    }

    pub fn with_resource_id(mut self, id: impl Into<String>) -> Self {
        self.error.resource_id = Some(id.into());
        self
    }

    pub fn status(&self) -> StatusCode {
        self.error.code.http_status()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code_str = self.error.code.to_string();
        let mut response = (status, Json(self)).into_response();

        if let Ok(code_value) = axum::http::HeaderValue::from_str(&code_str) {
            response.headers_mut().insert(
                axum::http::header::HeaderName::from_static("x-error-code"),
                code_value,
            );
        }

        response
    }
}

// ============================================================================
// Conversion from RiskError
// ============================================================================

impl From<RiskError> for ApiError {
    fn from(err: RiskError) -> Self {
        match err {
            RiskError::Database(e) => {
                ApiError::new(ErrorCode::DatabaseError, format!("Database error: {}", e))
            }
            RiskError::Persistence(msg) => ApiError::new(ErrorCode::DatabaseError, msg),
            RiskError::ProviderAuth { provider, status } => ApiError::new(
                ErrorCode::ProviderAuthFailed,
                format!("{} rejected credentials", provider),
            )
            .with_details(serde_json::json!({"provider": provider, "status": status})),
            RiskError::ProviderUnavailable { provider, reason } => {
                ApiError::new(ErrorCode::ProviderUnavailable, reason)
                    .with_details(serde_json::json!({"provider": provider}))
            }
            RiskError::MalformedResponse { provider, reason } => {
                ApiError::new(ErrorCode::ProviderMalformed, reason)
                    .with_details(serde_json::json!({"provider": provider}))
            }
            RiskError::PrimaryDataMissing(subject) => ApiError::new(
                ErrorCode::NoPrimaryData,
                format!("No voyage data for vessel {}", subject),
            )
            .with_resource_id(subject),
            RiskError::Serialization(e) => {
                ApiError::new(ErrorCode::InternalError, format!("Serialization error: {}", e))
            }
            RiskError::Configuration(msg) => {
                ApiError::new(ErrorCode::InternalError, format!("Configuration error: {}", msg))
            }
            RiskError::Internal(msg) => ApiError::new(ErrorCode::InternalError, msg),
        }
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Create a not found error for a specific resource type
pub fn not_found(resource_type: &str, id: impl std::fmt::Display) -> ApiError {
    ApiError::new(
        ErrorCode::ResourceNotFound,
        format!("{} not found: {}", resource_type, id),
    )
    .with_resource_id(id.to_string())
}

/// Create a validation error with field details
pub fn validation_error(field: &str, message: impl Into<String>) -> ApiError {
    ApiError::new(ErrorCode::InvalidFieldValue, message.into())
        .with_details(serde_json::json!({ "field": field }))
}

/// Create a missing-field error
pub fn missing_field(field: &str) -> ApiError {
    ApiError::new(
        ErrorCode::MissingRequiredField,
        format!("{} is required", field),
    )
    .with_details(serde_json::json!({ "field": field }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Source;

    #[test]
    fn test_error_code_http_status() {
        assert_eq!(ErrorCode::InvalidFieldValue.http_status(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorCode::NoPrimaryData.http_status(), StatusCode::NOT_FOUND);
        assert_eq!(ErrorCode::ProviderAuthFailed.http_status(), StatusCode::BAD_GATEWAY);
        assert_eq!(ErrorCode::InternalError.numeric_code(), 8999);
    }

    #[test]
    fn test_from_risk_error() {
        let err: ApiError = RiskError::ProviderAuth {
            provider: Source::ProviderA,
            status: 403,
        }
        .into();
        assert_eq!(err.error.code, ErrorCode::ProviderAuthFailed);
        assert_eq!(err.error.details.unwrap()["status"], 403);

        let err: ApiError = RiskError::PrimaryDataMissing("9569671".into()).into();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.error.resource_id.as_deref(), Some("9569671"));
    }

    #[test]
    fn test_error_serialization() {
        let error = validation_error("imo", "IMO must be numeric");
        let json = serde_json::to_string(&error).unwrap();

        assert!(json.contains("INVALID_FIELD_VALUE"));
        assert!(json.contains("3003"));
        assert!(json.contains("\"field\":\"imo\""));
    }

    #[test]
    fn test_into_response_sets_code_header() {
        let response = not_found("Risk record", "9569671").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(response.headers()["x-error-code"], "RESOURCE_NOT_FOUND");
    }
}
