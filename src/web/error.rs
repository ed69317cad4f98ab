//! API error handling for the contact endpoints.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::collections::HashMap;

use crate::contact::ValidationResult;
use crate::i18n::I18n;

/// API error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Bad request (400).
    BadRequest,
    /// Validation error (422) - for field-level validation errors.
    ValidationError,
    /// Internal server error (500).
    InternalError,
}

impl ErrorCode {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ErrorCode::BadRequest => StatusCode::BAD_REQUEST,
            ErrorCode::ValidationError => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// API error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

/// Error detail.
#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: ErrorCode,
    /// Human-readable message.
    pub message: String,
    /// Field-level messages (only present for validation errors).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, Vec<String>>>,
}

/// API error type.
#[derive(Debug)]
pub struct ApiError {
    code: ErrorCode,
    message: String,
    details: Option<HashMap<String, Vec<String>>>,
}

impl ApiError {
    /// Create a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Create a new API error with field-level details.
    pub fn with_details(
        code: ErrorCode,
        message: impl Into<String>,
        details: HashMap<String, Vec<String>>,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            details: Some(details),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::BadRequest, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// Create a validation error with field-level details.
    pub fn validation(details: HashMap<String, Vec<String>>) -> Self {
        Self::with_details(ErrorCode::ValidationError, "Validation failed", details)
    }

    /// Create a validation error from a failed submission.
    ///
    /// Messages are localised; a field with several failures lists them in
    /// check order.
    pub fn from_validation(result: &ValidationResult, i18n: &I18n) -> Self {
        let mut details: HashMap<String, Vec<String>> = HashMap::new();

        for error in result.errors() {
            details
                .entry(error.field.to_string())
                .or_default()
                .push(i18n.t(error.kind.message_key()).to_string());
        }

        Self::validation(details)
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.code.status_code();
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code,
                message: self.message,
                details: self.details,
            },
        };
        (status, Json(body)).into_response()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

impl From<crate::ContactError> for ApiError {
    fn from(err: crate::ContactError) -> Self {
        match &err {
            crate::ContactError::Validation(msg) => ApiError::bad_request(msg.clone()),
            _ => {
                tracing::error!("Internal error: {}", err);
                ApiError::internal("An internal error occurred")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contact::{ErrorKind, Field};

    #[test]
    fn test_status_codes() {
        assert_eq!(ErrorCode::BadRequest.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ErrorCode::ValidationError.status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ErrorCode::InternalError.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_error_code_serialization() {
        let json = serde_json::to_string(&ErrorCode::ValidationError).unwrap();
        assert_eq!(json, "\"VALIDATION_ERROR\"");
    }

    #[test]
    fn test_from_validation() {
        let i18n = I18n::builtin("en").unwrap();
        let mut result = ValidationResult::new();
        result.push(Field::Name, ErrorKind::NameTooShort);
        result.push(Field::Name, ErrorKind::InjectionDetected(Field::Name));
        result.push(Field::Email, ErrorKind::InvalidEmail);

        let err = ApiError::from_validation(&result, &i18n);
        assert_eq!(err.code(), ErrorCode::ValidationError);

        let details = err.details.unwrap();
        assert_eq!(details.len(), 2);
        assert_eq!(
            details["name"],
            vec![i18n.t("error.name"), i18n.t("error.valid_name")]
        );
        assert_eq!(details["email"], vec![i18n.t("error.email")]);
    }

    #[test]
    fn test_internal_errors_are_generic() {
        let err: ApiError = crate::ContactError::Mail(crate::mail::TransportError::Send(
            "554 secret relay diagnostics".to_string(),
        ))
        .into();
        assert_eq!(err.code(), ErrorCode::InternalError);
        assert!(!err.message().contains("relay"));
    }

    #[test]
    fn test_display() {
        let err = ApiError::bad_request("broken");
        assert_eq!(err.to_string(), "BadRequest: broken");
    }
}
