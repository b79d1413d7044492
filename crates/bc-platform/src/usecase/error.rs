//! Use Case Errors
//!
//! Categorized error types for workflow failures.
//! Errors are categorized by type to enable consistent HTTP status mapping.
//!
//! # Creating Errors with Details
//!
//! ```ignore
//! use bc_platform::usecase::{UseCaseError, details};
//!
//! UseCaseError::validation("NAME_REQUIRED", "name is required");
//!
//! UseCaseError::duplicate_customer_with_details(
//!     "Customer with this email or national ID already exists",
//!     details!{ "email" => email },
//! );
//! ```

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use utoipa::ToSchema;

use crate::shared::error::PlatformError;

/// Macro for creating error detail maps.
///
/// ```ignore
/// let details = details! {
///     "nationalId" => national_id,
///     "attempts" => 3
/// };
/// ```
#[macro_export]
macro_rules! details {
    () => {
        std::collections::HashMap::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut map = std::collections::HashMap::new();
        $(
            map.insert($key.to_string(), serde_json::json!($value));
        )+
        map
    }};
}

pub type Details = HashMap<String, serde_json::Value>;

/// Categorized error types for workflow failures.
///
/// - `ValidationError` -> 400 Bad Request
/// - `PasswordMismatch` -> 400 Bad Request
/// - `SamePassword` -> 400 Bad Request
/// - `InvalidCredentials` -> 401 Unauthorized
/// - `Unauthenticated` -> 401 Unauthorized
/// - `NotFoundError` -> 404 Not Found
/// - `DuplicateCustomer` -> 409 Conflict
/// - `StoreFailure` -> 500 Internal Server Error
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum UseCaseError {
    /// Missing or malformed input.
    ValidationError {
        code: String,
        message: String,
        #[serde(default)]
        details: Details,
    },

    /// Email or national id already belongs to a customer.
    DuplicateCustomer {
        code: String,
        message: String,
        #[serde(default)]
        details: Details,
    },

    NotFoundError {
        code: String,
        message: String,
        #[serde(default)]
        details: Details,
    },

    /// Password does not verify against the stored hash.
    InvalidCredentials {
        code: String,
        message: String,
        #[serde(default)]
        details: Details,
    },

    /// Password and confirmation differ.
    PasswordMismatch {
        code: String,
        message: String,
        #[serde(default)]
        details: Details,
    },

    /// New password equals the current one.
    SamePassword {
        code: String,
        message: String,
        #[serde(default)]
        details: Details,
    },

    /// Missing, malformed or expired bearer token.
    Unauthenticated {
        code: String,
        message: String,
        #[serde(default)]
        details: Details,
    },

    /// A store, hashing or signing operation failed.
    StoreFailure {
        code: String,
        message: String,
        #[serde(default)]
        details: Details,
    },
}

impl UseCaseError {
    pub fn validation(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            code: code.into(),
            message: message.into(),
            details: HashMap::new(),
        }
    }

    pub fn validation_with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: Details,
    ) -> Self {
        Self::ValidationError {
            code: code.into(),
            message: message.into(),
            details,
        }
    }

    pub fn duplicate_customer(message: impl Into<String>) -> Self {
        Self::duplicate_customer_with_details(message, HashMap::new())
    }

    pub fn duplicate_customer_with_details(message: impl Into<String>, details: Details) -> Self {
        Self::DuplicateCustomer {
            code: "DUPLICATE_CUSTOMER".to_string(),
            message: message.into(),
            details,
        }
    }

    pub fn not_found(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::NotFoundError {
            code: code.into(),
            message: message.into(),
            details: HashMap::new(),
        }
    }

    pub fn invalid_credentials() -> Self {
        Self::InvalidCredentials {
            code: "INVALID_CREDENTIALS".to_string(),
            message: "Invalid credentials".to_string(),
            details: HashMap::new(),
        }
    }

    pub fn password_mismatch() -> Self {
        Self::PasswordMismatch {
            code: "PASSWORD_MISMATCH".to_string(),
            message: "Passwords do not match".to_string(),
            details: HashMap::new(),
        }
    }

    pub fn same_password() -> Self {
        Self::SamePassword {
            code: "SAME_PASSWORD".to_string(),
            message: "New password must differ from the current password".to_string(),
            details: HashMap::new(),
        }
    }

    pub fn unauthenticated(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Unauthenticated {
            code: code.into(),
            message: message.into(),
            details: HashMap::new(),
        }
    }

    pub fn store_failure(message: impl Into<String>) -> Self {
        Self::StoreFailure {
            code: "STORE_FAILURE".to_string(),
            message: message.into(),
            details: HashMap::new(),
        }
    }

    pub fn code(&self) -> &str {
        match self {
            Self::ValidationError { code, .. }
            | Self::DuplicateCustomer { code, .. }
            | Self::NotFoundError { code, .. }
            | Self::InvalidCredentials { code, .. }
            | Self::PasswordMismatch { code, .. }
            | Self::SamePassword { code, .. }
            | Self::Unauthenticated { code, .. }
            | Self::StoreFailure { code, .. } => code,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::ValidationError { message, .. }
            | Self::DuplicateCustomer { message, .. }
            | Self::NotFoundError { message, .. }
            | Self::InvalidCredentials { message, .. }
            | Self::PasswordMismatch { message, .. }
            | Self::SamePassword { message, .. }
            | Self::Unauthenticated { message, .. }
            | Self::StoreFailure { message, .. } => message,
        }
    }

    pub fn details(&self) -> &Details {
        match self {
            Self::ValidationError { details, .. }
            | Self::DuplicateCustomer { details, .. }
            | Self::NotFoundError { details, .. }
            | Self::InvalidCredentials { details, .. }
            | Self::PasswordMismatch { details, .. }
            | Self::SamePassword { details, .. }
            | Self::Unauthenticated { details, .. }
            | Self::StoreFailure { details, .. } => details,
        }
    }

    /// Get the suggested HTTP status code for this error.
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::ValidationError { .. } => 400,
            Self::PasswordMismatch { .. } => 400,
            Self::SamePassword { .. } => 400,
            Self::InvalidCredentials { .. } => 401,
            Self::Unauthenticated { .. } => 401,
            Self::NotFoundError { .. } => 404,
            Self::DuplicateCustomer { .. } => 409,
            Self::StoreFailure { .. } => 500,
        }
    }
}

impl std::fmt::Display for UseCaseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code(), self.message())
    }
}

impl std::error::Error for UseCaseError {}

impl From<PlatformError> for UseCaseError {
    fn from(err: PlatformError) -> Self {
        match err {
            PlatformError::Duplicate { entity_type, field, value } if entity_type == "Customer" => {
                Self::duplicate_customer_with_details(
                    format!("Customer with this {} already exists", field),
                    details! { "field" => field, "value" => value },
                )
            }
            PlatformError::NotFound { entity_type, id } => Self::not_found(
                format!("{}_NOT_FOUND", entity_type.to_uppercase()),
                format!("{} not found: {}", entity_type, id),
            ),
            PlatformError::Validation { message } => Self::validation("VALIDATION_ERROR", message),
            PlatformError::TokenExpired => Self::unauthenticated("TOKEN_EXPIRED", "Token expired"),
            PlatformError::InvalidToken { message } => Self::unauthenticated("INVALID_TOKEN", message),
            other => Self::store_failure(other.to_string()),
        }
    }
}

/// Error response body
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Always "error"
    pub status: String,
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub details: Option<Details>,
}

impl IntoResponse for UseCaseError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let details = Some(self.details().clone()).filter(|d| !d.is_empty());
        let body = ErrorResponse {
            status: "error".to_string(),
            code: self.code().to_string(),
            message: self.message().to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(UseCaseError::validation("X", "x").http_status_code(), 400);
        assert_eq!(UseCaseError::password_mismatch().http_status_code(), 400);
        assert_eq!(UseCaseError::same_password().http_status_code(), 400);
        assert_eq!(UseCaseError::invalid_credentials().http_status_code(), 401);
        assert_eq!(UseCaseError::not_found("CUSTOMER_NOT_FOUND", "gone").http_status_code(), 404);
        assert_eq!(UseCaseError::duplicate_customer("taken").http_status_code(), 409);
        assert_eq!(UseCaseError::store_failure("down").http_status_code(), 500);
    }

    #[test]
    fn test_customer_duplicate_maps_to_conflict() {
        let err: UseCaseError = PlatformError::duplicate("Customer", "email", "a@b.com").into();
        assert!(matches!(err, UseCaseError::DuplicateCustomer { .. }));
        assert_eq!(err.details().get("field"), Some(&serde_json::json!("email")));
    }

    #[test]
    fn test_other_duplicates_are_store_failures() {
        let err: UseCaseError = PlatformError::duplicate("Account", "accountNumber", "1").into();
        assert!(matches!(err, UseCaseError::StoreFailure { .. }));
    }

    #[test]
    fn test_not_found_code() {
        let err: UseCaseError = PlatformError::not_found("Customer", "abc").into();
        assert_eq!(err.code(), "CUSTOMER_NOT_FOUND");
        assert_eq!(err.http_status_code(), 404);
    }

    #[test]
    fn test_token_errors_are_unauthenticated() {
        let expired: UseCaseError = PlatformError::TokenExpired.into();
        assert_eq!(expired.code(), "TOKEN_EXPIRED");
        assert_eq!(expired.http_status_code(), 401);
    }

    #[test]
    fn test_details_macro() {
        let empty: Details = details!();
        assert!(empty.is_empty());

        let details = details! { "nationalId" => "X1", "attempts" => 3 };
        assert_eq!(details.get("nationalId"), Some(&serde_json::json!("X1")));
        assert_eq!(details.get("attempts"), Some(&serde_json::json!(3)));
    }
}
