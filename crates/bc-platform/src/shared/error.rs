//! Platform Error Types

use thiserror::Error;
use axum::response::{IntoResponse, Response};

use crate::usecase::UseCaseError;

/// MongoDB server code for a unique index violation
pub const DUPLICATE_KEY_CODE: i32 = 11000;

#[derive(Error, Debug)]
pub enum PlatformError {
    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound { entity_type: String, id: String },

    #[error("Duplicate entity: {entity_type} with {field}={value}")]
    Duplicate { entity_type: String, field: String, value: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Database error: {0}")]
    Database(#[from] mongodb::error::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] bson::ser::Error),

    #[error("Deserialization error: {0}")]
    Deserialization(#[from] bson::de::Error),

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token: {message}")]
    InvalidToken { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl PlatformError {
    pub fn not_found(entity_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: entity_type.into(),
            id: id.into(),
        }
    }

    pub fn duplicate(entity_type: impl Into<String>, field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Duplicate {
            entity_type: entity_type.into(),
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation { message: message.into() }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration { message: message.into() }
    }

    pub fn invalid_token(message: impl Into<String>) -> Self {
        Self::InvalidToken { message: message.into() }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal { message: message.into() }
    }

    /// True for a uniqueness violation on the given entity type.
    pub fn is_duplicate_of(&self, entity: &str) -> bool {
        matches!(self, Self::Duplicate { entity_type, .. } if entity_type == entity)
    }
}

pub type Result<T> = std::result::Result<T, PlatformError>;

/// Name of the unique index a write collided with, if the error is a
/// duplicate key violation.
///
/// Inserts report the collision as a write error; `findOneAndUpdate`
/// reports it as a command error. Both carry the index name in the message
/// (`... index: email_1 dup key: { ... }`). The name is empty when the
/// server message does not include it.
pub fn duplicate_key_index(err: &mongodb::error::Error) -> Option<String> {
    use mongodb::error::{ErrorKind, WriteFailure};

    let message = match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(we)) if we.code == DUPLICATE_KEY_CODE => &we.message,
        ErrorKind::Command(ce) if ce.code == DUPLICATE_KEY_CODE => &ce.message,
        _ => return None,
    };

    Some(parse_index_name(message).unwrap_or_default())
}

fn parse_index_name(message: &str) -> Option<String> {
    let rest = &message[message.find("index: ")? + "index: ".len()..];
    rest.split_whitespace().next().map(str::to_string)
}

impl IntoResponse for PlatformError {
    fn into_response(self) -> Response {
        UseCaseError::from(self).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_index_name() {
        let msg = "E11000 duplicate key error collection: bankcore.customers index: nationalId_1 dup key: { nationalId: \"X1\" }";
        assert_eq!(parse_index_name(msg), Some("nationalId_1".to_string()));
        assert_eq!(parse_index_name("E11000 duplicate key error"), None);
    }

    #[test]
    fn test_is_duplicate_of() {
        let err = PlatformError::duplicate("Account", "accountNumber", "1234567890");
        assert!(err.is_duplicate_of("Account"));
        assert!(!err.is_duplicate_of("Customer"));
        assert!(!PlatformError::internal("boom").is_duplicate_of("Account"));
    }
}
