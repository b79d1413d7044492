//! Use Case Infrastructure
//!
//! `UseCaseError` is the error every workflow returns; it carries a stable
//! code and maps onto an HTTP status.

pub mod error;

pub use error::{Details, ErrorResponse, UseCaseError};
