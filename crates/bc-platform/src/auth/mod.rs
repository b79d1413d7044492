//! Authentication
//!
//! Password hashing, token issuing, and the bearer token extractor.

pub mod password_service;
pub mod token_service;
pub mod middleware;

pub use password_service::{Argon2Config, PasswordService};
pub use token_service::{CustomerClaims, TokenConfig, TokenService, extract_bearer_token};
pub use middleware::Authenticated;
