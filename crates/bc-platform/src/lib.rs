//! BankCore Platform
//!
//! Customer onboarding core:
//! - Registration with a default savings account and bearer token
//! - Login by national ID and password
//! - Profile updates, password changes and cascading deletion
//!
//! ## Module Organization (Aggregate-based)
//!
//! Each aggregate contains:
//! - `entity` - Domain entities
//! - `repository` - Store trait with MongoDB and in-memory implementations
//! - `api` - REST endpoints (customer only)
//! - `operations` - Use case operations (customer only)

// Cross-cutting concerns
pub mod usecase;

// Aggregates
pub mod customer;
pub mod account;
pub mod token;

// Authentication
pub mod auth;

pub mod notification;

// Shared infrastructure
pub mod shared;

// Re-export common types from shared
pub use shared::error::{PlatformError, Result};
pub use shared::stores::Stores;
pub use usecase::UseCaseError;

// Re-export main entity types for convenience
pub use customer::entity::{Customer, CustomerUpdate};
pub use account::entity::{Account, AccountType};
pub use token::entity::CustomerToken;

// Re-export repositories
pub use customer::repository::CustomerRepository;
pub use account::repository::AccountRepository;
pub use token::repository::TokenRepository;

// Re-export services
pub use auth::{Argon2Config, PasswordService, TokenConfig, TokenService};
pub use notification::{CustomerNotifier, LoggingNotifier};

// Re-export routers
pub use customer::api::{customers_router, CustomersState};
pub use shared::health_api::{health_router, HealthState};
pub use shared::indexes::initialize_indexes;
