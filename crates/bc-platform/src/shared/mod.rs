//! Shared Module
//!
//! Cross-cutting concerns and shared utilities.

pub mod error;
pub mod api_common;
pub mod indexes;
pub mod stores;

// APIs
pub mod health_api;

// Re-export commonly used items
pub use error::{PlatformError, Result};
pub use api_common::{ApiResponse, MessageResponse};
pub use health_api::{health_router, HealthState};
pub use stores::Stores;
