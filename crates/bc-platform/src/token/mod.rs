//! Token Aggregate

pub mod entity;
pub mod repository;

pub use entity::CustomerToken;
pub use repository::{TokenRepository, MongoTokenRepository, InMemoryTokenRepository};
