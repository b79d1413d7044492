//! Account Aggregate

pub mod entity;
pub mod repository;

pub use entity::{Account, AccountType, generate_account_number};
pub use repository::{AccountRepository, MongoAccountRepository, InMemoryAccountRepository};
