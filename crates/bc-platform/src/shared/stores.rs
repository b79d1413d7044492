//! Store wiring
//!
//! Bundles the three repositories so the server can pick a backend once.

use std::sync::Arc;
use mongodb::Database;

use crate::account::repository::{AccountRepository, InMemoryAccountRepository, MongoAccountRepository};
use crate::customer::repository::{CustomerRepository, InMemoryCustomerRepository, MongoCustomerRepository};
use crate::token::repository::{InMemoryTokenRepository, MongoTokenRepository, TokenRepository};

#[derive(Clone)]
pub struct Stores {
    pub customers: Arc<dyn CustomerRepository>,
    pub accounts: Arc<dyn AccountRepository>,
    pub tokens: Arc<dyn TokenRepository>,
}

impl Stores {
    pub fn mongo(db: &Database) -> Self {
        Self {
            customers: Arc::new(MongoCustomerRepository::new(db)),
            accounts: Arc::new(MongoAccountRepository::new(db)),
            tokens: Arc::new(MongoTokenRepository::new(db)),
        }
    }

    /// Process-local stores; everything is lost on restart
    pub fn in_memory() -> Self {
        Self {
            customers: Arc::new(InMemoryCustomerRepository::new()),
            accounts: Arc::new(InMemoryAccountRepository::new()),
            tokens: Arc::new(InMemoryTokenRepository::new()),
        }
    }
}
