//! Token Repository
//!
//! The MongoDB implementation is backed by a unique index on `customerId`,
//! so two concurrent first logins cannot both persist a token.

use async_trait::async_trait;
use mongodb::{bson::doc, Collection, Database};
use parking_lot::RwLock;
use std::collections::HashMap;

use crate::shared::error::{duplicate_key_index, PlatformError, Result};
use crate::token::entity::CustomerToken;

pub const TOKENS_COLLECTION: &str = "tokens";

#[async_trait]
pub trait TokenRepository: Send + Sync {
    async fn find_by_customer(&self, customer_id: &str) -> Result<Option<CustomerToken>>;

    /// Persist a token. Fails with `Duplicate` if the customer already
    /// has one.
    async fn insert(&self, token: &CustomerToken) -> Result<()>;

    async fn delete_all_for_customer(&self, customer_id: &str) -> Result<u64>;
}

pub struct MongoTokenRepository {
    collection: Collection<CustomerToken>,
}

impl MongoTokenRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection(TOKENS_COLLECTION),
        }
    }
}

#[async_trait]
impl TokenRepository for MongoTokenRepository {
    async fn find_by_customer(&self, customer_id: &str) -> Result<Option<CustomerToken>> {
        Ok(self.collection.find_one(doc! { "customerId": customer_id }).await?)
    }

    async fn insert(&self, token: &CustomerToken) -> Result<()> {
        self.collection.insert_one(token).await.map_err(|e| {
            if duplicate_key_index(&e).is_some() {
                PlatformError::duplicate("Token", "customerId", &token.customer_id)
            } else {
                PlatformError::Database(e)
            }
        })?;
        Ok(())
    }

    async fn delete_all_for_customer(&self, customer_id: &str) -> Result<u64> {
        let result = self.collection
            .delete_many(doc! { "customerId": customer_id })
            .await?;
        Ok(result.deleted_count)
    }
}

/// Process-local token store keyed by customer id
#[derive(Default)]
pub struct InMemoryTokenRepository {
    tokens: RwLock<HashMap<String, CustomerToken>>,
}

impl InMemoryTokenRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored tokens
    pub fn len(&self) -> usize {
        self.tokens.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl TokenRepository for InMemoryTokenRepository {
    async fn find_by_customer(&self, customer_id: &str) -> Result<Option<CustomerToken>> {
        Ok(self.tokens.read().get(customer_id).cloned())
    }

    async fn insert(&self, token: &CustomerToken) -> Result<()> {
        let mut tokens = self.tokens.write();
        if tokens.contains_key(&token.customer_id) {
            return Err(PlatformError::duplicate("Token", "customerId", &token.customer_id));
        }
        tokens.insert(token.customer_id.clone(), token.clone());
        Ok(())
    }

    async fn delete_all_for_customer(&self, customer_id: &str) -> Result<u64> {
        Ok(self.tokens.write().remove(customer_id).map_or(0, |_| 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_one_token_per_customer() {
        let repo = InMemoryTokenRepository::new();
        repo.insert(&CustomerToken::new("c1", "tok-a")).await.unwrap();

        let err = repo.insert(&CustomerToken::new("c1", "tok-b")).await.unwrap_err();
        assert!(err.is_duplicate_of("Token"));

        let stored = repo.find_by_customer("c1").await.unwrap().unwrap();
        assert_eq!(stored.token, "tok-a");
    }

    #[tokio::test]
    async fn test_delete_all_for_customer() {
        let repo = InMemoryTokenRepository::new();
        repo.insert(&CustomerToken::new("c1", "tok")).await.unwrap();

        assert_eq!(repo.delete_all_for_customer("c1").await.unwrap(), 1);
        assert_eq!(repo.delete_all_for_customer("c1").await.unwrap(), 0);
        assert!(repo.find_by_customer("c1").await.unwrap().is_none());
    }
}
