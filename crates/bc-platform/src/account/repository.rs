//! Account Repository

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{bson::doc, Collection, Database};
use parking_lot::RwLock;
use std::collections::HashMap;

use crate::account::entity::Account;
use crate::shared::error::{duplicate_key_index, PlatformError, Result};

pub const ACCOUNTS_COLLECTION: &str = "accounts";

#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Insert an account. Fails with `Duplicate` on an account number
    /// collision.
    async fn insert(&self, account: &Account) -> Result<()>;

    async fn find_by_customer(&self, customer_id: &str) -> Result<Vec<Account>>;

    /// Remove every account owned by the customer; returns how many went.
    async fn delete_all_for_customer(&self, customer_id: &str) -> Result<u64>;
}

pub struct MongoAccountRepository {
    collection: Collection<Account>,
}

impl MongoAccountRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection(ACCOUNTS_COLLECTION),
        }
    }
}

#[async_trait]
impl AccountRepository for MongoAccountRepository {
    async fn insert(&self, account: &Account) -> Result<()> {
        self.collection.insert_one(account).await.map_err(|e| {
            if duplicate_key_index(&e).is_some() {
                PlatformError::duplicate("Account", "accountNumber", &account.account_number)
            } else {
                PlatformError::Database(e)
            }
        })?;
        Ok(())
    }

    async fn find_by_customer(&self, customer_id: &str) -> Result<Vec<Account>> {
        let cursor = self.collection
            .find(doc! { "customerId": customer_id })
            .sort(doc! { "createdAt": 1 })
            .await?;
        Ok(cursor.try_collect().await?)
    }

    async fn delete_all_for_customer(&self, customer_id: &str) -> Result<u64> {
        let result = self.collection
            .delete_many(doc! { "customerId": customer_id })
            .await?;
        Ok(result.deleted_count)
    }
}

/// Process-local account store keyed by account number
#[derive(Default)]
pub struct InMemoryAccountRepository {
    accounts: RwLock<HashMap<String, Account>>,
}

impl InMemoryAccountRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored accounts
    pub fn len(&self) -> usize {
        self.accounts.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn insert(&self, account: &Account) -> Result<()> {
        let mut accounts = self.accounts.write();
        if accounts.contains_key(&account.account_number) {
            return Err(PlatformError::duplicate("Account", "accountNumber", &account.account_number));
        }
        accounts.insert(account.account_number.clone(), account.clone());
        Ok(())
    }

    async fn find_by_customer(&self, customer_id: &str) -> Result<Vec<Account>> {
        let mut owned: Vec<Account> = self.accounts
            .read()
            .values()
            .filter(|a| a.customer_id == customer_id)
            .cloned()
            .collect();
        owned.sort_by_key(|a| a.created_at);
        Ok(owned)
    }

    async fn delete_all_for_customer(&self, customer_id: &str) -> Result<u64> {
        let mut accounts = self.accounts.write();
        let before = accounts.len();
        accounts.retain(|_, a| a.customer_id != customer_id);
        Ok((before - accounts.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::entity::AccountType;

    #[tokio::test]
    async fn test_insert_and_find_by_customer() {
        let repo = InMemoryAccountRepository::new();
        repo.insert(&Account::opening("c1", "1111111111").unwrap()).await.unwrap();
        repo.insert(&Account::new("c1", AccountType::Current, 500, "2222222222", false).unwrap()).await.unwrap();
        repo.insert(&Account::opening("c2", "3333333333").unwrap()).await.unwrap();

        let owned = repo.find_by_customer("c1").await.unwrap();
        assert_eq!(owned.len(), 2);
        assert!(owned.iter().all(|a| a.customer_id == "c1"));
    }

    #[tokio::test]
    async fn test_duplicate_account_number() {
        let repo = InMemoryAccountRepository::new();
        repo.insert(&Account::opening("c1", "1111111111").unwrap()).await.unwrap();

        let err = repo.insert(&Account::opening("c2", "1111111111").unwrap()).await.unwrap_err();
        assert!(err.is_duplicate_of("Account"));
    }

    #[tokio::test]
    async fn test_delete_all_for_customer() {
        let repo = InMemoryAccountRepository::new();
        repo.insert(&Account::opening("c1", "1111111111").unwrap()).await.unwrap();
        repo.insert(&Account::opening("c2", "2222222222").unwrap()).await.unwrap();

        assert_eq!(repo.delete_all_for_customer("c1").await.unwrap(), 1);
        assert_eq!(repo.delete_all_for_customer("c1").await.unwrap(), 0);
        assert_eq!(repo.find_by_customer("c2").await.unwrap().len(), 1);
    }
}
