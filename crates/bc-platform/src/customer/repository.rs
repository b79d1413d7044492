//! Customer Repository
//!
//! `CustomerRepository` is the store seam used by the workflows. The MongoDB
//! implementation relies on unique indexes over `email` and `nationalId`
//! (see `shared::indexes`); the in-memory implementation enforces the same
//! uniqueness under its write lock.

use async_trait::async_trait;
use chrono::Utc;
use mongodb::{
    bson::{doc, Document},
    options::ReturnDocument,
    Collection, Database,
};
use parking_lot::RwLock;
use std::collections::HashMap;

use crate::customer::entity::{Customer, CustomerUpdate};
use crate::shared::error::{duplicate_key_index, PlatformError, Result};

pub const CUSTOMERS_COLLECTION: &str = "customers";

#[async_trait]
pub trait CustomerRepository: Send + Sync {
    /// Insert a new customer. Fails with `Duplicate` when email or
    /// national id is taken.
    async fn insert(&self, customer: &Customer) -> Result<()>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Customer>>;

    async fn find_by_national_id(&self, national_id: &str) -> Result<Option<Customer>>;

    /// Any customer whose email OR national id matches.
    async fn find_by_email_or_national_id(&self, email: &str, national_id: &str) -> Result<Option<Customer>>;

    /// Apply a partial update and return the updated record.
    async fn update_fields(&self, id: &str, update: &CustomerUpdate) -> Result<Customer>;

    async fn update_password(&self, id: &str, password_hash: &str) -> Result<()>;

    /// Remove the customer record. Fails with `NotFound` if absent.
    async fn delete(&self, id: &str) -> Result<()>;
}

/// Customer field guarded by the unique index Mongo names in a duplicate
/// key error (`email_1`, `nationalId_1`).
fn duplicated_field(index: &str) -> Option<&'static str> {
    if index.starts_with("nationalId") {
        Some("nationalId")
    } else if index.starts_with("email") {
        Some("email")
    } else {
        None
    }
}

/// Map a write error on the customers collection to `Duplicate` when it
/// violated the email or national id index. Any other duplicate key
/// (`_id_` included) stays a database error.
fn map_write_error(err: mongodb::error::Error, email: &str, national_id: &str) -> PlatformError {
    match duplicate_key_index(&err).as_deref().and_then(duplicated_field) {
        Some("nationalId") => PlatformError::duplicate("Customer", "nationalId", national_id),
        Some("email") => PlatformError::duplicate("Customer", "email", email),
        _ => PlatformError::Database(err),
    }
}

pub struct MongoCustomerRepository {
    collection: Collection<Customer>,
}

impl MongoCustomerRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection(CUSTOMERS_COLLECTION),
        }
    }

    fn set_document(update: &CustomerUpdate) -> Result<Document> {
        let mut set = doc! { "updatedAt": bson::DateTime::from_chrono(Utc::now()) };
        if let Some(ref name) = update.name {
            set.insert("name", name.clone());
        }
        if let Some(ref email) = update.email {
            set.insert("email", email.clone());
        }
        if let Some(ref phone) = update.phone {
            set.insert("phone", phone.clone());
        }
        if let Some(ref address) = update.address {
            set.insert("address", address.clone());
        }
        if let Some(ref date_of_birth) = update.date_of_birth {
            set.insert("dateOfBirth", bson::to_bson(date_of_birth)?);
        }
        if let Some(ref national_id) = update.national_id {
            set.insert("nationalId", national_id.clone());
        }
        Ok(set)
    }
}

#[async_trait]
impl CustomerRepository for MongoCustomerRepository {
    async fn insert(&self, customer: &Customer) -> Result<()> {
        self.collection
            .insert_one(customer)
            .await
            .map_err(|e| map_write_error(e, &customer.email, &customer.national_id))?;
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Customer>> {
        Ok(self.collection.find_one(doc! { "_id": id }).await?)
    }

    async fn find_by_national_id(&self, national_id: &str) -> Result<Option<Customer>> {
        Ok(self.collection.find_one(doc! { "nationalId": national_id }).await?)
    }

    async fn find_by_email_or_national_id(&self, email: &str, national_id: &str) -> Result<Option<Customer>> {
        Ok(self.collection.find_one(doc! {
            "$or": [
                { "email": email },
                { "nationalId": national_id }
            ]
        }).await?)
    }

    async fn update_fields(&self, id: &str, update: &CustomerUpdate) -> Result<Customer> {
        let set = Self::set_document(update)?;

        self.collection
            .find_one_and_update(doc! { "_id": id }, doc! { "$set": set })
            .return_document(ReturnDocument::After)
            .await
            .map_err(|e| {
                map_write_error(
                    e,
                    update.email.as_deref().unwrap_or_default(),
                    update.national_id.as_deref().unwrap_or_default(),
                )
            })?
            .ok_or_else(|| PlatformError::not_found("Customer", id))
    }

    async fn update_password(&self, id: &str, password_hash: &str) -> Result<()> {
        let result = self.collection
            .update_one(
                doc! { "_id": id },
                doc! { "$set": {
                    "passwordHash": password_hash,
                    "updatedAt": bson::DateTime::from_chrono(Utc::now()),
                }},
            )
            .await?;

        if result.matched_count == 0 {
            return Err(PlatformError::not_found("Customer", id));
        }
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let result = self.collection.delete_one(doc! { "_id": id }).await?;
        if result.deleted_count == 0 {
            return Err(PlatformError::not_found("Customer", id));
        }
        Ok(())
    }
}

/// Process-local customer store
#[derive(Default)]
pub struct InMemoryCustomerRepository {
    customers: RwLock<HashMap<String, Customer>>,
}

impl InMemoryCustomerRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored customers
    pub fn len(&self) -> usize {
        self.customers.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check_unique(
        customers: &HashMap<String, Customer>,
        exclude_id: Option<&str>,
        email: Option<&str>,
        national_id: Option<&str>,
    ) -> Result<()> {
        for existing in customers.values() {
            if Some(existing.id.as_str()) == exclude_id {
                continue;
            }
            if let Some(email) = email.filter(|e| *e == existing.email) {
                return Err(PlatformError::duplicate("Customer", "email", email));
            }
            if let Some(national_id) = national_id.filter(|n| *n == existing.national_id) {
                return Err(PlatformError::duplicate("Customer", "nationalId", national_id));
            }
        }
        Ok(())
    }
}

#[async_trait]
impl CustomerRepository for InMemoryCustomerRepository {
    async fn insert(&self, customer: &Customer) -> Result<()> {
        let mut customers = self.customers.write();
        if customers.contains_key(&customer.id) {
            return Err(PlatformError::duplicate("Customer", "_id", &customer.id));
        }
        Self::check_unique(&customers, None, Some(&customer.email), Some(&customer.national_id))?;
        customers.insert(customer.id.clone(), customer.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Customer>> {
        Ok(self.customers.read().get(id).cloned())
    }

    async fn find_by_national_id(&self, national_id: &str) -> Result<Option<Customer>> {
        Ok(self.customers
            .read()
            .values()
            .find(|c| c.national_id == national_id)
            .cloned())
    }

    async fn find_by_email_or_national_id(&self, email: &str, national_id: &str) -> Result<Option<Customer>> {
        Ok(self.customers
            .read()
            .values()
            .find(|c| c.email == email || c.national_id == national_id)
            .cloned())
    }

    async fn update_fields(&self, id: &str, update: &CustomerUpdate) -> Result<Customer> {
        let mut customers = self.customers.write();
        if !customers.contains_key(id) {
            return Err(PlatformError::not_found("Customer", id));
        }
        Self::check_unique(
            &customers,
            Some(id),
            update.email.as_deref(),
            update.national_id.as_deref(),
        )?;

        let customer = customers
            .get_mut(id)
            .ok_or_else(|| PlatformError::not_found("Customer", id))?;
        customer.apply(update);
        Ok(customer.clone())
    }

    async fn update_password(&self, id: &str, password_hash: &str) -> Result<()> {
        let mut customers = self.customers.write();
        let customer = customers
            .get_mut(id)
            .ok_or_else(|| PlatformError::not_found("Customer", id))?;
        customer.password_hash = password_hash.to_string();
        customer.updated_at = Utc::now();
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.customers
            .write()
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| PlatformError::not_found("Customer", id))
    }
}
