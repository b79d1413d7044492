//! MongoDB Index Initialization
//!
//! Creates indexes for all collections on application startup. The unique
//! indexes are what make the store reject duplicate customers, account
//! numbers and second tokens under concurrent writes.

use mongodb::{Database, IndexModel, bson::doc, options::IndexOptions};
use tracing::info;

use crate::account::repository::ACCOUNTS_COLLECTION;
use crate::customer::repository::CUSTOMERS_COLLECTION;
use crate::token::repository::TOKENS_COLLECTION;

/// Initialize all MongoDB indexes
pub async fn initialize_indexes(db: &Database) -> Result<(), mongodb::error::Error> {
    info!("Initializing MongoDB indexes...");

    create_customer_indexes(db).await?;
    create_account_indexes(db).await?;
    create_token_indexes(db).await?;

    info!("MongoDB indexes initialized successfully");
    Ok(())
}

fn unique_index(keys: mongodb::bson::Document) -> IndexModel {
    IndexModel::builder()
        .keys(keys)
        .options(IndexOptions::builder().unique(true).build())
        .build()
}

async fn create_customer_indexes(db: &Database) -> Result<(), mongodb::error::Error> {
    let collection = db.collection::<mongodb::bson::Document>(CUSTOMERS_COLLECTION);

    collection.create_index(unique_index(doc! { "email": 1 })).await?;
    collection.create_index(unique_index(doc! { "nationalId": 1 })).await?;

    info!("Created indexes on {}", CUSTOMERS_COLLECTION);
    Ok(())
}

async fn create_account_indexes(db: &Database) -> Result<(), mongodb::error::Error> {
    let collection = db.collection::<mongodb::bson::Document>(ACCOUNTS_COLLECTION);

    collection.create_index(unique_index(doc! { "accountNumber": 1 })).await?;

    // Owner lookup for fetch and cascading delete
    collection.create_index(
        IndexModel::builder()
            .keys(doc! { "customerId": 1 })
            .build(),
    ).await?;

    info!("Created indexes on {}", ACCOUNTS_COLLECTION);
    Ok(())
}

async fn create_token_indexes(db: &Database) -> Result<(), mongodb::error::Error> {
    let collection = db.collection::<mongodb::bson::Document>(TOKENS_COLLECTION);

    collection.create_index(unique_index(doc! { "customerId": 1 })).await?;

    info!("Created indexes on {}", TOKENS_COLLECTION);
    Ok(())
}
