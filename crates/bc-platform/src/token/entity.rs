//! Customer Token Entity
//!
//! The bearer token persisted for a customer. At most one record exists per
//! customer; login hands back the stored token instead of minting a new one.

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use bson::serde_helpers::chrono_datetime_as_bson_datetime;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerToken {
    #[serde(rename = "_id")]
    pub id: String,

    pub customer_id: String,

    pub token: String,

    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

impl CustomerToken {
    pub fn new(customer_id: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            id: bson::oid::ObjectId::new().to_hex(),
            customer_id: customer_id.into(),
            token: token.into(),
            created_at: Utc::now(),
        }
    }
}
