//! Customer Entity
//!
//! A registered person. Email and national id are each unique across all
//! customers; the password is only ever held as an Argon2 hash.

use serde::{Deserialize, Serialize};
use chrono::{DateTime, NaiveDate, Utc};
use bson::serde_helpers::chrono_datetime_as_bson_datetime;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    /// Hex ObjectId string
    #[serde(rename = "_id")]
    pub id: String,

    pub name: String,

    /// Stored trimmed and lowercased
    pub email: String,

    pub phone: String,

    pub address: String,

    /// Calendar date, stored as `YYYY-MM-DD`
    pub date_of_birth: NaiveDate,

    /// Government identifier, used as the login name
    pub national_id: String,

    /// PHC-format Argon2id hash
    pub password_hash: String,

    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,

    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl Customer {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
        address: impl Into<String>,
        date_of_birth: NaiveDate,
        national_id: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: bson::oid::ObjectId::new().to_hex(),
            name: name.into(),
            email: email.into(),
            phone: phone.into(),
            address: address.into(),
            date_of_birth,
            national_id: national_id.into(),
            password_hash: password_hash.into(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a partial update in place. The password hash is never touched.
    pub fn apply(&mut self, update: &CustomerUpdate) {
        if let Some(ref name) = update.name {
            self.name = name.clone();
        }
        if let Some(ref email) = update.email {
            self.email = email.clone();
        }
        if let Some(ref phone) = update.phone {
            self.phone = phone.clone();
        }
        if let Some(ref address) = update.address {
            self.address = address.clone();
        }
        if let Some(date_of_birth) = update.date_of_birth {
            self.date_of_birth = date_of_birth;
        }
        if let Some(ref national_id) = update.national_id {
            self.national_id = national_id.clone();
        }
        self.updated_at = Utc::now();
    }
}

/// Profile fields a customer may change. `None` leaves a field as is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CustomerUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub national_id: Option<String>,
}

impl CustomerUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.phone.is_none()
            && self.address.is_none()
            && self.date_of_birth.is_none()
            && self.national_id.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Customer {
        Customer::new(
            "Ada",
            "ada@example.com",
            "0800",
            "Lagos",
            NaiveDate::from_ymd_opt(1990, 1, 2).unwrap(),
            "NIN-1",
            "$argon2id$hash",
        )
    }

    #[test]
    fn test_new_customer_ids_are_object_ids() {
        let a = sample();
        let b = sample();
        assert_ne!(a.id, b.id);
        assert!(bson::oid::ObjectId::parse_str(&a.id).is_ok());
        assert_eq!(a.created_at, a.updated_at);
    }

    #[test]
    fn test_apply_changes_only_given_fields() {
        let mut customer = sample();
        let update = CustomerUpdate {
            phone: Some("0900".to_string()),
            ..Default::default()
        };

        customer.apply(&update);

        assert_eq!(customer.phone, "0900");
        assert_eq!(customer.name, "Ada");
        assert_eq!(customer.password_hash, "$argon2id$hash");
        assert!(customer.updated_at >= customer.created_at);
    }

    #[test]
    fn test_bson_field_names() {
        let doc = bson::to_document(&sample()).unwrap();
        assert!(doc.contains_key("_id"));
        assert!(doc.contains_key("nationalId"));
        assert!(doc.contains_key("passwordHash"));
        assert_eq!(doc.get_str("dateOfBirth").unwrap(), "1990-01-02");
        assert!(doc.get_datetime("createdAt").is_ok());
    }

    #[test]
    fn test_empty_update() {
        assert!(CustomerUpdate::default().is_empty());
        let update = CustomerUpdate {
            name: Some("B".to_string()),
            ..Default::default()
        };
        assert!(!update.is_empty());
    }
}
