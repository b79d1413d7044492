//! Account Entity
//!
//! A bank account owned by exactly one customer. Every registration opens
//! one default savings account with a zero balance.

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use bson::serde_helpers::chrono_datetime_as_bson_datetime;
use rand::Rng;
use utoipa::ToSchema;

use crate::shared::error::{PlatformError, Result};

/// Smallest and one-past-largest ten digit account number
const ACCOUNT_NUMBER_RANGE: std::ops::Range<u64> = 1_000_000_000..10_000_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
pub enum AccountType {
    #[default]
    #[serde(rename = "Savings account")]
    Savings,
    #[serde(rename = "Current account")]
    Current,
}

impl std::fmt::Display for AccountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Savings => write!(f, "Savings account"),
            Self::Current => write!(f, "Current account"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    #[serde(rename = "_id")]
    pub id: String,

    /// Owning customer
    pub customer_id: String,

    pub account_type: AccountType,

    /// Minor currency units
    pub balance: i64,

    /// Ten decimal digits, globally unique
    pub account_number: String,

    pub is_default: bool,

    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

impl Account {
    pub fn new(
        customer_id: impl Into<String>,
        account_type: AccountType,
        balance: i64,
        account_number: impl Into<String>,
        is_default: bool,
    ) -> Result<Self> {
        if balance < 0 {
            return Err(PlatformError::validation("Opening balance must not be negative"));
        }

        let account_number = account_number.into();
        if !is_valid_account_number(&account_number) {
            return Err(PlatformError::validation(format!(
                "Account number must be ten digits: {}",
                account_number
            )));
        }

        Ok(Self {
            id: bson::oid::ObjectId::new().to_hex(),
            customer_id: customer_id.into(),
            account_type,
            balance,
            account_number,
            is_default,
            created_at: Utc::now(),
        })
    }

    /// The savings account opened at registration
    pub fn opening(customer_id: impl Into<String>, account_number: impl Into<String>) -> Result<Self> {
        Self::new(customer_id, AccountType::Savings, 0, account_number, true)
    }
}

/// Draw a ten digit account number uniformly from 1000000000..=9999999999.
pub fn generate_account_number() -> String {
    rand::thread_rng().gen_range(ACCOUNT_NUMBER_RANGE).to_string()
}

pub fn is_valid_account_number(value: &str) -> bool {
    value.len() == 10 && value.bytes().all(|b| b.is_ascii_digit()) && !value.starts_with('0')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_numbers_are_ten_digits() {
        for _ in 0..1000 {
            let number = generate_account_number();
            assert!(is_valid_account_number(&number), "bad number {}", number);
            let value: u64 = number.parse().unwrap();
            assert!((1_000_000_000..=9_999_999_999).contains(&value));
        }
    }

    #[test]
    fn test_opening_account() {
        let account = Account::opening("cust-1", "1234567890").unwrap();
        assert_eq!(account.account_type, AccountType::Savings);
        assert_eq!(account.balance, 0);
        assert!(account.is_default);
        assert_eq!(account.customer_id, "cust-1");
    }

    #[test]
    fn test_rejects_negative_balance_and_bad_number() {
        assert!(Account::new("c", AccountType::Current, -1, "1234567890", false).is_err());
        assert!(Account::new("c", AccountType::Current, 0, "0123456789", false).is_err());
        assert!(Account::new("c", AccountType::Current, 0, "12345", false).is_err());
    }

    #[test]
    fn test_account_type_wire_names() {
        assert_eq!(serde_json::to_string(&AccountType::Savings).unwrap(), "\"Savings account\"");
        assert_eq!(AccountType::Current.to_string(), "Current account");

        let doc = bson::to_document(&Account::opening("c", "1234567890").unwrap()).unwrap();
        assert_eq!(doc.get_str("accountType").unwrap(), "Savings account");
        assert_eq!(doc.get_str("accountNumber").unwrap(), "1234567890");
        assert!(doc.get_bool("isDefault").unwrap());
    }
}
