//! Register Customer Use Case
//!
//! Creates the customer, the default savings account and the customer's
//! token, in that order. The steps are not transactional: a failure after
//! the customer insert leaves the earlier records in place, and the
//! failure is logged with the ids already committed.

use std::sync::Arc;
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::{debug, error, info, warn};
use utoipa::ToSchema;

use crate::account::entity::{generate_account_number, Account};
use crate::account::repository::AccountRepository;
use crate::auth::{PasswordService, TokenService};
use crate::customer::entity::Customer;
use crate::customer::repository::CustomerRepository;
use crate::details;
use crate::notification::CustomerNotifier;
use crate::shared::error::PlatformError;
use crate::token::entity::CustomerToken;
use crate::token::repository::TokenRepository;
use crate::usecase::UseCaseError;
use super::validation::{normalize_email, parse_date_of_birth, require_fields};

/// Account number draws before registration gives up
const MAX_ACCOUNT_NUMBER_ATTEMPTS: u32 = 5;

/// Command for registering a new customer. Every field is required.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct RegisterCustomerCommand {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    /// `YYYY-MM-DD`
    pub date_of_birth: String,
    #[serde(rename = "nationalID", alias = "nationalId")]
    pub national_id: String,
    pub password: String,
}

/// Registration input after validation
#[derive(Debug, Clone)]
struct NewCustomer {
    name: String,
    email: String,
    phone: String,
    address: String,
    date_of_birth: NaiveDate,
    national_id: String,
    password: String,
}

impl RegisterCustomerCommand {
    fn validate(self) -> Result<NewCustomer, UseCaseError> {
        require_fields(&[
            ("name", self.name.as_str()),
            ("email", self.email.as_str()),
            ("phone", self.phone.as_str()),
            ("address", self.address.as_str()),
            ("dateOfBirth", self.date_of_birth.as_str()),
            ("nationalID", self.national_id.as_str()),
            ("password", self.password.as_str()),
        ])?;

        Ok(NewCustomer {
            name: self.name.trim().to_string(),
            email: normalize_email(&self.email)?,
            phone: self.phone.trim().to_string(),
            address: self.address.trim().to_string(),
            date_of_birth: parse_date_of_birth(&self.date_of_birth)?,
            national_id: self.national_id.trim().to_string(),
            password: self.password,
        })
    }
}

/// Result of a successful registration
#[derive(Debug, Clone, PartialEq)]
pub struct Registration {
    pub customer_id: String,
    pub token: String,
    pub account_number: String,
}

pub struct RegisterCustomerUseCase {
    customers: Arc<dyn CustomerRepository>,
    accounts: Arc<dyn AccountRepository>,
    tokens: Arc<dyn TokenRepository>,
    password_service: Arc<PasswordService>,
    token_service: Arc<TokenService>,
    notifier: Arc<dyn CustomerNotifier>,
}

impl RegisterCustomerUseCase {
    pub fn new(
        customers: Arc<dyn CustomerRepository>,
        accounts: Arc<dyn AccountRepository>,
        tokens: Arc<dyn TokenRepository>,
        password_service: Arc<PasswordService>,
        token_service: Arc<TokenService>,
        notifier: Arc<dyn CustomerNotifier>,
    ) -> Self {
        Self {
            customers,
            accounts,
            tokens,
            password_service,
            token_service,
            notifier,
        }
    }

    pub async fn execute(&self, command: RegisterCustomerCommand) -> Result<Registration, UseCaseError> {
        let input = command.validate()?;

        // Fast-fail; the unique indexes decide races
        if let Some(existing) = self.customers
            .find_by_email_or_national_id(&input.email, &input.national_id)
            .await?
        {
            let field = if existing.email == input.email { "email" } else { "nationalID" };
            return Err(UseCaseError::duplicate_customer_with_details(
                "A customer with this email or national ID already exists",
                details! { "field" => field },
            ));
        }

        let password_hash = self.password_service.hash_password_async(&input.password).await?;

        let customer = Customer::new(
            input.name,
            input.email,
            input.phone,
            input.address,
            input.date_of_birth,
            input.national_id,
            password_hash,
        );
        self.customers.insert(&customer).await?;
        debug!(customer_id = %customer.id, "Customer stored");

        let account_number = self.open_default_account(&customer.id).await.map_err(|e| {
            error!(customer_id = %customer.id, error = %e, "Registration incomplete: customer stored without account");
            e
        })?;

        let token = self.token_service.issue(&customer).map_err(|e| {
            error!(customer_id = %customer.id, account_number = %account_number, error = %e,
                "Registration incomplete: token could not be issued");
            e
        })?;

        self.tokens
            .insert(&CustomerToken::new(&customer.id, &token))
            .await
            .map_err(|e| {
                error!(customer_id = %customer.id, account_number = %account_number, error = %e,
                    "Registration incomplete: token could not be stored");
                e
            })?;

        if let Err(e) = self.notifier.customer_registered(&customer, &account_number).await {
            warn!(customer_id = %customer.id, error = %e, "Registration notification failed");
        }

        info!(customer_id = %customer.id, account_number = %account_number, "Customer registration complete");

        Ok(Registration {
            customer_id: customer.id,
            token,
            account_number,
        })
    }

    /// Insert the default savings account, drawing a fresh number when the
    /// store reports a collision.
    async fn open_default_account(&self, customer_id: &str) -> Result<String, PlatformError> {
        let mut attempt = 1;
        loop {
            let account = Account::opening(customer_id, generate_account_number())?;
            match self.accounts.insert(&account).await {
                Ok(()) => return Ok(account.account_number),
                Err(e) if e.is_duplicate_of("Account") && attempt < MAX_ACCOUNT_NUMBER_ATTEMPTS => {
                    warn!(attempt, account_number = %account.account_number, "Account number collision, regenerating");
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command() -> RegisterCustomerCommand {
        RegisterCustomerCommand {
            name: "A".to_string(),
            email: " A@X.com".to_string(),
            phone: "123".to_string(),
            address: "addr".to_string(),
            date_of_birth: "2000-01-01".to_string(),
            national_id: "N1".to_string(),
            password: "p1".to_string(),
        }
    }

    #[test]
    fn test_validate_normalizes() {
        let input = command().validate().unwrap();
        assert_eq!(input.email, "a@x.com");
        assert_eq!(input.date_of_birth, NaiveDate::from_ymd_opt(2000, 1, 1).unwrap());
        assert_eq!(input.password, "p1");
    }

    #[test]
    fn test_validate_lists_missing_fields() {
        let cmd = RegisterCustomerCommand {
            phone: String::new(),
            password: String::new(),
            ..command()
        };
        let err = cmd.validate().unwrap_err();
        assert_eq!(err.code(), "MISSING_FIELDS");
        assert_eq!(
            err.details().get("fields"),
            Some(&serde_json::json!(["phone", "password"]))
        );
    }

    #[test]
    fn test_command_accepts_national_id_spellings() {
        let cmd: RegisterCustomerCommand = serde_json::from_str(
            r#"{"name":"A","nationalID":"N1","dateOfBirth":"2000-01-01"}"#,
        ).unwrap();
        assert_eq!(cmd.national_id, "N1");
        assert_eq!(cmd.date_of_birth, "2000-01-01");

        let cmd: RegisterCustomerCommand = serde_json::from_str(r#"{"nationalId":"N2"}"#).unwrap();
        assert_eq!(cmd.national_id, "N2");
    }
}
