//! Login Use Case
//!
//! Authenticates by national id and password. A customer keeps one stored
//! token: login returns it unchanged while it still verifies, and only
//! mints a new one when none is stored or the stored one no longer verifies
//! (expired, or signed under a rotated secret).
//!
//! A successful login also re-hashes the password when the stored hash was
//! made with different Argon2 parameters.

use std::sync::Arc;
use serde::Deserialize;
use tracing::{debug, warn};
use utoipa::ToSchema;

use crate::auth::{PasswordService, TokenService};
use crate::customer::entity::Customer;
use crate::customer::repository::CustomerRepository;
use crate::token::entity::CustomerToken;
use crate::token::repository::TokenRepository;
use crate::usecase::UseCaseError;
use super::validation::require_fields;

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct LoginCommand {
    #[serde(rename = "nationalID", alias = "nationalId")]
    pub national_id: String,
    pub password: String,
}

pub struct LoginUseCase {
    customers: Arc<dyn CustomerRepository>,
    tokens: Arc<dyn TokenRepository>,
    password_service: Arc<PasswordService>,
    token_service: Arc<TokenService>,
}

impl LoginUseCase {
    pub fn new(
        customers: Arc<dyn CustomerRepository>,
        tokens: Arc<dyn TokenRepository>,
        password_service: Arc<PasswordService>,
        token_service: Arc<TokenService>,
    ) -> Self {
        Self {
            customers,
            tokens,
            password_service,
            token_service,
        }
    }

    /// Returns the customer's bearer token.
    pub async fn execute(&self, command: LoginCommand) -> Result<String, UseCaseError> {
        require_fields(&[
            ("nationalID", command.national_id.as_str()),
            ("password", command.password.as_str()),
        ])?;
        let national_id = command.national_id.trim();

        let customer = self.customers
            .find_by_national_id(national_id)
            .await?
            .ok_or_else(|| {
                UseCaseError::not_found("CUSTOMER_NOT_FOUND", "No customer with this national ID")
            })?;

        let valid = self.password_service
            .verify_password_async(&command.password, &customer.password_hash)
            .await?;
        if !valid {
            warn!(customer_id = %customer.id, "Login rejected: wrong password");
            return Err(UseCaseError::invalid_credentials());
        }

        if self.password_service.needs_rehash(&customer.password_hash) {
            self.upgrade_hash(&customer, &command.password).await;
        }

        if let Some(stored) = self.tokens.find_by_customer(&customer.id).await? {
            if self.token_service.verify(&stored.token).is_ok() {
                debug!(customer_id = %customer.id, "Returning stored token");
                return Ok(stored.token);
            }
            debug!(customer_id = %customer.id, "Stored token no longer verifies, reissuing");
            self.tokens.delete_all_for_customer(&customer.id).await?;
        }

        self.issue_and_store(&customer).await
    }

    /// Re-hash under the current cost parameters. Failures leave the old
    /// hash in place and do not fail the login.
    async fn upgrade_hash(&self, customer: &Customer, password: &str) {
        let result = match self.password_service.hash_password_async(password).await {
            Ok(hash) => self.customers.update_password(&customer.id, &hash).await,
            Err(e) => Err(e),
        };
        match result {
            Ok(()) => debug!(customer_id = %customer.id, "Password hash upgraded"),
            Err(e) => warn!(customer_id = %customer.id, error = %e, "Password hash upgrade failed"),
        }
    }

    async fn issue_and_store(&self, customer: &Customer) -> Result<String, UseCaseError> {
        let token = self.token_service.issue(customer)?;

        match self.tokens.insert(&CustomerToken::new(&customer.id, &token)).await {
            Ok(()) => {
                debug!(customer_id = %customer.id, "Issued new token");
                Ok(token)
            }
            // A concurrent login stored one first; hand back that one
            Err(e) if e.is_duplicate_of("Token") => self.tokens
                .find_by_customer(&customer.id)
                .await?
                .map(|stored| stored.token)
                .ok_or_else(|| UseCaseError::store_failure("Token vanished after duplicate insert")),
            Err(e) => Err(e.into()),
        }
    }
}
