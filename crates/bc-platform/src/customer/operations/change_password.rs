//! Change Password Use Case

use std::sync::Arc;
use serde::Deserialize;
use tracing::info;
use utoipa::ToSchema;

use crate::auth::PasswordService;
use crate::customer::repository::CustomerRepository;
use crate::usecase::UseCaseError;
use super::validation::require_fields;

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct ChangePasswordCommand {
    #[serde(rename = "nationalID", alias = "nationalId")]
    pub national_id: String,
    /// New password
    pub password: String,
    /// Confirmation; must equal `password`
    pub repassword: String,
}

pub struct ChangePasswordUseCase {
    customers: Arc<dyn CustomerRepository>,
    password_service: Arc<PasswordService>,
}

impl ChangePasswordUseCase {
    pub fn new(customers: Arc<dyn CustomerRepository>, password_service: Arc<PasswordService>) -> Self {
        Self {
            customers,
            password_service,
        }
    }

    pub async fn execute(&self, command: ChangePasswordCommand) -> Result<(), UseCaseError> {
        require_fields(&[
            ("nationalID", command.national_id.as_str()),
            ("password", command.password.as_str()),
            ("repassword", command.repassword.as_str()),
        ])?;

        if command.password != command.repassword {
            return Err(UseCaseError::password_mismatch());
        }

        let customer = self.customers
            .find_by_national_id(command.national_id.trim())
            .await?
            .ok_or_else(|| {
                UseCaseError::not_found("CUSTOMER_NOT_FOUND", "No customer with this national ID")
            })?;

        let unchanged = self.password_service
            .verify_password_async(&command.password, &customer.password_hash)
            .await?;
        if unchanged {
            return Err(UseCaseError::same_password());
        }

        let password_hash = self.password_service.hash_password_async(&command.password).await?;
        self.customers.update_password(&customer.id, &password_hash).await?;

        info!(customer_id = %customer.id, "Password changed");
        Ok(())
    }
}
