//! Update Customer Use Case

use std::sync::Arc;
use serde::Deserialize;
use tracing::debug;
use utoipa::ToSchema;

use crate::customer::entity::{Customer, CustomerUpdate};
use crate::customer::repository::CustomerRepository;
use crate::details;
use crate::usecase::UseCaseError;
use super::validation::{normalize_email, parse_date_of_birth};

/// Partial profile update. Omitted fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateCustomerCommand {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    /// `YYYY-MM-DD`
    pub date_of_birth: Option<String>,
    #[serde(rename = "nationalID", alias = "nationalId")]
    pub national_id: Option<String>,
    /// Rejected; passwords change through change-password only
    pub password: Option<String>,
}

fn non_blank(field: &str, value: Option<String>) -> Result<Option<String>, UseCaseError> {
    match value {
        None => Ok(None),
        Some(v) if v.trim().is_empty() => Err(UseCaseError::validation_with_details(
            "EMPTY_FIELD",
            format!("{} must not be empty", field),
            details! { "field" => field },
        )),
        Some(v) => Ok(Some(v.trim().to_string())),
    }
}

impl UpdateCustomerCommand {
    pub fn into_update(self) -> Result<CustomerUpdate, UseCaseError> {
        if self.password.is_some() {
            return Err(UseCaseError::validation(
                "PASSWORD_NOT_UPDATABLE",
                "Password cannot be changed here; use change-password",
            ));
        }

        let email = non_blank("email", self.email)?
            .map(|e| normalize_email(&e))
            .transpose()?;
        let date_of_birth = non_blank("dateOfBirth", self.date_of_birth)?
            .map(|d| parse_date_of_birth(&d))
            .transpose()?;

        let update = CustomerUpdate {
            name: non_blank("name", self.name)?,
            email,
            phone: non_blank("phone", self.phone)?,
            address: non_blank("address", self.address)?,
            date_of_birth,
            national_id: non_blank("nationalID", self.national_id)?,
        };

        if update.is_empty() {
            return Err(UseCaseError::validation("NO_FIELDS", "No fields to update"));
        }
        Ok(update)
    }
}

pub struct UpdateCustomerUseCase {
    customers: Arc<dyn CustomerRepository>,
}

impl UpdateCustomerUseCase {
    pub fn new(customers: Arc<dyn CustomerRepository>) -> Self {
        Self { customers }
    }

    /// Uniqueness of a changed email or national id is left to the store,
    /// which reports a collision as `DuplicateCustomer`.
    pub async fn execute(&self, id: &str, command: UpdateCustomerCommand) -> Result<Customer, UseCaseError> {
        let update = command.into_update()?;
        let customer = self.customers.update_fields(id, &update).await?;

        debug!(customer_id = %customer.id, "Customer updated");
        Ok(customer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_into_update() {
        let cmd = UpdateCustomerCommand {
            email: Some(" New@X.com ".to_string()),
            date_of_birth: Some("1980-06-30".to_string()),
            ..Default::default()
        };
        let update = cmd.into_update().unwrap();
        assert_eq!(update.email.as_deref(), Some("new@x.com"));
        assert_eq!(update.date_of_birth, NaiveDate::from_ymd_opt(1980, 6, 30));
        assert!(update.name.is_none());
    }

    #[test]
    fn test_empty_command_rejected() {
        let err = UpdateCustomerCommand::default().into_update().unwrap_err();
        assert_eq!(err.code(), "NO_FIELDS");
    }

    #[test]
    fn test_blank_field_rejected() {
        let cmd = UpdateCustomerCommand {
            phone: Some("  ".to_string()),
            ..Default::default()
        };
        assert_eq!(cmd.into_update().unwrap_err().code(), "EMPTY_FIELD");
    }

    #[test]
    fn test_password_rejected() {
        let cmd = UpdateCustomerCommand {
            name: Some("B".to_string()),
            password: Some("new".to_string()),
            ..Default::default()
        };
        assert_eq!(cmd.into_update().unwrap_err().code(), "PASSWORD_NOT_UPDATABLE");
    }
}
