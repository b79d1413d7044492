//! Fetch Customer Use Case

use std::sync::Arc;

use crate::account::entity::Account;
use crate::account::repository::AccountRepository;
use crate::customer::entity::Customer;
use crate::customer::repository::CustomerRepository;
use crate::usecase::UseCaseError;

/// A customer together with the accounts they own
#[derive(Debug, Clone)]
pub struct CustomerProfile {
    pub customer: Customer,
    pub accounts: Vec<Account>,
}

pub struct FetchCustomerUseCase {
    customers: Arc<dyn CustomerRepository>,
    accounts: Arc<dyn AccountRepository>,
}

impl FetchCustomerUseCase {
    pub fn new(customers: Arc<dyn CustomerRepository>, accounts: Arc<dyn AccountRepository>) -> Self {
        Self { customers, accounts }
    }

    pub async fn execute(&self, id: &str) -> Result<CustomerProfile, UseCaseError> {
        let customer = self.customers
            .find_by_id(id)
            .await?
            .ok_or_else(|| UseCaseError::not_found("CUSTOMER_NOT_FOUND", format!("Customer not found: {}", id)))?;

        let accounts = self.accounts.find_by_customer(&customer.id).await?;

        Ok(CustomerProfile { customer, accounts })
    }
}
