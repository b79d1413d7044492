//! Delete Customer Use Case
//!
//! Removes dependents first (accounts, then tokens), then the customer.
//! A missing customer is only detected by the final step, so deleting an
//! unknown id is a harmless no-op on the dependent collections.

use std::sync::Arc;
use tracing::{error, info};

use crate::account::repository::AccountRepository;
use crate::customer::repository::CustomerRepository;
use crate::token::repository::TokenRepository;
use crate::usecase::UseCaseError;

pub struct DeleteCustomerUseCase {
    customers: Arc<dyn CustomerRepository>,
    accounts: Arc<dyn AccountRepository>,
    tokens: Arc<dyn TokenRepository>,
}

impl DeleteCustomerUseCase {
    pub fn new(
        customers: Arc<dyn CustomerRepository>,
        accounts: Arc<dyn AccountRepository>,
        tokens: Arc<dyn TokenRepository>,
    ) -> Self {
        Self {
            customers,
            accounts,
            tokens,
        }
    }

    pub async fn execute(&self, id: &str) -> Result<(), UseCaseError> {
        let accounts_removed = self.accounts.delete_all_for_customer(id).await?;

        let tokens_removed = self.tokens.delete_all_for_customer(id).await.map_err(|e| {
            error!(customer_id = id, accounts_removed, error = %e,
                "Deletion incomplete: accounts removed, tokens remain");
            e
        })?;

        self.customers.delete(id).await?;

        info!(customer_id = id, accounts_removed, tokens_removed, "Customer deleted");
        Ok(())
    }
}
