//! Customer notifications
//!
//! Hook invoked once a registration has fully committed. Delivery channels
//! (email, SMS) plug in behind `CustomerNotifier`; the bundled
//! implementation only records the event in the log.

use async_trait::async_trait;
use tracing::info;

use crate::customer::entity::Customer;
use crate::shared::error::Result;

#[async_trait]
pub trait CustomerNotifier: Send + Sync {
    async fn customer_registered(&self, customer: &Customer, account_number: &str) -> Result<()>;
}

/// Notifier that writes a structured log line and nothing else
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingNotifier;

#[async_trait]
impl CustomerNotifier for LoggingNotifier {
    async fn customer_registered(&self, customer: &Customer, account_number: &str) -> Result<()> {
        info!(
            customer_id = %customer.id,
            email = %customer.email,
            account_number,
            "Customer registered"
        );
        Ok(())
    }
}
