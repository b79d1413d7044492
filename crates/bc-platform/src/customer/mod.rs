//! Customer Aggregate
//!
//! Customer entity, repository, lifecycle operations and REST API.

pub mod entity;
pub mod repository;
pub mod operations;
pub mod api;

pub use entity::{Customer, CustomerUpdate};
pub use repository::{CustomerRepository, MongoCustomerRepository, InMemoryCustomerRepository};
pub use api::{customers_router, CustomersState};
