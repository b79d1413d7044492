//! Customer Operations
//!
//! Use cases for the customer lifecycle.

mod validation;

pub mod register;
pub mod login;
pub mod update;
pub mod change_password;
pub mod delete;
pub mod fetch;

pub use register::{RegisterCustomerCommand, RegisterCustomerUseCase, Registration};
pub use login::{LoginCommand, LoginUseCase};
pub use update::{UpdateCustomerCommand, UpdateCustomerUseCase};
pub use change_password::{ChangePasswordCommand, ChangePasswordUseCase};
pub use delete::DeleteCustomerUseCase;
pub use fetch::{CustomerProfile, FetchCustomerUseCase};
