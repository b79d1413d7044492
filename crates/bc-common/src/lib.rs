//! BankCore Common
//!
//! Process-wide plumbing shared by the platform crate and the server binary.

pub mod logging;

pub use logging::{init_logging, LogFormat};
