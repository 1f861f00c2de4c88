//! HTTP client for the finance API plus the client-side dashboard state built on it.

pub mod client;
pub mod credentials;
pub mod dashboard;
mod error;

pub use client::FinanceClient;
pub use credentials::{CredentialStore, FileCredentialStore, MemoryCredentialStore};
pub use dashboard::Dashboard;
pub use error::ClientError;
