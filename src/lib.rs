mod client;
pub mod config;
pub mod dispatch;
pub mod errors;
pub mod refresh;
pub mod telemetry;
pub mod token;
pub mod types;

pub use client::AuthenticatedClient;
pub use config::{Config, ConfigLocation};
pub use dispatch::{ApiResponse, PendingRequest};
pub use errors::Error;
pub use refresh::RefreshState;
pub use token::{CredentialPair, TokenStore};

#[cfg(test)]
mod tests;
