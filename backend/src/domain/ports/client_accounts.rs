//! Driving port for client signup, login and dashboard.

use async_trait::async_trait;

use crate::domain::{ClientId, ClientProfile, ClientSession, ClientSignup, Error, LoginCredentials};

/// Domain use-case port for client accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClientAccounts: Send + Sync {
    /// Create an account; `conflict` when the email is taken.
    async fn signup(&self, signup: ClientSignup) -> Result<ClientProfile, Error>;

    /// Check credentials; `unauthorized` on any mismatch.
    async fn login(&self, credentials: &LoginCredentials) -> Result<ClientSession, Error>;

    async fn dashboard(&self, id: &ClientId) -> Result<ClientProfile, Error>;
}
