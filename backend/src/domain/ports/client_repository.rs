//! Port abstraction for client account persistence.

use async_trait::async_trait;

use crate::domain::{Client, ClientId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by client repository adapters.
    pub enum ClientRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "client repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "client repository query failed: {message}",
        /// Another account already uses this email.
        DuplicateEmail { email: String } => "email already exists: {email}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClientRepository: Send + Sync {
    /// Look up an account by its exact (trimmed) email.
    async fn find_by_email(&self, email: &str) -> Result<Option<Client>, ClientRepositoryError>;

    async fn find_by_id(&self, id: &ClientId) -> Result<Option<Client>, ClientRepositoryError>;

    /// Store a new account; fails with `DuplicateEmail` on collision.
    async fn insert(&self, client: &Client) -> Result<(), ClientRepositoryError>;
}
