//! Client signup, login and dashboard service.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::debug;

use crate::domain::ports::{
    ClientAccounts, ClientRepository, ClientRepositoryError, PasswordHasher, PasswordHasherError,
};
use crate::domain::{
    Client, ClientId, ClientProfile, ClientSession, ClientSignup, Error, LoginCredentials,
};

const INVALID_LOGIN: &str = "invalid email or password";

/// Domain service implementing [`ClientAccounts`].
#[derive(Clone)]
pub struct ClientAccountService<R, H> {
    repo: Arc<R>,
    hasher: Arc<H>,
    clock: Arc<dyn Clock>,
}

impl<R, H> ClientAccountService<R, H> {
    pub fn new(repo: Arc<R>, hasher: Arc<H>, clock: Arc<dyn Clock>) -> Self {
        Self {
            repo,
            hasher,
            clock,
        }
    }
}

/// Location of a client's dashboard on the HTTP surface.
pub fn dashboard_path(id: &ClientId) -> String {
    format!("/api/v1/clients/{id}/dashboard")
}

#[async_trait]
impl<R, H> ClientAccounts for ClientAccountService<R, H>
where
    R: ClientRepository,
    H: PasswordHasher,
{
    async fn signup(&self, signup: ClientSignup) -> Result<ClientProfile, Error> {
        if self
            .repo
            .find_by_email(signup.email().as_ref())
            .await
            .map_err(map_repository_error)?
            .is_some()
        {
            return Err(Error::conflict("email already exists"));
        }

        let password_hash = self
            .hasher
            .hash(signup.password())
            .map_err(map_hasher_error)?;
        let now = self.clock.utc();
        let client = Client {
            id: ClientId::random(),
            name: signup.name().to_owned(),
            email: signup.email().clone(),
            password_hash,
            created_at: now,
            updated_at: now,
        };
        self.repo
            .insert(&client)
            .await
            .map_err(map_repository_error)?;
        Ok(client.profile())
    }

    async fn login(&self, credentials: &LoginCredentials) -> Result<ClientSession, Error> {
        let Some(client) = self
            .repo
            .find_by_email(credentials.identity())
            .await
            .map_err(map_repository_error)?
        else {
            debug!("client login for unknown email");
            return Err(Error::unauthorized(INVALID_LOGIN));
        };

        let matches = self
            .hasher
            .verify(credentials.password(), &client.password_hash)
            .map_err(map_hasher_error)?;
        if !matches {
            debug!(client_id = %client.id, "client login with wrong password");
            return Err(Error::unauthorized(INVALID_LOGIN));
        }

        Ok(ClientSession {
            client_id: client.id,
            dashboard: dashboard_path(&client.id),
        })
    }

    async fn dashboard(&self, id: &ClientId) -> Result<ClientProfile, Error> {
        self.repo
            .find_by_id(id)
            .await
            .map_err(map_repository_error)?
            .map(|client| client.profile())
            .ok_or_else(|| Error::not_found("client not found"))
    }
}

fn map_repository_error(error: ClientRepositoryError) -> Error {
    match error {
        ClientRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("client store unavailable: {message}"))
        }
        ClientRepositoryError::Query { message } => {
            Error::internal(format!("client store query failed: {message}"))
        }
        ClientRepositoryError::DuplicateEmail { .. } => Error::conflict("email already exists"),
    }
}

fn map_hasher_error(error: PasswordHasherError) -> Error {
    Error::internal(error.to_string())
}
