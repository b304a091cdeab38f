//! In-memory client account repository.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::ports::{ClientRepository, ClientRepositoryError};
use crate::domain::{Client, ClientId};

/// Mutex-guarded client store with a unique-email rule.
#[derive(Default)]
pub struct InMemoryClientRepository {
    clients: Mutex<Vec<Client>>,
}

impl InMemoryClientRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<Client>>, ClientRepositoryError> {
        self.clients
            .lock()
            .map_err(|_| ClientRepositoryError::query("client store lock poisoned"))
    }
}

#[async_trait]
impl ClientRepository for InMemoryClientRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<Client>, ClientRepositoryError> {
        let clients = self.lock()?;
        Ok(clients
            .iter()
            .find(|client| client.email.as_ref() == email)
            .cloned())
    }

    async fn find_by_id(&self, id: &ClientId) -> Result<Option<Client>, ClientRepositoryError> {
        let clients = self.lock()?;
        Ok(clients.iter().find(|client| &client.id == id).cloned())
    }

    async fn insert(&self, client: &Client) -> Result<(), ClientRepositoryError> {
        let mut clients = self.lock()?;
        if clients.iter().any(|existing| existing.email == client.email) {
            return Err(ClientRepositoryError::duplicate_email(client.email.as_ref()));
        }
        clients.push(client.clone());
        Ok(())
    }
}
