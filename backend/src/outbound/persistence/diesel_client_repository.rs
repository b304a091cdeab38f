//! PostgreSQL-backed client account repository.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{ClientRepository, ClientRepositoryError};
use crate::domain::{Client, ClientId, EmailAddress, PasswordHash};

use super::diesel_error_mapping::{DieselFailure, classify_diesel_error, pool_error_message};
use super::models::{ClientRow, NewClientRow};
use super::pool::{DbPool, PoolError};
use super::schema::clients;

/// Diesel-backed implementation of [`ClientRepository`].
#[derive(Clone)]
pub struct DieselClientRepository {
    pool: DbPool,
}

impl DieselClientRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ClientRepositoryError {
    ClientRepositoryError::connection(pool_error_message(error))
}

fn map_diesel_error(error: diesel::result::Error) -> ClientRepositoryError {
    match classify_diesel_error(error) {
        DieselFailure::Connection(message) => ClientRepositoryError::connection(message),
        DieselFailure::UniqueViolation(message)
        | DieselFailure::ConstraintViolation(message)
        | DieselFailure::Query(message) => ClientRepositoryError::query(message),
    }
}

fn row_to_client(row: ClientRow) -> Result<Client, ClientRepositoryError> {
    let email = EmailAddress::new(&row.email).map_err(|err| {
        ClientRepositoryError::query(format!("stored client {} is invalid: {err}", row.id))
    })?;
    Ok(Client {
        id: ClientId::from_uuid(row.id),
        name: row.name,
        email,
        password_hash: PasswordHash::new(row.password_hash),
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

#[async_trait]
impl ClientRepository for DieselClientRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<Client>, ClientRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        clients::table
            .filter(clients::email.eq(email))
            .select(ClientRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .map(row_to_client)
            .transpose()
    }

    async fn find_by_id(&self, id: &ClientId) -> Result<Option<Client>, ClientRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        clients::table
            .find(*id.as_uuid())
            .select(ClientRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .map(row_to_client)
            .transpose()
    }

    async fn insert(&self, client: &Client) -> Result<(), ClientRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewClientRow {
            id: *client.id.as_uuid(),
            name: client.name.as_str(),
            email: client.email.as_ref(),
            password_hash: client.password_hash.as_str(),
            created_at: client.created_at,
            updated_at: client.updated_at,
        };
        diesel::insert_into(clients::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map_err(|err| match classify_diesel_error(err) {
                DieselFailure::UniqueViolation(_) => {
                    ClientRepositoryError::duplicate_email(client.email.as_ref())
                }
                DieselFailure::Connection(message) => ClientRepositoryError::connection(message),
                DieselFailure::ConstraintViolation(message) | DieselFailure::Query(message) => {
                    ClientRepositoryError::query(message)
                }
            })?;
        Ok(())
    }
}
