//! Client account model.
//!
//! Clients sign up with a name, an email and a password. Only the password
//! hash is stored; it never appears in serialised payloads.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use zeroize::Zeroizing;

use crate::domain::employee::{EmailAddress, EmployeeValidationError};

/// Validation errors raised by [`ClientSignup::try_from_parts`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientValidationError {
    #[error("client id must be a valid UUID")]
    InvalidId,
    #[error("name required")]
    EmptyName,
    #[error("email required")]
    EmptyEmail,
    #[error("valid email required")]
    InvalidEmail,
    #[error("password required")]
    EmptyPassword,
}

impl ClientValidationError {
    /// Field the failure refers to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::InvalidId => "id",
            Self::EmptyName => "name",
            Self::EmptyEmail | Self::InvalidEmail => "email",
            Self::EmptyPassword => "password",
        }
    }
}

/// Stable client identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClientId(Uuid);

impl ClientId {
    /// Parse an identifier from its textual form.
    pub fn new(id: impl AsRef<str>) -> Result<Self, ClientValidationError> {
        Uuid::parse_str(id.as_ref().trim())
            .map(Self)
            .map_err(|_| ClientValidationError::InvalidId)
    }

    /// Generate a new random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an identifier read back from storage.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<ClientId> for String {
    fn from(value: ClientId) -> Self {
        value.0.to_string()
    }
}

impl TryFrom<String> for ClientId {
    type Error = ClientValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Encoded password hash (PHC string format).
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap an encoded hash produced by a hasher or read from storage.
    pub fn new(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    /// Encoded hash string.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(..)")
    }
}

/// Validated signup request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSignup {
    name: String,
    email: EmailAddress,
    password: Zeroizing<String>,
}

impl ClientSignup {
    /// Validate raw signup inputs.
    ///
    /// # Examples
    /// ```
    /// use roster::domain::ClientSignup;
    ///
    /// let signup = ClientSignup::try_from_parts("Ada", "ada@x.com", "hunter2").unwrap();
    /// assert_eq!(signup.email().as_ref(), "ada@x.com");
    /// ```
    pub fn try_from_parts(
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<Self, ClientValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ClientValidationError::EmptyName);
        }
        let email = EmailAddress::new(email).map_err(|err| match err {
            EmployeeValidationError::EmptyEmail => ClientValidationError::EmptyEmail,
            _ => ClientValidationError::InvalidEmail,
        })?;
        if password.is_empty() {
            return Err(ClientValidationError::EmptyPassword);
        }
        Ok(Self {
            name: name.to_owned(),
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Stored client account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Client {
    pub id: ClientId,
    pub name: String,
    pub email: EmailAddress,
    pub password_hash: PasswordHash,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Client {
    /// Public view of the account for the dashboard.
    pub fn profile(&self) -> ClientProfile {
        ClientProfile {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            created_at: self.created_at,
        }
    }
}

/// Client data shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientProfile {
    pub id: ClientId,
    pub name: String,
    pub email: EmailAddress,
    pub created_at: DateTime<Utc>,
}

/// Result of a successful client login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientSession {
    pub client_id: ClientId,
    /// Location of the client's dashboard.
    pub dashboard: String,
}
