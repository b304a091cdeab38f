//! Driving port for the admin login stub.
//!
//! There is no admin account store; the fixture checks a fixed pair and
//! establishes no session.

use async_trait::async_trait;

use crate::domain::{Error, LoginCredentials};

/// Domain use-case port for admin authentication.
#[async_trait]
pub trait AdminLogin: Send + Sync {
    /// Validate credentials, returning the admin username on success.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<String, Error>;
}

/// Accepts `admin` / `password` and nothing else.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureAdminLogin;

const FIXTURE_USERNAME: &str = "admin";
const FIXTURE_PASSWORD: &str = "password";

#[async_trait]
impl AdminLogin for FixtureAdminLogin {
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<String, Error> {
        if credentials.identity() == FIXTURE_USERNAME && credentials.password() == FIXTURE_PASSWORD
        {
            Ok(FIXTURE_USERNAME.to_owned())
        } else {
            Err(Error::unauthorized("invalid credentials"))
        }
    }
}
