//! Login payloads for the admin stub and client accounts.
//!
//! Inbound adapters build these through validating constructors before
//! calling a port. Passwords are held in [`Zeroizing`] buffers.

use zeroize::Zeroizing;

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoginValidationError {
    /// Username or email was missing or blank once trimmed.
    #[error("{field} must not be empty")]
    EmptyIdentity { field: &'static str },
    /// Password was blank.
    #[error("password must not be empty")]
    EmptyPassword,
}

impl LoginValidationError {
    /// Field the failure refers to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyIdentity { field } => field,
            Self::EmptyPassword => "password",
        }
    }
}

/// Validated login credentials.
///
/// ## Invariants
/// - `identity` (a username or an email) is trimmed and non-empty.
/// - `password` is non-empty and keeps caller-provided whitespace.
///
/// # Examples
/// ```
/// use roster::domain::LoginCredentials;
///
/// let creds = LoginCredentials::admin(" admin ", "password").unwrap();
/// assert_eq!(creds.identity(), "admin");
/// assert_eq!(creds.password(), "password");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    identity: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Credentials for the admin stub, identified by username.
    pub fn admin(username: &str, password: &str) -> Result<Self, LoginValidationError> {
        Self::try_from_parts("username", username, password)
    }

    /// Credentials for a client account, identified by email.
    pub fn client(email: &str, password: &str) -> Result<Self, LoginValidationError> {
        Self::try_from_parts("email", email, password)
    }

    fn try_from_parts(
        field: &'static str,
        identity: &str,
        password: &str,
    ) -> Result<Self, LoginValidationError> {
        let normalized = identity.trim();
        if normalized.is_empty() {
            return Err(LoginValidationError::EmptyIdentity { field });
        }
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }
        Ok(Self {
            identity: normalized.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Username or email used for lookups.
    pub fn identity(&self) -> &str {
        self.identity.as_str()
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "pw", "username")]
    #[case("   ", "pw", "username")]
    #[case("user", "", "password")]
    fn admin_rejects_blank_inputs(
        #[case] username: &str,
        #[case] password: &str,
        #[case] field: &str,
    ) {
        let err = LoginCredentials::admin(username, password).expect_err("invalid inputs");
        assert_eq!(err.field(), field);
    }

    #[rstest]
    fn client_reports_email_field() {
        let err = LoginCredentials::client(" ", "pw").expect_err("blank email");
        assert_eq!(err, LoginValidationError::EmptyIdentity { field: "email" });
        assert_eq!(err.to_string(), "email must not be empty");
    }

    #[rstest]
    #[case("  ada@x.com  ", " secret ")]
    #[case("alice", "correct horse battery staple")]
    fn trims_identity_but_not_password(#[case] identity: &str, #[case] password: &str) {
        let creds = LoginCredentials::client(identity, password).expect("valid inputs");
        assert_eq!(creds.identity(), identity.trim());
        assert_eq!(creds.password(), password);
    }
}
