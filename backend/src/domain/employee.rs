//! Employee record model.
//!
//! Required and optional fields are explicit in the types: a draft cannot be
//! built without a name and a well-formed email, and an age outside
//! [`AGE_MIN`]..=[`AGE_MAX`] cannot be represented.

use std::fmt;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Youngest age accepted for an employee record.
pub const AGE_MIN: i64 = 16;
/// Oldest age accepted for an employee record.
pub const AGE_MAX: i64 = 100;

/// Validation errors raised while building employee values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EmployeeValidationError {
    #[error("employee id must be a valid UUID")]
    InvalidId,
    #[error("name required")]
    EmptyName,
    #[error("email required")]
    EmptyEmail,
    #[error("valid email required")]
    InvalidEmail,
    #[error("age must be between {min} and {max}, got {value}")]
    AgeOutOfRange { min: i64, max: i64, value: i64 },
    #[error("search pattern is not a valid regular expression")]
    InvalidSearch,
}

impl EmployeeValidationError {
    /// Field the failure refers to, for structured error details.
    pub fn field(&self) -> &'static str {
        match self {
            Self::InvalidId => "id",
            Self::EmptyName => "name",
            Self::EmptyEmail | Self::InvalidEmail => "email",
            Self::AgeOutOfRange { .. } => "age",
            Self::InvalidSearch => "q",
        }
    }
}

/// Stable employee identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmployeeId(Uuid);

impl EmployeeId {
    /// Parse an identifier from its textual form.
    pub fn new(id: impl AsRef<str>) -> Result<Self, EmployeeValidationError> {
        Uuid::parse_str(id.as_ref().trim())
            .map(Self)
            .map_err(|_| EmployeeValidationError::InvalidId)
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

impl fmt::Display for EmployeeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<EmployeeId> for String {
    fn from(value: EmployeeId) -> Self {
        value.0.to_string()
    }
}

impl TryFrom<String> for EmployeeId {
    type Error = EmployeeValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Employee display name; trimmed and never blank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct EmployeeName(String);

impl EmployeeName {
    /// Trim and validate a name.
    pub fn new(name: impl AsRef<str>) -> Result<Self, EmployeeValidationError> {
        let trimmed = name.as_ref().trim();
        if trimmed.is_empty() {
            return Err(EmployeeValidationError::EmptyName);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for EmployeeName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$")
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Email address used as the unique key for employees and clients.
///
/// Stored trimmed; comparison is exact (case-sensitive).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Trim and validate an email address.
    ///
    /// # Examples
    /// ```
    /// use roster::domain::EmailAddress;
    ///
    /// let email = EmailAddress::new("  ada@example.com ").expect("valid email");
    /// assert_eq!(email.as_ref(), "ada@example.com");
    /// assert!(EmailAddress::new("not-an-email").is_err());
    /// ```
    pub fn new(email: impl AsRef<str>) -> Result<Self, EmployeeValidationError> {
        let trimmed = email.as_ref().trim();
        if trimmed.is_empty() {
            return Err(EmployeeValidationError::EmptyEmail);
        }
        if !email_regex().is_match(trimmed) {
            return Err(EmployeeValidationError::InvalidEmail);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Employee age within [`AGE_MIN`]..=[`AGE_MAX`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Age(u8);

impl Age {
    /// Validate an age.
    pub fn new(value: i64) -> Result<Self, EmployeeValidationError> {
        if !(AGE_MIN..=AGE_MAX).contains(&value) {
            return Err(EmployeeValidationError::AgeOutOfRange {
                min: AGE_MIN,
                max: AGE_MAX,
                value,
            });
        }
        u8::try_from(value)
            .map(Self)
            .map_err(|_| EmployeeValidationError::AgeOutOfRange {
                min: AGE_MIN,
                max: AGE_MAX,
                value,
            })
    }

    /// Age in years.
    pub fn value(self) -> u8 {
        self.0
    }
}

/// Optional department label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Department(String);

impl Department {
    /// Trim a department label; blank input means "no department".
    pub fn from_optional(value: Option<&str>) -> Option<Self> {
        value
            .map(str::trim)
            .filter(|trimmed| !trimmed.is_empty())
            .map(|trimmed| Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for Department {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Validated field set used to create or fully replace an employee.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeDraft {
    pub name: EmployeeName,
    pub email: EmailAddress,
    pub age: Option<Age>,
    pub department: Option<Department>,
}

impl EmployeeDraft {
    /// Validate raw inputs into a draft.
    ///
    /// # Examples
    /// ```
    /// use roster::domain::EmployeeDraft;
    ///
    /// let draft = EmployeeDraft::try_from_parts("Ada", "ada@example.com", Some(36), None)
    ///     .expect("valid draft");
    /// assert_eq!(draft.age.map(|age| age.value()), Some(36));
    /// ```
    pub fn try_from_parts(
        name: &str,
        email: &str,
        age: Option<i64>,
        department: Option<&str>,
    ) -> Result<Self, EmployeeValidationError> {
        Ok(Self {
            name: EmployeeName::new(name)?,
            email: EmailAddress::new(email)?,
            age: age.map(Age::new).transpose()?,
            department: Department::from_optional(department),
        })
    }
}

/// Partial update; absent fields keep their stored values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmployeePatch {
    pub name: Option<EmployeeName>,
    pub email: Option<EmailAddress>,
    pub age: Option<Age>,
    pub department: Option<Department>,
}

impl EmployeePatch {
    /// Validate raw optional inputs into a patch.
    pub fn try_from_parts(
        name: Option<&str>,
        email: Option<&str>,
        age: Option<i64>,
        department: Option<&str>,
    ) -> Result<Self, EmployeeValidationError> {
        Ok(Self {
            name: name.map(EmployeeName::new).transpose()?,
            email: email.map(EmailAddress::new).transpose()?,
            age: age.map(Age::new).transpose()?,
            department: Department::from_optional(department),
        })
    }

    /// Merge the patch over an existing record.
    pub fn apply_to(self, current: &Employee) -> EmployeeDraft {
        EmployeeDraft {
            name: self.name.unwrap_or_else(|| current.name.clone()),
            email: self.email.unwrap_or_else(|| current.email.clone()),
            age: self.age.or(current.age),
            department: self.department.or_else(|| current.department.clone()),
        }
    }
}

/// Draft paired with the identifier it will be stored under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEmployee {
    pub id: EmployeeId,
    pub draft: EmployeeDraft,
}

impl NewEmployee {
    /// Assign a fresh identifier to a draft.
    pub fn new(draft: EmployeeDraft) -> Self {
        Self {
            id: EmployeeId::random(),
            draft,
        }
    }
}

/// Persisted employee record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    id: EmployeeId,
    name: EmployeeName,
    email: EmailAddress,
    #[serde(skip_serializing_if = "Option::is_none")]
    age: Option<Age>,
    #[serde(skip_serializing_if = "Option::is_none")]
    department: Option<Department>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Employee {
    /// Assemble a record from stored parts.
    pub fn new(
        id: EmployeeId,
        draft: EmployeeDraft,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        let EmployeeDraft {
            name,
            email,
            age,
            department,
        } = draft;
        Self {
            id,
            name,
            email,
            age,
            department,
            created_at,
            updated_at,
        }
    }

    pub fn id(&self) -> &EmployeeId {
        &self.id
    }

    pub fn name(&self) -> &EmployeeName {
        &self.name
    }

    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    pub fn age(&self) -> Option<Age> {
        self.age
    }

    pub fn department(&self) -> Option<&Department> {
        self.department.as_ref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Replace the mutable fields, stamping the update time.
    pub fn apply(&mut self, draft: EmployeeDraft, updated_at: DateTime<Utc>) {
        self.name = draft.name;
        self.email = draft.email;
        self.age = draft.age;
        self.department = draft.department;
        self.updated_at = updated_at;
    }
}

/// Case-insensitive regular expression matched against name or email.
#[derive(Debug, Clone)]
pub struct EmployeeSearch {
    pattern: String,
    regex: Regex,
}

impl EmployeeSearch {
    /// Compile a search term. Blank terms mean "no filter".
    pub fn parse(term: Option<&str>) -> Result<Option<Self>, EmployeeValidationError> {
        let Some(pattern) = term.map(str::trim).filter(|term| !term.is_empty()) else {
            return Ok(None);
        };
        let regex = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map_err(|_| EmployeeValidationError::InvalidSearch)?;
        Ok(Some(Self {
            pattern: pattern.to_owned(),
            regex,
        }))
    }

    /// Pattern text as supplied by the caller.
    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    /// Whether the employee's name or email matches.
    pub fn matches(&self, employee: &Employee) -> bool {
        self.regex.is_match(employee.name.as_ref()) || self.regex.is_match(employee.email.as_ref())
    }
}

impl PartialEq for EmployeeSearch {
    fn eq(&self, other: &Self) -> bool {
        self.pattern == other.pattern
    }
}
