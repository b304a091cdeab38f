//! Port abstraction for employee persistence adapters and their errors.
//!
//! Email is the unique key. Adapters must enforce it themselves and report
//! collisions as [`EmployeeRepositoryError::DuplicateEmail`] for single
//! writes, or as [`RejectedRecord`] entries for unordered bulk writes.

use std::collections::BTreeSet;

use async_trait::async_trait;
use pagination::PageRequest;
use serde::Serialize;

use crate::domain::{Employee, EmployeeDraft, EmployeeId, EmployeeSearch, NewEmployee};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by employee repository adapters.
    pub enum EmployeeRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "employee repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "employee repository query failed: {message}",
        /// Another record already uses this email.
        DuplicateEmail { email: String } => "email already exists: {email}",
    }
}

/// Filter and window for a list query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmployeeListQuery {
    pub search: Option<EmployeeSearch>,
    pub page: PageRequest,
}

/// One page of matches plus the total number of matches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmployeeListing {
    pub items: Vec<Employee>,
    pub total: u64,
}

/// A bulk-insert record the store declined.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectedRecord {
    pub email: String,
    pub reason: String,
}

impl RejectedRecord {
    pub fn new(email: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            reason: reason.into(),
        }
    }
}

/// Outcome of an unordered bulk insert.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulkInsertReport {
    /// Records committed, in submission order.
    pub inserted: Vec<Employee>,
    /// Records refused by a constraint; the rest of the batch still commits.
    pub rejected: Vec<RejectedRecord>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmployeeRepository: Send + Sync {
    /// Page through employees, newest first, optionally filtered.
    async fn list(&self, query: EmployeeListQuery)
    -> Result<EmployeeListing, EmployeeRepositoryError>;

    /// Every employee, newest first.
    async fn list_all(&self) -> Result<Vec<Employee>, EmployeeRepositoryError>;

    async fn find_by_id(&self, id: &EmployeeId)
    -> Result<Option<Employee>, EmployeeRepositoryError>;

    /// Store a new record.
    async fn insert(&self, employee: NewEmployee) -> Result<Employee, EmployeeRepositoryError>;

    /// Replace the mutable fields of an existing record.
    ///
    /// Returns `Ok(None)` when no record has this id.
    async fn update(
        &self,
        id: &EmployeeId,
        draft: EmployeeDraft,
    ) -> Result<Option<Employee>, EmployeeRepositoryError>;

    /// Remove a record. Returns whether anything was deleted.
    async fn delete(&self, id: &EmployeeId) -> Result<bool, EmployeeRepositoryError>;

    /// Return the subset of `emails` already stored, compared exactly.
    async fn find_existing_emails(
        &self,
        emails: &[String],
    ) -> Result<BTreeSet<String>, EmployeeRepositoryError>;

    /// Insert each record independently.
    ///
    /// Constraint violations reject only the offending record. Connection
    /// failures abort and surface as an error.
    async fn insert_many_unordered(
        &self,
        employees: &[NewEmployee],
    ) -> Result<BulkInsertReport, EmployeeRepositoryError>;
}
