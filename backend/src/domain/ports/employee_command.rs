//! Driving port for employee writes, including CSV bulk upload.

use std::path::Path;

use async_trait::async_trait;

use crate::domain::{Employee, EmployeeDraft, EmployeeId, EmployeePatch, Error, RowError};

use super::RejectedRecord;

/// Result of a bulk upload that got as far as the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkUploadReport {
    /// Number of records handed to the store.
    pub requested: usize,
    /// Records committed.
    pub inserted: Vec<Employee>,
    /// Records refused at the storage boundary.
    pub rejected: Vec<RejectedRecord>,
}

impl BulkUploadReport {
    /// Records requested but not committed.
    pub fn shortfall(&self) -> usize {
        self.requested.saturating_sub(self.inserted.len())
    }
}

/// Data-level outcome of a bulk upload.
///
/// Read faults are not represented here; they surface as an internal
/// [`Error`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BulkUploadOutcome {
    /// The file was refused; the caller must fix it and retry.
    Invalid(Vec<RowError>),
    /// Candidates were handed to the store.
    Completed(BulkUploadReport),
}

/// Domain use-case port for changing employees.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmployeeCommand: Send + Sync {
    async fn create(&self, draft: EmployeeDraft) -> Result<Employee, Error>;

    /// Replace every mutable field.
    async fn replace(&self, id: &EmployeeId, draft: EmployeeDraft) -> Result<Employee, Error>;

    /// Update only the fields present in `patch`.
    async fn patch(&self, id: &EmployeeId, patch: EmployeePatch) -> Result<Employee, Error>;

    async fn delete(&self, id: &EmployeeId) -> Result<(), Error>;

    /// Ingest the CSV document at `path` and insert the surviving rows.
    ///
    /// The caller owns the file and removes it afterwards.
    async fn bulk_upload(&self, path: &Path) -> Result<BulkUploadOutcome, Error>;
}
