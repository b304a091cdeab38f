//! Employee use-case service.
//!
//! Implements both driving ports over one [`EmployeeRepository`]:
//! - reads, search and CSV export ([`EmployeeQuery`]);
//! - writes and CSV bulk upload ([`EmployeeCommand`]).

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use pagination::{Page, PageRequest};
use serde_json::json;
use tracing::info;

use crate::domain::csv_export::employees_to_csv;
use crate::domain::csv_ingest::{
    CandidateAge, CandidateRecord, CsvIngestError, CsvIngestPipeline, IngestOutcome,
};
use crate::domain::ports::{
    BulkInsertReport, BulkUploadOutcome, BulkUploadReport, EmployeeCommand, EmployeeListQuery,
    EmployeeQuery, EmployeeRepository, EmployeeRepositoryError, RejectedRecord,
};
use crate::domain::{
    Employee, EmployeeDraft, EmployeeId, EmployeePatch, EmployeeSearch, EmployeeValidationError,
    Error, NewEmployee,
};

/// Domain service implementing the employee driving ports.
pub struct EmployeeService<R> {
    repo: Arc<R>,
    pipeline: CsvIngestPipeline<R>,
}

impl<R> Clone for EmployeeService<R> {
    fn clone(&self) -> Self {
        Self {
            repo: Arc::clone(&self.repo),
            pipeline: self.pipeline.clone(),
        }
    }
}

impl<R> EmployeeService<R>
where
    R: EmployeeRepository,
{
    /// Create a service over the given repository.
    pub fn new(repo: Arc<R>) -> Self {
        Self {
            pipeline: CsvIngestPipeline::new(Arc::clone(&repo)),
            repo,
        }
    }

    async fn require(&self, id: &EmployeeId) -> Result<Employee, Error> {
        self.repo
            .find_by_id(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| employee_not_found(id))
    }

    async fn store_candidates(
        &self,
        candidates: Vec<CandidateRecord>,
    ) -> Result<BulkUploadReport, Error> {
        let requested = candidates.len();
        let (records, mut rejected) = to_new_employees(candidates);
        let report = if records.is_empty() {
            BulkInsertReport::default()
        } else {
            self.repo
                .insert_many_unordered(&records)
                .await
                .map_err(map_repository_error)?
        };
        rejected.extend(report.rejected);
        Ok(BulkUploadReport {
            requested,
            inserted: report.inserted,
            rejected,
        })
    }
}

#[async_trait]
impl<R> EmployeeQuery for EmployeeService<R>
where
    R: EmployeeRepository,
{
    async fn list(
        &self,
        search: Option<String>,
        page: PageRequest,
    ) -> Result<Page<Employee>, Error> {
        let search = EmployeeSearch::parse(search.as_deref()).map_err(map_validation_error)?;
        let listing = self
            .repo
            .list(EmployeeListQuery { search, page })
            .await
            .map_err(map_repository_error)?;
        Ok(Page::new(listing.items, page, listing.total))
    }

    async fn get(&self, id: &EmployeeId) -> Result<Employee, Error> {
        self.require(id).await
    }

    async fn export_csv(&self) -> Result<String, Error> {
        let employees = self.repo.list_all().await.map_err(map_repository_error)?;
        if employees.is_empty() {
            return Err(Error::not_found("no employees found"));
        }
        employees_to_csv(&employees)
            .map_err(|err| Error::internal(format!("failed to render employees CSV: {err}")))
    }
}

#[async_trait]
impl<R> EmployeeCommand for EmployeeService<R>
where
    R: EmployeeRepository,
{
    async fn create(&self, draft: EmployeeDraft) -> Result<Employee, Error> {
        self.repo
            .insert(NewEmployee::new(draft))
            .await
            .map_err(map_repository_error)
    }

    async fn replace(&self, id: &EmployeeId, draft: EmployeeDraft) -> Result<Employee, Error> {
        self.repo
            .update(id, draft)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| employee_not_found(id))
    }

    async fn patch(&self, id: &EmployeeId, patch: EmployeePatch) -> Result<Employee, Error> {
        let current = self.require(id).await?;
        let draft = patch.apply_to(&current);
        self.replace(id, draft).await
    }

    async fn delete(&self, id: &EmployeeId) -> Result<(), Error> {
        let deleted = self.repo.delete(id).await.map_err(map_repository_error)?;
        if deleted {
            Ok(())
        } else {
            Err(employee_not_found(id))
        }
    }

    async fn bulk_upload(&self, path: &Path) -> Result<BulkUploadOutcome, Error> {
        let candidates = match self.pipeline.ingest(path).await.map_err(map_ingest_error)? {
            IngestOutcome::Rejected(errors) => return Ok(BulkUploadOutcome::Invalid(errors)),
            IngestOutcome::Accepted(candidates) => candidates,
        };

        let report = self.store_candidates(candidates).await?;
        info!(
            requested = report.requested,
            inserted = report.inserted.len(),
            rejected = report.rejected.len(),
            "bulk upload stored"
        );
        Ok(BulkUploadOutcome::Completed(report))
    }
}

fn to_new_employees(candidates: Vec<CandidateRecord>) -> (Vec<NewEmployee>, Vec<RejectedRecord>) {
    let mut records = Vec::with_capacity(candidates.len());
    let mut rejected = Vec::new();
    for candidate in candidates {
        let age = match candidate.age {
            None => None,
            Some(CandidateAge::Years(years)) => Some(years),
            Some(CandidateAge::Unreadable(raw)) => {
                rejected.push(RejectedRecord::new(
                    candidate.email,
                    format!("age {raw:?} is not an integer"),
                ));
                continue;
            }
        };
        match EmployeeDraft::try_from_parts(&candidate.name, &candidate.email, age, None) {
            Ok(draft) => records.push(NewEmployee::new(draft)),
            Err(err) => rejected.push(RejectedRecord::new(candidate.email, err.to_string())),
        }
    }
    (records, rejected)
}

fn employee_not_found(id: &EmployeeId) -> Error {
    Error::not_found("employee not found").with_details(json!({ "id": id.to_string() }))
}

fn map_validation_error(error: EmployeeValidationError) -> Error {
    Error::invalid_request(error.to_string()).with_details(json!({ "field": error.field() }))
}

fn map_repository_error(error: EmployeeRepositoryError) -> Error {
    match error {
        EmployeeRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("employee store unavailable: {message}"))
        }
        EmployeeRepositoryError::Query { message } => {
            Error::internal(format!("employee store query failed: {message}"))
        }
        EmployeeRepositoryError::DuplicateEmail { email } => {
            Error::conflict("email already exists").with_details(json!({ "email": email }))
        }
    }
}

fn map_ingest_error(error: CsvIngestError) -> Error {
    match error {
        CsvIngestError::Read { message } => {
            Error::internal(format!("failed to read CSV upload: {message}"))
        }
        CsvIngestError::Lookup { source } => map_repository_error(source),
    }
}

#[cfg(test)]
#[path = "employee_service_tests.rs"]
mod tests;
