//! In-memory employee repository.
//!
//! Enforces the same unique-email rule as the PostgreSQL schema. The age
//! bound holds by construction of [`NewEmployee`].

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use mockable::Clock;

use crate::domain::ports::{
    BulkInsertReport, EmployeeListQuery, EmployeeListing, EmployeeRepository,
    EmployeeRepositoryError, RejectedRecord,
};
use crate::domain::{Employee, EmployeeDraft, EmployeeId, NewEmployee};

/// Mutex-guarded employee store, oldest record first.
pub struct InMemoryEmployeeRepository {
    records: Mutex<Vec<Employee>>,
    clock: Arc<dyn Clock>,
}

impl InMemoryEmployeeRepository {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            records: Mutex::new(Vec::new()),
            clock,
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<Employee>>, EmployeeRepositoryError> {
        self.records
            .lock()
            .map_err(|_| EmployeeRepositoryError::query("employee store lock poisoned"))
    }

    fn stamp(&self, employee: NewEmployee) -> Employee {
        let now = self.clock.utc();
        Employee::new(employee.id, employee.draft, now, now)
    }
}

fn email_taken(records: &[Employee], email: &str, except: Option<&EmployeeId>) -> bool {
    records
        .iter()
        .any(|record| record.email().as_ref() == email && Some(record.id()) != except)
}

/// Newest first; later inserts win ties on `created_at`.
fn newest_first(records: &[Employee]) -> Vec<&Employee> {
    let mut ordered: Vec<&Employee> = records.iter().rev().collect();
    ordered.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
    ordered
}

#[async_trait]
impl EmployeeRepository for InMemoryEmployeeRepository {
    async fn list(
        &self,
        query: EmployeeListQuery,
    ) -> Result<EmployeeListing, EmployeeRepositoryError> {
        let records = self.lock()?;
        let matching: Vec<&Employee> = newest_first(&records)
            .into_iter()
            .filter(|employee| {
                query
                    .search
                    .as_ref()
                    .is_none_or(|search| search.matches(employee))
            })
            .collect();
        let offset = usize::try_from(query.page.offset()).unwrap_or(usize::MAX);
        let limit = usize::try_from(query.page.limit()).unwrap_or(usize::MAX);
        Ok(EmployeeListing {
            total: u64::try_from(matching.len()).unwrap_or(u64::MAX),
            items: matching
                .into_iter()
                .skip(offset)
                .take(limit)
                .cloned()
                .collect(),
        })
    }

    async fn list_all(&self) -> Result<Vec<Employee>, EmployeeRepositoryError> {
        let records = self.lock()?;
        Ok(newest_first(&records).into_iter().cloned().collect())
    }

    async fn find_by_id(
        &self,
        id: &EmployeeId,
    ) -> Result<Option<Employee>, EmployeeRepositoryError> {
        let records = self.lock()?;
        Ok(records.iter().find(|record| record.id() == id).cloned())
    }

    async fn insert(&self, employee: NewEmployee) -> Result<Employee, EmployeeRepositoryError> {
        let mut records = self.lock()?;
        let email = employee.draft.email.as_ref();
        if email_taken(&records, email, None) {
            return Err(EmployeeRepositoryError::duplicate_email(email));
        }
        let stored = self.stamp(employee);
        records.push(stored.clone());
        Ok(stored)
    }

    async fn update(
        &self,
        id: &EmployeeId,
        draft: EmployeeDraft,
    ) -> Result<Option<Employee>, EmployeeRepositoryError> {
        let mut records = self.lock()?;
        if email_taken(&records, draft.email.as_ref(), Some(id)) {
            return Err(EmployeeRepositoryError::duplicate_email(draft.email.as_ref()));
        }
        let now = self.clock.utc();
        Ok(records
            .iter_mut()
            .find(|record| record.id() == id)
            .map(|record| {
                record.apply(draft, now);
                record.clone()
            }))
    }

    async fn delete(&self, id: &EmployeeId) -> Result<bool, EmployeeRepositoryError> {
        let mut records = self.lock()?;
        let before = records.len();
        records.retain(|record| record.id() != id);
        Ok(records.len() < before)
    }

    async fn find_existing_emails(
        &self,
        emails: &[String],
    ) -> Result<BTreeSet<String>, EmployeeRepositoryError> {
        let records = self.lock()?;
        let wanted: BTreeSet<&str> = emails.iter().map(String::as_str).collect();
        Ok(records
            .iter()
            .map(|record| record.email().as_ref())
            .filter(|email| wanted.contains(email))
            .map(str::to_owned)
            .collect())
    }

    async fn insert_many_unordered(
        &self,
        employees: &[NewEmployee],
    ) -> Result<BulkInsertReport, EmployeeRepositoryError> {
        let mut records = self.lock()?;
        let mut report = BulkInsertReport::default();
        for employee in employees {
            let email = employee.draft.email.as_ref();
            if email_taken(&records, email, None) {
                report
                    .rejected
                    .push(RejectedRecord::new(email, "email already exists"));
                continue;
            }
            let stored = self.stamp(employee.clone());
            records.push(stored.clone());
            report.inserted.push(stored);
        }
        Ok(report)
    }
}
