//! Driving port for employee reads.
//!
//! Inbound adapters list, fetch and export employees through this port
//! without importing persistence concerns.

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::{Employee, EmployeeId, Error};

/// Domain use-case port for reading employees.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmployeeQuery: Send + Sync {
    /// Page through employees, newest first.
    ///
    /// `search` is a case-insensitive regular expression matched against
    /// name or email; blank means no filter.
    async fn list(&self, search: Option<String>, page: PageRequest)
    -> Result<Page<Employee>, Error>;

    /// Fetch one employee.
    async fn get(&self, id: &EmployeeId) -> Result<Employee, Error>;

    /// Render every employee as a CSV document.
    async fn export_csv(&self) -> Result<String, Error>;
}
