//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driving ports (`EmployeeQuery`, `EmployeeCommand`, `ClientAccounts`,
//! `AdminLogin`) are called by inbound adapters. Driven ports
//! (`EmployeeRepository`, `ClientRepository`, `PasswordHasher`) are
//! implemented by outbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod admin_login;
mod client_accounts;
mod client_repository;
mod employee_command;
mod employee_query;
mod employee_repository;
mod password_hasher;

pub use admin_login::{AdminLogin, FixtureAdminLogin};
#[cfg(test)]
pub use client_accounts::MockClientAccounts;
pub use client_accounts::ClientAccounts;
#[cfg(test)]
pub use client_repository::MockClientRepository;
pub use client_repository::{ClientRepository, ClientRepositoryError};
#[cfg(test)]
pub use employee_command::MockEmployeeCommand;
pub use employee_command::{BulkUploadOutcome, BulkUploadReport, EmployeeCommand};
#[cfg(test)]
pub use employee_query::MockEmployeeQuery;
pub use employee_query::EmployeeQuery;
#[cfg(test)]
pub use employee_repository::MockEmployeeRepository;
pub use employee_repository::{
    BulkInsertReport, EmployeeListQuery, EmployeeListing, EmployeeRepository,
    EmployeeRepositoryError, RejectedRecord,
};
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHasher, PasswordHasherError};
