//! Domain primitives, services and ports.
//!
//! Purpose: define strongly typed employee and client records, the CSV
//! bulk-ingest pipeline and the use-case services that inbound adapters
//! drive. Nothing here depends on HTTP or on a particular database.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic error payload.
//! - Employee, EmployeeDraft, EmployeePatch and their value types.
//! - CsvIngestPipeline: parse, validate and dedupe uploaded CSV files.
//! - EmployeeService, ClientAccountService: driving port implementations.

pub mod auth;
pub mod client;
pub mod client_account_service;
pub mod csv_export;
pub mod csv_ingest;
pub mod employee;
pub mod employee_service;
pub mod error;
pub mod ports;
pub mod trace_id;

pub use self::auth::{LoginCredentials, LoginValidationError};
pub use self::client::{
    Client, ClientId, ClientProfile, ClientSession, ClientSignup, ClientValidationError,
    PasswordHash,
};
pub use self::client_account_service::{ClientAccountService, dashboard_path};
pub use self::csv_export::{CsvExportError, EXPORT_COLUMNS, employees_to_csv};
pub use self::csv_ingest::{
    ALL_DUPLICATES_MESSAGE, CandidateAge, CandidateRecord, CsvIngestError, CsvIngestPipeline,
    IngestOutcome, NO_ROWS_MESSAGE, RawCsvRow, RowError,
};
pub use self::employee::{
    AGE_MAX, AGE_MIN, Age, Department, EmailAddress, Employee, EmployeeDraft, EmployeeId,
    EmployeeName, EmployeePatch, EmployeeSearch, EmployeeValidationError, NewEmployee,
};
pub use self::employee_service::EmployeeService;
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::trace_id::TraceId;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use roster::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
