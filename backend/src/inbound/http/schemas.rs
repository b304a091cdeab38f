//! OpenAPI schema definitions for domain types.
//!
//! Domain types remain framework-agnostic by not deriving `ToSchema`. This
//! module provides the schema definitions required for OpenAPI documentation
//! using utoipa's external schema registration.
//!
//! The schema wrappers mirror the structure of their corresponding domain
//! types but live in the inbound adapter layer where framework concerns belong.

#![expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
///
/// Stable machine-readable error codes returned in API error responses.
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or fails validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// Authentication failed or is missing.
    #[schema(rename = "unauthorized")]
    Unauthorized,
    /// Authenticated but not permitted to perform this action.
    #[schema(rename = "forbidden")]
    Forbidden,
    /// The requested resource does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// The request collides with existing state.
    #[schema(rename = "conflict")]
    Conflict,
    /// A backing service is unreachable.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
///
/// API error response payload with machine-readable code and human-readable
/// message.
#[derive(ToSchema)]
#[schema(as = crate::domain::Error)]
#[schema(rename_all = "camelCase")]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "invalid_request")]
    code: ErrorCodeSchema,
    /// Human-readable message returned to clients.
    #[schema(example = "valid email required")]
    message: String,
    /// Correlation identifier for tracing this error across systems.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// Supplementary error details for clients.
    details: Option<serde_json::Value>,
}

/// OpenAPI schema for [`crate::domain::Employee`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Employee)]
#[schema(rename_all = "camelCase")]
pub struct EmployeeSchema {
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    id: String,
    #[schema(example = "Ada Lovelace")]
    name: String,
    #[schema(example = "ada@example.com")]
    email: String,
    #[schema(minimum = 16, maximum = 100, example = 36)]
    age: Option<u8>,
    #[schema(example = "Engineering")]
    department: Option<String>,
    #[schema(value_type = String, format = DateTime)]
    created_at: String,
    #[schema(value_type = String, format = DateTime)]
    updated_at: String,
}

/// One page of employees.
#[derive(ToSchema)]
#[schema(as = EmployeePage)]
#[schema(rename_all = "camelCase")]
pub struct EmployeePageSchema {
    items: Vec<EmployeeSchema>,
    /// One-based page number.
    current: u64,
    /// Total number of pages.
    pages: u64,
    /// Total number of matching employees.
    total: u64,
    per_page: u64,
}

/// OpenAPI schema for [`crate::domain::RowError`].
#[derive(ToSchema)]
#[schema(as = crate::domain::RowError)]
pub struct RowErrorSchema {
    #[schema(example = "Invalid row (missing name/email): {\"name\":\"\",\"email\":\"x@y.z\"}")]
    message: String,
    /// One-based line of the offending record.
    line: Option<u64>,
    /// The offending row as read, keyed by header.
    row: Option<serde_json::Value>,
}

/// OpenAPI schema for [`crate::domain::ports::RejectedRecord`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ports::RejectedRecord)]
pub struct RejectedRecordSchema {
    #[schema(example = "ada@example.com")]
    email: String,
    #[schema(example = "email already exists")]
    reason: String,
}

/// OpenAPI schema for [`crate::domain::ClientProfile`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ClientProfile)]
#[schema(rename_all = "camelCase")]
pub struct ClientProfileSchema {
    id: String,
    name: String,
    email: String,
    #[schema(value_type = String, format = DateTime)]
    created_at: String,
}

/// OpenAPI schema for [`crate::domain::ClientSession`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ClientSession)]
#[schema(rename_all = "camelCase")]
pub struct ClientSessionSchema {
    client_id: String,
    #[schema(example = "/api/v1/clients/3fa85f64-5717-4562-b3fc-2c963f66afa6/dashboard")]
    dashboard: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use utoipa::PartialSchema;

    fn schema_to_json<T: PartialSchema>() -> String {
        serde_json::to_string(&T::schema()).expect("schema serialises to JSON")
    }

    #[test]
    fn error_code_schema_variants_match_domain() {
        let schema_json = schema_to_json::<ErrorCodeSchema>();
        for code in [
            "invalid_request",
            "unauthorized",
            "forbidden",
            "not_found",
            "conflict",
            "service_unavailable",
            "internal_error",
        ] {
            assert!(schema_json.contains(code), "missing {code}");
        }
    }

    #[test]
    fn error_schema_has_expected_name() {
        let schema_json = schema_to_json::<ErrorSchema>();
        // utoipa replaces :: with . in schema names
        assert_eq!(ErrorSchema::name(), "crate.domain.Error");
        assert!(schema_json.contains("traceId"));
    }

    #[test]
    fn employee_schema_uses_camel_case() {
        let schema_json = schema_to_json::<EmployeeSchema>();
        assert_eq!(EmployeeSchema::name(), "crate.domain.Employee");
        assert!(schema_json.contains("createdAt"));
        assert!(schema_json.contains("department"));
    }
}
