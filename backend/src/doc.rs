//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every HTTP endpoint and the schema wrappers from
//! [`crate::inbound::http::schemas`], which describe domain types without
//! coupling them to utoipa. Swagger UI serves it in debug builds.

use utoipa::OpenApi;

use crate::inbound::http::admin::{AdminLoginRequest, AdminLoginResponse};
use crate::inbound::http::clients::{ClientLoginRequest, SignupRequest};
use crate::inbound::http::employees::{
    BulkUploadResponse, EmployeePatchRequest, EmployeeRequest,
};
use crate::inbound::http::schemas::{
    ClientProfileSchema, ClientSessionSchema, EmployeePageSchema, EmployeeSchema,
    ErrorCodeSchema, ErrorSchema, RejectedRecordSchema, RowErrorSchema,
};

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Roster API",
        description = "Employee records with CSV bulk import and export, client accounts and health probes."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::employees::list_employees,
        crate::inbound::http::employees::download_employees_csv,
        crate::inbound::http::employees::bulk_upload_employees,
        crate::inbound::http::employees::create_employee,
        crate::inbound::http::employees::get_employee,
        crate::inbound::http::employees::replace_employee,
        crate::inbound::http::employees::patch_employee,
        crate::inbound::http::employees::delete_employee,
        crate::inbound::http::clients::signup,
        crate::inbound::http::clients::client_login,
        crate::inbound::http::clients::dashboard,
        crate::inbound::http::admin::admin_login,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        EmployeeSchema,
        EmployeePageSchema,
        RowErrorSchema,
        RejectedRecordSchema,
        ClientProfileSchema,
        ClientSessionSchema,
        EmployeeRequest,
        EmployeePatchRequest,
        BulkUploadResponse,
        SignupRequest,
        ClientLoginRequest,
        AdminLoginRequest,
        AdminLoginResponse,
    )),
    tags(
        (name = "employees", description = "Employee records and CSV import/export"),
        (name = "clients", description = "Client signup, login and dashboard"),
        (name = "admin", description = "Admin login stub"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
