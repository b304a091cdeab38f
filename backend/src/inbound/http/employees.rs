//! Employee API handlers.
//!
//! ```text
//! GET    /api/v1/employees?q=ada&page=1&perPage=10
//! GET    /api/v1/employees/download-csv
//! POST   /api/v1/employees/bulk            (body: CSV document)
//! POST   /api/v1/employees                 {"name":"Ada","email":"ada@example.com","age":36}
//! GET    /api/v1/employees/{id}
//! PUT    /api/v1/employees/{id}
//! PATCH  /api/v1/employees/{id}            {"department":"Research"}
//! DELETE /api/v1/employees/{id}
//! ```

use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{HttpResponse, delete, get, patch, post, put, web};
use pagination::Page;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use crate::domain::ports::{BulkUploadOutcome, BulkUploadReport, RejectedRecord};
use crate::domain::{Employee, EmployeeDraft, EmployeePatch, Error, RowError};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{
    EmployeePageSchema, EmployeeSchema, ErrorSchema, RejectedRecordSchema,
};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::upload::spool;
use crate::inbound::http::validation::{
    map_employee_validation_error, page_request, parse_employee_id,
};

/// Message attached to a bulk upload whose rows failed validation.
pub const CSV_VALIDATION_FAILED: &str = "CSV validation failed";

const EXPORT_FILENAME: &str = "employees.csv";

/// Query string accepted by `GET /api/v1/employees`.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query, rename_all = "camelCase")]
pub struct ListEmployeesQuery {
    /// Case-insensitive regular expression matched against name or email.
    pub q: Option<String>,
    /// One-based page number.
    pub page: Option<u64>,
    /// Page size, between 1 and 100.
    pub per_page: Option<u64>,
}

/// Request body for create and full replace.
///
/// Missing `name` or `email` fall through to domain validation so clients see
/// the same messages as for blank values.
#[derive(Debug, Clone, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    pub age: Option<i64>,
    pub department: Option<String>,
}

impl TryFrom<EmployeeRequest> for EmployeeDraft {
    type Error = Error;

    fn try_from(value: EmployeeRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(
            &value.name,
            &value.email,
            value.age,
            value.department.as_deref(),
        )
        .map_err(map_employee_validation_error)
    }
}

/// Request body for partial updates; absent fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmployeePatchRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub age: Option<i64>,
    pub department: Option<String>,
}

impl TryFrom<EmployeePatchRequest> for EmployeePatch {
    type Error = Error;

    fn try_from(value: EmployeePatchRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(
            value.name.as_deref(),
            value.email.as_deref(),
            value.age,
            value.department.as_deref(),
        )
        .map_err(map_employee_validation_error)
    }
}

/// Summary returned after a bulk upload reached the store.
#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BulkUploadResponse {
    pub message: String,
    /// Records that passed validation and deduplication.
    pub requested_count: usize,
    pub inserted_count: usize,
    #[schema(value_type = Vec<RejectedRecordSchema>)]
    pub rejected: Vec<RejectedRecord>,
    #[schema(value_type = Vec<EmployeeSchema>)]
    pub inserted_employees: Vec<Employee>,
}

impl From<BulkUploadReport> for BulkUploadResponse {
    fn from(report: BulkUploadReport) -> Self {
        let shortfall = report.shortfall();
        let message = if shortfall == 0 {
            "Employees uploaded successfully".to_owned()
        } else {
            format!(
                "Inserted {} of {} employees; {shortfall} not inserted",
                report.inserted.len(),
                report.requested
            )
        };
        Self {
            message,
            requested_count: report.requested,
            inserted_count: report.inserted.len(),
            rejected: report.rejected,
            inserted_employees: report.inserted,
        }
    }
}

fn csv_validation_error(errors: Vec<RowError>) -> Error {
    Error::invalid_request(CSV_VALIDATION_FAILED).with_details(json!({ "errors": errors }))
}

/// List employees, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/employees",
    params(ListEmployeesQuery),
    responses(
        (status = 200, description = "Page of employees", body = EmployeePageSchema),
        (status = 400, description = "Invalid search or page", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["employees"],
    operation_id = "listEmployees"
)]
#[get("/employees")]
pub async fn list_employees(
    state: web::Data<HttpState>,
    query: web::Query<ListEmployeesQuery>,
) -> ApiResult<web::Json<Page<Employee>>> {
    let ListEmployeesQuery { q, page, per_page } = query.into_inner();
    let request = page_request(page, per_page, state.page_size)?;
    let page = state.employees.list(q, request).await?;
    Ok(web::Json(page))
}

/// Download every employee as a CSV attachment.
#[utoipa::path(
    get,
    path = "/api/v1/employees/download-csv",
    responses(
        (status = 200, description = "CSV export", content_type = "text/csv", body = String),
        (status = 404, description = "No employees to export", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["employees"],
    operation_id = "downloadEmployeesCsv"
)]
#[get("/employees/download-csv")]
pub async fn download_employees_csv(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    let csv = state.employees.export_csv().await?;
    Ok(HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(EXPORT_FILENAME.to_owned())],
        })
        .body(csv))
}

/// Import employees from a CSV document sent as the request body.
///
/// The file must carry `name` and `email` columns and may carry `age`.
/// Any invalid row voids the whole batch; rows whose email already exists
/// are skipped.
#[utoipa::path(
    post,
    path = "/api/v1/employees/bulk",
    request_body(content = String, content_type = "text/csv", description = "CSV document"),
    responses(
        (status = 201, description = "Upload reached the store", body = BulkUploadResponse),
        (status = 400, description = "Empty, oversized or invalid file", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema),
        (status = 500, description = "File could not be read", body = ErrorSchema)
    ),
    tags = ["employees"],
    operation_id = "bulkUploadEmployees"
)]
#[post("/employees/bulk")]
pub async fn bulk_upload_employees(
    state: web::Data<HttpState>,
    payload: web::Payload,
) -> ApiResult<HttpResponse> {
    let upload = spool(payload, &state.upload).await?;
    info!(bytes = upload.len(), "bulk upload received");
    match state
        .employee_commands
        .bulk_upload(upload.path())
        .await?
    {
        BulkUploadOutcome::Invalid(errors) => Err(csv_validation_error(errors)),
        BulkUploadOutcome::Completed(report) => {
            Ok(HttpResponse::Created().json(BulkUploadResponse::from(report)))
        }
    }
}

/// Create a single employee.
#[utoipa::path(
    post,
    path = "/api/v1/employees",
    request_body = EmployeeRequest,
    responses(
        (status = 201, description = "Employee created", body = EmployeeSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 409, description = "Email already exists", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["employees"],
    operation_id = "createEmployee"
)]
#[post("/employees")]
pub async fn create_employee(
    state: web::Data<HttpState>,
    payload: web::Json<EmployeeRequest>,
) -> ApiResult<HttpResponse> {
    let draft = EmployeeDraft::try_from(payload.into_inner())?;
    let employee = state.employee_commands.create(draft).await?;
    Ok(HttpResponse::Created().json(employee))
}

/// Fetch one employee.
#[utoipa::path(
    get,
    path = "/api/v1/employees/{id}",
    params(("id" = String, Path, description = "Employee identifier")),
    responses(
        (status = 200, description = "Employee", body = EmployeeSchema),
        (status = 400, description = "Invalid identifier", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["employees"],
    operation_id = "getEmployee"
)]
#[get("/employees/{id}")]
pub async fn get_employee(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Employee>> {
    let id = parse_employee_id(&path.into_inner())?;
    Ok(web::Json(state.employees.get(&id).await?))
}

/// Replace every field of an employee.
#[utoipa::path(
    put,
    path = "/api/v1/employees/{id}",
    params(("id" = String, Path, description = "Employee identifier")),
    request_body = EmployeeRequest,
    responses(
        (status = 200, description = "Employee replaced", body = EmployeeSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 409, description = "Email already exists", body = ErrorSchema)
    ),
    tags = ["employees"],
    operation_id = "replaceEmployee"
)]
#[put("/employees/{id}")]
pub async fn replace_employee(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<EmployeeRequest>,
) -> ApiResult<web::Json<Employee>> {
    let id = parse_employee_id(&path.into_inner())?;
    let draft = EmployeeDraft::try_from(payload.into_inner())?;
    Ok(web::Json(state.employee_commands.replace(&id, draft).await?))
}

/// Update selected fields of an employee.
#[utoipa::path(
    patch,
    path = "/api/v1/employees/{id}",
    params(("id" = String, Path, description = "Employee identifier")),
    request_body = EmployeePatchRequest,
    responses(
        (status = 200, description = "Employee updated", body = EmployeeSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 409, description = "Email already exists", body = ErrorSchema)
    ),
    tags = ["employees"],
    operation_id = "patchEmployee"
)]
#[patch("/employees/{id}")]
pub async fn patch_employee(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<EmployeePatchRequest>,
) -> ApiResult<web::Json<Employee>> {
    let id = parse_employee_id(&path.into_inner())?;
    let patch = EmployeePatch::try_from(payload.into_inner())?;
    Ok(web::Json(state.employee_commands.patch(&id, patch).await?))
}

/// Delete an employee.
#[utoipa::path(
    delete,
    path = "/api/v1/employees/{id}",
    params(("id" = String, Path, description = "Employee identifier")),
    responses(
        (status = 200, description = "Employee deleted"),
        (status = 400, description = "Invalid identifier", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["employees"],
    operation_id = "deleteEmployee"
)]
#[delete("/employees/{id}")]
pub async fn delete_employee(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_employee_id(&path.into_inner())?;
    state.employee_commands.delete(&id).await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "employee deleted" })))
}

/// Register the employee routes in matching order.
///
/// `download-csv` and `bulk` must precede the `{id}` routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(list_employees)
        .service(download_employees_csv)
        .service(bulk_upload_employees)
        .service(create_employee)
        .service(get_employee)
        .service(replace_employee)
        .service(patch_employee)
        .service(delete_employee);
}

#[cfg(test)]
#[path = "employees_tests.rs"]
mod tests;
