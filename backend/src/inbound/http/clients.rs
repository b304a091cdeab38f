//! Client account API handlers.
//!
//! ```text
//! POST /api/v1/clients/signup {"name":"Ada","email":"ada@example.com","password":"s3cret"}
//! POST /api/v1/clients/login  {"email":"ada@example.com","password":"s3cret"}
//! GET  /api/v1/clients/{id}/dashboard
//! ```
//!
//! Login returns the dashboard location; no session is issued.

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};

use crate::domain::{ClientProfile, ClientSession, ClientSignup, Error, LoginCredentials};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{ClientProfileSchema, ClientSessionSchema, ErrorSchema};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    map_client_validation_error, map_login_validation_error, parse_client_id,
};

/// Signup request body.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl TryFrom<SignupRequest> for ClientSignup {
    type Error = Error;

    fn try_from(value: SignupRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.name, &value.email, &value.password)
            .map_err(map_client_validation_error)
    }
}

/// Client login request body.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClientLoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl TryFrom<ClientLoginRequest> for LoginCredentials {
    type Error = Error;

    fn try_from(value: ClientLoginRequest) -> Result<Self, Self::Error> {
        Self::client(&value.email, &value.password).map_err(map_login_validation_error)
    }
}

/// Register a client account.
#[utoipa::path(
    post,
    path = "/api/v1/clients/signup",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Account created", body = ClientProfileSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 409, description = "Email already registered", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["clients"],
    operation_id = "clientSignup",
    security([])
)]
#[post("/clients/signup")]
pub async fn signup(
    state: web::Data<HttpState>,
    payload: web::Json<SignupRequest>,
) -> ApiResult<HttpResponse> {
    let signup = ClientSignup::try_from(payload.into_inner())?;
    let profile = state.clients.signup(signup).await?;
    Ok(HttpResponse::Created().json(profile))
}

/// Check client credentials and return the dashboard location.
#[utoipa::path(
    post,
    path = "/api/v1/clients/login",
    request_body = ClientLoginRequest,
    responses(
        (status = 200, description = "Login success", body = ClientSessionSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Invalid email or password", body = ErrorSchema)
    ),
    tags = ["clients"],
    operation_id = "clientLogin",
    security([])
)]
#[post("/clients/login")]
pub async fn client_login(
    state: web::Data<HttpState>,
    payload: web::Json<ClientLoginRequest>,
) -> ApiResult<web::Json<ClientSession>> {
    let credentials = LoginCredentials::try_from(payload.into_inner())?;
    Ok(web::Json(state.clients.login(&credentials).await?))
}

/// Profile shown on a client's dashboard.
#[utoipa::path(
    get,
    path = "/api/v1/clients/{id}/dashboard",
    params(("id" = String, Path, description = "Client identifier")),
    responses(
        (status = 200, description = "Client profile", body = ClientProfileSchema),
        (status = 400, description = "Invalid identifier", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["clients"],
    operation_id = "clientDashboard"
)]
#[get("/clients/{id}/dashboard")]
pub async fn dashboard(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<ClientProfile>> {
    let id = parse_client_id(&path.into_inner())?;
    Ok(web::Json(state.clients.dashboard(&id).await?))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(signup).service(client_login).service(dashboard);
}
