//! Admin login stub.
//!
//! ```text
//! POST /api/v1/admin/login {"username":"admin","password":"password"}
//! ```

use actix_web::{post, web};
use serde::{Deserialize, Serialize};

use crate::domain::{Error, LoginCredentials};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::map_login_validation_error;

/// Admin login request body.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminLoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

impl TryFrom<AdminLoginRequest> for LoginCredentials {
    type Error = Error;

    fn try_from(value: AdminLoginRequest) -> Result<Self, Self::Error> {
        Self::admin(&value.username, &value.password).map_err(map_login_validation_error)
    }
}

/// Successful admin login.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminLoginResponse {
    pub username: String,
}

/// Check the admin credentials. No session is established.
#[utoipa::path(
    post,
    path = "/api/v1/admin/login",
    request_body = AdminLoginRequest,
    responses(
        (status = 200, description = "Credentials accepted", body = AdminLoginResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Invalid credentials", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "adminLogin",
    security([])
)]
#[post("/admin/login")]
pub async fn admin_login(
    state: web::Data<HttpState>,
    payload: web::Json<AdminLoginRequest>,
) -> ApiResult<web::Json<AdminLoginResponse>> {
    let credentials = LoginCredentials::try_from(payload.into_inner())?;
    let username = state.admin.authenticate(&credentials).await?;
    Ok(web::Json(AdminLoginResponse { username }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inbound::http::test_utils::{in_memory_state, test_app};
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use rstest::rstest;
    use serde_json::{Value, json};

    #[rstest]
    #[case("admin", "password", StatusCode::OK)]
    #[case("admin", "nope", StatusCode::UNAUTHORIZED)]
    #[case("   ", "password", StatusCode::BAD_REQUEST)]
    #[case("admin", "", StatusCode::BAD_REQUEST)]
    #[actix_web::test]
    async fn admin_login_checks_the_fixed_pair(
        #[case] username: &str,
        #[case] password: &str,
        #[case] status: StatusCode,
    ) {
        let app = actix_test::init_service(test_app(in_memory_state())).await;

        let request = actix_test::TestRequest::post()
            .uri("/api/v1/admin/login")
            .set_json(json!({"username": username, "password": password}))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), status);
        let body: Value = actix_test::read_body_json(response).await;
        if status == StatusCode::OK {
            assert_eq!(body["username"], "admin");
        } else {
            assert!(body.get("code").is_some());
        }
    }
}
