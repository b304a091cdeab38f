//! HTTP inbound adapter exposing REST endpoints.

pub mod admin;
pub mod clients;
pub mod employees;
pub mod error;
pub mod health;
pub mod schemas;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod upload;
pub mod validation;

pub use error::ApiResult;

use actix_web::{Scope, web};

/// Every `/api/v1` route.
pub fn api_scope() -> Scope {
    web::scope("/api/v1")
        .configure(employees::configure)
        .configure(clients::configure)
        .service(admin::admin_login)
}
