//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};
use mockable::DefaultClock;

use crate::Trace;
use crate::domain::ports::FixtureAdminLogin;
use crate::domain::{ClientAccountService, EmployeeService};
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::inbound::http::{api_scope, error::unknown_route};
use crate::outbound::memory::{InMemoryClientRepository, InMemoryEmployeeRepository};
use crate::outbound::security::Argon2PasswordHasher;

/// Handler state backed by fresh in-memory stores.
pub fn in_memory_state() -> HttpState {
    let clock = Arc::new(DefaultClock);
    let employees = Arc::new(EmployeeService::new(Arc::new(
        InMemoryEmployeeRepository::new(clock.clone()),
    )));
    let clients = Arc::new(ClientAccountService::new(
        Arc::new(InMemoryClientRepository::new()),
        Arc::new(Argon2PasswordHasher::new()),
        clock,
    ));
    HttpState::new(HttpStatePorts {
        employees: employees.clone(),
        employee_commands: employees,
        clients,
        admin: Arc::new(FixtureAdminLogin),
    })
}

/// The full API wired the way the server wires it.
pub fn test_app(
    state: HttpState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .wrap(Trace)
        .service(api_scope())
        .default_service(web::to(unknown_route))
}
