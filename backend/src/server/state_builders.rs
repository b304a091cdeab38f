//! Builders for HTTP state ports.
//!
//! PostgreSQL adapters are used when a pool is configured; otherwise every
//! port falls back to the in-memory stores.

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};

use roster::domain::ports::{
    AdminLogin, ClientAccounts, ClientRepository, EmployeeCommand, EmployeeQuery,
    EmployeeRepository, FixtureAdminLogin,
};
use roster::domain::{ClientAccountService, EmployeeService};
use roster::inbound::http::state::{HttpState, HttpStatePorts};
use roster::outbound::memory::{InMemoryClientRepository, InMemoryEmployeeRepository};
use roster::outbound::persistence::{DieselClientRepository, DieselEmployeeRepository};
use roster::outbound::security::Argon2PasswordHasher;

use super::ServerConfig;

/// Pick the pool-backed value when a pool is present, else the fallback.
fn select_backend<Pool, T>(
    pool: &Option<Pool>,
    with_pool: impl FnOnce(&Pool) -> T,
    fallback: impl FnOnce() -> T,
) -> T {
    match pool {
        Some(pool) => with_pool(pool),
        None => fallback(),
    }
}

fn employee_ports<R>(repo: Arc<R>) -> (Arc<dyn EmployeeQuery>, Arc<dyn EmployeeCommand>)
where
    R: EmployeeRepository + 'static,
{
    let service = Arc::new(EmployeeService::new(repo));
    (service.clone(), service)
}

fn client_accounts<R>(repo: Arc<R>, clock: Arc<dyn Clock>) -> Arc<dyn ClientAccounts>
where
    R: ClientRepository + 'static,
{
    Arc::new(ClientAccountService::new(
        repo,
        Arc::new(Argon2PasswordHasher::new()),
        clock,
    ))
}

fn build_ports(config: &ServerConfig, clock: Arc<dyn Clock>) -> HttpStatePorts {
    let (employees, employee_commands) = select_backend(
        &config.db_pool,
        |pool| employee_ports(Arc::new(DieselEmployeeRepository::new(pool.clone()))),
        || employee_ports(Arc::new(InMemoryEmployeeRepository::new(clock.clone()))),
    );
    let clients = select_backend(
        &config.db_pool,
        |pool| {
            client_accounts(
                Arc::new(DieselClientRepository::new(pool.clone())),
                clock.clone(),
            )
        },
        || client_accounts(Arc::new(InMemoryClientRepository::new()), clock.clone()),
    );
    let admin: Arc<dyn AdminLogin> = Arc::new(FixtureAdminLogin);

    HttpStatePorts {
        employees,
        employee_commands,
        clients,
        admin,
    }
}

/// Build the shared HTTP state for the configured backend.
pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let ports = build_ports(config, Arc::new(DefaultClock));
    web::Data::new(
        HttpState::new(ports)
            .with_upload(config.upload.clone())
            .with_page_size(config.page_size),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::config::ServerSettings;
    use pagination::PageRequest;
    use roster::domain::EmployeeDraft;
    use rstest::rstest;

    fn in_memory_config() -> ServerConfig {
        ServerConfig::from_settings(&ServerSettings {
            bind_addr: None,
            database_url: None,
            upload_dir: None,
            max_upload_bytes: Some(512),
            page_size: Some(5),
        })
        .expect("valid settings")
    }

    #[rstest]
    #[case(Some(()), "pool")]
    #[case(None, "fallback")]
    fn backend_follows_pool_presence(#[case] pool: Option<()>, #[case] expected: &str) {
        let picked = select_backend(&pool, |_| "pool", || "fallback");
        assert_eq!(picked, expected);
    }

    #[rstest]
    fn state_carries_upload_and_page_settings() {
        let state = build_http_state(&in_memory_config());
        assert_eq!(state.page_size, 5);
        assert_eq!(state.upload.max_upload_bytes, 512);
    }

    #[rstest]
    #[tokio::test]
    async fn query_and_command_ports_share_one_store() {
        let state = build_http_state(&in_memory_config());
        let draft = EmployeeDraft::try_from_parts("Ada", "ada@example.com", Some(36), None)
            .expect("valid draft");
        let created = state
            .employee_commands
            .create(draft)
            .await
            .expect("create succeeds");

        let page = state
            .employees
            .list(None, PageRequest::default())
            .await
            .expect("list succeeds");
        assert_eq!(page.total, 1);
        assert_eq!(page.items.first().map(|e| e.id()), Some(created.id()));
    }
}
