//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::path::PathBuf;
use std::sync::Arc;

use pagination::DEFAULT_PER_PAGE;

use crate::domain::ports::{AdminLogin, ClientAccounts, EmployeeCommand, EmployeeQuery};

/// Default cap on an uploaded CSV body.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Where uploaded CSV bodies are spooled and how large they may grow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadConfig {
    pub upload_dir: PathBuf,
    pub max_upload_bytes: usize,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            upload_dir: std::env::temp_dir(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub employees: Arc<dyn EmployeeQuery>,
    pub employee_commands: Arc<dyn EmployeeCommand>,
    pub clients: Arc<dyn ClientAccounts>,
    pub admin: Arc<dyn AdminLogin>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub employees: Arc<dyn EmployeeQuery>,
    pub employee_commands: Arc<dyn EmployeeCommand>,
    pub clients: Arc<dyn ClientAccounts>,
    pub admin: Arc<dyn AdminLogin>,
    pub upload: UploadConfig,
    pub page_size: u64,
}

impl HttpState {
    /// Construct state with default upload limits and page size.
    ///
    /// # Examples
    /// ```no_run
    /// use std::sync::Arc;
    ///
    /// use mockable::DefaultClock;
    /// use roster::domain::ports::FixtureAdminLogin;
    /// use roster::domain::{ClientAccountService, EmployeeService};
    /// use roster::inbound::http::state::{HttpState, HttpStatePorts};
    /// use roster::outbound::memory::{InMemoryClientRepository, InMemoryEmployeeRepository};
    /// use roster::outbound::security::Argon2PasswordHasher;
    ///
    /// let clock = Arc::new(DefaultClock);
    /// let employees = Arc::new(EmployeeService::new(Arc::new(
    ///     InMemoryEmployeeRepository::new(clock.clone()),
    /// )));
    /// let clients = Arc::new(ClientAccountService::new(
    ///     Arc::new(InMemoryClientRepository::new()),
    ///     Arc::new(Argon2PasswordHasher::new()),
    ///     clock,
    /// ));
    /// let state = HttpState::new(HttpStatePorts {
    ///     employees: employees.clone(),
    ///     employee_commands: employees,
    ///     clients,
    ///     admin: Arc::new(FixtureAdminLogin),
    /// });
    /// assert_eq!(state.page_size, 10);
    /// ```
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            employees,
            employee_commands,
            clients,
            admin,
        } = ports;
        Self {
            employees,
            employee_commands,
            clients,
            admin,
            upload: UploadConfig::default(),
            page_size: DEFAULT_PER_PAGE,
        }
    }

    /// Replace the upload settings.
    #[must_use]
    pub fn with_upload(mut self, upload: UploadConfig) -> Self {
        self.upload = upload;
        self
    }

    /// Replace the default page size used when a request omits `perPage`.
    #[must_use]
    pub fn with_page_size(mut self, page_size: u64) -> Self {
        self.page_size = page_size;
        self
    }
}
