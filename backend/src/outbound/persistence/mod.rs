//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Repository implementations only translate between Diesel rows and domain
//! types. Row structs (`models.rs`) and table definitions (`schema.rs`) stay
//! private to this module. Connections come from a `bb8` pool through
//! `diesel-async`.
//!
//! # Example
//!
//! ```no_run
//! use roster::outbound::persistence::{DbPool, DieselEmployeeRepository, PoolConfig};
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/roster")).await?;
//! let repo = DieselEmployeeRepository::new(pool);
//! # let _ = repo;
//! # Ok(())
//! # }
//! ```

mod diesel_client_repository;
mod diesel_employee_repository;
mod diesel_error_mapping;
mod models;
mod pool;
mod schema;

pub use diesel_client_repository::DieselClientRepository;
pub use diesel_employee_repository::DieselEmployeeRepository;
pub use pool::{DbPool, MigrationError, PoolConfig, PoolError, run_migrations};
