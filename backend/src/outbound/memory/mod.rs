//! In-memory adapters for the driven ports.
//!
//! Used when no database URL is configured, and as realistic stores in
//! behavioural tests.

mod client_repository;
mod employee_repository;

pub use client_repository::InMemoryClientRepository;
pub use employee_repository::InMemoryEmployeeRepository;
