//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{clients, employees};

/// Row struct for reading from the employees table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = employees)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct EmployeeRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub age: Option<i32>,
    pub department: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for creating employee records.
///
/// Timestamps come from column defaults.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = employees)]
pub(crate) struct NewEmployeeRow<'a> {
    pub id: Uuid,
    pub name: &'a str,
    pub email: &'a str,
    pub age: Option<i32>,
    pub department: Option<&'a str>,
}

/// Changeset replacing every mutable employee column.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = employees)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct EmployeeUpdate<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub age: Option<i32>,
    pub department: Option<&'a str>,
}

/// Row struct for reading from the clients table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = clients)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ClientRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for creating client accounts.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = clients)]
pub(crate) struct NewClientRow<'a> {
    pub id: Uuid,
    pub name: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
