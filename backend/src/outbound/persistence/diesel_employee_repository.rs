//! PostgreSQL-backed employee repository.
//!
//! Search uses PostgreSQL's case-insensitive regex operator (`~*`) on name
//! and email. Bulk inserts run one statement per record with
//! `ON CONFLICT DO NOTHING`, so a duplicate or out-of-range record is
//! reported without aborting the rest of the batch.

use std::collections::BTreeSet;

use async_trait::async_trait;
use diesel::expression::AsExpression;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel::sql_types::Text;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{
    BulkInsertReport, EmployeeListQuery, EmployeeListing, EmployeeRepository,
    EmployeeRepositoryError, RejectedRecord,
};
use crate::domain::{Employee, EmployeeDraft, EmployeeId, EmployeeSearch, NewEmployee};

use super::diesel_error_mapping::{DieselFailure, classify_diesel_error, pool_error_message};
use super::models::{EmployeeRow, EmployeeUpdate, NewEmployeeRow};
use super::pool::{DbPool, PoolError};
use super::schema::employees;

diesel::infix_operator!(RegexIMatch, " ~* ", backend: Pg);

type BoundText = <String as AsExpression<Text>>::Expression;

fn regex_imatch<C>(column: C, pattern: String) -> RegexIMatch<C, BoundText>
where
    C: Expression<SqlType = Text>,
{
    RegexIMatch::new(column, AsExpression::<Text>::as_expression(pattern))
}

const DUPLICATE_EMAIL_REASON: &str = "email already exists";

/// Diesel-backed implementation of [`EmployeeRepository`].
#[derive(Clone)]
pub struct DieselEmployeeRepository {
    pool: DbPool,
}

impl DieselEmployeeRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> EmployeeRepositoryError {
    EmployeeRepositoryError::connection(pool_error_message(error))
}

fn map_diesel_error(error: diesel::result::Error) -> EmployeeRepositoryError {
    match classify_diesel_error(error) {
        DieselFailure::Connection(message) => EmployeeRepositoryError::connection(message),
        DieselFailure::UniqueViolation(message)
        | DieselFailure::ConstraintViolation(message)
        | DieselFailure::Query(message) => EmployeeRepositoryError::query(message),
    }
}

/// Like [`map_diesel_error`] but reports unique violations as duplicate emails.
fn map_write_error(error: diesel::result::Error, email: &str) -> EmployeeRepositoryError {
    match classify_diesel_error(error) {
        DieselFailure::UniqueViolation(_) => EmployeeRepositoryError::duplicate_email(email),
        DieselFailure::Connection(message) => EmployeeRepositoryError::connection(message),
        DieselFailure::ConstraintViolation(message) | DieselFailure::Query(message) => {
            EmployeeRepositoryError::query(message)
        }
    }
}

fn to_i64(value: u64, what: &str) -> Result<i64, EmployeeRepositoryError> {
    i64::try_from(value)
        .map_err(|_| EmployeeRepositoryError::query(format!("{what} out of range")))
}

fn new_row(employee: &NewEmployee) -> NewEmployeeRow<'_> {
    let draft = &employee.draft;
    NewEmployeeRow {
        id: *employee.id.as_uuid(),
        name: draft.name.as_ref(),
        email: draft.email.as_ref(),
        age: draft.age.map(|age| i32::from(age.value())),
        department: draft.department.as_ref().map(AsRef::as_ref),
    }
}

fn row_to_employee(row: EmployeeRow) -> Result<Employee, EmployeeRepositoryError> {
    let draft = EmployeeDraft::try_from_parts(
        &row.name,
        &row.email,
        row.age.map(i64::from),
        row.department.as_deref(),
    )
    .map_err(|err| {
        EmployeeRepositoryError::query(format!("stored employee {} is invalid: {err}", row.id))
    })?;
    Ok(Employee::new(
        EmployeeId::from_uuid(row.id),
        draft,
        row.created_at,
        row.updated_at,
    ))
}

fn filtered(search: Option<&EmployeeSearch>) -> employees::BoxedQuery<'static, Pg> {
    let mut query = employees::table.into_boxed();
    if let Some(search) = search {
        let pattern = search.pattern().to_owned();
        query = query.filter(
            regex_imatch(employees::name, pattern.clone())
                .or(regex_imatch(employees::email, pattern)),
        );
    }
    query
}

#[async_trait]
impl EmployeeRepository for DieselEmployeeRepository {
    async fn list(
        &self,
        query: EmployeeListQuery,
    ) -> Result<EmployeeListing, EmployeeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let total: i64 = filtered(query.search.as_ref())
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let rows: Vec<EmployeeRow> = filtered(query.search.as_ref())
            .order((employees::created_at.desc(), employees::id))
            .offset(to_i64(query.page.offset(), "page offset")?)
            .limit(to_i64(query.page.limit(), "page size")?)
            .select(EmployeeRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(EmployeeListing {
            items: rows
                .into_iter()
                .map(row_to_employee)
                .collect::<Result<_, _>>()?,
            total: u64::try_from(total).unwrap_or_default(),
        })
    }

    async fn list_all(&self) -> Result<Vec<Employee>, EmployeeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<EmployeeRow> = employees::table
            .order((employees::created_at.desc(), employees::id))
            .select(EmployeeRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(row_to_employee).collect()
    }

    async fn find_by_id(
        &self,
        id: &EmployeeId,
    ) -> Result<Option<Employee>, EmployeeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        employees::table
            .find(*id.as_uuid())
            .select(EmployeeRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .map(row_to_employee)
            .transpose()
    }

    async fn insert(&self, employee: NewEmployee) -> Result<Employee, EmployeeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: EmployeeRow = diesel::insert_into(employees::table)
            .values(&new_row(&employee))
            .returning(EmployeeRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|err| map_write_error(err, employee.draft.email.as_ref()))?;
        row_to_employee(row)
    }

    async fn update(
        &self,
        id: &EmployeeId,
        draft: EmployeeDraft,
    ) -> Result<Option<Employee>, EmployeeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changes = EmployeeUpdate {
            name: draft.name.as_ref(),
            email: draft.email.as_ref(),
            age: draft.age.map(|age| i32::from(age.value())),
            department: draft.department.as_ref().map(AsRef::as_ref),
        };
        diesel::update(employees::table.find(*id.as_uuid()))
            .set((&changes, employees::updated_at.eq(diesel::dsl::now)))
            .returning(EmployeeRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(|err| map_write_error(err, draft.email.as_ref()))?
            .map(row_to_employee)
            .transpose()
    }

    async fn delete(&self, id: &EmployeeId) -> Result<bool, EmployeeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(employees::table.find(*id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }

    async fn find_existing_emails(
        &self,
        emails: &[String],
    ) -> Result<BTreeSet<String>, EmployeeRepositoryError> {
        if emails.is_empty() {
            return Ok(BTreeSet::new());
        }
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let existing: Vec<String> = employees::table
            .filter(employees::email.eq_any(emails))
            .select(employees::email)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(existing.into_iter().collect())
    }

    async fn insert_many_unordered(
        &self,
        records: &[NewEmployee],
    ) -> Result<BulkInsertReport, EmployeeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let mut report = BulkInsertReport::default();
        for record in records {
            let email = record.draft.email.as_ref();
            let inserted: Result<Option<EmployeeRow>, _> = diesel::insert_into(employees::table)
                .values(&new_row(record))
                .on_conflict_do_nothing()
                .returning(EmployeeRow::as_returning())
                .get_result(&mut conn)
                .await
                .optional();
            match inserted {
                Ok(Some(row)) => report.inserted.push(row_to_employee(row)?),
                Ok(None) => report
                    .rejected
                    .push(RejectedRecord::new(email, DUPLICATE_EMAIL_REASON)),
                Err(err) => match classify_diesel_error(err) {
                    DieselFailure::UniqueViolation(_) => report
                        .rejected
                        .push(RejectedRecord::new(email, DUPLICATE_EMAIL_REASON)),
                    DieselFailure::ConstraintViolation(message) => {
                        report.rejected.push(RejectedRecord::new(email, message));
                    }
                    DieselFailure::Connection(message) => {
                        return Err(EmployeeRepositoryError::connection(message));
                    }
                    DieselFailure::Query(message) => {
                        return Err(EmployeeRepositoryError::query(message));
                    }
                },
            }
        }
        Ok(report)
    }
}
