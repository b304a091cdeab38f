//! Shared Diesel error classification for the repositories.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Coarse failure categories the repositories translate into port errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum DieselFailure {
    /// The connection dropped or could not be used.
    Connection(String),
    /// A unique constraint rejected the write.
    UniqueViolation(String),
    /// A CHECK or NOT NULL constraint rejected the write.
    ConstraintViolation(String),
    /// Anything else.
    Query(String),
}

/// Message carried by a pool error.
pub(crate) fn pool_error_message(error: PoolError) -> String {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    }
}

/// Classify a Diesel error, logging the database detail at debug level.
pub(crate) fn classify_diesel_error(error: DieselError) -> DieselFailure {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(error = %error, "diesel operation failed"),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            DieselFailure::Connection("database connection error".to_owned())
        }
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            DieselFailure::UniqueViolation(
                info.constraint_name()
                    .unwrap_or("unique constraint")
                    .to_owned(),
            )
        }
        DieselError::DatabaseError(
            DatabaseErrorKind::CheckViolation | DatabaseErrorKind::NotNullViolation,
            info,
        ) => DieselFailure::ConstraintViolation(info.message().to_owned()),
        DieselError::NotFound => DieselFailure::Query("record not found".to_owned()),
        DieselError::QueryBuilderError(_) => {
            DieselFailure::Query("database query error".to_owned())
        }
        _ => DieselFailure::Query("database error".to_owned()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn pool_errors_keep_their_message() {
        assert_eq!(pool_error_message(PoolError::checkout("timed out")), "timed out");
        assert_eq!(pool_error_message(PoolError::build("bad url")), "bad url");
    }

    #[rstest]
    #[case(DieselError::NotFound, DieselFailure::Query("record not found".to_owned()))]
    #[case(
        DieselError::RollbackTransaction,
        DieselFailure::Query("database error".to_owned())
    )]
    fn non_database_errors_are_query_failures(
        #[case] error: DieselError,
        #[case] expected: DieselFailure,
    ) {
        assert_eq!(classify_diesel_error(error), expected);
    }
}
