//! Shared validation helpers for inbound HTTP adapters.
//!
//! Domain validation failures become `invalid_request` errors whose details
//! name the offending field and a stable machine-readable code.

use pagination::{PageRequest, PageRequestError};
use serde_json::json;

use crate::domain::{
    ClientId, ClientValidationError, EmployeeId, EmployeeValidationError, Error,
    LoginValidationError,
};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidUuid,
    InvalidEmail,
    OutOfRange,
    InvalidPattern,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::InvalidUuid => "invalid_uuid",
            ErrorCode::InvalidEmail => "invalid_email",
            ErrorCode::OutOfRange => "out_of_range",
            ErrorCode::InvalidPattern => "invalid_pattern",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &'static str {
        self.0
    }
}

fn field_error(field: FieldName, message: impl Into<String>, code: ErrorCode) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "code": code.as_str(),
    }))
}

fn field_value_error(
    field: FieldName,
    message: impl Into<String>,
    code: ErrorCode,
    value: &str,
) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "value": value,
        "code": code.as_str(),
    }))
}

pub(crate) fn invalid_uuid_error(field: FieldName, value: &str) -> Error {
    let name = field.as_str();
    field_value_error(
        field,
        format!("{name} must be a valid UUID"),
        ErrorCode::InvalidUuid,
        value,
    )
}

pub(crate) fn parse_employee_id(value: &str) -> Result<EmployeeId, Error> {
    EmployeeId::new(value).map_err(|_| invalid_uuid_error(FieldName::new("id"), value))
}

pub(crate) fn parse_client_id(value: &str) -> Result<ClientId, Error> {
    ClientId::new(value).map_err(|_| invalid_uuid_error(FieldName::new("id"), value))
}

pub(crate) fn map_employee_validation_error(err: EmployeeValidationError) -> Error {
    let field = FieldName::new(err.field());
    let code = match err {
        EmployeeValidationError::InvalidId => ErrorCode::InvalidUuid,
        EmployeeValidationError::EmptyName | EmployeeValidationError::EmptyEmail => {
            ErrorCode::MissingField
        }
        EmployeeValidationError::InvalidEmail => ErrorCode::InvalidEmail,
        EmployeeValidationError::AgeOutOfRange { .. } => ErrorCode::OutOfRange,
        EmployeeValidationError::InvalidSearch => ErrorCode::InvalidPattern,
    };
    field_error(field, err.to_string(), code)
}

pub(crate) fn map_client_validation_error(err: ClientValidationError) -> Error {
    let field = FieldName::new(err.field());
    let code = match err {
        ClientValidationError::InvalidId => ErrorCode::InvalidUuid,
        ClientValidationError::EmptyName
        | ClientValidationError::EmptyEmail
        | ClientValidationError::EmptyPassword => ErrorCode::MissingField,
        ClientValidationError::InvalidEmail => ErrorCode::InvalidEmail,
    };
    field_error(field, err.to_string(), code)
}

pub(crate) fn map_login_validation_error(err: LoginValidationError) -> Error {
    field_error(
        FieldName::new(err.field()),
        err.to_string(),
        ErrorCode::MissingField,
    )
}

/// Build a page request from optional query parameters.
pub(crate) fn page_request(
    page: Option<u64>,
    per_page: Option<u64>,
    default_per_page: u64,
) -> Result<PageRequest, Error> {
    PageRequest::new(
        page.unwrap_or(pagination::FIRST_PAGE),
        per_page.unwrap_or(default_per_page),
    )
    .map_err(|err| {
        let field = match err {
            PageRequestError::PageOutOfRange => FieldName::new("page"),
            PageRequestError::PerPageOutOfRange => FieldName::new("perPage"),
        };
        field_error(field, err.to_string(), ErrorCode::OutOfRange)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode as DomainErrorCode;
    use rstest::rstest;
    use serde_json::Value;

    fn detail<'a>(err: &'a Error, key: &str) -> Option<&'a str> {
        err.details()
            .and_then(|details| details.get(key))
            .and_then(Value::as_str)
    }

    #[rstest]
    fn invalid_employee_id_reports_value() {
        let err = parse_employee_id("not-a-uuid").expect_err("invalid id");
        assert_eq!(err.code(), DomainErrorCode::InvalidRequest);
        assert_eq!(err.message(), "id must be a valid UUID");
        assert_eq!(detail(&err, "value"), Some("not-a-uuid"));
        assert_eq!(detail(&err, "code"), Some("invalid_uuid"));
    }

    #[rstest]
    #[case(EmployeeValidationError::EmptyName, "name", "missing_field")]
    #[case(EmployeeValidationError::InvalidEmail, "email", "invalid_email")]
    #[case(
        EmployeeValidationError::AgeOutOfRange { min: 16, max: 100, value: 7 },
        "age",
        "out_of_range"
    )]
    #[case(EmployeeValidationError::InvalidSearch, "q", "invalid_pattern")]
    fn employee_validation_errors_name_field_and_code(
        #[case] err: EmployeeValidationError,
        #[case] field: &str,
        #[case] code: &str,
    ) {
        let mapped = map_employee_validation_error(err);
        assert_eq!(detail(&mapped, "field"), Some(field));
        assert_eq!(detail(&mapped, "code"), Some(code));
    }

    #[rstest]
    #[case(None, None, 1, 10)]
    #[case(Some(3), Some(25), 3, 25)]
    fn page_request_applies_defaults(
        #[case] page: Option<u64>,
        #[case] per_page: Option<u64>,
        #[case] expected_page: u64,
        #[case] expected_per_page: u64,
    ) {
        let request = page_request(page, per_page, 10).expect("valid page");
        assert_eq!(request.page(), expected_page);
        assert_eq!(request.per_page(), expected_per_page);
    }

    #[rstest]
    #[case(Some(0), None, "page")]
    #[case(None, Some(0), "perPage")]
    #[case(None, Some(500), "perPage")]
    fn page_request_rejects_out_of_range(
        #[case] page: Option<u64>,
        #[case] per_page: Option<u64>,
        #[case] field: &str,
    ) {
        let err = page_request(page, per_page, 10).expect_err("out of range");
        assert_eq!(detail(&err, "field"), Some(field));
    }
}
