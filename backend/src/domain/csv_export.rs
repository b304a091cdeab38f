//! CSV rendering of employee records.
//!
//! The header row uses the same column names the ingest pipeline reads, so
//! an exported file can be uploaded again.

use crate::domain::Employee;

/// Columns written by [`employees_to_csv`], in order.
pub const EXPORT_COLUMNS: [&str; 5] = ["id", "name", "email", "age", "department"];

/// Failures while rendering CSV.
#[derive(Debug, thiserror::Error)]
pub enum CsvExportError {
    #[error("failed to write CSV: {0}")]
    Write(#[from] csv::Error),
    #[error("failed to finish CSV buffer: {0}")]
    Flush(String),
    #[error("CSV output is not UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

/// Render employees as a CSV document with a header row.
///
/// Absent ages and departments become empty cells.
///
/// # Examples
/// ```
/// use roster::domain::employees_to_csv;
///
/// let csv = employees_to_csv(&[]).expect("render");
/// assert_eq!(csv, "id,name,email,age,department\n");
/// ```
pub fn employees_to_csv(employees: &[Employee]) -> Result<String, CsvExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(EXPORT_COLUMNS)?;
    for employee in employees {
        let age = employee
            .age()
            .map(|age| age.value().to_string())
            .unwrap_or_default();
        let department = employee.department().map(AsRef::as_ref).unwrap_or_default();
        writer.write_record([
            employee.id().to_string().as_str(),
            employee.name().as_ref(),
            employee.email().as_ref(),
            age.as_str(),
            department,
        ])?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|err| CsvExportError::Flush(err.error().to_string()))?;
    Ok(String::from_utf8(bytes)?)
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use rstest::rstest;

    use super::*;
    use crate::domain::{EmployeeDraft, EmployeeId};

    #[rstest]
    fn writes_one_line_per_employee_with_blank_optionals() {
        let id = EmployeeId::new("00000000-0000-0000-0000-000000000001").expect("uuid");
        let draft = EmployeeDraft::try_from_parts("Lovelace, Ada", "ada@x.com", None, None)
            .expect("valid draft");
        let now = Utc::now();
        let employee = Employee::new(id, draft, now, now);

        let csv = employees_to_csv(&[employee]).expect("render");

        assert_eq!(
            csv,
            "id,name,email,age,department\n\
             00000000-0000-0000-0000-000000000001,\"Lovelace, Ada\",ada@x.com,,\n"
        );
    }
}
