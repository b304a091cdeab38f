//! Unit coverage for the employee service over a mocked repository.

use std::collections::BTreeSet;
use std::io::Write;

use chrono::{TimeZone, Utc};
use rstest::rstest;
use tempfile::NamedTempFile;

use super::*;
use crate::domain::ErrorCode;
use crate::domain::ports::{EmployeeListing, MockEmployeeRepository};

fn employee(name: &str, email: &str, age: Option<i64>) -> Employee {
    let draft = EmployeeDraft::try_from_parts(name, email, age, None).expect("valid draft");
    let at = Utc
        .with_ymd_and_hms(2026, 3, 1, 9, 0, 0)
        .single()
        .expect("valid timestamp");
    Employee::new(EmployeeId::random(), draft, at, at)
}

fn service(repo: MockEmployeeRepository) -> EmployeeService<MockEmployeeRepository> {
    EmployeeService::new(Arc::new(repo))
}

fn csv_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(contents.as_bytes()).expect("write csv");
    file
}

fn stored(record: &NewEmployee) -> Employee {
    let at = Utc::now();
    Employee::new(record.id, record.draft.clone(), at, at)
}

#[rstest]
#[tokio::test]
async fn list_rejects_invalid_search_without_querying() {
    let mut repo = MockEmployeeRepository::new();
    repo.expect_list().never();

    let err = service(repo)
        .list(Some("(".to_owned()), PageRequest::default())
        .await
        .expect_err("invalid regex");

    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert_eq!(err.details(), Some(&json!({ "field": "q" })));
}

#[rstest]
#[tokio::test]
async fn list_wraps_listing_in_a_page() {
    let mut repo = MockEmployeeRepository::new();
    repo.expect_list()
        .times(1)
        .withf(|query| {
            query.search.as_ref().map(EmployeeSearch::pattern) == Some("ada")
                && query.page.page() == 2
        })
        .returning(|_| {
            Ok(EmployeeListing {
                items: vec![employee("Ada", "ada@x.com", None)],
                total: 11,
            })
        });
    let request = PageRequest::new(2, 10).expect("valid page");

    let page = service(repo)
        .list(Some(" ada ".to_owned()), request)
        .await
        .expect("list succeeds");

    assert_eq!(page.current, 2);
    assert_eq!(page.pages, 2);
    assert_eq!(page.total, 11);
    assert_eq!(page.items.len(), 1);
}

#[rstest]
#[tokio::test]
async fn get_maps_missing_to_not_found() {
    let mut repo = MockEmployeeRepository::new();
    repo.expect_find_by_id().returning(|_| Ok(None));

    let err = service(repo)
        .get(&EmployeeId::random())
        .await
        .expect_err("missing");

    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[case(EmployeeRepositoryError::connection("refused"), ErrorCode::ServiceUnavailable)]
#[case(EmployeeRepositoryError::query("syntax"), ErrorCode::InternalError)]
#[case(EmployeeRepositoryError::duplicate_email("ada@x.com"), ErrorCode::Conflict)]
#[tokio::test]
async fn create_maps_repository_errors(
    #[case] failure: EmployeeRepositoryError,
    #[case] expected: ErrorCode,
) {
    let mut repo = MockEmployeeRepository::new();
    repo.expect_insert()
        .times(1)
        .return_once(move |_| Err(failure));
    let draft = EmployeeDraft::try_from_parts("Ada", "ada@x.com", None, None).expect("draft");

    let err = service(repo).create(draft).await.expect_err("insert fails");

    assert_eq!(err.code(), expected);
}

#[rstest]
#[tokio::test]
async fn patch_merges_over_the_stored_record() {
    let current = employee("Ada", "ada@x.com", Some(36));
    let id = *current.id();
    let mut repo = MockEmployeeRepository::new();
    let found = current.clone();
    repo.expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(found)));
    repo.expect_update()
        .times(1)
        .withf(|_, draft| {
            draft.name.as_ref() == "Ada"
                && draft.email.as_ref() == "ada@x.com"
                && draft.department.as_ref().map(AsRef::as_ref) == Some("R&D")
                && draft.age.map(|age| age.value()) == Some(36)
        })
        .returning(move |id, draft| {
            let at = Utc::now();
            Ok(Some(Employee::new(*id, draft, at, at)))
        });
    let patch = EmployeePatch::try_from_parts(None, None, None, Some("R&D")).expect("patch");

    let updated = service(repo).patch(&id, patch).await.expect("patch succeeds");

    assert_eq!(updated.department().map(AsRef::as_ref), Some("R&D"));
}

#[rstest]
#[tokio::test]
async fn delete_reports_missing_records() {
    let mut repo = MockEmployeeRepository::new();
    repo.expect_delete().times(1).returning(|_| Ok(false));

    let err = service(repo)
        .delete(&EmployeeId::random())
        .await
        .expect_err("missing");

    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn bulk_upload_returns_row_errors_as_data() {
    let mut repo = MockEmployeeRepository::new();
    repo.expect_find_existing_emails().never();
    repo.expect_insert_many_unordered().never();
    let file = csv_file("name,email,age\nA,a@x.com,30\n,b@x.com,\n");

    let outcome = service(repo)
        .bulk_upload(file.path())
        .await
        .expect("ingest completes");

    let BulkUploadOutcome::Invalid(errors) = outcome else {
        panic!("expected invalid outcome, got {outcome:?}");
    };
    assert_eq!(errors.len(), 1);
    assert!(errors[0].message.contains("b@x.com"));
}

#[rstest]
#[tokio::test]
async fn bulk_upload_read_fault_is_internal() {
    let mut repo = MockEmployeeRepository::new();
    repo.expect_find_existing_emails().never();
    let dir = tempfile::tempdir().expect("temp dir");

    let err = service(repo)
        .bulk_upload(&dir.path().join("missing.csv"))
        .await
        .expect_err("read fault");

    assert_eq!(err.code(), ErrorCode::InternalError);
}

#[rstest]
#[tokio::test]
async fn bulk_upload_rejects_out_of_range_ages_at_the_storage_boundary() {
    let mut repo = MockEmployeeRepository::new();
    repo.expect_find_existing_emails()
        .times(1)
        .returning(|_| Ok(BTreeSet::new()));
    repo.expect_insert_many_unordered()
        .times(1)
        .withf(|records| records.len() == 1 && records[0].draft.email.as_ref() == "ada@x.com")
        .returning(|records| {
            Ok(BulkInsertReport {
                inserted: records.iter().map(stored).collect(),
                rejected: Vec::new(),
            })
        });
    let file = csv_file("name,email,age\nAda,ada@x.com,36\nKid,kid@x.com,12\n");

    let outcome = service(repo)
        .bulk_upload(file.path())
        .await
        .expect("upload completes");

    let BulkUploadOutcome::Completed(report) = outcome else {
        panic!("expected completed outcome, got {outcome:?}");
    };
    assert_eq!(report.requested, 2);
    assert_eq!(report.inserted.len(), 1);
    assert_eq!(report.shortfall(), 1);
    assert_eq!(report.rejected.len(), 1);
    assert_eq!(report.rejected[0].email, "kid@x.com");
}

#[rstest]
#[tokio::test]
async fn bulk_upload_rejects_unreadable_ages_without_voiding_the_file() {
    let mut repo = MockEmployeeRepository::new();
    repo.expect_find_existing_emails()
        .times(1)
        .returning(|_| Ok(BTreeSet::new()));
    repo.expect_insert_many_unordered()
        .times(1)
        .withf(|records| {
            records.len() == 2
                && records[0].draft.age.map(|age| age.value()) == Some(30)
                && records[1].draft.email.as_ref() == "b@x.com"
        })
        .returning(|records| {
            Ok(BulkInsertReport {
                inserted: records.iter().map(stored).collect(),
                rejected: Vec::new(),
            })
        });
    let file = csv_file("name,email,age\nA,a@x.com,30.5\nB,b@x.com,40\nC,c@x.com,abc\n");

    let outcome = service(repo)
        .bulk_upload(file.path())
        .await
        .expect("upload completes");

    let BulkUploadOutcome::Completed(report) = outcome else {
        panic!("expected completed outcome, got {outcome:?}");
    };
    assert_eq!(report.requested, 3);
    assert_eq!(report.shortfall(), 1);
    assert_eq!(
        report.rejected,
        vec![RejectedRecord::new("c@x.com", r#"age "abc" is not an integer"#)]
    );
}

#[rstest]
#[tokio::test]
async fn bulk_upload_surfaces_write_time_duplicates_as_a_count_mismatch() {
    let mut repo = MockEmployeeRepository::new();
    repo.expect_find_existing_emails()
        .times(1)
        .returning(|_| Ok(BTreeSet::new()));
    repo.expect_insert_many_unordered()
        .times(1)
        .returning(|records| {
            Ok(BulkInsertReport {
                inserted: records.iter().take(1).map(stored).collect(),
                rejected: vec![RejectedRecord::new("b@x.com", "email already exists")],
            })
        });
    let file = csv_file("name,email\nA,a@x.com\nB,b@x.com\n");

    let outcome = service(repo)
        .bulk_upload(file.path())
        .await
        .expect("upload completes");

    let BulkUploadOutcome::Completed(report) = outcome else {
        panic!("expected completed outcome, got {outcome:?}");
    };
    assert_eq!(report.requested, 2);
    assert_eq!(report.inserted.len(), 1);
    assert_eq!(report.rejected[0].email, "b@x.com");
}

#[rstest]
#[tokio::test]
async fn export_requires_at_least_one_employee() {
    let mut repo = MockEmployeeRepository::new();
    repo.expect_list_all().times(1).returning(|| Ok(Vec::new()));

    let err = service(repo).export_csv().await.expect_err("empty store");

    assert_eq!(err.code(), ErrorCode::NotFound);
    assert_eq!(err.message(), "no employees found");
}

#[rstest]
#[tokio::test]
async fn export_renders_header_and_rows() {
    let mut repo = MockEmployeeRepository::new();
    repo.expect_list_all()
        .times(1)
        .returning(|| Ok(vec![employee("Ada", "ada@x.com", Some(36))]));

    let csv = service(repo).export_csv().await.expect("export succeeds");

    let mut lines = csv.lines();
    assert_eq!(lines.next(), Some("id,name,email,age,department"));
    let row = lines.next().expect("one row");
    assert!(row.ends_with(",Ada,ada@x.com,36,"), "row: {row}");
}
