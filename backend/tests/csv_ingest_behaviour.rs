//! Behavioural tests for CSV ingest and bulk upload over the in-memory store.

use std::io::Write;
use std::sync::Arc;

use mockable::DefaultClock;
use rstest::{fixture, rstest};
use tempfile::NamedTempFile;

use roster::domain::ports::{BulkUploadOutcome, EmployeeCommand, EmployeeQuery};
use roster::domain::{
    ALL_DUPLICATES_MESSAGE, CandidateRecord, CsvIngestPipeline, EmployeeDraft, EmployeeService,
    IngestOutcome, RowError,
};
use roster::outbound::memory::InMemoryEmployeeRepository;

fn csv_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(contents.as_bytes()).expect("write csv");
    file.flush().expect("flush csv");
    file
}

#[fixture]
fn repo() -> Arc<InMemoryEmployeeRepository> {
    Arc::new(InMemoryEmployeeRepository::new(Arc::new(DefaultClock)))
}

async fn seed(repo: &Arc<InMemoryEmployeeRepository>, name: &str, email: &str) {
    let service = EmployeeService::new(Arc::clone(repo));
    let draft = EmployeeDraft::try_from_parts(name, email, None, None).expect("valid draft");
    service.create(draft).await.expect("seed employee");
}

async fn ingest(repo: &Arc<InMemoryEmployeeRepository>, contents: &str) -> IngestOutcome {
    let file = csv_file(contents);
    CsvIngestPipeline::new(Arc::clone(repo))
        .ingest(file.path())
        .await
        .expect("ingest succeeds")
}

fn rejected(outcome: IngestOutcome) -> Vec<RowError> {
    match outcome {
        IngestOutcome::Rejected(errors) => errors,
        IngestOutcome::Accepted(candidates) => panic!("expected errors, got {candidates:?}"),
    }
}

fn accepted(outcome: IngestOutcome) -> Vec<CandidateRecord> {
    match outcome {
        IngestOutcome::Accepted(candidates) => candidates,
        IngestOutcome::Rejected(errors) => panic!("expected candidates, got {errors:?}"),
    }
}

#[rstest]
#[tokio::test]
async fn blank_name_voids_an_otherwise_valid_file(repo: Arc<InMemoryEmployeeRepository>) {
    let errors = rejected(ingest(&repo, "name,email,age\nA,a@x.com,30\n,b@x.com,\n").await);

    assert_eq!(errors.len(), 1);
    let error = &errors[0];
    assert_eq!(error.line, Some(3));
    let row = error.row.as_ref().expect("row attached");
    assert_eq!(
        serde_json::to_value(row).expect("serialise row"),
        serde_json::json!({ "name": "", "email": "b@x.com", "age": "" })
    );
}

#[rstest]
#[tokio::test]
async fn existing_email_is_dropped_from_candidates(repo: Arc<InMemoryEmployeeRepository>) {
    seed(&repo, "Existing", "a@x.com").await;

    let candidates = accepted(ingest(&repo, "name,email\nA,a@x.com\nC,c@x.com\n").await);

    assert_eq!(
        candidates,
        vec![CandidateRecord {
            name: "C".to_owned(),
            email: "c@x.com".to_owned(),
            age: None,
        }]
    );
}

#[rstest]
#[case(0)]
#[case(2)]
#[case(4)]
#[tokio::test]
async fn candidates_exclude_only_stored_emails(
    repo: Arc<InMemoryEmployeeRepository>,
    #[case] stored: usize,
) {
    const ROWS: usize = 5;
    for index in 0..stored {
        seed(&repo, "Stored", &format!("user{index}@x.com")).await;
    }
    let mut contents = String::from("name,email,age\n");
    for index in 0..ROWS {
        contents.push_str(&format!("User {index},user{index}@x.com,{}\n", 20 + index));
    }

    let candidates = accepted(ingest(&repo, &contents).await);

    let expected: Vec<String> = (stored..ROWS).map(|index| format!("user{index}@x.com")).collect();
    let emails: Vec<String> = candidates.into_iter().map(|c| c.email).collect();
    assert_eq!(emails, expected);
}

#[rstest]
#[tokio::test]
async fn every_email_stored_yields_one_error(repo: Arc<InMemoryEmployeeRepository>) {
    seed(&repo, "A", "a@x.com").await;
    seed(&repo, "B", "b@x.com").await;

    let errors = rejected(ingest(&repo, "name,email\nA,a@x.com\nB,b@x.com\n").await);

    assert_eq!(errors, vec![RowError::for_file(ALL_DUPLICATES_MESSAGE)]);
}

#[rstest]
#[tokio::test]
async fn exported_records_reingest_as_duplicates(repo: Arc<InMemoryEmployeeRepository>) {
    let service = EmployeeService::new(Arc::clone(&repo));
    for (name, email, age) in [("Ada", "ada@x.com", Some(36)), ("Grace", "grace@x.com", None)] {
        let draft =
            EmployeeDraft::try_from_parts(name, email, age, Some("Engineering")).expect("draft");
        service.create(draft).await.expect("create");
    }

    let exported = service.export_csv().await.expect("export");
    let errors = rejected(ingest(&repo, &exported).await);

    assert_eq!(errors, vec![RowError::for_file(ALL_DUPLICATES_MESSAGE)]);
}

#[rstest]
#[tokio::test]
async fn bulk_upload_stores_new_rows_and_reports_counts(repo: Arc<InMemoryEmployeeRepository>) {
    seed(&repo, "A", "a@x.com").await;
    let service = EmployeeService::new(Arc::clone(&repo));
    let file = csv_file("name,email,age\nA,a@x.com,30\nB,b@x.com,41\nC,c@x.com,\n");

    let outcome = service.bulk_upload(file.path()).await.expect("upload");

    let BulkUploadOutcome::Completed(report) = outcome else {
        panic!("expected a completed upload, got {outcome:?}");
    };
    assert_eq!(report.requested, 2);
    assert_eq!(report.inserted.len(), 2);
    assert_eq!(report.shortfall(), 0);
    let page = service
        .list(None, pagination::PageRequest::new(1, 10).expect("page"))
        .await
        .expect("list");
    assert_eq!(page.total, 3);
}

#[rstest]
#[tokio::test]
async fn bulk_upload_reports_store_rejections_as_shortfall(
    repo: Arc<InMemoryEmployeeRepository>,
) {
    let service = EmployeeService::new(Arc::clone(&repo));
    let file = csv_file("name,email,age\nA,a@x.com,200\nB,b@x.com,30\nB again,b@x.com,31\n");

    let outcome = service.bulk_upload(file.path()).await.expect("upload");

    let BulkUploadOutcome::Completed(report) = outcome else {
        panic!("expected a completed upload, got {outcome:?}");
    };
    assert_eq!(report.requested, 3);
    assert_eq!(report.inserted.len(), 1);
    assert_eq!(report.shortfall(), 2);
    let rejected: Vec<_> = report.rejected.iter().map(|r| r.email.as_str()).collect();
    assert!(rejected.contains(&"a@x.com"));
    assert!(rejected.contains(&"b@x.com"));
}

#[rstest]
#[tokio::test]
async fn bulk_upload_of_invalid_file_changes_nothing(repo: Arc<InMemoryEmployeeRepository>) {
    let service = EmployeeService::new(Arc::clone(&repo));
    let file = csv_file("name,email\nA,a@x.com\nB,\n");

    let outcome = service.bulk_upload(file.path()).await.expect("upload");

    assert!(matches!(outcome, BulkUploadOutcome::Invalid(ref errors) if errors.len() == 1));
    let all = service.export_csv().await;
    assert!(all.is_err(), "store should still be empty");
}

#[rstest]
#[tokio::test]
async fn unreadable_age_costs_one_record_not_the_file(repo: Arc<InMemoryEmployeeRepository>) {
    let service = EmployeeService::new(Arc::clone(&repo));
    let file = csv_file("name,email,age\nA,a@x.com,30.5\nB,b@x.com,40\nC,c@x.com,abc\n");

    let outcome = service.bulk_upload(file.path()).await.expect("upload");

    let BulkUploadOutcome::Completed(report) = outcome else {
        panic!("expected a completed upload, got {outcome:?}");
    };
    assert_eq!(report.requested, 3);
    assert_eq!(report.shortfall(), 1);
    assert_eq!(report.rejected.len(), 1);
    assert_eq!(report.rejected[0].email, "c@x.com");
    let ages: Vec<_> = report
        .inserted
        .iter()
        .map(|employee| {
            let age = employee.age().map(|age| age.value());
            (employee.email().as_ref().to_owned(), age)
        })
        .collect();
    assert_eq!(
        ages,
        vec![
            ("a@x.com".to_owned(), Some(30)),
            ("b@x.com".to_owned(), Some(40)),
        ]
    );
}
