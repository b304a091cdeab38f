//! CSV bulk-ingest pipeline.
//!
//! Turns an uploaded CSV file into either a set of insertable candidate
//! records or a list of row errors:
//! - rows are read one at a time from disk, decoding invalid UTF-8
//!   lossily;
//! - `name` and `email` are trimmed and must both be non-empty;
//! - a present `age` is read by its leading integer; unreadable and
//!   out-of-range ages are left for the store to refuse;
//! - any row error voids the whole file;
//! - candidates whose email already exists are dropped after one batched
//!   lookup.
//!
//! The pipeline never writes. Read and lookup faults are returned as
//! [`CsvIngestError`], separate from the data-level [`IngestOutcome`].

use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use serde::ser::SerializeMap;
use tracing::{debug, info};

use crate::domain::TraceId;
use crate::domain::ports::{EmployeeRepository, EmployeeRepositoryError};

const NAME_COLUMN: &str = "name";
const EMAIL_COLUMN: &str = "email";
const AGE_COLUMN: &str = "age";

/// Message of the single error returned when every candidate is a duplicate.
pub const ALL_DUPLICATES_MESSAGE: &str = "All emails already exist in database.";
/// Message of the single error returned for a file with a header but no rows.
pub const NO_ROWS_MESSAGE: &str = "No employee rows found in file.";

/// One CSV line as read, keyed by header, values untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawCsvRow {
    fields: Vec<(String, String)>,
}

impl RawCsvRow {
    /// Build a row from `(header, value)` pairs in column order.
    pub fn new(fields: Vec<(String, String)>) -> Self {
        Self { fields }
    }

    fn from_record(headers: &[String], record: &csv::ByteRecord) -> Self {
        Self {
            fields: headers
                .iter()
                .zip(record.iter())
                .map(|(header, value)| {
                    (header.clone(), String::from_utf8_lossy(value).into_owned())
                })
                .collect(),
        }
    }

    /// Value of the first column named `column`, if the row has one.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(header, _)| header == column)
            .map(|(_, value)| value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields
            .iter()
            .map(|(header, value)| (header.as_str(), value.as_str()))
    }
}

impl Serialize for RawCsvRow {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (header, value) in &self.fields {
            map.serialize_entry(header, value)?;
        }
        map.end()
    }
}

impl fmt::Display for RawCsvRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let encoded = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&encoded)
    }
}

/// A shape-valid row not yet known to conflict with stored data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateRecord {
    /// Trimmed, non-empty.
    pub name: String,
    /// Trimmed, non-empty.
    pub email: String,
    pub age: Option<CandidateAge>,
}

/// Age cell of a candidate.
///
/// Read by its leading integer, so `"30.5"` is 30 and `"42 years"` is 42.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CandidateAge {
    Years(i64),
    /// No leading integer; the store refuses the record.
    Unreadable(String),
}

impl CandidateAge {
    fn parse(raw: &str) -> Self {
        leading_integer(raw).map_or_else(|| Self::Unreadable(raw.to_owned()), Self::Years)
    }
}

fn leading_integer(raw: &str) -> Option<i64> {
    let sign = usize::from(raw.starts_with(['+', '-']));
    let digits = raw
        .bytes()
        .skip(sign)
        .take_while(u8::is_ascii_digit)
        .count();
    if digits == 0 {
        return None;
    }
    raw.get(..sign + digits)?.parse().ok()
}

/// A validation failure tied to one input row, or to the file as a whole.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowError {
    pub message: String,
    /// One-based line of the offending record.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row: Option<RawCsvRow>,
}

impl RowError {
    /// Error citing a specific row.
    pub fn for_row(message: impl Into<String>, row: RawCsvRow, line: Option<u64>) -> Self {
        Self {
            message: message.into(),
            line,
            row: Some(row),
        }
    }

    /// Error about the file as a whole.
    pub fn for_file(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            line: None,
            row: None,
        }
    }
}

/// Data-level result of one ingest pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestOutcome {
    /// The file was refused. Never empty.
    Rejected(Vec<RowError>),
    /// Candidates left after dropping existing emails. Never empty.
    Accepted(Vec<CandidateRecord>),
}

/// Faults that stop the pipeline before it can judge the data.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CsvIngestError {
    /// The file could not be opened or is not well-formed CSV.
    #[error("failed to read CSV upload: {message}")]
    Read { message: String },
    /// The existing-email lookup failed.
    #[error("existing email lookup failed: {source}")]
    Lookup {
        #[from]
        source: EmployeeRepositoryError,
    },
}

impl CsvIngestError {
    pub fn read(message: impl Into<String>) -> Self {
        Self::Read {
            message: message.into(),
        }
    }
}

#[derive(Debug, Default)]
struct ParsePass {
    rows: u64,
    candidates: Vec<CandidateRecord>,
    errors: Vec<RowError>,
}

fn missing_name_or_email(row: &RawCsvRow) -> String {
    format!("Invalid row (missing name/email): {row}")
}

/// Parses, validates and dedupes uploaded CSV files against a store.
///
/// # Examples
/// ```no_run
/// use std::path::Path;
/// use std::sync::Arc;
///
/// use mockable::DefaultClock;
/// use roster::domain::{CsvIngestPipeline, IngestOutcome};
/// use roster::outbound::memory::InMemoryEmployeeRepository;
///
/// # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
/// let repo = Arc::new(InMemoryEmployeeRepository::new(Arc::new(DefaultClock)));
/// let pipeline = CsvIngestPipeline::new(repo);
/// match pipeline.ingest(Path::new("employees.csv")).await? {
///     IngestOutcome::Accepted(candidates) => println!("{} new rows", candidates.len()),
///     IngestOutcome::Rejected(errors) => println!("{} errors", errors.len()),
/// }
/// # Ok(())
/// # }
/// ```
pub struct CsvIngestPipeline<R: ?Sized> {
    repo: Arc<R>,
}

impl<R: ?Sized> Clone for CsvIngestPipeline<R> {
    fn clone(&self) -> Self {
        Self {
            repo: Arc::clone(&self.repo),
        }
    }
}

impl<R> CsvIngestPipeline<R>
where
    R: EmployeeRepository + ?Sized,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Run one ingest pass over the file at `path`.
    ///
    /// Reads the file exactly once and queries the store at most once.
    pub async fn ingest(&self, path: &Path) -> Result<IngestOutcome, CsvIngestError> {
        let pass = parse_off_runtime(path.to_path_buf()).await?;

        if !pass.errors.is_empty() {
            info!(
                rows = pass.rows,
                errors = pass.errors.len(),
                "csv upload rejected: invalid rows"
            );
            return Ok(IngestOutcome::Rejected(pass.errors));
        }
        if pass.candidates.is_empty() {
            info!("csv upload rejected: no rows");
            return Ok(IngestOutcome::Rejected(vec![RowError::for_file(
                NO_ROWS_MESSAGE,
            )]));
        }

        let emails: Vec<String> = pass
            .candidates
            .iter()
            .map(|candidate| candidate.email.clone())
            .collect();
        let existing = self.repo.find_existing_emails(&emails).await?;

        let parsed = pass.candidates.len();
        let survivors: Vec<CandidateRecord> = pass
            .candidates
            .into_iter()
            .filter(|candidate| !existing.contains(&candidate.email))
            .collect();
        debug!(
            rows = pass.rows,
            duplicates = parsed - survivors.len(),
            "existing emails filtered"
        );

        if survivors.is_empty() {
            info!(rows = pass.rows, "csv upload rejected: all emails exist");
            return Ok(IngestOutcome::Rejected(vec![RowError::for_file(
                ALL_DUPLICATES_MESSAGE,
            )]));
        }
        info!(
            rows = pass.rows,
            candidates = survivors.len(),
            "csv upload accepted"
        );
        Ok(IngestOutcome::Accepted(survivors))
    }
}

async fn parse_off_runtime(path: PathBuf) -> Result<ParsePass, CsvIngestError> {
    let trace_id = TraceId::current();
    tokio::task::spawn_blocking(move || match trace_id {
        Some(id) => TraceId::sync_scope(id, || parse_file(&path)),
        None => parse_file(&path),
    })
    .await
    .map_err(|err| CsvIngestError::read(format!("csv parse task failed: {err}")))?
}

fn parse_file(path: &Path) -> Result<ParsePass, CsvIngestError> {
    let file = File::open(path)
        .map_err(|err| CsvIngestError::read(format!("{}: {err}", path.display())))?;
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(file);
    let headers: Vec<String> = reader
        .byte_headers()
        .map_err(map_csv_error)?
        .iter()
        .map(|header| String::from_utf8_lossy(header).into_owned())
        .collect();

    let mut pass = ParsePass::default();
    let mut record = csv::ByteRecord::new();
    while reader.read_byte_record(&mut record).map_err(map_csv_error)? {
        pass.rows += 1;
        let row = RawCsvRow::from_record(&headers, &record);
        match classify(&row) {
            Some(candidate) => {
                if pass.errors.is_empty() {
                    pass.candidates.push(candidate);
                }
            }
            None => {
                // The file is void now; stop holding candidates.
                pass.candidates = Vec::new();
                let line = record.position().map(csv::Position::line);
                pass.errors
                    .push(RowError::for_row(missing_name_or_email(&row), row, line));
            }
        }
    }
    debug!(rows = pass.rows, errors = pass.errors.len(), "csv parse pass finished");
    Ok(pass)
}

fn map_csv_error(err: csv::Error) -> CsvIngestError {
    CsvIngestError::read(err.to_string())
}

fn classify(row: &RawCsvRow) -> Option<CandidateRecord> {
    let name = row.get(NAME_COLUMN).map(str::trim).unwrap_or_default();
    let email = row.get(EMAIL_COLUMN).map(str::trim).unwrap_or_default();
    if name.is_empty() || email.is_empty() {
        return None;
    }

    Some(CandidateRecord {
        name: name.to_owned(),
        email: email.to_owned(),
        age: row
            .get(AGE_COLUMN)
            .map(str::trim)
            .filter(|age| !age.is_empty())
            .map(CandidateAge::parse),
    })
}
