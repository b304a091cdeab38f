//! Upload receiver for CSV bulk imports.
//!
//! The request body is streamed chunk by chunk into a temporary file under
//! the configured upload directory through `tokio::fs`, so disk writes stay
//! off the actix worker. The file is deleted when the returned
//! [`SpooledUpload`] is dropped, so every handler exit path cleans up.

use std::fmt::Display;
use std::path::{Path, PathBuf};

use actix_web::web::Bytes;
use futures_util::{Stream, StreamExt};
use serde_json::json;
use tempfile::NamedTempFile;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::domain::Error;

use super::state::UploadConfig;

/// An uploaded body held on disk for the lifetime of the request.
#[derive(Debug)]
pub struct SpooledUpload {
    file: NamedTempFile,
    len: usize,
}

impl SpooledUpload {
    /// Location of the spooled body.
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Number of bytes received.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

fn spool_failure(err: impl Display) -> Error {
    Error::internal(format!("failed to spool upload: {err}"))
}

async fn create_spool_file(upload_dir: PathBuf) -> Result<NamedTempFile, Error> {
    tokio::task::spawn_blocking(move || {
        tempfile::Builder::new()
            .prefix("roster-upload-")
            .suffix(".csv")
            .tempfile_in(upload_dir)
    })
    .await
    .map_err(spool_failure)?
    .map_err(spool_failure)
}

/// Stream `body` into a temporary file.
///
/// # Errors
/// - `invalid_request` "no file uploaded" for an empty body.
/// - `invalid_request` when the body exceeds `max_upload_bytes`.
/// - `internal` when the temporary file cannot be created or written.
pub async fn spool<S, E>(mut body: S, config: &UploadConfig) -> Result<SpooledUpload, Error>
where
    S: Stream<Item = Result<Bytes, E>> + Unpin,
    E: Display,
{
    let file = create_spool_file(config.upload_dir.clone()).await?;
    let mut writer =
        tokio::fs::File::from_std(file.as_file().try_clone().map_err(spool_failure)?);
    let mut len = 0usize;

    while let Some(chunk) = body.next().await {
        let chunk = chunk
            .map_err(|err| Error::invalid_request(format!("failed to read upload: {err}")))?;
        len = len.saturating_add(chunk.len());
        if len > config.max_upload_bytes {
            return Err(
                Error::invalid_request("uploaded file is too large").with_details(json!({
                    "maxBytes": config.max_upload_bytes,
                })),
            );
        }
        writer.write_all(&chunk).await.map_err(spool_failure)?;
    }

    if len == 0 {
        return Err(Error::invalid_request("no file uploaded"));
    }
    // Waits for the background write to land before the pipeline reads.
    writer.flush().await.map_err(spool_failure)?;
    debug!(bytes = len, path = %file.path().display(), "upload spooled");
    Ok(SpooledUpload { file, len })
}
