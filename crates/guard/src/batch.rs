//! Convenience wrappers for uploading one or many files in a single call.
//!
//! Each file is handled by its own [`UploadGuard`]. There is no transaction across
//! a batch: files stored before a failure stay where they are.

use crate::config::GuardConfig;
use crate::guard::{UploadGuard, UploadOptions};
use crate::transport::{UploadRequest, UploadTransport};
use crate::UploadError;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};

/// Outcome of one upload, suitable for logging or returning to a client.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct UploadReport {
    pub original_name: String,

    /// Where the file was stored; `None` if it was not moved
    pub stored_path: Option<PathBuf>,

    pub error_code: i32,
    pub error_message: String,

    /// UTC time the move completed
    pub stored_at: Option<DateTime<Utc>>,
}

impl UploadReport {
    /// Report for a guard that has not attempted an upload.
    pub fn pending(guard: &UploadGuard) -> Self {
        Self {
            original_name: guard.original_name().to_owned(),
            stored_path: None,
            error_code: guard.error_code().code(),
            error_message: guard.error_message(),
            stored_at: None,
        }
    }

    /// Report for a finished upload attempt.
    pub fn finished(guard: &UploadGuard, outcome: &Result<PathBuf, UploadError>) -> Self {
        match outcome {
            Ok(path) => Self {
                stored_path: Some(path.clone()),
                stored_at: Some(Utc::now()),
                ..Self::pending(guard)
            },
            Err(err) => Self {
                error_code: err.code().code(),
                error_message: err.message(),
                ..Self::pending(guard)
            },
        }
    }

    pub fn is_stored(&self) -> bool {
        self.stored_path.is_some()
    }
}

/// Validates and stores a single upload without overwriting existing files.
///
/// # Errors
///
/// Returns the [`UploadError`] from [`UploadGuard::upload`]; its `Display` is the
/// message to show the user.
pub fn load_file<T>(
    config: &GuardConfig,
    transport: &T,
    request: UploadRequest,
    destination: Option<&Path>,
    max_size: Option<u64>,
) -> Result<PathBuf, UploadError>
where
    T: UploadTransport + ?Sized,
{
    let mut guard = UploadGuard::with_config(config, request, destination, max_size);
    guard.upload(transport, &UploadOptions::default())
}

/// Uploads every request independently and reports each outcome, in input order.
pub fn multi_upload<T, I>(
    config: &GuardConfig,
    transport: &T,
    requests: I,
    overwrite: bool,
    destination: Option<&Path>,
) -> Vec<UploadReport>
where
    T: UploadTransport + ?Sized,
    I: IntoIterator<Item = UploadRequest>,
{
    let options = UploadOptions::default().overwrite(overwrite);

    let reports: Vec<UploadReport> = requests
        .into_iter()
        .map(|request| {
            let mut guard = UploadGuard::with_config(config, request, destination, None);
            let outcome = guard.upload(transport, &options);
            UploadReport::finished(&guard, &outcome)
        })
        .collect();

    let stored = reports.iter().filter(|r| r.is_stored()).count();
    tracing::info!(total = reports.len(), stored, "batch upload finished");

    reports
}
