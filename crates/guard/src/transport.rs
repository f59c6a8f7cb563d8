//! The boundary between the upload transport and the guard.
//!
//! The transport (normally the web server's multipart handling) writes each
//! uploaded body to a temporary file and describes it with an [`UploadRequest`].
//! The guard only ever moves files the transport vouches for through
//! [`UploadTransport::is_uploaded_file`], so a forged `source_path` pointing at
//! an arbitrary file on disk is refused.
//!
//! [`SpoolTransport`] is a directory-backed implementation: it stages bodies into
//! a spool directory under unguessable names and remembers exactly which paths it
//! issued.

use crate::codes::ErrorCode;
use crate::constants::{SPOOL_FILE_PREFIX, SPOOL_FILE_SUFFIX};
use crate::{GuardError, GuardResult};
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use uuid::Uuid;

/// Metadata describing one uploaded file, as reported by the transport.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct UploadRequest {
    /// Client-supplied filename
    pub original_name: String,

    /// Client-declared MIME type; untrusted and informational only
    pub declared_mime_type: String,

    /// Temporary file holding the uploaded body
    pub source_path: PathBuf,

    /// Size of the body in bytes
    pub reported_size: u64,

    /// Transport outcome; 0 on success
    pub transport_error_code: i32,
}

impl UploadRequest {
    pub fn new(
        original_name: impl Into<String>,
        declared_mime_type: impl Into<String>,
        source_path: impl Into<PathBuf>,
        reported_size: u64,
        transport_error_code: i32,
    ) -> Self {
        Self {
            original_name: original_name.into(),
            declared_mime_type: declared_mime_type.into(),
            source_path: source_path.into(),
            reported_size,
            transport_error_code,
        }
    }

    /// A request describing a transport-level failure with no usable body.
    pub fn failed(original_name: impl Into<String>, code: ErrorCode) -> Self {
        Self::new(original_name, "", PathBuf::new(), 0, code.code())
    }
}

/// Operations the guard needs from the upload transport.
pub trait UploadTransport {
    /// Returns `true` only if `path` is a temporary file this transport delivered
    /// and that is still present.
    fn is_uploaded_file(&self, path: &Path) -> bool;

    /// Moves a delivered file to `target`, replacing any file already there.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be moved. Implementations must leave
    /// `target` untouched when `source` is not a delivered file.
    fn move_uploaded_file(&self, source: &Path, target: &Path) -> io::Result<()>;
}

/// Directory-backed upload transport.
///
/// Files received through [`SpoolTransport::receive`] or
/// [`SpoolTransport::receive_file`] are written to the spool directory and
/// recorded; only recorded paths pass [`UploadTransport::is_uploaded_file`].
#[derive(Debug)]
pub struct SpoolTransport {
    spool_dir: PathBuf,
    server_max_bytes: Option<u64>,
    issued: Mutex<HashSet<PathBuf>>,
}

impl SpoolTransport {
    /// Creates a transport writing into `spool_dir`.
    ///
    /// # Errors
    ///
    /// Returns [`GuardError::InvalidInput`] if `spool_dir` is not an existing directory,
    /// or an I/O error if it cannot be canonicalised.
    pub fn new(spool_dir: &Path) -> GuardResult<Self> {
        if !spool_dir.is_dir() {
            return Err(GuardError::InvalidInput(format!(
                "Spool directory does not exist: {}",
                spool_dir.display()
            )));
        }

        Ok(Self {
            spool_dir: spool_dir.canonicalize()?,
            server_max_bytes: None,
            issued: Mutex::new(HashSet::new()),
        })
    }

    /// Sets a server-wide size limit. Bodies above it are refused with
    /// [`ErrorCode::IniSize`] and never written to the spool.
    #[must_use]
    pub fn with_server_max_bytes(mut self, limit: u64) -> Self {
        self.server_max_bytes = Some(limit);
        self
    }

    pub fn spool_dir(&self) -> &Path {
        &self.spool_dir
    }

    /// Stages an uploaded body and describes it.
    ///
    /// Transport-level failures (no filename, body over the server limit, spool
    /// write failure) are reported through the returned request's
    /// `transport_error_code` rather than as an `Err`, matching how a web server
    /// hands failed uploads to application code.
    pub fn receive(
        &self,
        original_name: &str,
        declared_mime_type: &str,
        body: &[u8],
    ) -> UploadRequest {
        if original_name.trim().is_empty() {
            return UploadRequest::failed(original_name, ErrorCode::NoFile);
        }

        let size = body.len() as u64;
        if self.server_max_bytes.is_some_and(|limit| size > limit) {
            tracing::warn!(
                original_name,
                size,
                "upload body exceeds the server limit"
            );
            return UploadRequest::failed(original_name, ErrorCode::IniSize);
        }

        let path = self.next_spool_path();
        if let Err(e) = fs::write(&path, body) {
            tracing::warn!(path = %path.display(), error = %e, "failed to write spool file");
            let _ = fs::remove_file(&path);
            return UploadRequest::failed(original_name, ErrorCode::CantWrite);
        }

        self.issued_set().insert(path.clone());
        tracing::debug!(original_name, path = %path.display(), size, "upload spooled");

        UploadRequest::new(original_name, declared_mime_type, path, size, ErrorCode::Ok.code())
    }

    /// Stages a copy of an existing file, using its filename as the original name.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if `path` cannot be read.
    pub fn receive_file(
        &self,
        path: &Path,
        declared_mime_type: &str,
    ) -> GuardResult<UploadRequest> {
        let body = fs::read(path).map_err(|e| {
            GuardError::Io(io::Error::new(
                e.kind(),
                format!("Failed to read source file {}: {}", path.display(), e),
            ))
        })?;

        let original_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(self.receive(&original_name, declared_mime_type, &body))
    }

    /// Removes every issued file that was never moved, as a web server does at the
    /// end of a request. Returns how many files were removed.
    ///
    /// # Errors
    ///
    /// Returns the first I/O error other than a file already being gone.
    pub fn cleanup(&self) -> io::Result<usize> {
        let mut issued = self.issued_set();
        let mut removed = 0;
        for path in issued.drain() {
            match fs::remove_file(&path) {
                Ok(()) => removed += 1,
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => return Err(e),
            }
        }
        if removed > 0 {
            tracing::debug!(removed, "discarded unclaimed spool files");
        }
        Ok(removed)
    }

    fn next_spool_path(&self) -> PathBuf {
        self.spool_dir.join(format!(
            "{}{}{}",
            SPOOL_FILE_PREFIX,
            Uuid::new_v4().simple(),
            SPOOL_FILE_SUFFIX
        ))
    }

    fn issued_set(&self) -> std::sync::MutexGuard<'_, HashSet<PathBuf>> {
        self.issued.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl UploadTransport for SpoolTransport {
    fn is_uploaded_file(&self, path: &Path) -> bool {
        if !self.issued_set().contains(path) {
            return false;
        }

        // The file must still be a regular file; a symlink swapped in after
        // issue does not count.
        fs::symlink_metadata(path)
            .map(|m| m.file_type().is_file())
            .unwrap_or(false)
    }

    fn move_uploaded_file(&self, source: &Path, target: &Path) -> io::Result<()> {
        if !self.is_uploaded_file(source) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("not a delivered upload: {}", source.display()),
            ));
        }

        match fs::rename(source, target) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
                copy_then_remove(source, target, |p| fs::remove_file(p))?;
            }
            Err(e) => return Err(e),
        }

        self.issued_set().remove(source);
        Ok(())
    }
}

/// Copies `source` to `target` and removes `source`. If the source cannot be
/// removed the copy is deleted again, so a failure leaves only the source.
fn copy_then_remove<F>(source: &Path, target: &Path, remove_source: F) -> io::Result<()>
where
    F: FnOnce(&Path) -> io::Result<()>,
{
    fs::copy(source, target)?;
    if let Err(e) = remove_source(source) {
        if let Err(cleanup) = fs::remove_file(target) {
            tracing::warn!(
                target = %target.display(),
                error = %cleanup,
                "failed to remove copied upload after source removal failed"
            );
        }
        return Err(e);
    }
    Ok(())
}
