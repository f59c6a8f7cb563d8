//! The upload guard: validation state for a single uploaded file and the move
//! that places it.
//!
//! A guard is built once per upload. Construction never fails; every problem is
//! recorded as an [`ErrorCode`] that callers can inspect, correct through the
//! setters, and then act on with [`UploadGuard::upload`].
//!
//! # Error code precedence
//!
//! 1. Source not delivered by the transport (104), once `upload` has checked it
//! 2. Destination directory missing (104)
//! 3. Transport failure code, passed through unchanged
//! 4. Size above the configured maximum (101)
//! 5. Extension on the denylist (102)

use crate::codes::ErrorCode;
use crate::config::GuardConfig;
use crate::constants::DENIED_EXTENSIONS;
use crate::destination::{check_dir, Category, Resolved};
use crate::naming::{extension_of, sanitize_name};
use crate::transport::{UploadRequest, UploadTransport};
use crate::UploadError;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use upload_types::{Extension, SanitizedName};

/// Caller choices for [`UploadGuard::upload`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadOptions {
    /// Replace an existing file at the target path instead of numbering the name
    pub overwrite: bool,

    /// Stored name to use instead of the original one
    pub new_name: Option<String>,

    /// Destination directory to use instead of the resolved one
    pub destination: Option<String>,
}

impl UploadOptions {
    pub fn overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    pub fn new_name(mut self, name: impl Into<String>) -> Self {
        self.new_name = Some(name.into());
        self
    }

    pub fn destination(mut self, dir: impl Into<String>) -> Self {
        self.destination = Some(dir.into());
        self
    }
}

/// Validated state for one uploaded file.
#[derive(Debug, Clone)]
pub struct UploadGuard {
    request: UploadRequest,
    fallback_dir: PathBuf,
    name: SanitizedName,
    extension: Extension,
    max_size_bytes: u64,
    destination_dir: PathBuf,
    rejected_destination: Option<PathBuf>,
    source_rejected: bool,
    error_code: ErrorCode,
}

impl UploadGuard {
    /// Builds a guard with the default directories and limits.
    ///
    /// See [`UploadGuard::with_config`].
    pub fn new(request: UploadRequest, destination: Option<&Path>, max_size: Option<u64>) -> Self {
        Self::with_config(&GuardConfig::default(), request, destination, max_size)
    }

    /// Builds a guard for `request`.
    ///
    /// # Arguments
    ///
    /// * `config` - Default directories and maximum size
    /// * `request` - Upload metadata reported by the transport
    /// * `destination` - Explicit destination directory. When `None`, the directory is
    ///   chosen by extension category. When given but not an existing directory, the
    ///   guard records [`ErrorCode::InvalidDestination`] and keeps the path as given.
    /// * `max_size` - Per-file ceiling overriding `config.max_size_bytes()`
    pub fn with_config(
        config: &GuardConfig,
        request: UploadRequest,
        destination: Option<&Path>,
        max_size: Option<u64>,
    ) -> Self {
        let name = sanitize_name(&request.original_name);
        let extension = extension_of(&request.original_name);

        let (destination_dir, rejected_destination) = match destination {
            None => (
                Category::of(&extension).default_dir(config).to_path_buf(),
                None,
            ),
            Some(dir) => match check_dir(dir) {
                Resolved::Valid(dir) => (dir, None),
                Resolved::Missing(dir) => (dir.clone(), Some(dir)),
            },
        };

        let mut guard = Self {
            request,
            fallback_dir: config.uploads_dir().to_path_buf(),
            name,
            extension,
            max_size_bytes: max_size.unwrap_or_else(|| config.max_size_bytes()),
            destination_dir,
            rejected_destination,
            source_rejected: false,
            error_code: ErrorCode::Ok,
        };
        guard.refresh();

        tracing::debug!(
            original_name = %guard.request.original_name,
            stored_name = %guard.name,
            extension = %guard.extension,
            destination = %guard.destination_dir.display(),
            code = guard.error_code.code(),
            "upload guard created"
        );

        guard
    }

    pub fn request(&self) -> &UploadRequest {
        &self.request
    }

    pub fn original_name(&self) -> &str {
        &self.request.original_name
    }

    pub fn declared_mime_type(&self) -> &str {
        &self.request.declared_mime_type
    }

    pub fn source_path(&self) -> &Path {
        &self.request.source_path
    }

    pub fn reported_size(&self) -> u64 {
        self.request.reported_size
    }

    pub fn sanitized_name(&self) -> &SanitizedName {
        &self.name
    }

    pub fn extension(&self) -> &Extension {
        &self.extension
    }

    pub fn category(&self) -> Category {
        Category::of(&self.extension)
    }

    pub fn max_size_bytes(&self) -> u64 {
        self.max_size_bytes
    }

    pub fn destination_dir(&self) -> &Path {
        &self.destination_dir
    }

    pub fn error_code(&self) -> ErrorCode {
        self.error_code
    }

    /// Renders the current error code. A destination error names the directory
    /// that was rejected, not the fallback.
    pub fn error_message(&self) -> String {
        let destination = self
            .rejected_destination
            .as_deref()
            .unwrap_or(&self.destination_dir);
        self.error_code.message(destination)
    }

    pub fn is_ok(&self) -> bool {
        self.error_code.is_ok()
    }

    /// Path the file would be stored at when overwriting.
    pub fn target_path(&self) -> PathBuf {
        self.destination_dir
            .join(self.name.with_extension(&self.extension))
    }

    /// Changes the size ceiling and re-runs the size and extension checks.
    pub fn set_max_size(&mut self, max_size_bytes: u64) {
        self.max_size_bytes = max_size_bytes;
        self.refresh();
    }

    /// Changes the destination directory.
    ///
    /// An existing directory is accepted and clears any earlier destination error.
    /// Anything else records [`ErrorCode::InvalidDestination`] and falls back to the
    /// generic uploads directory.
    pub fn set_destination(&mut self, dir: &Path) {
        match check_dir(dir) {
            Resolved::Valid(dir) => {
                self.destination_dir = dir;
                self.rejected_destination = None;
            }
            Resolved::Missing(dir) => {
                tracing::warn!(
                    destination = %dir.display(),
                    fallback = %self.fallback_dir.display(),
                    "destination is not a directory"
                );
                self.destination_dir = self.fallback_dir.clone();
                self.rejected_destination = Some(dir);
            }
        }
        self.refresh();
    }

    /// Re-derives the stored name from `new_name` using the same rules as the
    /// original name, then re-runs the content checks. The extension is
    /// unaffected.
    pub fn rename(&mut self, new_name: &str) {
        self.name = sanitize_name(new_name);
        self.refresh();
    }

    /// Moves the uploaded file into its destination.
    ///
    /// `options.destination` and `options.new_name` are applied first, through the
    /// same paths as [`UploadGuard::set_destination`] and [`UploadGuard::rename`].
    /// With `overwrite` the file goes to [`UploadGuard::target_path`], replacing any
    /// existing file; otherwise a numeric suffix is appended to the name (`name1`,
    /// `name2`, ...) until a free path is found.
    ///
    /// # Returns
    ///
    /// The path the file was stored at.
    ///
    /// # Errors
    ///
    /// Returns:
    /// - [`UploadError::UntrustedSource`] if the transport does not vouch for the source file,
    /// - [`UploadError::Rejected`] if the guard carries a nonzero error code or the
    ///   destination directory no longer exists,
    /// - [`UploadError::Io`] if the move itself fails.
    ///
    /// No filesystem change is made in any error case.
    pub fn upload<T>(
        &mut self,
        transport: &T,
        options: &UploadOptions,
    ) -> Result<PathBuf, UploadError>
    where
        T: UploadTransport + ?Sized,
    {
        if let Some(destination) = &options.destination {
            self.set_destination(Path::new(destination.trim()));
        }
        if let Some(new_name) = &options.new_name {
            self.rename(new_name);
        }

        if !transport.is_uploaded_file(&self.request.source_path) {
            self.source_rejected = true;
            self.refresh();
            tracing::warn!(
                source = %self.request.source_path.display(),
                "refusing to move a file not delivered by the upload transport"
            );
            return Err(UploadError::UntrustedSource(self.request.source_path.clone()));
        }

        if !self.error_code.is_ok() {
            return Err(self.rejected());
        }

        if !self.destination_dir.is_dir() {
            self.rejected_destination = Some(self.destination_dir.clone());
            self.refresh();
            return Err(self.rejected());
        }

        let target = if options.overwrite {
            self.target_path()
        } else {
            self.free_target_path()
        };

        transport
            .move_uploaded_file(&self.request.source_path, &target)
            .map_err(|e| {
                UploadError::Io(io::Error::new(
                    e.kind(),
                    format!("Failed to move upload to {}: {}", target.display(), e),
                ))
            })?;

        tracing::info!(
            original_name = %self.request.original_name,
            stored = %target.display(),
            size = self.request.reported_size,
            "upload stored"
        );

        Ok(target)
    }

    fn rejected(&self) -> UploadError {
        tracing::warn!(
            original_name = %self.request.original_name,
            code = self.error_code.code(),
            "upload rejected"
        );
        UploadError::Rejected {
            code: self.error_code,
            message: self.error_message(),
        }
    }

    /// First of `name.ext`, `name1.ext`, `name2.ext`, ... with nothing at the path.
    ///
    /// Not atomic: a concurrent upload to the same directory can claim the path
    /// between this check and the move.
    fn free_target_path(&self) -> PathBuf {
        let mut candidate = self.target_path();
        let mut n: u32 = 1;
        while fs::symlink_metadata(&candidate).is_ok() {
            candidate = self
                .destination_dir
                .join(self.name.numbered(n).with_extension(&self.extension));
            n += 1;
        }
        candidate
    }

    fn content_code(&self) -> ErrorCode {
        if self.request.transport_error_code != 0 {
            return ErrorCode::from_code(self.request.transport_error_code);
        }
        if self.request.reported_size > self.max_size_bytes {
            return ErrorCode::Oversize;
        }
        if DENIED_EXTENSIONS.contains(&self.stored_extension().as_str()) {
            return ErrorCode::DisallowedExtension;
        }
        ErrorCode::Ok
    }

    /// Extension the stored file ends up with. Without an extension of its own
    /// the stored filename is the bare stem, so the stem's suffix counts.
    fn stored_extension(&self) -> Extension {
        if self.extension.is_empty() {
            Extension::from_filename(self.name.as_str())
        } else {
            self.extension.clone()
        }
    }

    fn refresh(&mut self) {
        self.error_code = if self.source_rejected || self.rejected_destination.is_some() {
            ErrorCode::InvalidDestination
        } else {
            self.content_code()
        };
    }
}

impl fmt::Display for UploadGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Upload:")?;
        writeln!(f, "original_name => {}", self.request.original_name)?;
        writeln!(f, "declared_mime_type => {}", self.request.declared_mime_type)?;
        writeln!(f, "source_path => {}", self.request.source_path.display())?;
        writeln!(f, "reported_size => {}", self.request.reported_size)?;
        writeln!(f, "error_code => {}", self.error_code)?;
        writeln!(f, "sanitized_name => {}", self.name)?;
        writeln!(f, "extension => {}", self.extension)?;
        writeln!(f, "max_size_bytes => {}", self.max_size_bytes)?;
        writeln!(f, "destination_dir => {}", self.destination_dir.display())?;
        write!(f, "error_message => {}", self.error_message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::SpoolTransport;
    use tempfile::TempDir;

    fn request(name: &str, size: u64, code: i32) -> UploadRequest {
        UploadRequest::new(name, "application/octet-stream", "/tmp/phpA1b2C3", size, code)
    }

    /// Spool and destination directories under one temp root.
    fn fixture() -> (TempDir, SpoolTransport, PathBuf) {
        let temp = TempDir::new().unwrap();
        let spool_dir = temp.path().join("spool");
        let dest = temp.path().join("dest");
        fs::create_dir_all(&spool_dir).unwrap();
        fs::create_dir_all(&dest).unwrap();
        let spool = SpoolTransport::new(&spool_dir).unwrap();
        (temp, spool, dest)
    }

    fn staged(spool: &SpoolTransport, name: &str, body: &[u8], dest: &Path) -> UploadGuard {
        UploadGuard::new(spool.receive(name, "text/plain", body), Some(dest), None)
    }

    #[test]
    fn derives_name_and_extension() {
        let guard = UploadGuard::new(request("Summer Photo.JPG", 10, 0), None, None);
        assert_eq!(guard.sanitized_name().as_str(), "Summer_Photo");
        assert_eq!(guard.extension(), &"jpg");
        assert!(guard.is_ok());
    }

    #[test]
    fn oversize_is_reported() {
        let guard = UploadGuard::new(request("big.zip", 500, 0), None, Some(100));
        assert_eq!(guard.error_code(), ErrorCode::Oversize);
        assert_eq!(guard.error_code().code(), 101);
        assert_eq!(
            guard.error_message(),
            ErrorCode::Oversize.message(guard.destination_dir())
        );
    }

    #[test]
    fn php_is_disallowed() {
        let guard = UploadGuard::new(request("shell.php", 10, 0), None, None);
        assert_eq!(guard.error_code().code(), 102);

        let guard = UploadGuard::new(request("shell.PHTML", 10, 0), None, None);
        assert_eq!(guard.error_code(), ErrorCode::DisallowedExtension);
    }

    #[test]
    fn trailing_dot_does_not_slip_past_denylist() {
        for original in ["shell.php.", "x.PHP.", "shell.php. "] {
            let guard = UploadGuard::new(request(original, 10, 0), None, None);
            assert_eq!(guard.extension(), &"php", "{original:?}");
            assert_eq!(guard.error_code(), ErrorCode::DisallowedExtension, "{original:?}");
        }
    }

    #[test]
    fn rename_to_executable_stem_is_disallowed() {
        let mut guard = UploadGuard::new(request("Makefile", 10, 0), None, None);
        assert!(guard.is_ok());

        guard.rename("shell.php.bak");
        assert_eq!(guard.target_path(), Path::new("./uploads/shell.php"));
        assert_eq!(guard.error_code(), ErrorCode::DisallowedExtension);

        guard.rename("notes");
        assert!(guard.is_ok());
    }

    #[test]
    fn upload_of_trailing_dot_php_stores_nothing() {
        let (_temp, spool, dest) = fixture();
        for original in ["shell.php.", "x.PHP."] {
            let mut guard = staged(&spool, original, b"<?php", &dest);
            let result = guard.upload(&spool, &UploadOptions::default());
            assert!(matches!(
                result,
                Err(UploadError::Rejected { code: ErrorCode::DisallowedExtension, .. })
            ));
        }
        assert_eq!(fs::read_dir(&dest).unwrap().count(), 0);
    }

    #[test]
    fn dot_only_names_stay_inside_destination() {
        let (_temp, spool, dest) = fixture();
        for original in ["..", "..."] {
            let mut guard = staged(&spool, original, b"x", &dest);
            assert_eq!(guard.target_path(), dest.join("unnamed"));
            let stored = guard
                .upload(&spool, &UploadOptions::default().overwrite(true))
                .unwrap();
            assert_eq!(stored, dest.join("unnamed"));
        }
        assert_eq!(fs::read_dir(&dest).unwrap().count(), 1);
    }

    #[test]
    fn transport_error_masks_size_and_extension() {
        let guard = UploadGuard::new(request("shell.php", 500, 3), None, Some(100));
        assert_eq!(guard.error_code(), ErrorCode::Partial);
    }

    #[test]
    fn size_is_checked_before_extension() {
        let guard = UploadGuard::new(request("shell.php", 500, 0), None, Some(100));
        assert_eq!(guard.error_code(), ErrorCode::Oversize);
    }

    #[test]
    fn unknown_transport_codes_pass_through() {
        let guard = UploadGuard::new(request("a.txt", 1, 42), None, None);
        assert_eq!(guard.error_code(), ErrorCode::Unknown(42));
        assert_eq!(guard.error_message(), "Unknown upload error");
    }

    #[test]
    fn default_destination_by_category() {
        let img = UploadGuard::new(request("a.png", 1, 0), None, None);
        let doc = UploadGuard::new(request("a.pdf", 1, 0), None, None);
        let other = UploadGuard::new(request("a.zip", 1, 0), None, None);
        let bare = UploadGuard::new(request("Makefile", 1, 0), None, None);

        assert_eq!(img.destination_dir(), Path::new("./img/"));
        assert_eq!(doc.destination_dir(), Path::new("./docs/"));
        assert_eq!(other.destination_dir(), Path::new("./uploads/"));
        assert_eq!(bare.destination_dir(), Path::new("./uploads/"));
        assert_eq!(img.category(), Category::Image);
        assert_eq!(doc.category(), Category::Document);
    }

    #[test]
    fn constructor_keeps_invalid_destination_as_given() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("nope/");

        let guard = UploadGuard::new(request("a.png", 1, 0), Some(missing.as_path()), None);

        assert_eq!(guard.error_code().code(), 104);
        assert_eq!(guard.destination_dir(), missing.as_path());
        assert!(guard.error_message().contains("nope"));
    }

    #[test]
    fn constructor_destination_overrides_transport_error() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("nope");

        let guard = UploadGuard::new(request("a.png", 1, 4), Some(missing.as_path()), None);
        assert_eq!(guard.error_code(), ErrorCode::InvalidDestination);
    }

    #[test]
    fn setter_falls_back_to_generic_directory() {
        let temp = TempDir::new().unwrap();
        let mut guard = UploadGuard::new(request("a.png", 1, 0), Some(temp.path()), None);
        assert!(guard.is_ok());

        guard.set_destination(&temp.path().join("missing"));

        assert_eq!(guard.error_code(), ErrorCode::InvalidDestination);
        assert_eq!(guard.destination_dir(), Path::new("./uploads/"));
        assert!(guard.error_message().contains("missing"));
    }

    #[test]
    fn setter_with_valid_directory_clears_destination_error() {
        let temp = TempDir::new().unwrap();
        let mut guard = UploadGuard::new(
            request("a.png", 1, 0),
            Some(temp.path().join("missing").as_path()),
            None,
        );
        assert_eq!(guard.error_code(), ErrorCode::InvalidDestination);

        guard.set_destination(temp.path());

        assert!(guard.is_ok());
        assert_eq!(guard.destination_dir(), temp.path());
    }

    #[test]
    fn set_max_size_revalidates() {
        let mut guard = UploadGuard::new(request("a.txt", 500, 0), None, Some(100));
        assert_eq!(guard.error_code(), ErrorCode::Oversize);

        guard.set_max_size(1_000);
        assert!(guard.is_ok());

        guard.set_max_size(10);
        assert_eq!(guard.error_code(), ErrorCode::Oversize);
    }

    #[test]
    fn rename_keeps_extension() {
        let mut guard = UploadGuard::new(request("a.txt", 1, 0), None, None);
        guard.rename("Final Version.docx");
        assert_eq!(guard.sanitized_name().as_str(), "Final_Version");
        assert_eq!(guard.extension(), &"txt");
        assert!(guard.target_path().ends_with("Final_Version.txt"));
    }

    #[test]
    fn display_lists_every_field() {
        let guard = UploadGuard::new(request("a b.txt", 7, 0), None, None);
        let rendered = guard.to_string();
        for field in [
            "original_name => a b.txt",
            "declared_mime_type => application/octet-stream",
            "source_path => /tmp/phpA1b2C3",
            "reported_size => 7",
            "error_code => 0",
            "sanitized_name => a_b",
            "extension => txt",
            "max_size_bytes => 999999",
            "destination_dir => ./docs/",
            "error_message => Upload accepted",
        ] {
            assert!(rendered.contains(field), "missing {field:?} in {rendered}");
        }
    }

    #[test]
    fn upload_moves_to_destination() {
        let (_temp, spool, dest) = fixture();
        let req = spool.receive("My Notes.TXT", "text/plain", b"hello");
        let mut guard = UploadGuard::new(req, Some(dest.as_path()), None);

        let stored = guard.upload(&spool, &UploadOptions::default()).unwrap();

        assert_eq!(stored, dest.join("My_Notes.txt"));
        assert_eq!(fs::read(&stored).unwrap(), b"hello");
        assert!(!guard.source_path().exists());
    }

    #[test]
    fn upload_without_overwrite_numbers_collisions() {
        let (_temp, spool, dest) = fixture();

        let mut first = staged(&spool, "a.txt", b"one", &dest);
        let mut second = staged(&spool, "a.txt", b"two", &dest);
        let mut third = staged(&spool, "a.txt", b"three", &dest);

        let p1 = first.upload(&spool, &UploadOptions::default()).unwrap();
        let p2 = second.upload(&spool, &UploadOptions::default()).unwrap();
        let p3 = third.upload(&spool, &UploadOptions::default()).unwrap();

        assert_eq!(p1, dest.join("a.txt"));
        assert_eq!(p2, dest.join("a1.txt"));
        assert_eq!(p3, dest.join("a2.txt"));
        assert_eq!(fs::read(&p1).unwrap(), b"one");
        assert_eq!(fs::read(&p2).unwrap(), b"two");
    }

    #[test]
    fn upload_with_overwrite_replaces_existing() {
        let (_temp, spool, dest) = fixture();
        fs::write(dest.join("a.txt"), b"old").unwrap();

        let mut guard = staged(&spool, "a.txt", b"new", &dest);
        let stored = guard
            .upload(&spool, &UploadOptions::default().overwrite(true))
            .unwrap();

        assert_eq!(stored, dest.join("a.txt"));
        assert_eq!(fs::read(&stored).unwrap(), b"new");
        assert_eq!(fs::read_dir(&dest).unwrap().count(), 1);
    }

    #[test]
    fn upload_with_error_code_touches_nothing() {
        let (_temp, spool, dest) = fixture();
        let req = spool.receive("shell.php", "text/plain", b"<?php");
        let source = req.source_path.clone();
        let mut guard = UploadGuard::new(req, Some(dest.as_path()), None);

        let result = guard.upload(&spool, &UploadOptions::default().overwrite(true));

        assert!(matches!(
            result,
            Err(UploadError::Rejected { code: ErrorCode::DisallowedExtension, .. })
        ));
        assert_eq!(fs::read_dir(&dest).unwrap().count(), 0);
        assert!(source.exists());
    }

    #[test]
    fn upload_refuses_untrusted_source() {
        let (temp, spool, dest) = fixture();
        let forged = temp.path().join("forged.txt");
        fs::write(&forged, b"x").unwrap();

        let req = UploadRequest::new("forged.txt", "text/plain", &forged, 1, 0);
        let mut guard = UploadGuard::new(req, Some(dest.as_path()), None);

        let result = guard.upload(&spool, &UploadOptions::default());

        assert!(matches!(result, Err(UploadError::UntrustedSource(_))));
        assert_eq!(guard.error_code(), ErrorCode::InvalidDestination);
        assert_eq!(guard.error_code().code(), 104);
        assert!(forged.exists());
        assert_eq!(fs::read_dir(&dest).unwrap().count(), 0);
    }

    #[test]
    fn upload_applies_new_name_and_destination() {
        let (temp, spool, _dest) = fixture();
        let other = temp.path().join("other");
        fs::create_dir(&other).unwrap();

        let mut guard = UploadGuard::new(spool.receive("a.txt", "text/plain", b"x"), None, None);
        let options = UploadOptions::default()
            .new_name("renamed file.bin")
            .destination(format!("  {}  ", other.display()));
        let stored = guard.upload(&spool, &options).unwrap();

        assert_eq!(stored, other.join("renamed_file.txt"));
    }

    #[test]
    fn upload_with_missing_destination_option_is_rejected() {
        let (temp, spool, dest) = fixture();
        let mut guard = staged(&spool, "a.txt", b"x", &dest);

        let result = guard.upload(
            &spool,
            &UploadOptions::default()
                .destination(temp.path().join("missing").display().to_string()),
        );

        assert!(matches!(
            result,
            Err(UploadError::Rejected { code: ErrorCode::InvalidDestination, .. })
        ));
        assert_eq!(guard.destination_dir(), Path::new("./uploads/"));
    }

    #[test]
    fn upload_rechecks_destination_before_moving() {
        let (temp, spool, _dest) = fixture();
        let doomed = temp.path().join("doomed");
        fs::create_dir(&doomed).unwrap();

        let mut guard = staged(&spool, "a.txt", b"x", &doomed);
        assert!(guard.is_ok());
        fs::remove_dir(&doomed).unwrap();

        let result = guard.upload(&spool, &UploadOptions::default());
        assert!(matches!(
            result,
            Err(UploadError::Rejected { code: ErrorCode::InvalidDestination, .. })
        ));
        assert!(!doomed.exists());
    }

    #[test]
    fn second_upload_of_same_guard_is_untrusted() {
        let (_temp, spool, dest) = fixture();
        let mut guard = staged(&spool, "a.txt", b"x", &dest);

        guard.upload(&spool, &UploadOptions::default()).unwrap();
        let again = guard.upload(&spool, &UploadOptions::default());

        assert!(matches!(again, Err(UploadError::UntrustedSource(_))));
        assert_eq!(fs::read_dir(&dest).unwrap().count(), 1);
    }
}
