//! Guard runtime configuration.
//!
//! Configuration is resolved once at process startup and passed into the guard.
//! Nothing in this crate reads environment variables while an upload is being
//! handled; the binary reads them and hands the raw values to the helpers below.

use crate::constants::{DEFAULT_MAX_SIZE, DEFAULT_SPOOL_DIR, DOC_DIR, IMG_DIR, UPLOAD_GEN_DIR};
use crate::{GuardError, GuardResult};
use std::path::{Path, PathBuf};

/// Directory defaults and limits applied to every guard built from this config.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GuardConfig {
    images_dir: PathBuf,
    docs_dir: PathBuf,
    uploads_dir: PathBuf,
    spool_dir: PathBuf,
    max_size_bytes: u64,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            images_dir: PathBuf::from(IMG_DIR),
            docs_dir: PathBuf::from(DOC_DIR),
            uploads_dir: PathBuf::from(UPLOAD_GEN_DIR),
            spool_dir: PathBuf::from(DEFAULT_SPOOL_DIR),
            max_size_bytes: DEFAULT_MAX_SIZE,
        }
    }
}

impl GuardConfig {
    /// Create a new `GuardConfig`.
    ///
    /// # Errors
    ///
    /// Returns [`GuardError::InvalidInput`] if `max_size_bytes` is zero or any
    /// directory path is empty.
    pub fn new(
        images_dir: PathBuf,
        docs_dir: PathBuf,
        uploads_dir: PathBuf,
        spool_dir: PathBuf,
        max_size_bytes: u64,
    ) -> GuardResult<Self> {
        if max_size_bytes == 0 {
            return Err(GuardError::InvalidInput(
                "max_size_bytes must be greater than zero".into(),
            ));
        }

        for (label, dir) in [
            ("images_dir", &images_dir),
            ("docs_dir", &docs_dir),
            ("uploads_dir", &uploads_dir),
            ("spool_dir", &spool_dir),
        ] {
            if dir.as_os_str().is_empty() {
                return Err(GuardError::InvalidInput(format!("{label} cannot be empty")));
            }
        }

        Ok(Self {
            images_dir,
            docs_dir,
            uploads_dir,
            spool_dir,
            max_size_bytes,
        })
    }

    /// Builds a config from optional raw values, falling back to the defaults for
    /// anything missing or blank.
    ///
    /// This is the entry point used by the binary with values taken from
    /// `UPLOAD_IMG_DIR`, `UPLOAD_DOC_DIR`, `UPLOAD_GEN_DIR`, `UPLOAD_SPOOL_DIR`
    /// and `UPLOAD_MAX_SIZE`.
    ///
    /// # Errors
    ///
    /// Returns [`GuardError::InvalidInput`] if the max size cannot be parsed.
    pub fn from_env_values(
        images_dir: Option<String>,
        docs_dir: Option<String>,
        uploads_dir: Option<String>,
        spool_dir: Option<String>,
        max_size: Option<String>,
    ) -> GuardResult<Self> {
        let defaults = Self::default();
        Self::new(
            dir_from_env_value(images_dir).unwrap_or(defaults.images_dir),
            dir_from_env_value(docs_dir).unwrap_or(defaults.docs_dir),
            dir_from_env_value(uploads_dir).unwrap_or(defaults.uploads_dir),
            dir_from_env_value(spool_dir).unwrap_or(defaults.spool_dir),
            max_size_from_env_value(max_size)?,
        )
    }

    pub fn images_dir(&self) -> &Path {
        &self.images_dir
    }

    pub fn docs_dir(&self) -> &Path {
        &self.docs_dir
    }

    pub fn uploads_dir(&self) -> &Path {
        &self.uploads_dir
    }

    pub fn spool_dir(&self) -> &Path {
        &self.spool_dir
    }

    pub fn max_size_bytes(&self) -> u64 {
        self.max_size_bytes
    }
}

/// Parse the max upload size from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns [`DEFAULT_MAX_SIZE`].
pub fn max_size_from_env_value(value: Option<String>) -> GuardResult<u64> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());

    match value {
        None => Ok(DEFAULT_MAX_SIZE),
        Some(v) => match v.parse::<u64>() {
            Ok(0) => Err(GuardError::InvalidInput(
                "UPLOAD_MAX_SIZE must be greater than zero".into(),
            )),
            Ok(n) => Ok(n),
            Err(e) => Err(GuardError::InvalidInput(format!(
                "UPLOAD_MAX_SIZE is not a valid byte count ({v}): {e}"
            ))),
        },
    }
}

fn dir_from_env_value(value: Option<String>) -> Option<PathBuf> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}
