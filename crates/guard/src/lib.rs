//! Upload Guard
//!
//! This crate validates an uploaded file and moves it into place on the server.
//!
//! ## Flow
//!
//! - The upload transport stages the body in a temporary file and describes it
//!   with an [`UploadRequest`]
//! - An [`UploadGuard`] derives a safe stored name and the lowercased extension,
//!   checks the transport code, size and extension, and resolves a destination
//!   directory
//! - Problems are recorded as an [`ErrorCode`] with a readable message; nothing
//!   fails at construction
//! - [`UploadGuard::upload`] moves the file, either replacing an existing file or
//!   picking a free numbered name
//!
//! Only files the transport vouches for are ever moved. See [`UploadTransport`].
//!
//! ## Example Usage
//!
//! ```no_run
//! use upload_guard::{SpoolTransport, UploadGuard, UploadOptions};
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let spool = SpoolTransport::new(Path::new("/var/spool/uploads"))?;
//! let request = spool.receive("Holiday Photo.JPG", "image/jpeg", b"...");
//!
//! let mut guard = UploadGuard::new(request, None, Some(5 * 1024 * 1024));
//! if guard.is_ok() {
//!     let stored = guard.upload(&spool, &UploadOptions::default())?;
//!     println!("stored at {}", stored.display());
//! } else {
//!     eprintln!("{}", guard.error_message());
//! }
//! # Ok(())
//! # }
//! ```

pub mod batch;
pub mod codes;
pub mod config;
pub mod constants;
pub mod destination;
mod guard;
pub mod naming;
pub mod transport;

pub use batch::{load_file, multi_upload, UploadReport};
pub use codes::ErrorCode;
pub use config::GuardConfig;
pub use destination::Category;
pub use guard::{UploadGuard, UploadOptions};
pub use transport::{SpoolTransport, UploadRequest, UploadTransport};
pub use upload_types::{Extension, SanitizedName};

use std::path::PathBuf;

/// Errors raised while configuring the guard or staging uploads
#[derive(Debug, thiserror::Error)]
pub enum GuardError {
    /// Configuration or argument validation failed
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// I/O error occurred
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type GuardResult<T> = std::result::Result<T, GuardError>;

/// Reasons [`UploadGuard::upload`] did not store a file
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    /// The guard carries a nonzero error code
    #[error("Upload rejected ({code}): {message}")]
    Rejected { code: ErrorCode, message: String },

    /// The source file was not delivered by the upload transport
    #[error("Source file was not delivered by the upload transport: {}", .0.display())]
    UntrustedSource(PathBuf),

    /// Moving the file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl UploadError {
    /// The error code a caller should record for this failure.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Rejected { code, .. } => *code,
            Self::UntrustedSource(_) => ErrorCode::InvalidDestination,
            Self::Io(_) => ErrorCode::CantWrite,
        }
    }

    /// Human-readable message without the code prefix.
    pub fn message(&self) -> String {
        match self {
            Self::Rejected { message, .. } => message.clone(),
            Self::UntrustedSource(path) => format!(
                "Source file was not delivered by the upload transport: {}",
                path.display()
            ),
            Self::Io(e) => e.to_string(),
        }
    }
}
