//! Upload error codes and their human-readable messages.
//!
//! Codes 0–8 use the upload transport's standard vocabulary. Codes 101–104 are
//! raised by the guard itself. Anything else is carried through as
//! [`ErrorCode::Unknown`].

use std::fmt;
use std::path::Path;

/// Outcome code recorded on an [`crate::UploadGuard`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    Ok,
    /// Server-configured size limit exceeded
    IniSize,
    /// Form-declared size limit exceeded
    FormSize,
    Partial,
    NoFile,
    NoTmpDir,
    CantWrite,
    /// A server extension aborted the upload
    Extension,
    /// Larger than the guard's configured maximum
    Oversize,
    DisallowedExtension,
    /// Corrupt upload
    Corrupt,
    /// Destination directory missing, or the source was not delivered by the
    /// upload transport
    InvalidDestination,
    Unknown(i32),
}

impl ErrorCode {
    pub const fn code(self) -> i32 {
        match self {
            Self::Ok => 0,
            Self::IniSize => 1,
            Self::FormSize => 2,
            Self::Partial => 3,
            Self::NoFile => 4,
            Self::NoTmpDir => 6,
            Self::CantWrite => 7,
            Self::Extension => 8,
            Self::Oversize => 101,
            Self::DisallowedExtension => 102,
            Self::Corrupt => 103,
            Self::InvalidDestination => 104,
            Self::Unknown(code) => code,
        }
    }

    pub const fn from_code(code: i32) -> Self {
        match code {
            0 => Self::Ok,
            1 => Self::IniSize,
            2 => Self::FormSize,
            3 => Self::Partial,
            4 => Self::NoFile,
            6 => Self::NoTmpDir,
            7 => Self::CantWrite,
            8 => Self::Extension,
            101 => Self::Oversize,
            102 => Self::DisallowedExtension,
            103 => Self::Corrupt,
            104 => Self::InvalidDestination,
            other => Self::Unknown(other),
        }
    }

    pub const fn is_ok(self) -> bool {
        matches!(self, Self::Ok)
    }

    /// Renders the message for this code.
    ///
    /// `destination` is only used by [`ErrorCode::InvalidDestination`], whose
    /// message names the directory that was rejected.
    pub fn message(self, destination: &Path) -> String {
        match self {
            Self::Ok => "Upload accepted".into(),
            Self::IniSize => {
                "The uploaded file exceeds the server's configured maximum upload size".into()
            }
            Self::FormSize => {
                "The uploaded file exceeds the maximum size declared by the form".into()
            }
            Self::Partial => "The file was only partially uploaded".into(),
            Self::NoFile => "No file was uploaded".into(),
            Self::NoTmpDir => "Missing a temporary folder".into(),
            Self::CantWrite => "Failed to write the file to disk".into(),
            Self::Extension => "A server extension stopped the file upload".into(),
            Self::Oversize => "The file exceeds the maximum size allowed for this upload".into(),
            Self::DisallowedExtension => "File type not permitted".into(),
            Self::Corrupt => "The uploaded file is corrupt".into(),
            Self::InvalidDestination => format!(
                "The specified destination ('{}') does not exist",
                destination.display()
            ),
            Self::Unknown(_) => "Unknown upload error".into(),
        }
    }
}

impl From<i32> for ErrorCode {
    fn from(code: i32) -> Self {
        Self::from_code(code)
    }
}

impl From<ErrorCode> for i32 {
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
