//! Constants used throughout the upload guard crate.
//!
//! The extension tables are read-only and shared process-wide.

/// Default destination for image uploads.
pub const IMG_DIR: &str = "./img/";

/// Default destination for document uploads.
pub const DOC_DIR: &str = "./docs/";

/// Default destination for anything that is neither an image nor a document.
pub const UPLOAD_GEN_DIR: &str = "./uploads/";

/// Default directory the spool transport writes temporary files into.
pub const DEFAULT_SPOOL_DIR: &str = "./spool/";

/// Default per-file ceiling in bytes.
pub const DEFAULT_MAX_SIZE: u64 = 999_999;

/// Original names longer than this (in characters) are truncated.
pub const NAME_MAX_LEN: usize = 100;

/// Number of leading characters kept when a name is truncated.
pub const NAME_TRUNCATED_LEN: usize = 95;

/// Stem used when nothing usable is left of the original name.
pub const FALLBACK_NAME: &str = "unnamed";

/// Extensions routed to [`IMG_DIR`].
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "png", "gif", "svg"];

/// Extensions routed to [`DOC_DIR`].
pub const DOCUMENT_EXTENSIONS: &[&str] = &["txt", "pdf", "xls", "doc"];

/// Server-executable extensions that are never accepted.
pub const DENIED_EXTENSIONS: &[&str] = &["php", "php3", "php4", "php5", "php7", "phtml", "phar"];

/// Prefix of temporary files issued by the spool transport.
pub const SPOOL_FILE_PREFIX: &str = "upload-";

/// Suffix of temporary files issued by the spool transport.
pub const SPOOL_FILE_SUFFIX: &str = ".tmp";
