//! Destination directory resolution.

use crate::config::GuardConfig;
use crate::constants::{DOCUMENT_EXTENSIONS, IMAGE_EXTENSIONS};
use std::path::{Path, PathBuf};
use upload_types::Extension;

/// Category an extension is routed by when no explicit destination is given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Image,
    Document,
    Other,
}

impl Category {
    pub fn of(extension: &Extension) -> Self {
        let ext = extension.as_str();
        if IMAGE_EXTENSIONS.contains(&ext) {
            Self::Image
        } else if DOCUMENT_EXTENSIONS.contains(&ext) {
            Self::Document
        } else {
            Self::Other
        }
    }

    /// The configured default directory for this category.
    pub fn default_dir(self, config: &GuardConfig) -> &Path {
        match self {
            Self::Image => config.images_dir(),
            Self::Document => config.docs_dir(),
            Self::Other => config.uploads_dir(),
        }
    }
}

/// Result of checking a caller-supplied directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Resolved {
    Valid(PathBuf),
    Missing(PathBuf),
}

/// Checks that `dir` names an existing directory, following symlinks.
pub(crate) fn check_dir(dir: &Path) -> Resolved {
    if dir.is_dir() {
        Resolved::Valid(dir.to_path_buf())
    } else {
        Resolved::Missing(dir.to_path_buf())
    }
}
