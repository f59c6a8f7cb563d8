//! Filename derivation for uploaded files.

use crate::constants::{FALLBACK_NAME, NAME_MAX_LEN, NAME_TRUNCATED_LEN};
use upload_types::{Extension, SanitizedName};

/// Derives the stored filename stem from a client-supplied name.
///
/// Any directory components and control characters are dropped first, along
/// with trailing dots and whitespace. Names of up to [`NAME_MAX_LEN`] characters
/// keep everything before their last `.`; longer names keep their first
/// [`NAME_TRUNCATED_LEN`] characters followed by `_` and the length of
/// `original`. Spaces become underscores in both cases and leading dots are
/// removed, so the stem is never `.`, `..` or a hidden file.
///
/// Returns [`FALLBACK_NAME`] when nothing usable remains (e.g. `".htaccess"`).
pub fn sanitize_name(original: &str) -> SanitizedName {
    let base = base_name(original);

    let stem = if base.chars().count() > NAME_MAX_LEN {
        let head: String = base.chars().take(NAME_TRUNCATED_LEN).collect();
        format!("{}_{}", head, original.chars().count())
    } else {
        match base.rfind('.') {
            Some(pos) => base[..pos].to_owned(),
            None => base.clone(),
        }
    };

    let stem = stem.trim_start_matches('.').replace(' ', "_");
    SanitizedName::new(&stem).unwrap_or_else(|_| fallback_name())
}

/// Derives the lowercased extension from a client-supplied name.
pub fn extension_of(original: &str) -> Extension {
    Extension::from_filename(&base_name(original))
}

fn base_name(name: &str) -> String {
    name.rsplit(|c: char| c == '/' || c == '\\')
        .next()
        .unwrap_or(name)
        .chars()
        .filter(|c| !c.is_control())
        .collect::<String>()
        .trim_end_matches(|c: char| c == '.' || c.is_whitespace())
        .to_owned()
}

fn fallback_name() -> SanitizedName {
    SanitizedName::new(FALLBACK_NAME).expect("fallback name is non-empty without spaces")
}
