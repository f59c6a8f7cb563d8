//! Validated name types shared by the upload guard crates.
//!
//! Both types guarantee their invariants once constructed, so code holding an
//! [`Extension`] or a [`SanitizedName`] never has to re-check them.

/// Errors that can occur when creating validated name types.
#[derive(Debug, thiserror::Error)]
pub enum NameError {
    /// The name was empty after sanitisation
    #[error("Name cannot be empty")]
    Empty,

    /// The name contained a space character
    #[error("Name must not contain spaces: {0}")]
    ContainsSpace(String),

    /// The name would resolve to the current or parent directory
    #[error("Name must not consist only of dots: {0}")]
    DotsOnly(String),

    /// The extension was not lowercase or carried a leading dot
    #[error("Extension must be lowercase without a leading dot: {0}")]
    InvalidExtension(String),
}

/// A lowercase file extension without its leading dot.
///
/// An empty extension is valid: it represents a filename that had no `.` at all.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Extension(String);

impl Extension {
    /// Derives the extension of `filename`: the text after the last `.`, lowercased.
    ///
    /// Returns an empty extension when the filename contains no `.`.
    pub fn from_filename(filename: &str) -> Self {
        match filename.rfind('.') {
            Some(pos) => Self(filename[pos + 1..].to_lowercase()),
            None => Self::default(),
        }
    }

    /// Wraps an already-normalised extension.
    ///
    /// # Errors
    ///
    /// Returns [`NameError::InvalidExtension`] if `input` starts with `.` or contains
    /// uppercase characters.
    pub fn parse(input: &str) -> Result<Self, NameError> {
        if input.starts_with('.') || input.to_lowercase() != input {
            return Err(NameError::InvalidExtension(input.to_owned()));
        }
        Ok(Self(input.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for Extension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Extension {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for Extension {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Extension {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// A filename stem that is safe to place in a destination directory.
///
/// The wrapped string is never empty, never contains a space, and is never made
/// up of dots alone.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SanitizedName(String);

impl SanitizedName {
    /// Wraps a stem that has already been sanitised.
    ///
    /// # Errors
    ///
    /// Returns [`NameError::Empty`] for an empty input and
    /// [`NameError::ContainsSpace`] if the input still contains a space, and
    /// [`NameError::DotsOnly`] for inputs such as `.` or `..`.
    pub fn new(input: impl AsRef<str>) -> Result<Self, NameError> {
        let input = input.as_ref();
        if input.is_empty() {
            return Err(NameError::Empty);
        }
        if input.chars().all(|c| c == '.') {
            return Err(NameError::DotsOnly(input.to_owned()));
        }
        if input.contains(' ') {
            return Err(NameError::ContainsSpace(input.to_owned()));
        }
        Ok(Self(input.to_owned()))
    }

    /// Returns the stem with a numeric suffix appended, e.g. `report` → `report2`.
    pub fn numbered(&self, n: u32) -> Self {
        Self(format!("{}{}", self.0, n))
    }

    /// Composes the final filename, omitting the dot when `extension` is empty.
    pub fn with_extension(&self, extension: &Extension) -> String {
        if extension.is_empty() {
            self.0.clone()
        } else {
            format!("{}.{}", self.0, extension)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SanitizedName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for SanitizedName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl serde::Serialize for Extension {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for Extension {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Extension::parse(&s).map_err(serde::de::Error::custom)
    }
}

impl serde::Serialize for SanitizedName {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for SanitizedName {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        SanitizedName::new(&s).map_err(serde::de::Error::custom)
    }
}
