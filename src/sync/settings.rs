//! Environment-driven location of the persisted mapping document.

use camino::{Utf8Path, Utf8PathBuf};

/// Environment variable naming the mapping document path.
pub const MAPPING_FILE_ENV: &str = "MAPPING_FILE";

/// Path used when [`MAPPING_FILE_ENV`] is unset or empty.
pub const DEFAULT_MAPPING_FILE: &str = "data/mapping.json";

/// Location of the persisted mapping document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingSettings {
    path: Utf8PathBuf,
}

impl MappingSettings {
    /// Creates settings for an explicit path.
    #[must_use]
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Reads the mapping path from the environment, falling back to
    /// [`DEFAULT_MAPPING_FILE`].
    #[must_use]
    pub fn from_env() -> Self {
        let path = std::env::var(MAPPING_FILE_ENV)
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map_or_else(|| Utf8PathBuf::from(DEFAULT_MAPPING_FILE), Utf8PathBuf::from);
        Self { path }
    }

    /// Returns the full path of the mapping document.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Returns the directory holding the mapping document, or `"."` for a
    /// bare file name.
    #[must_use]
    pub fn directory(&self) -> &Utf8Path {
        match self.path.parent() {
            Some(parent) if !parent.as_str().is_empty() => parent,
            _ => Utf8Path::new("."),
        }
    }

    /// Returns the mapping document file name.
    #[must_use]
    pub fn file_name(&self) -> &str {
        self.path.file_name().unwrap_or("mapping.json")
    }
}

impl Default for MappingSettings {
    fn default() -> Self {
        Self::new(DEFAULT_MAPPING_FILE)
    }
}
