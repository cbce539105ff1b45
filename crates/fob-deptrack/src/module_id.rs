use std::borrow::Cow;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use path_clean::PathClean;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

const VIRTUAL_PREFIXES: [&str; 2] = ["virtual:", "rolldown:"];

/// Canonical identifier for a tracked source module.
///
/// The identifier is the absolute, lexically cleaned filesystem path of the
/// module's backing file, so modules reached through different spellings
/// (`./a/../b.ts` vs `/abs/b.ts`) compare equal. Virtual modules emitted by a
/// bundler have no backing file and cannot become a `ModuleId`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModuleId(PathBuf);

impl ModuleId {
    /// Create a new module identifier from a filesystem path.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, ModuleIdError> {
        let path = path.as_ref();

        if path.as_os_str().is_empty() {
            return Err(ModuleIdError::EmptyPath);
        }

        if looks_like_virtual(path) {
            return Err(ModuleIdError::Virtual(path.to_string_lossy().into_owned()));
        }

        let joined = if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir()
                .map_err(|source| ModuleIdError::CurrentDir { source })?
                .join(path)
        };

        Ok(Self(joined.clean()))
    }

    /// Resolve the identity of a host resource.
    ///
    /// Returns `None` for anything without a backing file: missing resources,
    /// blank strings and virtual modules. Callers treat that as an expected
    /// absence rather than an error. Any other resource is used verbatim;
    /// surrounding whitespace is part of a file name.
    pub fn resolve(resource: Option<&str>) -> Option<Self> {
        let resource = resource?;
        if resource.trim().is_empty() {
            return None;
        }
        match Self::new(resource) {
            Ok(id) => Some(id),
            Err(err) => {
                tracing::trace!("Unresolvable module resource {:?}: {}", resource, err);
                None
            }
        }
    }

    /// Returns the underlying path representation.
    pub fn as_path(&self) -> &Path {
        &self.0
    }

    /// Borrow the identifier as a string for logging/serialization.
    pub fn path_string(&self) -> Cow<'_, str> {
        self.0.to_string_lossy()
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path_string())
    }
}

impl Serialize for ModuleId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.path_string())
    }
}

impl<'de> Deserialize<'de> for ModuleId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        ModuleId::new(&value).map_err(serde::de::Error::custom)
    }
}

/// Error type for `ModuleId` construction failures.
#[derive(Debug, Error)]
pub enum ModuleIdError {
    /// The provided path was empty.
    #[error("module id path is empty")]
    EmptyPath,

    /// The path names a virtual module with no backing file.
    #[error("virtual module '{0}' has no backing file")]
    Virtual(String),

    /// Failed to resolve the current working directory for relative paths.
    #[error("failed to resolve current directory: {source}")]
    CurrentDir {
        #[source]
        source: io::Error,
    },
}

fn looks_like_virtual(path: &Path) -> bool {
    let text = path.to_string_lossy();
    text.starts_with('\0') || VIRTUAL_PREFIXES.iter().any(|prefix| text.starts_with(prefix))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cleans_dot_segments() {
        let id = ModuleId::new("/project/src/../src/./index.ts").unwrap();
        assert_eq!(id.as_path(), Path::new("/project/src/index.ts"));
    }

    #[test]
    fn relative_paths_become_absolute() {
        let id = ModuleId::new("src/index.ts").unwrap();
        assert!(id.as_path().is_absolute());
        assert!(id.as_path().ends_with("src/index.ts"));
    }

    #[test]
    fn virtual_modules_are_rejected() {
        assert!(matches!(
            ModuleId::new("virtual:entry"),
            Err(ModuleIdError::Virtual(_))
        ));
        assert!(matches!(
            ModuleId::new("\0commonjsHelpers.js"),
            Err(ModuleIdError::Virtual(_))
        ));
        assert!(matches!(ModuleId::new(""), Err(ModuleIdError::EmptyPath)));
    }

    #[test]
    fn resolve_treats_misses_as_none() {
        assert!(ModuleId::resolve(None).is_none());
        assert!(ModuleId::resolve(Some("")).is_none());
        assert!(ModuleId::resolve(Some("  ")).is_none());
        assert!(ModuleId::resolve(Some("rolldown:runtime")).is_none());
        assert_eq!(
            ModuleId::resolve(Some("/app/a.js")),
            Some(ModuleId::new("/app/a.js").unwrap())
        );
    }

    #[test]
    fn resolve_keeps_whitespace_in_file_names() {
        let plain = ModuleId::resolve(Some("/app/a.js")).unwrap();
        let spaced = ModuleId::resolve(Some("/app/a.js ")).unwrap();
        assert_ne!(plain, spaced);
        assert_eq!(spaced, ModuleId::new("/app/a.js ").unwrap());
        assert_eq!(
            ModuleId::resolve(Some(" /app/b.js")),
            ModuleId::new(" /app/b.js").ok()
        );
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = ModuleId::new("/app/a.js").unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"/app/a.js\"");
        let back: ModuleId = serde_json::from_str("\"/app/a.js\"").unwrap();
        assert_eq!(back, id);
    }
}
