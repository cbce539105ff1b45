//! Ignore policy: decides which module paths are excluded from tracking.

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};

use crate::error::{Result, TrackerError};

/// Ordered, immutable set of glob patterns.
///
/// Patterns follow shell-style glob semantics against the full path: `*` and
/// `?` stay within one path segment, `**` spans any number of segments and
/// `{a,b}` alternates. An empty set ignores nothing.
#[derive(Debug, Clone)]
pub struct IgnorePolicy {
    patterns: Vec<String>,
    set: GlobSet,
}

impl IgnorePolicy {
    /// Compile an ignore policy from glob patterns.
    ///
    /// Pattern validation belongs to the glob compiler; a pattern it rejects
    /// is reported as [`TrackerError::Pattern`].
    pub fn new<I, S>(patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut builder = GlobSetBuilder::new();
        let mut kept = Vec::new();
        for pattern in patterns {
            let pattern = pattern.as_ref();
            let glob = GlobBuilder::new(pattern)
                .literal_separator(true)
                .build()
                .map_err(|source| TrackerError::Pattern {
                    pattern: pattern.to_string(),
                    source,
                })?;
            builder.add(glob);
            kept.push(pattern.to_string());
        }
        let set = builder.build().map_err(|source| TrackerError::Pattern {
            pattern: kept.join(", "),
            source,
        })?;

        Ok(Self {
            patterns: kept,
            set,
        })
    }

    /// A policy that ignores nothing.
    pub fn empty() -> Self {
        Self {
            patterns: Vec::new(),
            set: GlobSet::empty(),
        }
    }

    /// Returns `true` iff `path` matches at least one pattern.
    pub fn should_ignore(&self, path: &str) -> bool {
        if self.patterns.is_empty() {
            return false;
        }
        let ignored = self.set.is_match(path);
        tracing::trace!(path, ignored, "ignore policy check");
        ignored
    }

    /// The configured patterns, in configuration order.
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

impl Default for IgnorePolicy {
    fn default() -> Self {
        Self::empty()
    }
}
