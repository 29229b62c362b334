//! Builder configuration.

use std::fmt;

/// What happens when set-once frame metadata is written twice before exit.
///
/// Covers the function name, return type, attribute and annotation entries,
/// map keys (`buffer_map`, `preflattened_buffer_map`, `env_threads`), and a
/// block's reads, writes, init and predicate. Append-only lists (parameters,
/// iteration variables, allocations) are never in conflict. Overwrites made
/// before a frame is entered are judged when it is entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MetadataPolicy {
    /// The later write replaces the earlier one.
    #[default]
    LastWriteWins,
    /// The later write fails with
    /// [`BuilderError::MetadataConflict`](crate::BuilderError::MetadataConflict).
    FailOnConflict,
}

impl fmt::Display for MetadataPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LastWriteWins => write!(f, "last-write-wins"),
            Self::FailOnConflict => write!(f, "fail-on-conflict"),
        }
    }
}

/// Configuration for a [`Builder`](crate::Builder) session.
#[derive(Debug, Clone)]
pub struct BuilderConfig {
    /// Overwrite semantics for set-once metadata.
    pub metadata_policy: MetadataPolicy,
    /// Annotate blocks whose reads or writes were never declared so a later
    /// pass can infer the footprint. See [`DETECT_ACCESS_ANNOTATION`].
    ///
    /// [`DETECT_ACCESS_ANNOTATION`]: crate::DETECT_ACCESS_ANNOTATION
    pub detect_access: bool,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            metadata_policy: MetadataPolicy::LastWriteWins,
            detect_access: true,
        }
    }
}

impl BuilderConfig {
    #[must_use]
    pub fn with_metadata_policy(mut self, policy: MetadataPolicy) -> Self {
        self.metadata_policy = policy;
        self
    }

    #[must_use]
    pub fn with_detect_access(mut self, detect_access: bool) -> Self {
        self.detect_access = detect_access;
        self
    }
}
