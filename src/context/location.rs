//! Where a build reads its sources from and where its output goes

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Which copy of the Xcode project a build runs against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceCodeLocation {
    /// The checked-in project sources
    Original,
    /// The copy the lane prepared for building
    WorkingCopy,
}

impl SourceCodeLocation {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceCodeLocation::Original => "original",
            SourceCodeLocation::WorkingCopy => "working-copy",
        }
    }
}

impl std::fmt::Display for SourceCodeLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Destination for the tool's console output.
///
/// Only carried through to the process runner; nothing in this crate writes
/// to it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum OutputSink {
    #[default]
    Stdout,
    Stderr,
    File(PathBuf),
}
