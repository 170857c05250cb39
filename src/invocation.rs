//! Invocation record for assembled xcodebuild commands
//!
//! A structured, serializable account of one command line: what will be run,
//! where, and a digest of the exact argument vector so two records can be
//! compared without diffing argv by hand.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::io;
use std::path::Path;

use crate::command::CommandLineBuilder;
use crate::layout;
use crate::managed::ManagedSetting;

/// Record of one assembled xcodebuild invocation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvocationRecord {
    /// When the record was created
    pub created_at: DateTime<Utc>,

    /// Working directory for the invocation
    pub project_root: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub configuration: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub sdk: Option<String>,

    /// Argument vector, tool name first
    pub argv: Vec<String>,

    /// Space-joined argv, for display only
    pub command_line: String,

    /// SHA-256 over the NUL-separated argv
    pub argv_sha256: String,

    /// Static library the build is expected to produce
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_binary: Option<String>,
}

impl InvocationRecord {
    /// Record the build call of `builder`
    pub fn from_build_call(builder: &CommandLineBuilder<'_>) -> Self {
        Self::record(builder, builder.build_call())
    }

    /// Record the show-build-settings call of `builder`
    pub fn from_show_build_settings_call(builder: &CommandLineBuilder<'_>) -> Self {
        Self::record(builder, builder.show_build_settings_call())
    }

    fn record(builder: &CommandLineBuilder<'_>, argv: Vec<String>) -> Self {
        let context = builder.context();
        let root = context.project_root_directory();
        let configuration = builder.options().get("configuration").map(String::from);
        let sdk = builder.options().get("sdk").map(String::from);

        let expected_binary = match (
            configuration.as_deref(),
            sdk.as_deref(),
            context.project_name(),
            builder.settings().get(ManagedSetting::SymRoot.name()),
        ) {
            (Some(configuration), Some(sdk), Some(project), Some(symroot)) => Some(
                layout::binary(&root.join(symroot), configuration, sdk, project)
                    .to_string_lossy()
                    .into_owned(),
            ),
            _ => None,
        };

        Self {
            created_at: Utc::now(),
            project_root: root.to_string_lossy().into_owned(),
            configuration,
            sdk,
            command_line: argv.join(" "),
            argv_sha256: argv_digest(&argv),
            argv,
            expected_binary,
        }
    }

    /// Serialize to JSON string with pretty formatting
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write the record as JSON to `path`
    pub fn write_to_file(&self, path: &Path) -> io::Result<()> {
        let json = self.to_json().map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("JSON serialization failed: {}", e),
            )
        })?;
        fs::write(path, json)
    }
}

/// Hex SHA-256 of the arguments joined with NUL bytes
pub fn argv_digest(argv: &[String]) -> String {
    let mut hasher = Sha256::new();
    for (i, arg) in argv.iter().enumerate() {
        if i > 0 {
            hasher.update([0u8]);
        }
        hasher.update(arg.as_bytes());
    }
    hex::encode(hasher.finalize())
}
