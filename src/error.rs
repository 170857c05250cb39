//! Configuration error taxonomy
//!
//! Every failure raised while resolving options, settings or a build context
//! is an invalid-configuration error. Nothing here is retried: the error aborts
//! command-line assembly before xcodebuild is ever started.

use std::path::PathBuf;

/// Which of the two key/value sets an error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Option,
    Setting,
}

impl EntryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::Option => "option",
            EntryKind::Setting => "setting",
        }
    }
}

impl std::fmt::Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Invalid configuration detected before any xcodebuild invocation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Xcode option '{key}' is managed and cannot be supplied by the user")]
    ManagedOptionCollision { key: String },

    #[error("Xcode setting '{key}' is managed and cannot be supplied by the user")]
    ManagedSettingCollision { key: String },

    #[error("Unknown managed option '{key}'")]
    UnknownManagedOption { key: String },

    #[error("Unknown managed setting '{key}'")]
    UnknownManagedSetting { key: String },

    #[error("Required option '{key}' was not available inside the managed options")]
    MissingRequiredOption { key: String },

    #[error("Empty {kind} key found. Value was: '{value}'")]
    EmptyKey { kind: EntryKind, value: String },

    #[error("No value provided for managed setting '{key}'")]
    MissingSettingValue { key: String },

    #[error(
        "Code sign identity was empty. To use the code sign identity defined in the \
         Xcode project configuration, do not provide a code sign identity at all"
    )]
    EmptyCodeSignIdentity,

    #[error("No build actions have been provided")]
    EmptyBuildActions,

    #[error("Build action at position {index} is empty")]
    EmptyBuildAction { index: usize },

    #[error("Invalid build action '{action}' (expected [A-Za-z0-9_]+)")]
    InvalidBuildAction { action: String },

    #[error("Project root directory '{}' cannot be read: {reason}", path.display())]
    UnreadableProjectDirectory { path: PathBuf, reason: String },

    #[error("Invalid {kind} {name}: was empty (key '{key}', value '{value}')")]
    EmptyArgument {
        kind: EntryKind,
        name: &'static str,
        key: String,
        value: String,
    },

    #[error("Option '{key}' is '{context}' in the build context but '{requested}' was requested")]
    ConflictingOption {
        key: String,
        context: String,
        requested: String,
    },
}

/// Result alias for configuration resolution
pub type Result<T, E = ConfigError> = std::result::Result<T, E>;
