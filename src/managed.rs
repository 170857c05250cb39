//! Managed key registries
//!
//! Options and settings whose values are owned by the lane rather than the
//! user. Each registry is a closed table iterated in declaration order, which
//! fixes the order managed entries are emitted on the command line.

/// Default value for the output directory settings
pub const XCODE_OUTPUT_DIRECTORY: &str = "build";

/// Options (`-key value` flags) controlled by the lane
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ManagedOption {
    Project,
    Configuration,
    Sdk,
    Target,
}

impl ManagedOption {
    /// All managed options in emission order
    pub const ALL: [ManagedOption; 4] = [
        ManagedOption::Project,
        ManagedOption::Configuration,
        ManagedOption::Sdk,
        ManagedOption::Target,
    ];

    /// Option name as passed to xcodebuild, without the leading dash
    pub fn name(&self) -> &'static str {
        match self {
            ManagedOption::Project => "project",
            ManagedOption::Configuration => "configuration",
            ManagedOption::Sdk => "sdk",
            ManagedOption::Target => "target",
        }
    }

    pub fn is_required(&self) -> bool {
        matches!(self, ManagedOption::Project | ManagedOption::Configuration)
    }

    /// Exact lookup by option name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|o| o.name() == name)
    }

    /// Case-insensitive lookup, used to detect user keys shadowing a managed option
    pub fn matching(key: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|o| o.name().eq_ignore_ascii_case(key.trim()))
    }
}

impl std::fmt::Display for ManagedOption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Build settings (`KEY=value` assignments) controlled by the lane
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ManagedSetting {
    CodeSignIdentity,
    ProvisioningProfile,
    ObjRoot,
    SymRoot,
    DstRoot,
    SharedPrecompsDir,
}

impl ManagedSetting {
    /// All managed settings in emission order
    pub const ALL: [ManagedSetting; 6] = [
        ManagedSetting::CodeSignIdentity,
        ManagedSetting::ProvisioningProfile,
        ManagedSetting::ObjRoot,
        ManagedSetting::SymRoot,
        ManagedSetting::DstRoot,
        ManagedSetting::SharedPrecompsDir,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ManagedSetting::CodeSignIdentity => "CODE_SIGN_IDENTITY",
            ManagedSetting::ProvisioningProfile => "PROVISIONING_PROFILE",
            ManagedSetting::ObjRoot => "OBJROOT",
            ManagedSetting::SymRoot => "SYMROOT",
            ManagedSetting::DstRoot => "DSTROOT",
            ManagedSetting::SharedPrecompsDir => "SHARED_PRECOMPS_DIR",
        }
    }

    /// Value filled in when the setting is absent from the managed map.
    ///
    /// Only the output directories have one; explicit output directories are
    /// recommended for command-line builds.
    pub fn default_value(&self) -> Option<&'static str> {
        match self {
            ManagedSetting::CodeSignIdentity | ManagedSetting::ProvisioningProfile => None,
            ManagedSetting::ObjRoot
            | ManagedSetting::SymRoot
            | ManagedSetting::DstRoot
            | ManagedSetting::SharedPrecompsDir => Some(XCODE_OUTPUT_DIRECTORY),
        }
    }

    pub fn is_required(&self) -> bool {
        self.default_value().is_some()
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.name() == name)
    }
}

impl std::fmt::Display for ManagedSetting {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
