//! Declarative build requests (`xcode.toml`)
//!
//! A request names the project, the configurations and SDKs to build, code
//! signing, and free-form user options and settings. It is translated into one
//! [`BuildContext`] per configuration/SDK pair; all managed/user validation
//! happens there.
//!
//! ```toml
//! project = "MyLib"
//! configurations = ["Release"]
//! sdks = ["iphoneos"]
//! code_sign_identity = "iPhone Distribution"
//!
//! [options]
//! arch = "arm64"
//!
//! [settings]
//! VALID_ARCHS = "arm64"
//! ```

pub mod defaults;

use serde::Deserialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::context::{BuildContext, OutputSink, SourceCodeLocation, PROJECT_SUFFIX};
use crate::error::ConfigError;
use crate::managed::{ManagedOption, ManagedSetting};
use crate::options::OptionSet;
use crate::settings::SettingSet;

/// Error types for request loading
#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    #[error("Failed to read request file: {0}")]
    IoError(#[from] io::Error),

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Value of '{key}' in [{table}] must be a string")]
    InvalidValue { table: &'static str, key: String },

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Project source locations, relative to the request's base directory
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SourcePaths {
    #[serde(default = "defaults::original_dir")]
    pub original: String,

    #[serde(default = "defaults::working_copy_dir")]
    pub working_copy: String,
}

impl Default for SourcePaths {
    fn default() -> Self {
        Self {
            original: defaults::original_dir(),
            working_copy: defaults::working_copy_dir(),
        }
    }
}

/// Build request as read from `xcode.toml`
#[derive(Debug, Clone, Deserialize)]
pub struct BuildRequest {
    /// Project name without the `.xcodeproj` suffix
    pub project: String,

    #[serde(default = "defaults::configurations")]
    pub configurations: Vec<String>,

    #[serde(default = "defaults::sdks")]
    pub sdks: Vec<String>,

    /// Target to build; the project's first target when absent
    pub target: Option<String>,

    /// A blank identity leaves code signing to the Xcode project
    pub code_sign_identity: Option<String>,

    pub provisioning_profile: Option<String>,

    /// Defaults to `clean build` when empty
    #[serde(default)]
    pub build_actions: Vec<String>,

    /// User options, emitted in document order
    #[serde(default)]
    pub options: toml::Table,

    /// User build settings, emitted in document order
    #[serde(default)]
    pub settings: toml::Table,

    #[serde(default)]
    pub paths: SourcePaths,
}

impl BuildRequest {
    /// Load and parse a request from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, RequestError> {
        let contents = fs::read_to_string(path)?;
        Self::from_str(&contents)
    }

    /// Parse a request from a TOML string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Result<Self, RequestError> {
        let request: BuildRequest = toml::from_str(s)?;
        request.validate()?;
        Ok(request)
    }

    /// Structural checks that do not need a build context
    pub fn validate(&self) -> Result<(), RequestError> {
        if self.project.trim().is_empty() {
            return Err(RequestError::ValidationError(
                "'project' must not be empty".to_string(),
            ));
        }
        if self.configurations.is_empty() {
            return Err(RequestError::ValidationError(
                "At least one configuration must be defined in 'configurations'".to_string(),
            ));
        }
        if self.sdks.is_empty() {
            return Err(RequestError::ValidationError(
                "At least one SDK must be defined in 'sdks'".to_string(),
            ));
        }
        string_entries("options", &self.options)?;
        string_entries("settings", &self.settings)?;
        Ok(())
    }

    /// Every configuration/SDK pair, configurations outermost
    pub fn matrix(&self) -> Vec<(String, String)> {
        self.configurations
            .iter()
            .flat_map(|c| self.sdks.iter().map(move |s| (c.clone(), s.clone())))
            .collect()
    }

    /// Requested build actions, or `clean build`
    pub fn build_actions(&self) -> Vec<String> {
        if self.build_actions.is_empty() {
            defaults::BUILD_ACTIONS.iter().map(|a| a.to_string()).collect()
        } else {
            self.build_actions.clone()
        }
    }

    /// Project root for a source location
    pub fn project_root(&self, base: &Path, location: SourceCodeLocation) -> PathBuf {
        match location {
            SourceCodeLocation::Original => base.join(&self.paths.original),
            SourceCodeLocation::WorkingCopy => base.join(&self.paths.working_copy),
        }
    }

    /// Managed options for one configuration/SDK pair.
    ///
    /// Blank configuration, SDK or target values are left out.
    pub fn managed_options(&self, configuration: &str, sdk: &str) -> Vec<(String, String)> {
        let mut managed = vec![(
            ManagedOption::Project.name().to_string(),
            format!("{}{}", self.project, PROJECT_SUFFIX),
        )];
        let optional = [
            (ManagedOption::Configuration, Some(configuration)),
            (ManagedOption::Sdk, Some(sdk)),
            (ManagedOption::Target, self.target.as_deref()),
        ];
        for (option, value) in optional {
            if let Some(value) = value.filter(|v| !v.trim().is_empty()) {
                managed.push((option.name().to_string(), value.to_string()));
            }
        }
        managed
    }

    /// Managed settings taken from the code signing fields
    pub fn managed_settings(&self) -> Vec<(String, Option<String>)> {
        let mut managed = Vec::new();
        if let Some(identity) = self
            .code_sign_identity
            .as_deref()
            .filter(|i| !i.trim().is_empty())
        {
            managed.push((
                ManagedSetting::CodeSignIdentity.name().to_string(),
                Some(identity.to_string()),
            ));
        }
        if let Some(profile) = &self.provisioning_profile {
            managed.push((
                ManagedSetting::ProvisioningProfile.name().to_string(),
                Some(profile.clone()),
            ));
        }
        managed
    }

    /// Build context for one configuration/SDK pair
    pub fn context(
        &self,
        base: &Path,
        location: SourceCodeLocation,
        configuration: &str,
        sdk: &str,
    ) -> Result<BuildContext, RequestError> {
        let options = OptionSet::new(
            string_entries("options", &self.options)?,
            self.managed_options(configuration, sdk),
        )?;
        let settings = SettingSet::new(
            string_entries("settings", &self.settings)?,
            self.managed_settings(),
        )?;

        let root = self.project_root(base, location);
        debug!(%location, configuration, sdk, root = %root.display(), "building context from request");

        let context = BuildContext::new(
            self.build_actions(),
            root,
            OutputSink::Stdout,
            Some(options),
            Some(settings),
        )?;
        Ok(context)
    }
}

fn string_entries(
    table: &'static str,
    values: &toml::Table,
) -> Result<Vec<(String, String)>, RequestError> {
    values
        .iter()
        .map(|(key, value)| match value {
            toml::Value::String(s) => Ok((key.clone(), s.clone())),
            _ => Err(RequestError::InvalidValue {
                table,
                key: key.clone(),
            }),
        })
        .collect()
}
