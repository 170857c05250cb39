//! Build context
//!
//! A [`BuildContext`] is the resolved, immutable description of one
//! xcodebuild invocation: the project root, the build actions and the merged
//! option and setting sets. Accessors such as [`BuildContext::sdk`] read
//! through to those sets rather than keeping copies.

mod location;

pub use location::{OutputSink, SourceCodeLocation};

use regex_lite::Regex;
use std::fmt;
use std::fs;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::debug;

use crate::error::{ConfigError, Result};
use crate::managed::{ManagedOption, ManagedSetting};
use crate::options::OptionSet;
use crate::settings::SettingSet;

/// Suffix of the project bundle passed with `-project`
pub const PROJECT_SUFFIX: &str = ".xcodeproj";

fn build_action_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z0-9_]+$").expect("build action pattern is valid"))
}

/// Everything needed to assemble one xcodebuild command line
#[derive(Debug, Clone)]
pub struct BuildContext {
    build_actions: Vec<String>,
    project_root_directory: PathBuf,
    out: OutputSink,
    options: OptionSet,
    settings: SettingSet,
}

impl BuildContext {
    /// Create a context, validating the build actions and the project root.
    ///
    /// Without `options`, an empty option set is validated instead, which
    /// fails for lack of the required `project` option. Without `settings`,
    /// the defaulted output directories are used.
    pub fn new<A>(
        build_actions: impl IntoIterator<Item = A>,
        project_root_directory: impl Into<PathBuf>,
        out: OutputSink,
        options: Option<OptionSet>,
        settings: Option<SettingSet>,
    ) -> Result<Self>
    where
        A: Into<String>,
    {
        let build_actions: Vec<String> = build_actions.into_iter().map(Into::into).collect();
        validate_build_actions(&build_actions)?;

        let project_root_directory = project_root_directory.into();
        ensure_readable(&project_root_directory)?;

        let options = match options {
            Some(options) => options,
            None => OptionSet::new(Vec::<(String, String)>::new(), Vec::<(String, String)>::new())?,
        };
        let settings = settings.unwrap_or_default();

        debug!(
            root = %project_root_directory.display(),
            actions = ?build_actions,
            "created build context"
        );

        Ok(Self {
            build_actions,
            project_root_directory,
            out,
            options,
            settings,
        })
    }

    pub fn build_actions(&self) -> &[String] {
        &self.build_actions
    }

    pub fn project_root_directory(&self) -> &Path {
        &self.project_root_directory
    }

    pub fn out(&self) -> &OutputSink {
        &self.out
    }

    pub fn options(&self) -> &OptionSet {
        &self.options
    }

    pub fn settings(&self) -> &SettingSet {
        &self.settings
    }

    /// Project name, i.e. the `project` option without its `.xcodeproj` suffix
    pub fn project_name(&self) -> Option<&str> {
        self.options
            .get(ManagedOption::Project)
            .map(|p| p.strip_suffix(PROJECT_SUFFIX).unwrap_or(p))
    }

    pub fn configuration(&self) -> Option<&str> {
        self.options.get(ManagedOption::Configuration)
    }

    pub fn sdk(&self) -> Option<&str> {
        self.options.get(ManagedOption::Sdk)
    }

    pub fn target(&self) -> Option<&str> {
        self.options.get(ManagedOption::Target)
    }

    pub fn code_sign_identity(&self) -> Option<&str> {
        self.settings.get(ManagedSetting::CodeSignIdentity)
    }

    pub fn provisioning_profile(&self) -> Option<&str> {
        self.settings.get(ManagedSetting::ProvisioningProfile)
    }
}

// The output sink is a runtime detail and takes no part in identity.
impl PartialEq for BuildContext {
    fn eq(&self, other: &Self) -> bool {
        self.build_actions == other.build_actions
            && self.options == other.options
            && self.project_root_directory == other.project_root_directory
            && self.settings == other.settings
    }
}

impl Eq for BuildContext {}

impl Hash for BuildContext {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.build_actions.hash(state);
        self.options.hash(state);
        self.project_root_directory.hash(state);
        self.settings.hash(state);
    }
}

impl fmt::Display for BuildContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "ProjectRootDirectory: {}",
            self.project_root_directory.display()
        )?;
        writeln!(f, "ProjectName         : {}", self.project_name().unwrap_or(""))?;
        writeln!(f, "BuildActions        : [{}]", self.build_actions.join(", "))?;
        writeln!(f, "Target              : {}", self.target().unwrap_or(""))?;
        write!(f, "Options             :")?;
        for (key, value) in self.options.effective_options().iter() {
            write!(f, " -{} {}", key, value)?;
        }
        writeln!(f)?;
        write!(f, "Settings            :")?;
        for (key, value) in self.settings.effective_settings().iter() {
            write!(f, " {}={}", key, value)?;
        }
        Ok(())
    }
}

fn validate_build_actions(actions: &[String]) -> Result<()> {
    if actions.is_empty() {
        return Err(ConfigError::EmptyBuildActions);
    }
    for (index, action) in actions.iter().enumerate() {
        if action.is_empty() {
            return Err(ConfigError::EmptyBuildAction { index });
        }
        if !build_action_pattern().is_match(action) {
            return Err(ConfigError::InvalidBuildAction {
                action: action.clone(),
            });
        }
    }
    Ok(())
}

fn ensure_readable(dir: &Path) -> Result<()> {
    fs::read_dir(dir)
        .map(|_| ())
        .map_err(|e| ConfigError::UnreadableProjectDirectory {
            path: dir.to_path_buf(),
            reason: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use tempfile::TempDir;

    fn options() -> OptionSet {
        OptionSet::from_managed([
            ("project", "MyLibrary.xcodeproj"),
            ("configuration", "Release"),
            ("sdk", "iphoneos"),
        ])
        .unwrap()
    }

    fn context(dir: &TempDir, actions: &[&str]) -> Result<BuildContext> {
        BuildContext::new(
            actions.iter().copied(),
            dir.path(),
            OutputSink::Stdout,
            Some(options()),
            None,
        )
    }

    #[test]
    fn test_straight_forward() {
        let dir = TempDir::new().unwrap();
        let settings = SettingSet::new(
            Vec::<(String, String)>::new(),
            [
                ("CODE_SIGN_IDENTITY", Some("MyCodeSignIdentity")),
                ("PROVISIONING_PROFILE", Some("MyProvisioningProfile")),
            ],
        )
        .unwrap();

        let ctx = BuildContext::new(
            ["clean", "build"],
            dir.path(),
            OutputSink::Stdout,
            Some(options()),
            Some(settings),
        )
        .unwrap();

        assert_eq!(ctx.project_name(), Some("MyLibrary"));
        assert_eq!(ctx.build_actions(), ["clean", "build"]);
        assert_eq!(ctx.configuration(), Some("Release"));
        assert_eq!(ctx.sdk(), Some("iphoneos"));
        assert_eq!(ctx.target(), None);
        assert_eq!(ctx.code_sign_identity(), Some("MyCodeSignIdentity"));
        assert_eq!(ctx.provisioning_profile(), Some("MyProvisioningProfile"));
        assert_eq!(ctx.project_root_directory(), dir.path());
    }

    #[test]
    fn test_empty_build_actions() {
        let dir = TempDir::new().unwrap();
        let err = context(&dir, &[]).unwrap_err();
        assert_eq!(err, ConfigError::EmptyBuildActions);
    }

    #[test]
    fn test_build_action_with_empty_entry() {
        let dir = TempDir::new().unwrap();
        let err = context(&dir, &["clean", "", "build"]).unwrap_err();
        assert_eq!(err, ConfigError::EmptyBuildAction { index: 1 });
    }

    #[test]
    fn test_build_action_with_blank() {
        let dir = TempDir::new().unwrap();
        let err = context(&dir, &["clean", "build foo"]).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidBuildAction {
                action: "build foo".to_string()
            }
        );
    }

    #[test]
    fn test_build_action_charset() {
        let dir = TempDir::new().unwrap();
        assert!(context(&dir, &["install_src", "Build2"]).is_ok());
        assert!(context(&dir, &["build;rm"]).is_err());
        assert!(context(&dir, &["-showBuildSettings"]).is_err());
    }

    #[test]
    fn test_unreadable_project_directory() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("does-not-exist");
        let err = BuildContext::new(
            ["build"],
            &missing,
            OutputSink::Stdout,
            Some(options()),
            None,
        )
        .unwrap_err();

        match err {
            ConfigError::UnreadableProjectDirectory { path, .. } => assert_eq!(path, missing),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_missing_options_fail_on_required_project() {
        let dir = TempDir::new().unwrap();
        let err =
            BuildContext::new(["build"], dir.path(), OutputSink::Stdout, None, None).unwrap_err();
        assert_eq!(
            err,
            ConfigError::MissingRequiredOption {
                key: "project".to_string()
            }
        );
    }

    #[test]
    fn test_code_sign_identity_and_profile_absent_by_default() {
        let dir = TempDir::new().unwrap();
        let ctx = context(&dir, &["build"]).unwrap();
        assert_eq!(ctx.code_sign_identity(), None);
        assert_eq!(ctx.provisioning_profile(), None);
        assert_eq!(ctx.settings(), &SettingSet::defaults());
    }

    #[test]
    fn test_equality_ignores_output_sink() {
        let dir = TempDir::new().unwrap();
        let a = context(&dir, &["clean", "build"]).unwrap();
        let b = BuildContext::new(
            ["clean", "build"],
            dir.path(),
            OutputSink::File(dir.path().join("xcodebuild.log")),
            Some(options()),
            None,
        )
        .unwrap();
        let c = context(&dir, &["build"]).unwrap();

        assert_eq!(a, b);
        assert_ne!(a, c);

        let set: HashSet<_> = [a, b, c].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_display() {
        let dir = TempDir::new().unwrap();
        let ctx = context(&dir, &["clean", "build"]).unwrap();
        let text = ctx.to_string();

        assert!(text.contains("ProjectName         : MyLibrary"));
        assert!(text.contains("BuildActions        : [clean, build]"));
        assert!(text.contains(" -project MyLibrary.xcodeproj -configuration Release -sdk iphoneos"));
        assert!(text.contains(" OBJROOT=build"));
    }
}
