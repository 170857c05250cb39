//! xcodebuild command-line assembly
//!
//! Serializes a [`BuildContext`] into the argument vector of one xcodebuild
//! invocation. Order is fixed: tool name, options (`-key value`, user options
//! before managed ones), settings (`KEY=value`, same rule), then the build
//! actions in the order given.
//!
//! The space-joined form from `Display` is for logs only. Processes are
//! spawned from the argument vector so no shell quoting is involved.

use std::fmt;
use std::process::Command;
use tracing::debug;

use crate::context::BuildContext;
use crate::entries::Entries;
use crate::error::{ConfigError, EntryKind, Result};
use crate::managed::ManagedOption;

/// Name of the external build tool
pub const XCODEBUILD: &str = "xcodebuild";

/// Flag replacing the build actions when querying effective build settings
pub const SHOW_BUILD_SETTINGS: &str = "-showBuildSettings";

/// Builds xcodebuild argument vectors for one context and configuration/SDK pair
#[derive(Debug, Clone)]
pub struct CommandLineBuilder<'a> {
    context: &'a BuildContext,
    options: Entries,
    settings: Entries,
}

impl<'a> CommandLineBuilder<'a> {
    /// Resolve the options and settings that will be emitted.
    ///
    /// An empty `configuration` or `sdk` keeps whatever the context carries.
    /// A non-empty one fills the option when the context has none and must
    /// match it otherwise.
    pub fn new(configuration: &str, sdk: &str, context: &'a BuildContext) -> Result<Self> {
        let mut options = context.options().clone();
        for (option, requested) in [
            (ManagedOption::Configuration, configuration),
            (ManagedOption::Sdk, sdk),
        ] {
            let requested = requested.trim();
            if requested.is_empty() {
                continue;
            }
            match options.get(option).map(str::to_string) {
                Some(current) if current != requested => {
                    return Err(ConfigError::ConflictingOption {
                        key: option.name().to_string(),
                        context: current,
                        requested: requested.to_string(),
                    });
                }
                Some(_) => {}
                None => options = options.with_managed(option, requested)?,
            }
        }

        let options = options.effective_options();
        for (key, value) in options.iter() {
            if key.is_empty() {
                return Err(empty_argument(EntryKind::Option, "key", key, value));
            }
            if value.is_empty() {
                return Err(empty_argument(EntryKind::Option, "value", key, value));
            }
        }

        let settings = context.settings().effective_settings();
        for (key, value) in settings.iter() {
            if key.is_empty() {
                return Err(empty_argument(EntryKind::Setting, "key", key, value));
            }
        }

        Ok(Self {
            context,
            options,
            settings,
        })
    }

    /// The options in emission order
    pub fn options(&self) -> &Entries {
        &self.options
    }

    pub fn settings(&self) -> &Entries {
        &self.settings
    }

    pub fn context(&self) -> &BuildContext {
        self.context
    }

    /// `xcodebuild <options> <settings> <build actions>`
    pub fn build_call(&self) -> Vec<String> {
        let mut argv = self.base_call();
        argv.extend(self.context.build_actions().iter().cloned());
        debug!(argc = argv.len(), "assembled xcodebuild build call");
        argv
    }

    /// `xcodebuild <options> <settings> -showBuildSettings`
    pub fn show_build_settings_call(&self) -> Vec<String> {
        let mut argv = self.base_call();
        argv.push(SHOW_BUILD_SETTINGS.to_string());
        argv
    }

    /// Process ready to spawn in the project root, arguments passed verbatim
    pub fn command(&self) -> Command {
        let argv = self.build_call();
        let mut cmd = Command::new(&argv[0]);
        cmd.args(&argv[1..])
            .current_dir(self.context.project_root_directory());
        cmd
    }

    fn base_call(&self) -> Vec<String> {
        let mut argv = Vec::with_capacity(1 + 2 * self.options.len() + self.settings.len());
        argv.push(XCODEBUILD.to_string());
        for (key, value) in self.options.iter() {
            argv.push(format!("-{}", key));
            argv.push(value.to_string());
        }
        for (key, value) in self.settings.iter() {
            argv.push(format!("{}={}", key, value));
        }
        argv
    }
}

impl fmt::Display for CommandLineBuilder<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.build_call().join(" "))
    }
}

fn empty_argument(kind: EntryKind, name: &'static str, key: &str, value: &str) -> ConfigError {
    ConfigError::EmptyArgument {
        kind,
        name,
        key: key.to_string(),
        value: value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::OutputSink;
    use crate::options::OptionSet;
    use crate::settings::SettingSet;
    use tempfile::TempDir;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    fn managed() -> Vec<(&'static str, &'static str)> {
        vec![("project", "MyLib.xcodeproj"), ("configuration", "Release")]
    }

    fn ctx(dir: &TempDir, options: OptionSet, settings: Option<SettingSet>) -> BuildContext {
        BuildContext::new(
            ["clean", "build"],
            dir.path(),
            OutputSink::Stdout,
            Some(options),
            settings,
        )
        .unwrap()
    }

    #[test]
    fn test_straight_forward() {
        let dir = TempDir::new().unwrap();
        let context = ctx(&dir, OptionSet::from_managed(managed()).unwrap(), None);
        let builder = CommandLineBuilder::new("Release", "mysdk", &context).unwrap();

        assert_eq!(
            builder.build_call(),
            argv(&[
                "xcodebuild",
                "-project",
                "MyLib.xcodeproj",
                "-configuration",
                "Release",
                "-sdk",
                "mysdk",
                "OBJROOT=build",
                "SYMROOT=build",
                "DSTROOT=build",
                "SHARED_PRECOMPS_DIR=build",
                "clean",
                "build",
            ])
        );
    }

    #[test]
    fn test_user_options_emitted_first() {
        let dir = TempDir::new().unwrap();
        let options = OptionSet::new([("arch", "i386")], managed()).unwrap();
        let context = ctx(&dir, options, None);
        let builder = CommandLineBuilder::new("Release", "mysdk", &context).unwrap();

        let call = builder.build_call();
        assert_eq!(&call[..7], &argv(&[
            "xcodebuild",
            "-arch",
            "i386",
            "-project",
            "MyLib.xcodeproj",
            "-configuration",
            "Release",
        ])[..]);
    }

    #[test]
    fn test_user_settings_emitted_before_managed() {
        let dir = TempDir::new().unwrap();
        let settings = SettingSet::new(
            [
                ("VALID_ARCHS", "i386"),
                ("CONFIGURATION_BUILD_DIR", "/Users/me/myapp/build"),
            ],
            Vec::<(String, Option<String>)>::new(),
        )
        .unwrap();
        let context = ctx(&dir, OptionSet::from_managed(managed()).unwrap(), Some(settings));
        let builder = CommandLineBuilder::new("", "", &context).unwrap();

        assert_eq!(
            builder.build_call(),
            argv(&[
                "xcodebuild",
                "-project",
                "MyLib.xcodeproj",
                "-configuration",
                "Release",
                "VALID_ARCHS=i386",
                "CONFIGURATION_BUILD_DIR=/Users/me/myapp/build",
                "OBJROOT=build",
                "SYMROOT=build",
                "DSTROOT=build",
                "SHARED_PRECOMPS_DIR=build",
                "clean",
                "build",
            ])
        );
    }

    #[test]
    fn test_code_sign_identity_emitted() {
        let dir = TempDir::new().unwrap();
        let settings = SettingSet::new(
            Vec::<(String, String)>::new(),
            [("CODE_SIGN_IDENTITY", Some("MyCodeSignIdentity"))],
        )
        .unwrap();
        let context = ctx(&dir, OptionSet::from_managed(managed()).unwrap(), Some(settings));
        let call = CommandLineBuilder::new("Release", "mysdk", &context)
            .unwrap()
            .build_call();

        assert!(call.contains(&"CODE_SIGN_IDENTITY=MyCodeSignIdentity".to_string()));
    }

    #[test]
    fn test_code_sign_identity_none_not_emitted() {
        let dir = TempDir::new().unwrap();
        let settings = SettingSet::new(
            Vec::<(String, String)>::new(),
            [("CODE_SIGN_IDENTITY", None::<String>)],
        )
        .unwrap();
        let context = ctx(&dir, OptionSet::from_managed(managed()).unwrap(), Some(settings));
        let call = CommandLineBuilder::new("Release", "mysdk", &context)
            .unwrap()
            .build_call();

        assert!(call.iter().all(|arg| !arg.contains("CODE_SIGN_IDENTITY=")));
    }

    #[test]
    fn test_provisioning_profile() {
        let dir = TempDir::new().unwrap();
        let settings = SettingSet::new(
            Vec::<(String, String)>::new(),
            [("PROVISIONING_PROFILE", Some("MyProvisioningProfile"))],
        )
        .unwrap();
        let context = ctx(&dir, OptionSet::from_managed(managed()).unwrap(), Some(settings));
        let call = CommandLineBuilder::new("Release", "mysdk", &context)
            .unwrap()
            .build_call();
        assert!(call.contains(&"PROVISIONING_PROFILE=MyProvisioningProfile".to_string()));

        let context = ctx(&dir, OptionSet::from_managed(managed()).unwrap(), None);
        let call = CommandLineBuilder::new("Release", "mysdk", &context)
            .unwrap()
            .build_call();
        assert!(call.iter().all(|arg| !arg.contains("PROVISIONING_PROFILE=")));
    }

    #[test]
    fn test_sdk_from_context_kept() {
        let dir = TempDir::new().unwrap();
        let mut options = managed();
        options.push(("sdk", "iphonesimulator"));
        let context = ctx(&dir, OptionSet::from_managed(options).unwrap(), None);

        let builder = CommandLineBuilder::new("", "", &context).unwrap();
        assert_eq!(builder.options().get("sdk"), Some("iphonesimulator"));

        let builder = CommandLineBuilder::new("Release", "iphonesimulator", &context).unwrap();
        assert_eq!(builder.options().get("sdk"), Some("iphonesimulator"));
    }

    #[test]
    fn test_conflicting_configuration() {
        let dir = TempDir::new().unwrap();
        let context = ctx(&dir, OptionSet::from_managed(managed()).unwrap(), None);
        let err = CommandLineBuilder::new("Debug", "", &context).unwrap_err();
        assert_eq!(
            err,
            ConfigError::ConflictingOption {
                key: "configuration".to_string(),
                context: "Release".to_string(),
                requested: "Debug".to_string(),
            }
        );
    }

    #[test]
    fn test_empty_option_value_rejected() {
        let dir = TempDir::new().unwrap();
        let options = OptionSet::new([("arch", "")], managed()).unwrap();
        let context = ctx(&dir, options, None);
        let err = CommandLineBuilder::new("", "", &context).unwrap_err();
        assert_eq!(
            err,
            ConfigError::EmptyArgument {
                kind: EntryKind::Option,
                name: "value",
                key: "arch".to_string(),
                value: String::new(),
            }
        );
    }

    #[test]
    fn test_show_build_settings_call() {
        let dir = TempDir::new().unwrap();
        let context = ctx(&dir, OptionSet::from_managed(managed()).unwrap(), None);
        let call = CommandLineBuilder::new("", "iphoneos", &context)
            .unwrap()
            .show_build_settings_call();

        assert_eq!(call.first().map(String::as_str), Some("xcodebuild"));
        assert_eq!(call.last().map(String::as_str), Some("-showBuildSettings"));
        assert!(!call.contains(&"clean".to_string()));
    }

    #[test]
    fn test_deterministic_output() {
        let dir = TempDir::new().unwrap();
        let make = || {
            let options = OptionSet::new(
                [("arch", "arm64"), ("quiet", "YES"), ("jobs", "4")],
                managed(),
            )
            .unwrap();
            let settings = SettingSet::new(
                [("B", "2"), ("A", "1"), ("C", "3")],
                [("CODE_SIGN_IDENTITY", Some("X"))],
            )
            .unwrap();
            ctx(&dir, options, Some(settings))
        };

        let first = make();
        let second = make();
        let a = CommandLineBuilder::new("Release", "iphoneos", &first).unwrap();
        let b = CommandLineBuilder::new("Release", "iphoneos", &second).unwrap();

        assert_eq!(a.build_call(), b.build_call());
        assert_eq!(a.to_string(), b.to_string());
    }

    #[test]
    fn test_display_joins_with_single_space() {
        let dir = TempDir::new().unwrap();
        let context = ctx(&dir, OptionSet::from_managed(managed()).unwrap(), None);
        let builder = CommandLineBuilder::new("Release", "mysdk", &context).unwrap();

        assert_eq!(
            builder.to_string(),
            "xcodebuild -project MyLib.xcodeproj -configuration Release -sdk mysdk \
             OBJROOT=build SYMROOT=build DSTROOT=build SHARED_PRECOMPS_DIR=build clean build"
        );
    }

    #[test]
    fn test_command_uses_argv_directly() {
        let dir = TempDir::new().unwrap();
        let settings = SettingSet::new(
            Vec::<(String, String)>::new(),
            [("CODE_SIGN_IDENTITY", Some("iPhone Distribution: ACME"))],
        )
        .unwrap();
        let context = ctx(&dir, OptionSet::from_managed(managed()).unwrap(), Some(settings));
        let cmd = CommandLineBuilder::new("", "", &context).unwrap().command();

        assert_eq!(cmd.get_program(), "xcodebuild");
        let args: Vec<_> = cmd.get_args().map(|a| a.to_string_lossy().into_owned()).collect();
        assert!(args.contains(&"CODE_SIGN_IDENTITY=iPhone Distribution: ACME".to_string()));
        assert_eq!(cmd.get_current_dir(), Some(dir.path()));
    }
}
