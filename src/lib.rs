//! Xcode invocation resolution
//!
//! Turns a declarative build request into one deterministic `xcodebuild`
//! argument vector. Values the lane controls (project, configuration, SDK,
//! target, code signing, output directories) are kept apart from values the
//! user may override; a user value that collides with a managed key is a
//! configuration error, never a silent override.
//!
//! Flow: raw maps → [`OptionSet`] / [`SettingSet`] → [`BuildContext`] →
//! [`CommandLineBuilder`].

pub mod command;
pub mod context;
pub mod entries;
pub mod error;
pub mod invocation;
pub mod layout;
pub mod logging;
pub mod managed;
pub mod options;
pub mod request;
pub mod settings;

pub use command::{CommandLineBuilder, XCODEBUILD};
pub use context::{BuildContext, OutputSink, SourceCodeLocation};
pub use entries::Entries;
pub use error::{ConfigError, EntryKind, Result};
pub use invocation::InvocationRecord;
pub use managed::{ManagedOption, ManagedSetting};
pub use options::OptionSet;
pub use request::{BuildRequest, RequestError};
pub use settings::SettingSet;
