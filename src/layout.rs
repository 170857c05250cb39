//! Output locations derived from a build's configuration and SDK

use std::path::{Path, PathBuf};

/// Static library produced for `project` in `<build_dir>/<configuration>-<sdk>/`
pub fn binary(build_dir: &Path, configuration: &str, sdk: &str, project_name: &str) -> PathBuf {
    configuration_build_dir(build_dir, configuration, sdk).join(format!("lib{}.a", project_name))
}

/// Per configuration/SDK product directory, as xcodebuild lays it out under SYMROOT
pub fn configuration_build_dir(build_dir: &Path, configuration: &str, sdk: &str) -> PathBuf {
    build_dir.join(format!("{}-{}", configuration, sdk))
}

/// Resource bundle directory `<dir>/<name>.bundle`
pub fn bundle_directory(src_dir: &Path, bundle_name: &str) -> PathBuf {
    src_dir.join(format!("{}.bundle", bundle_name))
}
