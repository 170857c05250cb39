//! Built-in request defaults
//!
//! Values used when a request file leaves a field out.

/// Build actions run when none are requested
pub const BUILD_ACTIONS: [&str; 2] = ["clean", "build"];

/// Configurations built when none are requested
pub fn configurations() -> Vec<String> {
    vec!["Release".to_string(), "Debug".to_string()]
}

/// SDKs built when none are requested
pub fn sdks() -> Vec<String> {
    vec!["iphoneos".to_string(), "iphonesimulator".to_string()]
}

/// Checked-in project sources, relative to the request's base directory
pub fn original_dir() -> String {
    "src/xcode".to_string()
}

/// Prepared working copy, relative to the request's base directory
pub fn working_copy_dir() -> String {
    "target/xcode/src/main/xcode".to_string()
}
