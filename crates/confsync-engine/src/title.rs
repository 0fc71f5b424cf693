//! Page title derivation from folder names.

/// Display title for a folder name: underscores become spaces, trimmed.
///
/// ```
/// assert_eq!(confsync_engine::format_title("my_feature"), "my feature");
/// ```
pub fn format_title(segment: &str) -> String {
    segment.replace('_', " ").trim().to_owned()
}
